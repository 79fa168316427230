pub mod config;
pub mod error;
pub mod preprocess;
pub mod preprocessor;
pub mod progress;
pub mod stages;

pub use config::{ExtractionConfig, HistogramMatchingConfig, PreprocessorConfig};
pub use error::{PreprocessError, Result};
pub use preprocess::{preprocess, PreprocessDiagnostics, PreprocessInputs, PreprocessOutput};
pub use preprocessor::DemonsPreprocessor;
pub use progress::{ConsoleProgressCallback, HistoryCallback, ProgressCallback, ProgressInfo, ProgressTracker};
pub use stages::{ExtractionDiagnostics, Stage};
