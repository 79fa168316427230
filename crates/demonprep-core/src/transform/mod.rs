//! Spatial transforms and the displacement field handed to the solver.

pub mod trait_;
pub mod identity;
pub mod displacement_field;

pub use trait_::Transform;
pub use identity::IdentityTransform;
pub use displacement_field::DisplacementField;
