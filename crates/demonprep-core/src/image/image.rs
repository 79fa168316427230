//! Image type with physical metadata and coordinate transformations.
//!
//! This module provides the Image struct which represents a scalar volume
//! with tensor data and physical space metadata (origin, spacing, direction).

use burn::tensor::{Tensor, TensorData, Shape};
use burn::tensor::backend::Backend;
use crate::error::{ImageError, Result};
use crate::image::ImageGeometry;
use crate::spatial::{Point, Spacing, Direction, Vector};

/// Scalar volume with physical metadata.
///
/// # Type Parameters
/// * `B` - The backend (CPU or GPU) for tensor operations
/// * `D` - The dimensionality of the image
///
/// # Coordinate Systems
/// * **Index Space**: voxel indices ordered `(x, y, z)`; the tensor itself is
///   stored `[Z, Y, X]` so `x` is the fastest-varying memory axis
/// * **Physical Space**: `point = origin + Direction * (index * spacing)`
///
/// # Examples
/// ```rust
/// use demonprep_core::Image;
/// use demonprep_core::spatial::{Point3, Spacing3, Direction3};
/// use burn::tensor::Tensor;
/// use burn_ndarray::NdArray;
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let data = Tensor::<Backend, 3>::zeros([10, 10, 10], &device);
/// let image = Image::new(data, Point3::origin(), Spacing3::uniform(1.0), Direction3::identity());
/// assert_eq!(image.shape(), [10, 10, 10]);
/// ```
#[derive(Debug, Clone)]
pub struct Image<B: Backend, const D: usize> {
    /// The voxel data, potentially on GPU.
    data: Tensor<B, D>,
    /// Physical coordinate of the first voxel.
    origin: Point<D>,
    /// Physical distance between voxels along each axis.
    spacing: Spacing<D>,
    /// Orientation of the image axes.
    direction: Direction<D>,
}

impl<B: Backend, const D: usize> Image<B, D> {
    /// Create a new image with the given data and metadata.
    pub fn new(
        data: Tensor<B, D>,
        origin: Point<D>,
        spacing: Spacing<D>,
        direction: Direction<D>,
    ) -> Self {
        Self {
            data,
            origin,
            spacing,
            direction,
        }
    }

    /// Build an image from a flat buffer laid out in tensor memory order.
    pub fn from_vec(values: Vec<f32>, geometry: &ImageGeometry<D>, device: &B::Device) -> Result<Self> {
        let expected = geometry.num_voxels();
        if values.len() != expected {
            return Err(ImageError::ShapeMismatch {
                expected: vec![expected],
                actual: vec![values.len()],
            });
        }
        let data = Tensor::<B, D>::from_data(
            TensorData::new(values, Shape::new(geometry.size)),
            device,
        );
        Ok(Self::new(data, geometry.origin, geometry.spacing, geometry.direction))
    }

    /// New image on this image's grid holding `values`.
    pub fn with_values(&self, values: Vec<f32>) -> Result<Self> {
        Self::from_vec(values, &self.geometry(), &self.data.device())
    }

    /// Get the image data tensor.
    pub fn data(&self) -> &Tensor<B, D> {
        &self.data
    }

    /// Get the origin (physical coordinate of first voxel).
    pub fn origin(&self) -> &Point<D> {
        &self.origin
    }

    /// Get the spacing (physical distance between voxels).
    pub fn spacing(&self) -> &Spacing<D> {
        &self.spacing
    }

    /// Get the direction (orientation matrix).
    pub fn direction(&self) -> &Direction<D> {
        &self.direction
    }

    /// Get the image shape in tensor order.
    pub fn shape(&self) -> [usize; D] {
        self.data.dims()
    }

    /// Size and placement of the voxel grid.
    pub fn geometry(&self) -> ImageGeometry<D> {
        ImageGeometry::new(self.shape(), self.origin, self.spacing, self.direction)
    }

    /// Copy the voxel values to host memory in tensor memory order.
    pub fn to_vec(&self) -> Result<Vec<f32>> {
        self.data
            .to_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| ImageError::DataConversion(format!("{:?}", e)))
    }

    /// Convert a continuous physical point to a continuous index.
    ///
    /// `index = (Direction^-1 * (point - origin)) / spacing`
    pub fn transform_physical_point_to_continuous_index(&self, point: &Point<D>) -> Result<Point<D>> {
        let inv_dir = self.inverse_direction()?;
        let rotated = inv_dir * (*point - self.origin);

        let mut index = Point::<D>::origin();
        for i in 0..D {
            index[i] = rotated[i] / self.spacing[i];
        }
        Ok(index)
    }

    /// Convert a continuous index to a physical point.
    ///
    /// `point = origin + Direction * (index * spacing)`
    pub fn transform_continuous_index_to_physical_point(&self, index: &Point<D>) -> Point<D> {
        let mut scaled_index = Vector::<D>::zeros();
        for i in 0..D {
            scaled_index[i] = index[i] * self.spacing[i];
        }
        self.origin + self.direction * scaled_index
    }

    /// Batch transform physical points `[Batch, D]` to continuous indices.
    pub fn world_to_index_tensor(&self, points: Tensor<B, 2>) -> Result<Tensor<B, 2>> {
        let device = points.device();
        let origin_tensor = self.origin_tensor(&device);

        // I = (P - O) @ T with T_rc = (D^-1)_cr / S_c
        let inv_dir = self.inverse_direction()?;
        let mut t_data = Vec::with_capacity(D * D);
        for r in 0..D {
            for c in 0..D {
                t_data.push((inv_dir[(c, r)] / self.spacing[c]) as f32);
            }
        }
        let t_tensor = Tensor::<B, 2>::from_data(TensorData::new(t_data, Shape::new([D, D])), &device);

        Ok((points - origin_tensor).matmul(t_tensor))
    }

    /// Batch transform continuous indices `[Batch, D]` to physical points.
    pub fn index_to_world_tensor(&self, indices: Tensor<B, 2>) -> Tensor<B, 2> {
        let device = indices.device();
        let origin_tensor = self.origin_tensor(&device);

        // P = O + I @ M with M_rc = S_r * D_cr
        let mut m_data = Vec::with_capacity(D * D);
        for r in 0..D {
            for c in 0..D {
                m_data.push((self.spacing[r] * self.direction[(c, r)]) as f32);
            }
        }
        let m_tensor = Tensor::<B, 2>::from_data(TensorData::new(m_data, Shape::new([D, D])), &device);

        indices.matmul(m_tensor) + origin_tensor
    }

    fn origin_tensor(&self, device: &B::Device) -> Tensor<B, 2> {
        let origin_vec: Vec<f32> = (0..D).map(|i| self.origin[i] as f32).collect();
        Tensor::<B, 1>::from_data(TensorData::new(origin_vec, Shape::new([D])), device).reshape([1, D])
    }

    fn inverse_direction(&self) -> Result<Direction<D>> {
        self.direction
            .try_inverse()
            .ok_or_else(|| ImageError::invalid_geometry("direction matrix is singular"))
    }
}
