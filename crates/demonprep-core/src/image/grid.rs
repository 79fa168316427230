use burn::tensor::{Tensor, TensorData, Shape};
use burn::tensor::backend::Backend;

/// Generate the continuous indices of every voxel of a 3D grid.
///
/// Rows follow the tensor's memory order (`x` fastest) and each row holds
/// `(x, y, z)`, the component order used by physical/index transforms.
///
/// # Arguments
/// * `shape` - The image shape `[Z, Y, X]`
/// * `device` - The device to create the tensor on
///
/// # Returns
/// Tensor of shape `[N, 3]`
pub fn generate_grid_3d<B>(
    shape: [usize; 3],
    device: &B::Device,
) -> Tensor<B, 2>
where
    B: Backend,
{
    let [d, h, w] = shape;
    let total = d * h * w;

    let mut grid = Vec::with_capacity(total * 3);
    for z in 0..d {
        for y in 0..h {
            for x in 0..w {
                grid.push(x as f32);
                grid.push(y as f32);
                grid.push(z as f32);
            }
        }
    }

    Tensor::<B, 1>::from_data(TensorData::new(grid, Shape::new([total * 3])), device)
        .reshape([total, 3])
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_grid_ordering() {
        let device = Default::default();
        let grid = generate_grid_3d::<TestBackend>([2, 1, 3], &device);
        assert_eq!(grid.dims(), [6, 3]);

        let data = grid.into_data();
        let values = data.as_slice::<f32>().unwrap();
        // Row 4 is voxel x=1, y=0, z=1
        assert_eq!(&values[12..15], &[1.0, 0.0, 1.0]);
    }
}
