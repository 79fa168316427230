use demonprep_core::filter::{
    count_foreground, BinaryMedianFilter, BinaryThresholdFilter, MaskImageFilter, RegionConfirmFilter,
};
use demonprep_core::image::{Image, ImageGeometry};
use burn_ndarray::NdArray;
use proptest::prelude::*;

type Backend = NdArray<f32>;

const N: usize = 16;

fn volume(values: Vec<f32>) -> Image<Backend, 3> {
    Image::from_vec(values, &ImageGeometry::default_for_size([N, N, N]), &Default::default()).unwrap()
}

fn idx(x: usize, y: usize, z: usize) -> usize {
    x + y * N + z * N * N
}

/// Two 4^3 cubes labelled 50, separated by a four voxel gap along x.
fn two_cubes_mask() -> Image<Backend, 3> {
    let mut values = vec![0.0; N * N * N];
    for z in 6..10 {
        for y in 6..10 {
            for x in 1..5 {
                values[idx(x, y, z)] = 50.0;
            }
            for x in 9..13 {
                values[idx(x, y, z)] = 50.0;
            }
        }
    }
    volume(values)
}

fn extract(source: &Image<Backend, 3>, mask: &Image<Backend, 3>, seed: [usize; 3], fill: f32) -> Image<Backend, 3> {
    let binary = BinaryThresholdFilter::new(1.0, 70.0).unwrap().apply(mask);
    let confirmed = RegionConfirmFilter::new(seed, [1, 1, 1]).apply(&binary).unwrap();
    let cleaned = BinaryMedianFilter::new([0, 0, 0]).apply(&confirmed).unwrap();
    MaskImageFilter::new(fill).apply(source, &cleaned).unwrap()
}

#[test]
fn test_disconnected_component_is_discarded() {
    let source = volume((0..N * N * N).map(|i| 100.0 + i as f32).collect());
    let mask = two_cubes_mask();

    let out = extract(&source, &mask, [2, 7, 7], -1.0).to_vec().unwrap();
    let src = source.to_vec().unwrap();

    assert_eq!(out[idx(3, 8, 8)], src[idx(3, 8, 8)]);
    assert_eq!(out[idx(10, 8, 8)], -1.0);
    assert_eq!(out.iter().filter(|&&v| v != -1.0).count(), 64);
}

#[test]
fn test_confirmed_region_size() {
    let binary = BinaryThresholdFilter::new(1.0, 70.0).unwrap().apply(&two_cubes_mask());
    assert_eq!(count_foreground(&binary), 128);

    let confirmed = RegionConfirmFilter::new([11, 8, 8], [1, 1, 1]).apply(&binary).unwrap();
    assert_eq!(count_foreground(&confirmed), 64);
}

proptest! {
    #[test]
    fn test_excluded_voxels_hold_fill_value(
        mask_bits in proptest::collection::vec(0u8..2, 27),
        source in proptest::collection::vec(-500.0f32..500.0, 27),
        fill in -10.0f32..10.0
    ) {
        let geometry = ImageGeometry::default_for_size([3, 3, 3]);
        let device = Default::default();
        let mask_values: Vec<f32> = mask_bits.iter().map(|&b| b as f32).collect();
        let mask = Image::<Backend, 3>::from_vec(mask_values.clone(), &geometry, &device).unwrap();
        let image = Image::<Backend, 3>::from_vec(source.clone(), &geometry, &device).unwrap();

        let out = MaskImageFilter::new(fill).apply(&image, &mask).unwrap().to_vec().unwrap();
        for i in 0..27 {
            if mask_values[i] == 0.0 {
                prop_assert_eq!(out[i], fill);
            } else {
                prop_assert_eq!(out[i], source[i]);
            }
        }
    }

    #[test]
    fn test_confirmed_region_is_subset_of_threshold(
        bits in proptest::collection::vec(0u8..2, 64),
        sx in 0usize..4, sy in 0usize..4, sz in 0usize..4
    ) {
        let geometry = ImageGeometry::default_for_size([4, 4, 4]);
        let values: Vec<f32> = bits.iter().map(|&b| b as f32).collect();
        let binary = Image::<Backend, 3>::from_vec(values.clone(), &geometry, &Default::default()).unwrap();

        let confirmed = RegionConfirmFilter::new([sx, sy, sz], [1, 1, 1])
            .apply(&binary)
            .unwrap()
            .to_vec()
            .unwrap();
        for i in 0..64 {
            prop_assert!(confirmed[i] <= values[i]);
        }
    }
}
