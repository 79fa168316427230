use anyhow::{Context, Result};
use burn::tensor::backend::Backend;
use nalgebra::{SMatrix, Vector3};
use ndarray::{Array3, Ix3};
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use nifti::writer::WriterOptions;
use demonprep_core::image::{Image, ImageGeometry};
use demonprep_core::spatial::{Direction, Point, Spacing};
use std::path::Path;

/// Voxel-to-world affine stored in the header, row major.
///
/// Prefers the sform, then the qform, then bare `pixdim` scaling.
fn header_affine(header: &NiftiHeader) -> [[f64; 4]; 3] {
    let row = |r: [f32; 4]| r.map(|v| v as f64);
    if header.sform_code > 0 {
        return [row(header.srow_x), row(header.srow_y), row(header.srow_z)];
    }

    let [dx, dy, dz] = [1, 2, 3].map(|i| header.pixdim[i] as f64);
    if header.qform_code > 0 {
        let (b, c, d) = (
            header.quatern_b as f64,
            header.quatern_c as f64,
            header.quatern_d as f64,
        );
        let a = (1.0 - (b * b + c * c + d * d).min(1.0)).sqrt();
        let qfac = if header.pixdim[0] < 0.0 { -1.0 } else { 1.0 };
        let dz = dz * qfac;
        return [
            [
                (a * a + b * b - c * c - d * d) * dx,
                2.0 * (b * c - a * d) * dy,
                2.0 * (b * d + a * c) * dz,
                header.quatern_x as f64,
            ],
            [
                2.0 * (b * c + a * d) * dx,
                (a * a + c * c - b * b - d * d) * dy,
                2.0 * (c * d - a * b) * dz,
                header.quatern_y as f64,
            ],
            [
                2.0 * (b * d - a * c) * dx,
                2.0 * (c * d + a * b) * dy,
                (a * a + d * d - b * b - c * c) * dz,
                header.quatern_z as f64,
            ],
        ];
    }

    [
        [dx, 0.0, 0.0, 0.0],
        [0.0, dy, 0.0, 0.0],
        [0.0, 0.0, dz, 0.0],
    ]
}

/// Split an affine into origin, per-axis spacing and unit direction columns.
fn decompose_affine(affine: &[[f64; 4]; 3]) -> (Point<3>, Spacing<3>, Direction<3>) {
    let origin = Point::new([affine[0][3], affine[1][3], affine[2][3]]);
    let axes = [Vector3::x(), Vector3::y(), Vector3::z()];

    let mut spacing = [1.0; 3];
    let mut columns = axes;
    for col in 0..3 {
        let v = Vector3::new(affine[0][col], affine[1][col], affine[2][col]);
        let norm = v.norm();
        if norm > 1e-9 {
            spacing[col] = norm;
            columns[col] = v / norm;
        }
    }

    (
        origin,
        Spacing::new(spacing),
        Direction(SMatrix::<f64, 3, 3>::from_columns(&columns)),
    )
}

/// Read a 3-D NIfTI volume.
///
/// The returned tensor is laid out `[Z, Y, X]`; geometry comes from the
/// header's sform or qform.
pub fn read_nifti<B: Backend, P: AsRef<Path>>(path: P, device: &B::Device) -> Result<Image<B, 3>> {
    let path = path.as_ref();
    let obj = ReaderOptions::new()
        .read_file(path)
        .with_context(|| format!("Failed to read NIfTI file {}", path.display()))?;
    let (origin, spacing, direction) = decompose_affine(&header_affine(obj.header()));

    let volume = obj
        .into_volume()
        .into_ndarray::<f32>()
        .context("Failed to convert volume to ndarray")?;
    let ndim = volume.ndim();
    let volume = volume
        .into_dimensionality::<Ix3>()
        .with_context(|| format!("Expected 3D NIfTI file, found {} dimensions", ndim))?;

    let (nx, ny, nz) = volume.dim();
    let mut values = Vec::with_capacity(nx * ny * nz);
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                values.push(volume[[x, y, z]]);
            }
        }
    }

    let geometry = ImageGeometry::new([nz, ny, nx], origin, spacing, direction);
    tracing::debug!("Read {} with size {:?}", path.display(), geometry.size);
    Image::from_vec(values, &geometry, device).context("NIfTI voxel count does not match its header")
}

/// Write an image to a NIfTI file, geometry included as an sform.
pub fn write_nifti<B: Backend, P: AsRef<Path>>(path: P, image: &Image<B, 3>) -> Result<()> {
    let path = path.as_ref();
    let geometry = image.geometry();
    let [nz, ny, nx] = geometry.size;
    let values = image.to_vec().context("Failed to read tensor data")?;

    let array = Array3::from_shape_fn((nx, ny, nz), |(x, y, z)| values[x + y * nx + z * nx * ny]);

    let mut header = NiftiHeader::default();
    header.sform_code = 1;
    header.qform_code = 0;
    header.pixdim[0] = 1.0;
    let srows = [&mut header.srow_x, &mut header.srow_y, &mut header.srow_z];
    for (r, srow) in srows.into_iter().enumerate() {
        for c in 0..3 {
            srow[c] = (geometry.direction[(r, c)] * geometry.spacing[c]) as f32;
        }
        srow[3] = geometry.origin[r] as f32;
    }
    for axis in 0..3 {
        header.pixdim[axis + 1] = geometry.spacing[axis] as f32;
    }

    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(&array)
        .with_context(|| format!("Failed to write NIfTI file {}", path.display()))?;

    Ok(())
}
