//! Merge rasters sharing crs and pixel grid into one raster covering
//! the union of their extents.

use itertools::Itertools;
use log::{debug, info};
use ndarray::{s, Array3, Zip};
use num::ToPrimitive;

use crate::{
    components::{DataType, GeoBounds, GeoTransform, Raster},
    errors::{Result, TileMosaicError},
    intersection::Intersection,
};

/// Largest origin offset, in pixels, still considered on the grid.
const ALIGNMENT_TOLERANCE: f64 = 1e-6;
/// Relative tolerance when comparing pixel sizes.
const RESOLUTION_TOLERANCE: f64 = 1e-9;

/// How overlapping valid pixels are resolved.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Deserialize,
    serde::Serialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// First raster in input order wins.
    #[default]
    First,
    /// Last raster in input order wins.
    Last,
    Min,
    Max,
}

impl MergeMethod {
    fn replaces<T: PartialOrd>(&self, filled: bool, current: T, candidate: T) -> bool {
        if !filled {
            return true;
        }
        match self {
            MergeMethod::First => false,
            MergeMethod::Last => true,
            MergeMethod::Min => candidate < current,
            MergeMethod::Max => candidate > current,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Mosaic {
    method: MergeMethod,
    nodata: Option<f64>,
}

impl Mosaic {
    /// Without `nodata` the first raster's nodata is used, zero if it has none.
    pub fn new(method: MergeMethod, nodata: Option<f64>) -> Self {
        Self { method, nodata }
    }

    pub fn build<T: DataType>(&self, rasters: &[Raster<T>]) -> Result<Raster<T>> {
        let first = rasters.first().ok_or(TileMosaicError::EmptyMosaic)?;
        let resolution = first.transform().resolution();
        for raster in rasters {
            check_compatible(first, raster)?;
        }
        self.log_overlaps(rasters);

        let bounds = rasters
            .iter()
            .map(Raster::bounds)
            .reduce(|union, bounds| union.union(&bounds))
            .ok_or(TileMosaicError::EmptyMosaic)?;
        let offsets = rasters
            .iter()
            .map(|raster| grid_offset(&bounds, &raster.bounds(), resolution))
            .collect::<Result<Vec<_>>>()?;
        let (rows, cols) = offsets.iter().zip(rasters).fold(
            (0usize, 0usize),
            |(rows, cols), ((row_off, col_off), raster)| {
                let (src_rows, src_cols) = raster.shape();
                (rows.max(row_off + src_rows), cols.max(col_off + src_cols))
            },
        );

        let nodata = self.nodata.or(first.nodata()).unwrap_or(0.);
        let fill = T::from(nodata).ok_or(TileMosaicError::Uncastable)?;
        let shape = (first.num_bands(), rows, cols);
        let mut data = Array3::from_elem(shape, fill);
        let mut filled = Array3::from_elem(shape, false);

        for (raster, (row_off, col_off)) in rasters.iter().zip(offsets) {
            let (src_rows, src_cols) = raster.shape();
            let (row_end, col_end) = (row_off + src_rows, col_off + src_cols);
            let src_nodata = raster.nodata();
            Zip::from(data.slice_mut(s![.., row_off..row_end, col_off..col_end]))
                .and(filled.slice_mut(s![.., row_off..row_end, col_off..col_end]))
                .and(raster.data())
                .for_each(|dst, dst_filled, src| {
                    if is_valid(*src, src_nodata) && self.method.replaces(*dst_filled, *dst, *src)
                    {
                        *dst = *src;
                        *dst_filled = true;
                    }
                });
            debug!("placed {src_rows}x{src_cols} raster at ({row_off}, {col_off})");
        }

        let transform = GeoTransform::new(
            resolution.0,
            0.,
            bounds.left(),
            0.,
            resolution.1,
            bounds.top(),
        );
        let mosaic = Raster::new(
            data,
            transform,
            first.shared_crs(),
            Some(nodata),
            first.band_names().into(),
        )?;
        info!(
            "merged {} rasters with {:?} into {mosaic:?}",
            rasters.len(),
            self.method
        );
        Ok(mosaic)
    }

    fn log_overlaps<T: DataType>(&self, rasters: &[Raster<T>]) {
        for ((lhs_idx, lhs), (rhs_idx, rhs)) in rasters.iter().enumerate().tuple_combinations() {
            if let Ok(overlap) = lhs.bounds().intersection(&rhs.bounds()) {
                debug!(
                    "rasters {lhs_idx} and {rhs_idx} overlap on {:?}, resolved by {:?}",
                    overlap, self.method
                );
            }
        }
    }
}

fn is_valid<T: DataType>(value: T, nodata: Option<f64>) -> bool {
    match value.to_f64() {
        Some(value) if value.is_nan() => false,
        Some(value) => nodata.map_or(true, |nodata| value != nodata),
        None => false,
    }
}

fn same_resolution(lhs: f64, rhs: f64) -> bool {
    (lhs - rhs).abs() <= RESOLUTION_TOLERANCE * lhs.abs().max(rhs.abs())
}

fn check_compatible<T: DataType>(reference: &Raster<T>, raster: &Raster<T>) -> Result<()> {
    let (res_x, res_y) = raster.transform().resolution();
    if raster.transform().is_rotated() || res_x <= 0. || res_y >= 0. {
        return Err(TileMosaicError::RotatedTransform);
    }
    if raster.num_bands() != reference.num_bands() {
        return Err(TileMosaicError::BandCountMismatch {
            expected: reference.num_bands(),
            found: raster.num_bands(),
        });
    }
    if raster.crs() != reference.crs() {
        return Err(TileMosaicError::CrsMismatch);
    }
    let expected = reference.transform().resolution();
    if !same_resolution(expected.0, res_x) || !same_resolution(expected.1, res_y) {
        return Err(TileMosaicError::ResolutionMismatch {
            expected,
            found: (res_x, res_y),
        });
    }
    Ok(())
}

/// `(row, col)` of `bounds` top left pixel on the grid starting at `mosaic`.
fn grid_offset(
    mosaic: &GeoBounds,
    bounds: &GeoBounds,
    resolution: (f64, f64),
) -> Result<(usize, usize)> {
    let col = (bounds.left() - mosaic.left()) / resolution.0;
    let row = (mosaic.top() - bounds.top()) / resolution.1.abs();
    let (col_err, row_err) = (col - col.round(), row - row.round());
    if col_err.abs() > ALIGNMENT_TOLERANCE || row_err.abs() > ALIGNMENT_TOLERANCE {
        return Err(TileMosaicError::Misaligned(col_err, row_err));
    }
    let row = row.round().to_usize().ok_or(TileMosaicError::Uncastable)?;
    let col = col.round().to_usize().ok_or(TileMosaicError::Uncastable)?;
    Ok((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use rstest::rstest;
    use std::rc::Rc;

    fn tile(left: f64, top: f64, band: Array2<u16>, nodata: Option<f64>) -> Raster<u16> {
        let (rows, cols) = band.dim();
        Raster::new(
            band.into_shape_with_order((1, rows, cols)).unwrap(),
            GeoTransform::from_origin(left, top, 10., 10.),
            Rc::from("EPSG:32633"),
            nodata,
            Box::from(["green".to_string()]),
        )
        .unwrap()
    }

    #[rstest]
    fn single_raster_is_reproduced() {
        let raster = tile(0., 20., array![[1, 2], [3, 4]], Some(0.));
        let mosaic = Mosaic::default().build(&[raster]).unwrap();
        assert_eq!(mosaic.band(0).unwrap(), array![[1, 2], [3, 4]]);
        assert_eq!(mosaic.transform(), &GeoTransform::from_origin(0., 20., 10., 10.));
        assert_eq!(mosaic.crs(), "EPSG:32633");
        assert_eq!(mosaic.band_names(), ["green".to_string()]);
    }

    #[rstest]
    fn adjacent_tiles_cover_union_extent() {
        let west = tile(0., 20., array![[1, 2], [3, 4]], Some(0.));
        let east = tile(20., 20., array![[5, 6, 7], [8, 9, 10]], Some(0.));
        let area = west.bounds().area() + east.bounds().area();
        let mosaic = Mosaic::default().build(&[west, east]).unwrap();

        assert_eq!(mosaic.shape(), (2, 5));
        assert_eq!(mosaic.bounds().area(), area);
        assert_eq!(
            mosaic.band(0).unwrap(),
            array![[1, 2, 5, 6, 7], [3, 4, 8, 9, 10]]
        );
    }

    #[rstest]
    fn gaps_are_filled_with_nodata() {
        let north_west = tile(0., 20., array![[1]], Some(65535.));
        let south_east = tile(10., 10., array![[2]], Some(65535.));
        let mosaic = Mosaic::default().build(&[north_west, south_east]).unwrap();
        assert_eq!(mosaic.band(0).unwrap(), array![[1, 65535], [65535, 2]]);
        assert_eq!(mosaic.nodata(), Some(65535.));
    }

    #[rstest]
    #[case(MergeMethod::First, array![[1, 2, 9]])]
    #[case(MergeMethod::Last, array![[1, 7, 9]])]
    #[case(MergeMethod::Min, array![[1, 2, 9]])]
    #[case(MergeMethod::Max, array![[1, 7, 9]])]
    fn overlaps_follow_method(#[case] method: MergeMethod, #[case] expected: Array2<u16>) {
        let west = tile(0., 10., array![[1, 2]], None);
        let east = tile(10., 10., array![[7, 9]], None);
        let mosaic = Mosaic::new(method, None).build(&[west, east]).unwrap();
        assert_eq!(mosaic.band(0).unwrap(), expected);
    }

    #[rstest]
    fn nodata_never_overwrites_valid_pixels() {
        let first = tile(0., 10., array![[0, 3]], Some(0.));
        let second = tile(0., 10., array![[4, 0]], Some(0.));
        let mosaic = Mosaic::new(MergeMethod::Last, None)
            .build(&[first, second])
            .unwrap();
        assert_eq!(mosaic.band(0).unwrap(), array![[4, 3]]);
    }

    #[rstest]
    fn explicit_nodata_is_used() {
        let raster = tile(0., 10., array![[1]], None);
        let other = tile(20., 10., array![[2]], None);
        let mosaic = Mosaic::new(MergeMethod::First, Some(9.))
            .build(&[raster, other])
            .unwrap();
        assert_eq!(mosaic.band(0).unwrap(), array![[1, 9, 2]]);
        assert_eq!(mosaic.nodata(), Some(9.));
    }

    #[rstest]
    fn empty_input_fails() {
        assert!(matches!(
            Mosaic::default().build::<u16>(&[]),
            Err(TileMosaicError::EmptyMosaic)
        ));
    }

    #[rstest]
    fn misaligned_tiles_fail() {
        let west = tile(0., 10., array![[1]], None);
        let east = tile(15., 10., array![[2]], None);
        assert!(matches!(
            Mosaic::default().build(&[west, east]),
            Err(TileMosaicError::Misaligned(..))
        ));
    }

    #[rstest]
    fn incompatible_tiles_fail() {
        let reference = tile(0., 10., array![[1]], None);

        let other_crs = Raster::new(
            array![[[2u16]]],
            GeoTransform::from_origin(10., 10., 10., 10.),
            Rc::from("EPSG:4326"),
            None,
            Box::from(["green".to_string()]),
        )
        .unwrap();
        let coarser = Raster::new(
            array![[[2u16]]],
            GeoTransform::from_origin(10., 10., 30., 30.),
            Rc::from("EPSG:32633"),
            None,
            Box::from(["green".to_string()]),
        )
        .unwrap();
        let more_bands = Raster::new(
            array![[[2u16]], [[3]]],
            GeoTransform::from_origin(10., 10., 10., 10.),
            Rc::from("EPSG:32633"),
            None,
            Box::from(["green".to_string(), "nir".to_string()]),
        )
        .unwrap();
        let rotated = Raster::new(
            array![[[2u16]]],
            GeoTransform::new(10., 1., 10., 0., -10., 10.),
            Rc::from("EPSG:32633"),
            None,
            Box::from(["green".to_string()]),
        )
        .unwrap();

        let mosaic = Mosaic::default();
        assert!(matches!(
            mosaic.build(&[tile(0., 10., array![[1]], None), other_crs]),
            Err(TileMosaicError::CrsMismatch)
        ));
        assert!(matches!(
            mosaic.build(&[tile(0., 10., array![[1]], None), coarser]),
            Err(TileMosaicError::ResolutionMismatch { .. })
        ));
        assert!(matches!(
            mosaic.build(&[tile(0., 10., array![[1]], None), more_bands]),
            Err(TileMosaicError::BandCountMismatch {
                expected: 1,
                found: 2
            })
        ));
        assert!(matches!(
            mosaic.build(&[reference, rotated]),
            Err(TileMosaicError::RotatedTransform)
        ));
    }
}
