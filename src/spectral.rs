//! Band ratio indexes.
//!
//! The index of a pixel is `(a - b) / (a + b)`. Where `a + b == 0` the
//! result is NaN, it is neither an error nor replaced by zero.

use log::{debug, warn};
use ndarray::{Array2, ArrayView2, Zip};
use std::path::Path;

use crate::{
    components::{gdal_engine, DataType, Raster},
    errors::{Result, TileMosaicError},
    Indexes,
};

/// Normalized difference of a single pixel pair.
pub fn normalized_difference_pixel(a: f64, b: f64) -> f64 {
    let sum = a + b;
    if sum == 0. {
        f64::NAN
    } else {
        (a - b) / sum
    }
}

/// Elementwise `(band_a - band_b) / (band_a + band_b)`.
///
/// Bands must share their shape. For non negative inputs the result lies
/// in `[-1, 1]`.
pub fn normalized_difference(
    band_a: ArrayView2<f64>,
    band_b: ArrayView2<f64>,
) -> Result<Array2<f64>> {
    if band_a.dim() != band_b.dim() {
        return Err(TileMosaicError::ShapeMismatch {
            lhs: band_a.dim(),
            rhs: band_b.dim(),
        });
    }
    Ok(Zip::from(&band_a)
        .and(&band_b)
        .map_collect(|a, b| normalized_difference_pixel(*a, *b)))
}

/// Normalized Difference Water Index (McFeeters)
///
/// `NDWI = (Green - NIR) / (Green + NIR)`, positive over open water.
pub fn ndwi(green: ArrayView2<f64>, nir: ArrayView2<f64>) -> Result<Array2<f64>> {
    normalized_difference(green, nir)
}

/// NDWI of two zero based bands of an in memory raster.
///
/// Pixels equal to the raster's nodata are NaN in the result.
pub fn ndwi_from_raster<T: DataType>(
    raster: &Raster<T>,
    green: usize,
    nir: usize,
) -> Result<Array2<f64>> {
    let green = raster.valid_band_as_f64(green)?;
    let nir = raster.valid_band_as_f64(nir)?;
    ndwi(green.view(), nir.view())
}

/// Read the zero based `green` and `nir` bands of `path` as `f64` and
/// compute their NDWI.
pub fn ndwi_from_file<P: AsRef<Path>>(path: P, green: usize, nir: usize) -> Result<Array2<f64>> {
    let raster = gdal_engine::open::<f64, _>(&path, &Indexes::from([green, nir]))?;
    debug!("read bands {green} and {nir} of {:?}", path.as_ref());
    ndwi_from_raster(&raster, 0, 1)
}

/// Pixels whose index is above `threshold`. NaN is never water.
pub fn water_mask(index: ArrayView2<f64>, threshold: f64) -> Array2<bool> {
    index.mapv(|value| value > threshold)
}

/// Summary statistics of an index array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Pixels with a finite value.
    pub valid: usize,
    pub nan: usize,
    /// Share of valid pixels above the water threshold.
    pub water_fraction: f64,
}

impl IndexSummary {
    pub fn new(index: ArrayView2<f64>, water_threshold: f64) -> Self {
        let (mut min, mut max, mut sum) = (f64::INFINITY, f64::NEG_INFINITY, 0.);
        let (mut valid, mut nan) = (0, 0);
        let water = Zip::from(&water_mask(index, water_threshold))
            .and(&index)
            .fold(0, |count, is_water, value| {
                count + usize::from(*is_water && value.is_finite())
            });
        for value in index.iter().copied() {
            if value.is_nan() {
                nan += 1;
                continue;
            }
            if !value.is_finite() {
                continue;
            }
            valid += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }
        if valid == 0 {
            warn!("index has no finite values");
            return Self {
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
                valid,
                nan,
                water_fraction: f64::NAN,
            };
        }
        Self {
            min,
            max,
            mean: sum / valid as f64,
            valid,
            nan,
            water_fraction: water as f64 / valid as f64,
        }
    }
}
