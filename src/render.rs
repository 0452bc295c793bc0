//! Quick look products: stretched RGB composites, index previews and
//! histograms.

use image::{Rgb, RgbImage};
use log::debug;
use ndarray::{Array2, ArrayView2};

use crate::{
    components::{DataType, Raster},
    errors::{Result, TileMosaicError},
};

/// Default lower and upper percentiles of the contrast stretch.
pub const DEFAULT_STRETCH: (f64, f64) = (2., 98.);

const DRY: [f64; 3] = [140., 81., 10.];
const NEUTRAL: [f64; 3] = [245., 245., 245.];
const WET: [f64; 3] = [33., 102., 172.];

/// Counts of values per equal width bin over `range`.
///
/// The upper edge belongs to the last bin, values outside the range and
/// NaN are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn new<'a>(
        values: impl IntoIterator<Item = &'a f64>,
        bins: usize,
        range: (f64, f64),
    ) -> Self {
        let bins = bins.max(1);
        let (low, high) = range;
        let width = (high - low) / bins as f64;
        let edges = (0..=bins).map(|idx| low + width * idx as f64).collect();
        let mut counts = vec![0; bins];
        for value in values.into_iter().copied() {
            if !(low..=high).contains(&value) {
                continue;
            }
            let bin = if width > 0. {
                (((value - low) / width) as usize).min(bins - 1)
            } else {
                0
            };
            counts[bin] += 1;
        }
        Self { edges, counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Linearly interpolated percentile of the non NaN values.
pub fn percentile(values: &[f64], percent: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let rank = (percent.clamp(0., 100.) / 100.) * (sorted.len() - 1) as f64;
    let (lower, upper) = (rank.floor() as usize, rank.ceil() as usize);
    let fraction = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Map the `percentiles` range of `band` onto `0..=255`, NaN becomes 0.
pub fn stretch(band: ArrayView2<f64>, percentiles: (f64, f64)) -> Array2<u8> {
    let values: Vec<f64> = band.iter().copied().collect();
    let (Some(low), Some(high)) = (
        percentile(&values, percentiles.0),
        percentile(&values, percentiles.1),
    ) else {
        return Array2::zeros(band.dim());
    };
    debug!("stretching {low}..{high}");
    band.mapv(|value| {
        if value.is_nan() || high <= low {
            0
        } else {
            (((value - low) / (high - low)).clamp(0., 1.) * 255.).round() as u8
        }
    })
}

fn image_size(shape: (usize, usize)) -> Result<(u32, u32)> {
    let (rows, cols) = shape;
    let width = u32::try_from(cols).map_err(|_| TileMosaicError::Uncastable)?;
    let height = u32::try_from(rows).map_err(|_| TileMosaicError::Uncastable)?;
    Ok((width, height))
}

/// True or false colour composite of three zero based bands.
///
/// Nodata pixels are rendered black.
pub fn rgb_composite<T: DataType>(
    raster: &Raster<T>,
    bands: [usize; 3],
    percentiles: (f64, f64),
) -> Result<RgbImage> {
    let channels = bands
        .iter()
        .map(|band| {
            let values = raster.valid_band_as_f64(*band)?;
            Ok(stretch(values.view(), percentiles))
        })
        .collect::<Result<Vec<_>>>()?;
    let (width, height) = image_size(raster.shape())?;
    Ok(RgbImage::from_fn(width, height, |x, y| {
        let idx = [y as usize, x as usize];
        Rgb([channels[0][idx], channels[1][idx], channels[2][idx]])
    }))
}

fn lerp(from: [f64; 3], to: [f64; 3], fraction: f64) -> Rgb<u8> {
    let channel = |idx: usize| (from[idx] + (to[idx] - from[idx]) * fraction).round() as u8;
    Rgb([channel(0), channel(1), channel(2)])
}

/// Colour of an index value on a brown (-1), white (0), blue (1) ramp.
pub fn index_colour(value: f64) -> Rgb<u8> {
    if value.is_nan() {
        return Rgb([0, 0, 0]);
    }
    let value = value.clamp(-1., 1.);
    if value < 0. {
        lerp(NEUTRAL, DRY, -value)
    } else {
        lerp(NEUTRAL, WET, value)
    }
}

pub fn index_image(index: ArrayView2<f64>) -> Result<RgbImage> {
    let (width, height) = image_size(index.dim())?;
    Ok(RgbImage::from_fn(width, height, |x, y| {
        index_colour(index[[y as usize, x as usize]])
    }))
}
