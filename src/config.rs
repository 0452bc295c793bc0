use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    discovery::DEFAULT_PATTERN,
    errors::{Result, TileMosaicError},
    mosaic::MergeMethod,
};

/// Settings of a pipeline run. Band numbers are one based, as in gdal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub pattern: String,
    pub output: PathBuf,
    pub method: MergeMethod,
    pub nodata: Option<f64>,
    pub green_band: usize,
    pub nir_band: usize,
    pub water_threshold: f64,
    pub ndwi_output: Option<PathBuf>,
    pub rgb_preview: Option<PathBuf>,
    pub rgb_bands: [usize; 3],
    pub ndwi_preview: Option<PathBuf>,
    pub histogram_bins: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            pattern: DEFAULT_PATTERN.to_string(),
            output: PathBuf::from("output/mosaic.tif"),
            method: MergeMethod::First,
            nodata: None,
            green_band: 2,
            nir_band: 4,
            water_threshold: 0.,
            ndwi_output: None,
            rgb_preview: None,
            rgb_bands: [3, 2, 1],
            ndwi_preview: None,
            histogram_bins: 20,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_toml(&fs::read_to_string(path)?)
    }

    fn zero_based(number: usize) -> Result<usize> {
        number
            .checked_sub(1)
            .ok_or(TileMosaicError::BandOutOfRange {
                index: number,
                count: 0,
            })
    }

    /// Zero based (green, nir) band indexes.
    pub fn ndwi_bands(&self) -> Result<(usize, usize)> {
        Ok((
            Self::zero_based(self.green_band)?,
            Self::zero_based(self.nir_band)?,
        ))
    }

    /// Zero based (red, green, blue) band indexes of the preview.
    pub fn preview_bands(&self) -> Result<[usize; 3]> {
        Ok([
            Self::zero_based(self.rgb_bands[0])?,
            Self::zero_based(self.rgb_bands[1])?,
            Self::zero_based(self.rgb_bands[2])?,
        ])
    }
}
