//! Discover tiles, mosaic them, write the mosaic and compute its NDWI.

use gdal::raster::GdalDataType;
use log::{debug, info, warn};
use ndarray::Axis;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    components::{gdal_engine, DataType, Raster},
    config::PipelineConfig,
    discovery,
    errors::Result,
    mosaic::Mosaic,
    render::{self, Histogram},
    spectral::{self, IndexSummary},
    Indexes,
};

#[derive(Debug)]
pub struct Report {
    pub inputs: Vec<PathBuf>,
    /// (rows, cols)
    pub mosaic_shape: (usize, usize),
    pub num_bands: usize,
    pub output: PathBuf,
    pub summary: IndexSummary,
    pub histogram: Histogram,
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(fs::create_dir_all(parent)?),
        _ => Ok(()),
    }
}

/// Run every step described by `config`.
///
/// The mosaic keeps the pixel type of the first input.
pub fn run(config: &PipelineConfig) -> Result<Report> {
    let inputs = discovery::discover(&config.data_dir, &config.pattern)?;
    info!(
        "found {} tiles matching {:?} in {:?}",
        inputs.len(),
        config.pattern,
        config.data_dir
    );
    match gdal_engine::band_type(&inputs[0])? {
        GdalDataType::UInt8 => run_typed::<u8>(config, inputs),
        GdalDataType::UInt16 => run_typed::<u16>(config, inputs),
        GdalDataType::Int16 => run_typed::<i16>(config, inputs),
        GdalDataType::UInt32 => run_typed::<u32>(config, inputs),
        GdalDataType::Int32 => run_typed::<i32>(config, inputs),
        GdalDataType::Float32 => run_typed::<f32>(config, inputs),
        other => {
            debug!("reading {other:?} pixels as f64");
            run_typed::<f64>(config, inputs)
        }
    }
}

fn run_typed<T: DataType>(config: &PipelineConfig, inputs: Vec<PathBuf>) -> Result<Report> {
    let (green, nir) = config.ndwi_bands()?;

    let rasters = inputs
        .iter()
        .map(|path| gdal_engine::open::<T, _>(path, &Indexes::all()))
        .collect::<Result<Vec<_>>>()?;
    let mosaic = Mosaic::new(config.method, config.nodata).build(&rasters)?;
    drop(rasters);
    mosaic.band(green)?;
    mosaic.band(nir)?;

    create_parent(&config.output)?;
    gdal_engine::write(&config.output, &mosaic)?;

    let index = spectral::ndwi_from_file(&config.output, green, nir)?;
    let summary = IndexSummary::new(index.view(), config.water_threshold);
    info!("ndwi {summary:?}");
    if summary.nan > 0 {
        warn!("{} pixels have no ndwi value", summary.nan);
    }
    let histogram = Histogram::new(index.iter(), config.histogram_bins, (-1., 1.));
    for (edge, count) in histogram.edges.iter().zip(&histogram.counts) {
        debug!("ndwi >= {edge:+.2}: {count}");
    }

    if let Some(path) = &config.ndwi_output {
        let index_raster = Raster::new(
            index.clone().insert_axis(Axis(0)),
            *mosaic.transform(),
            mosaic.shared_crs(),
            Some(f64::NAN),
            Box::from(["NDWI".to_string()]),
        )?;
        create_parent(path)?;
        gdal_engine::write(path, &index_raster)?;
    }
    if let Some(path) = &config.rgb_preview {
        create_parent(path)?;
        render::rgb_composite(&mosaic, config.preview_bands()?, render::DEFAULT_STRETCH)?
            .save(path)?;
        info!("saved rgb preview to {path:?}");
    }
    if let Some(path) = &config.ndwi_preview {
        create_parent(path)?;
        render::index_image(index.view())?.save(path)?;
        info!("saved ndwi preview to {path:?}");
    }

    Ok(Report {
        inputs,
        mosaic_shape: mosaic.shape(),
        num_bands: mosaic.num_bands(),
        output: config.output.clone(),
        summary,
        histogram,
    })
}
