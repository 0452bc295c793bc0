use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

use tilemosaic::{
    config::PipelineConfig,
    mosaic::MergeMethod,
    pipeline::{self, Report},
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Mosaic GeoTIFF tiles and map water with NDWI", long_about = None)]
struct Cli {
    /// TOML file with pipeline settings, flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the tiles
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Glob pattern of tile file names
    #[arg(long)]
    pattern: Option<String>,

    /// Path of the mosaic GeoTIFF
    #[arg(long)]
    output: Option<PathBuf>,

    /// How overlapping pixels are resolved
    #[arg(long, value_enum)]
    method: Option<MergeMethod>,

    /// Nodata value of the mosaic
    #[arg(long, allow_negative_numbers = true)]
    nodata: Option<f64>,

    /// Green band number, starting at 1
    #[arg(long)]
    green: Option<usize>,

    /// Near infrared band number, starting at 1
    #[arg(long)]
    nir: Option<usize>,

    /// NDWI above this value counts as water
    #[arg(long, allow_negative_numbers = true)]
    water_threshold: Option<f64>,

    /// Also write the NDWI as a GeoTIFF
    #[arg(long)]
    ndwi_output: Option<PathBuf>,

    /// Save a stretched RGB composite of the mosaic as PNG
    #[arg(long)]
    rgb_preview: Option<PathBuf>,

    /// Save a colour ramp rendering of the NDWI as PNG
    #[arg(long)]
    ndwi_preview: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)
                .with_context(|| format!("reading config {path:?}"))?,
            None => PipelineConfig::default(),
        };
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(pattern) = self.pattern {
            config.pattern = pattern;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(method) = self.method {
            config.method = method;
        }
        if let Some(green) = self.green {
            config.green_band = green;
        }
        if let Some(nir) = self.nir {
            config.nir_band = nir;
        }
        if let Some(water_threshold) = self.water_threshold {
            config.water_threshold = water_threshold;
        }
        config.nodata = self.nodata.or(config.nodata);
        config.ndwi_output = self.ndwi_output.or(config.ndwi_output);
        config.rgb_preview = self.rgb_preview.or(config.rgb_preview);
        config.ndwi_preview = self.ndwi_preview.or(config.ndwi_preview);
        Ok(config)
    }
}

fn print_report(report: &Report) {
    let (rows, cols) = report.mosaic_shape;
    println!(
        "merged {} tiles into {} ({} bands, {rows}x{cols})",
        report.inputs.len(),
        report.output.display(),
        report.num_bands
    );
    let summary = &report.summary;
    println!(
        "ndwi min {:.3} max {:.3} mean {:.3}, {} valid / {} nan pixels, water {:.1}%",
        summary.min,
        summary.max,
        summary.mean,
        summary.valid,
        summary.nan,
        summary.water_fraction * 100.
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    debug!("Parsed CLI args: {:?}", cli);
    let config = cli.into_config()?;
    info!("running with {config:?}");

    let report = pipeline::run(&config).with_context(|| {
        format!(
            "processing {:?} in {:?}",
            config.pattern, config.data_dir
        )
    })?;
    print_report(&report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tilemosaic").chain(args.iter().copied())).unwrap()
    }

    #[rstest]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        fs::write(
            &path,
            r#"
            data_dir = "tiles"
            method = "max"
            nodata = 0.0
            green_band = 2
            nir_band = 8
            ndwi_preview = "ndwi.png"
            "#,
        )
        .unwrap();
        let config_arg = path.to_str().unwrap();
        let config = parse(&[
            "--config", config_arg, "--method", "last", "--nodata", "-1", "--green", "3",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.method, MergeMethod::Last);
        assert_eq!(config.nodata, Some(-1.));
        assert_eq!(config.green_band, 3);
        assert_eq!(config.nir_band, 8);
        assert_eq!(config.data_dir, PathBuf::from("tiles"));
        assert_eq!(config.ndwi_preview, Some(PathBuf::from("ndwi.png")));
        assert_eq!(config.output, PathBuf::from("output/mosaic.tif"));
    }

    #[rstest]
    fn flags_without_config_file_override_defaults() {
        let config = parse(&["--data-dir", "scenes", "--water-threshold", "-0.2"])
            .into_config()
            .unwrap();
        assert_eq!(
            config,
            PipelineConfig {
                data_dir: PathBuf::from("scenes"),
                water_threshold: -0.2,
                ..PipelineConfig::default()
            }
        );
    }

    #[rstest]
    fn missing_config_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let result = parse(&["--config", missing.to_str().unwrap()]).into_config();
        assert!(result.is_err());
    }
}
