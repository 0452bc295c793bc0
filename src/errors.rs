use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, TileMosaicError>;

#[derive(thiserror::Error, Debug)]
pub enum TileMosaicError {
    #[error(transparent)]
    GdalError(#[from] gdal::errors::GdalError),
    #[error(transparent)]
    NdarrayError(#[from] ndarray::ShapeError),
    #[error(transparent)]
    PatternError(#[from] glob::PatternError),
    #[error(transparent)]
    GlobError(#[from] glob::GlobError),
    #[error(transparent)]
    ImageError(#[from] image::ImageError),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    ConfigError(#[from] toml::de::Error),
    #[error("No file in {dir:?} matches {pattern:?}")]
    NoMatches { dir: PathBuf, pattern: String },
    #[error("Can not build a mosaic from zero rasters")]
    EmptyMosaic,
    #[error("Band {index} out of range for {count} bands")]
    BandOutOfRange { index: usize, count: usize },
    #[error("Array shapes differ: {lhs:?} and {rhs:?}")]
    ShapeMismatch {
        lhs: (usize, usize),
        rhs: (usize, usize),
    },
    #[error("Raster has {found} bands, expected {expected}")]
    BandCountMismatch { expected: usize, found: usize },
    #[error("Rasters do not share a crs")]
    CrsMismatch,
    #[error("Pixel size {found:?} differs from {expected:?}")]
    ResolutionMismatch {
        expected: (f64, f64),
        found: (f64, f64),
    },
    #[error("Only north up geotransforms without rotation are supported")]
    RotatedTransform,
    #[error("Raster origin is off the mosaic grid by ({0}, {1}) pixels")]
    Misaligned(f64, f64),
    #[error("There is no intersection between geometries")]
    NoIntersection,
    #[error("Value could not be cast")]
    Uncastable,
}
