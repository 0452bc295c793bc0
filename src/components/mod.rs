pub mod band;
pub mod bounds;
pub mod engines;
pub mod file;
pub mod raster;
pub mod reader;
pub mod transforms;

pub use band::BandInfo;
pub use bounds::GeoBounds;
pub use engines::gdal_engine::{self, GdalFile};
pub use file::File;
pub use raster::{band::RasterBand, Raster};
pub use reader::BandReader;
pub use transforms::GeoTransform;

use gdal::raster::GdalType;
use num::{traits::NumCast, Num};
use std::fmt::Debug;

/// Pixel types a [Raster] can hold.
pub trait DataType: Num + NumCast + PartialOrd + Copy + Debug + GdalType + 'static {}

impl<T> DataType for T where T: Num + NumCast + PartialOrd + Copy + Debug + GdalType + 'static {}
