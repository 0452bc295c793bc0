mod components;
pub mod config;
pub mod discovery;
mod errors;
mod indexes;
mod intersection;
pub mod mosaic;
pub mod pipeline;
pub mod render;
pub mod spectral;

pub use components::{
    gdal_engine, BandInfo, BandReader, DataType, File, GdalFile, GeoBounds, GeoTransform, Raster,
    RasterBand,
};
pub use errors::{Result, TileMosaicError};
pub use indexes::Indexes;
pub use intersection::Intersection;

use num::traits::{NumCast, ToPrimitive};

fn try_tuple_cast<TI: ToPrimitive, TO: NumCast>(tuple: (TI, TI)) -> Result<(TO, TO)> {
    Ok((
        TO::from(tuple.0).ok_or(TileMosaicError::Uncastable)?,
        TO::from(tuple.1).ok_or(TileMosaicError::Uncastable)?,
    ))
}
