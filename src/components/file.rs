use std::{fmt::Debug, path::Path, rc::Rc};

use crate::{
    components::{raster::RasterBand, transforms::GeoTransform, DataType, Raster},
    errors::Result,
    Indexes,
};

pub trait File<T: DataType>: Debug + Sized {
    fn open<P: AsRef<Path>>(path: P) -> Result<Self>;
    /// Create `path` holding `raster`, replacing any existing file.
    fn write<P: AsRef<Path>>(path: P, raster: &Raster<T>) -> Result<()>;
    /// (rows, cols)
    fn shape(&self) -> (usize, usize);
    fn crs(&self) -> Rc<str>;
    fn transform(&self) -> Result<GeoTransform>;
    fn num_bands(&self) -> usize;
    fn band(&self, index: usize) -> Result<RasterBand<T>>;
    fn bands(&self, indexes: &Indexes) -> Result<Vec<RasterBand<T>>> {
        indexes
            .indexes_from(self.num_bands())?
            .iter()
            .map(|idx| self.band(*idx))
            .collect()
    }
}
