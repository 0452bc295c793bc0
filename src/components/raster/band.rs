use std::{fmt::Debug, rc::Rc};

use crate::components::{band::BandInfo, reader::BandReader, DataType};

/// Raster representation of a band.
///
/// Contains [BandInfo] and [BandReader].
#[derive(Debug)]
pub struct RasterBand<T: DataType> {
    pub info: Rc<dyn BandInfo>,
    pub reader: Rc<dyn BandReader<T>>,
}
