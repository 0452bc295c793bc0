use std::fmt::Debug;

use crate::errors::Result;

/// Descriptive side of a band, independent of its pixel type.
pub trait BandInfo: Debug {
    fn description(&self) -> Result<String>;
    fn nodata(&self) -> Result<Option<f64>>;
}
