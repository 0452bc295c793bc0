use ndarray::Array2;
use std::fmt::Debug;

use crate::{components::DataType, errors::Result};

pub trait BandReader<T: DataType>: Debug {
    fn read_window_as_array(
        &self,
        // (row, col) of the top left pixel.
        offset: (usize, usize),
        // (rows, cols)
        shape: (usize, usize),
    ) -> Result<Array2<T>>;
}
