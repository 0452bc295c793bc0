pub mod band;

pub use band::RasterBand;

use log::info;
use ndarray::{s, Array2, Array3, ArrayView2};
use num::ToPrimitive;
use std::{fmt::Debug, path::Path, rc::Rc};

use crate::{
    components::{bounds::GeoBounds, file::File, transforms::GeoTransform, DataType},
    errors::{Result, TileMosaicError},
    Indexes,
};

/// In memory multi band raster.
///
/// Pixels are held as `(bands, rows, cols)`. Never mutated once built,
/// transformations produce new rasters.
pub struct Raster<T: DataType> {
    data: Array3<T>,
    transform: GeoTransform,
    crs: Rc<str>,
    nodata: Option<f64>,
    band_names: Box<[String]>,
}

impl<T: DataType> Debug for Raster<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let f = &mut f.debug_struct("Raster");
        f.field("geo_bounds", &self.bounds())
            .field("shape", &self.data.dim())
            .field("resolution", &self.transform.resolution())
            .field("nodata", &self.nodata)
            .field("bands", &self.band_names)
            .finish()
    }
}

impl<T: DataType> Raster<T> {
    pub fn new(
        data: Array3<T>,
        transform: GeoTransform,
        crs: Rc<str>,
        nodata: Option<f64>,
        band_names: Box<[String]>,
    ) -> Result<Self> {
        let expected = data.dim().0;
        if band_names.len() != expected {
            return Err(TileMosaicError::BandCountMismatch {
                expected,
                found: band_names.len(),
            });
        }
        Ok(Self {
            data,
            transform,
            crs,
            nodata,
            band_names,
        })
    }

    /// Read the selected bands of the file at `path`.
    ///
    /// The file is released before returning.
    pub fn open<F: File<T>, P: AsRef<Path>>(path: P, indexes: &Indexes) -> Result<Self> {
        let file = F::open(&path)?;
        let shape = file.shape();
        let transform = file.transform()?;
        let crs = file.crs();
        let bands = file.bands(indexes)?;

        let mut data = Array3::zeros((bands.len(), shape.0, shape.1));
        let mut band_names = Vec::with_capacity(bands.len());
        let mut nodata = None;
        for (index, band) in bands.iter().enumerate() {
            data.slice_mut(s![index, .., ..])
                .assign(&band.reader.read_window_as_array((0, 0), shape)?);
            band_names.push(band.info.description()?);
            if index == 0 {
                nodata = band.info.nodata()?;
            }
        }

        let raster = Self::new(data, transform, crs, nodata, band_names.into())?;
        info!("opened {:?} as {raster:?}", path.as_ref());
        Ok(raster)
    }

    pub fn write<F: File<T>, P: AsRef<Path>>(&self, path: P) -> Result<()> {
        F::write(path, self)
    }

    pub fn data(&self) -> &Array3<T> {
        &self.data
    }

    pub fn band(&self, index: usize) -> Result<ArrayView2<T>> {
        if index >= self.num_bands() {
            return Err(TileMosaicError::BandOutOfRange {
                index,
                count: self.num_bands(),
            });
        }
        Ok(self.data.slice(s![index, .., ..]))
    }

    /// Copy of one band as `f64`, nodata values are kept as is.
    pub fn band_as_f64(&self, index: usize) -> Result<Array2<f64>> {
        let band = self.band(index)?;
        let values = band
            .iter()
            .map(|value| value.to_f64().ok_or(TileMosaicError::Uncastable))
            .collect::<Result<Vec<f64>>>()?;
        Ok(Array2::from_shape_vec(band.dim(), values)?)
    }

    /// Like [Raster::band_as_f64] with nodata pixels set to NaN.
    pub fn valid_band_as_f64(&self, index: usize) -> Result<Array2<f64>> {
        let mut values = self.band_as_f64(index)?;
        if let Some(nodata) = self.nodata {
            values.mapv_inplace(|value| if value == nodata { f64::NAN } else { value });
        }
        Ok(values)
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        let (_, rows, cols) = self.data.dim();
        (rows, cols)
    }

    pub fn num_bands(&self) -> usize {
        self.data.dim().0
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn crs(&self) -> &str {
        self.crs.as_ref()
    }

    pub(crate) fn shared_crs(&self) -> Rc<str> {
        Rc::clone(&self.crs)
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn band_names(&self) -> &[String] {
        &self.band_names
    }

    pub fn bounds(&self) -> GeoBounds {
        self.transform.bounds(self.shape())
    }
}
