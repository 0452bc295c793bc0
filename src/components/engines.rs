use log::{debug, info};
use std::{marker::PhantomData, path::Path, rc::Rc};

use crate::{
    components::{
        band::BandInfo, file::File, raster::RasterBand, reader::BandReader,
        transforms::GeoTransform, DataType, Raster,
    },
    errors::Result,
    try_tuple_cast, Indexes,
};

/// Implementations for gdal
pub mod gdal_engine {
    use super::*;
    use gdal::{
        raster::{Buffer, GdalDataType},
        spatial_ref::SpatialRef,
        Dataset as GdalDataset, DriverManager, Metadata as GdalMetadata,
    };
    use ndarray::Array2;

    pub const GTIFF_DRIVER: &str = "GTiff";

    /// Open `path` and read the selected bands into memory.
    pub fn open<T: DataType, P: AsRef<Path>>(path: P, indexes: &Indexes) -> Result<Raster<T>> {
        Raster::open::<GdalFile<T>, _>(path, indexes)
    }

    /// Write `raster` to `path` as a GeoTIFF.
    pub fn write<T: DataType, P: AsRef<Path>>(path: P, raster: &Raster<T>) -> Result<()> {
        raster.write::<GdalFile<T>, _>(path)
    }

    /// Pixel type of the first band of `path`.
    pub fn band_type<P: AsRef<Path>>(path: P) -> Result<GdalDataType> {
        let dataset = GdalDataset::open(&path)?;
        Ok(dataset.rasterband(1)?.band_type())
    }

    /// An opened gdal dataset. The dataset is closed when dropped.
    #[derive(Debug)]
    pub struct GdalFile<T: DataType> {
        _t: PhantomData<T>,
        path: Rc<Path>,
        dataset: Rc<GdalDataset>,
    }

    impl<T: DataType> File<T> for GdalFile<T> {
        fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
            debug!("opening {:?}", path.as_ref());
            let dataset = Rc::new(GdalDataset::open(&path)?);
            Ok(GdalFile {
                path: Rc::from(path.as_ref()),
                dataset,
                _t: PhantomData,
            })
        }

        fn write<P: AsRef<Path>>(path: P, raster: &Raster<T>) -> Result<()> {
            let (rows, cols) = raster.shape();
            let driver = DriverManager::get_driver_by_name(GTIFF_DRIVER)?;
            let mut dataset = driver.create_with_band_type::<T, _>(
                path.as_ref(),
                cols,
                rows,
                raster.num_bands(),
            )?;
            dataset.set_geo_transform(&raster.transform().to_gdal())?;
            if !raster.crs().is_empty() {
                dataset.set_spatial_ref(&SpatialRef::from_wkt(raster.crs())?)?;
            }
            for (index, (band_data, name)) in raster
                .data()
                .outer_iter()
                .zip(raster.band_names())
                .enumerate()
            {
                let mut rasterband = dataset.rasterband(index + 1)?;
                rasterband.set_no_data_value(raster.nodata())?;
                if !name.is_empty() {
                    rasterband.set_description(name)?;
                }
                let mut buffer = Buffer::new((cols, rows), band_data.iter().copied().collect());
                rasterband.write((0, 0), (cols, rows), &mut buffer)?;
            }
            info!(
                "wrote {} bands of {}x{} to {:?}",
                raster.num_bands(),
                rows,
                cols,
                path.as_ref()
            );
            Ok(())
        }

        fn shape(&self) -> (usize, usize) {
            let (cols, rows) = self.dataset.raster_size();
            (rows, cols)
        }

        fn crs(&self) -> Rc<str> {
            Rc::from(self.dataset.projection())
        }

        fn transform(&self) -> Result<GeoTransform> {
            Ok(GeoTransform::from_gdal(self.dataset.geo_transform()?))
        }

        fn num_bands(&self) -> usize {
            self.dataset.raster_count()
        }

        fn band(&self, index: usize) -> Result<RasterBand<T>> {
            let info: Rc<dyn BandInfo> =
                Rc::new(GdalBandInfo(Rc::clone(&self.dataset), index + 1));
            let reader: Rc<dyn BandReader<T>> =
                Rc::new(GdalBandReader(Rc::clone(&self.path), index + 1));
            Ok(RasterBand { info, reader })
        }
    }

    #[derive(Debug)]
    struct GdalBandInfo(Rc<GdalDataset>, usize);

    impl BandInfo for GdalBandInfo {
        fn description(&self) -> Result<String> {
            Ok(GdalMetadata::description(&self.0.rasterband(self.1)?)?)
        }

        fn nodata(&self) -> Result<Option<f64>> {
            Ok(self.0.rasterband(self.1)?.no_data_value())
        }
    }

    /// Opens its dataset only for the duration of a read.
    #[derive(Debug)]
    struct GdalBandReader(Rc<Path>, usize);

    impl<T: DataType> BandReader<T> for GdalBandReader {
        fn read_window_as_array(
            &self,
            offset: (usize, usize),
            shape: (usize, usize),
        ) -> Result<Array2<T>> {
            let dataset = GdalDataset::open(&self.0)?;
            let rasterband = dataset.rasterband(self.1)?;
            let (row, col) = try_tuple_cast::<_, isize>(offset)?;
            let window_size = (shape.1, shape.0);
            let buffer = rasterband.read_as::<T>((col, row), window_size, window_size, None)?;
            Ok(Array2::from_shape_vec(shape, buffer.data().to_vec())?)
        }
    }
}
