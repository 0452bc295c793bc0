use geo::{AffineTransform, Coord, Rect};
use shrinkwraprs::Shrinkwrap;

use crate::components::bounds::GeoBounds;

/// Transform from pixel space `(col, row)` to the raster's crs.
#[derive(Shrinkwrap, Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform(AffineTransform);

impl GeoTransform {
    pub fn new(a: f64, b: f64, xoff: f64, d: f64, e: f64, yoff: f64) -> Self {
        Self(AffineTransform::new(a, b, xoff, d, e, yoff))
    }

    /// North up transform from the top left corner and the pixel size.
    pub fn from_origin(left: f64, top: f64, res_x: f64, res_y: f64) -> Self {
        Self::new(res_x, 0., left, 0., -res_y.abs(), top)
    }

    /// From gdal ordering `[xoff, a, b, yoff, d, e]`.
    pub fn from_gdal(gdal_transform: [f64; 6]) -> Self {
        Self::new(
            gdal_transform[1],
            gdal_transform[2],
            gdal_transform[0],
            gdal_transform[4],
            gdal_transform[5],
            gdal_transform[3],
        )
    }

    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.xoff(),
            self.a(),
            self.b(),
            self.yoff(),
            self.d(),
            self.e(),
        ]
    }

    /// Pixel size as `(x, y)`, `y` is negative for north up rasters.
    pub fn resolution(&self) -> (f64, f64) {
        (self.a(), self.e())
    }

    pub fn is_rotated(&self) -> bool {
        self.b() != 0. || self.d() != 0.
    }

    /// Geo bounds of a `(rows, cols)` grid.
    pub fn bounds(&self, shape: (usize, usize)) -> GeoBounds {
        let (rows, cols) = shape;
        let top_left = self.apply(Coord { x: 0., y: 0. });
        let bottom_right = self.apply(Coord {
            x: cols as f64,
            y: rows as f64,
        });
        GeoBounds::from(Rect::new(top_left, bottom_right))
    }
}
