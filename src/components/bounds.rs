use geo::{Area, Rect};
use shrinkwraprs::Shrinkwrap;

use crate::{errors::Result, intersection::Intersection};

/// Extent of a raster in its crs.
#[derive(Shrinkwrap, Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds(Rect<f64>);

impl From<Rect<f64>> for GeoBounds {
    fn from(value: Rect<f64>) -> Self {
        Self(value)
    }
}

impl Intersection for GeoBounds {
    type Output = GeoBounds;
    fn intersection(&self, rhs: &Self) -> Result<Self::Output> {
        Ok(GeoBounds(self.0.intersection(&rhs.0)?))
    }
}

impl GeoBounds {
    pub fn left(&self) -> f64 {
        self.0.min().x
    }

    pub fn right(&self) -> f64 {
        self.0.max().x
    }

    pub fn bottom(&self) -> f64 {
        self.0.min().y
    }

    pub fn top(&self) -> f64 {
        self.0.max().y
    }

    pub fn area(&self) -> f64 {
        self.0.unsigned_area()
    }

    /// Smallest bounds containing both.
    pub fn union(&self, rhs: &Self) -> Self {
        let min = (self.left().min(rhs.left()), self.bottom().min(rhs.bottom()));
        let max = (self.right().max(rhs.right()), self.top().max(rhs.top()));
        Self(Rect::new(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn union_of_adjacent_bounds_adds_areas() {
        let west = GeoBounds::from(Rect::new((0., 0.), (10., 5.)));
        let east = GeoBounds::from(Rect::new((10., 0.), (16., 5.)));
        let union = west.union(&east);
        assert_eq!(union, GeoBounds::from(Rect::new((0., 0.), (16., 5.))));
        assert_eq!(union.area(), west.area() + east.area());
        assert!(west.intersection(&east).is_err());
    }
}
