use geo::{CoordNum, Rect};

use crate::errors::{Result, TileMosaicError};

pub trait Intersection {
    type Output;
    fn intersection(&self, rhs: &Self) -> Result<Self::Output>;
}

impl<T: CoordNum> Intersection for Rect<T> {
    type Output = Rect<T>;
    /// Touching edges are not an intersection.
    fn intersection(&self, rhs: &Self) -> Result<Rect<T>> {
        let lhs_max = self.max();
        let rhs_min = rhs.min();
        if (lhs_max.x <= rhs_min.x) | (lhs_max.y <= rhs_min.y) {
            return Err(TileMosaicError::NoIntersection);
        }

        let lhs_min = self.min();
        let rhs_max = rhs.max();
        if (lhs_min.x >= rhs_max.x) | (lhs_min.y >= rhs_max.y) {
            return Err(TileMosaicError::NoIntersection);
        }

        let min = (
            if lhs_min.x > rhs_min.x { lhs_min.x } else { rhs_min.x },
            if lhs_min.y > rhs_min.y { lhs_min.y } else { rhs_min.y },
        );
        let max = (
            if lhs_max.x < rhs_max.x { lhs_max.x } else { rhs_max.x },
            if lhs_max.y < rhs_max.y { lhs_max.y } else { rhs_max.y },
        );

        Ok(Self::new(min, max))
    }
}
