use std::rc::Rc;

use crate::errors::{Result, TileMosaicError};

/// Selection of zero based band indexes, `None` selects every band.
#[derive(Clone, Debug)]
pub struct Indexes(Option<Rc<[usize]>>);

impl<const N: usize> From<[usize; N]> for Indexes {
    fn from(value: [usize; N]) -> Self {
        Indexes(Some(Rc::from(value)))
    }
}

impl Indexes {
    pub fn all() -> Self {
        Self(None)
    }

    /// Resolve against a collection of `collection_len` bands.
    pub fn indexes_from(&self, collection_len: usize) -> Result<Rc<[usize]>> {
        let Some(selection) = &self.0 else {
            return Ok((0..collection_len).collect());
        };
        if let Some(&index) = selection.iter().find(|idx| **idx >= collection_len) {
            return Err(TileMosaicError::BandOutOfRange {
                index,
                count: collection_len,
            });
        }
        Ok(Rc::clone(selection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Indexes::all(), 4, vec![0, 1, 2, 3])]
    #[case(Indexes::all(), 0, vec![])]
    #[case(Indexes::from([2, 0]), 4, vec![2, 0])]
    #[case(Indexes::from([1, 1]), 2, vec![1, 1])]
    fn resolves_selection(
        #[case] indexes: Indexes,
        #[case] len: usize,
        #[case] expected: Vec<usize>,
    ) {
        assert_eq!(indexes.indexes_from(len).unwrap().as_ref(), expected.as_slice());
    }

    #[rstest]
    fn out_of_range_selection_fails() {
        let result = Indexes::from([0, 4]).indexes_from(4);
        assert!(matches!(
            result,
            Err(TileMosaicError::BandOutOfRange { index: 4, count: 4 })
        ));
    }
}
