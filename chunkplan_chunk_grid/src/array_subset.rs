//! Array subsets.

use std::ops::Range;

use crate::ArrayShape;

/// A rectangular region of an array, such as a chunk, given by its start and shape.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ArraySubset {
    start: Vec<u64>,
    shape: ArrayShape,
}

impl<T: IntoIterator<Item = Range<u64>>> From<T> for ArraySubset {
    /// Reversed ranges are treated as empty.
    fn from(ranges: T) -> Self {
        let (start, shape) = ranges
            .into_iter()
            .map(|range| (range.start, range.end.saturating_sub(range.start)))
            .unzip();
        Self { start, shape }
    }
}

impl ArraySubset {
    /// Return the element range of each dimension.
    #[must_use]
    pub fn to_ranges(&self) -> Vec<Range<u64>> {
        std::iter::zip(&self.start, &self.shape)
            .map(|(&start, &size)| start..start + size)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_subset_ranges() {
        let subset = ArraySubset::from([14000..14600, 0..90, 180..288]);
        assert_eq!(subset.to_ranges(), vec![14000..14600, 0..90, 180..288]);
        assert_eq!(ArraySubset::default().to_ranges(), Vec::<Range<u64>>::new());
    }

    #[test]
    fn array_subset_reversed_range() {
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = ArraySubset::from([5..3, 0..2]);
        assert_eq!(reversed.to_ranges(), vec![5..5, 0..2]);
    }
}
