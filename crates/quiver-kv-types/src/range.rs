//! Range read parameters.

use quiver_layer::KeySelector;
use quiver_layer::Subspace;

/// Parameters of a range read.
///
/// `begin` is inclusive and `end` exclusive once both selectors resolve.
/// `limit` caps the number of returned pairs; `None` reads the whole range.
/// A `snapshot` read adds no read conflict ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeOption {
    pub begin: KeySelector,
    pub end: KeySelector,
    pub limit: Option<usize>,
    pub reverse: bool,
    pub snapshot: bool,
}

impl RangeOption {
    /// Range between two selectors.
    pub fn new(begin: KeySelector, end: KeySelector) -> Self {
        Self {
            begin,
            end,
            limit: None,
            reverse: false,
            snapshot: false,
        }
    }

    /// Range over `[begin, end)`.
    pub fn from_keys(begin: impl Into<Vec<u8>>, end: impl Into<Vec<u8>>) -> Self {
        Self::new(
            KeySelector::first_greater_or_equal(begin),
            KeySelector::first_greater_or_equal(end),
        )
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn snapshot(mut self) -> Self {
        self.snapshot = true;
        self
    }
}

impl From<&Subspace> for RangeOption {
    fn from(subspace: &Subspace) -> Self {
        let (begin, end) = subspace.range_selectors();
        Self::new(begin, end)
    }
}

impl From<(Vec<u8>, Vec<u8>)> for RangeOption {
    fn from((begin, end): (Vec<u8>, Vec<u8>)) -> Self {
        Self::from_keys(begin, end)
    }
}
