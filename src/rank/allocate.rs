//! Rank allocation for a single insertion into a column

use crate::errors::Result;

use super::Rank;

/// Known outer limits for a column, used when a neighbour's rank is missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertBounds {
    pub lower: Option<Rank>,
    pub upper: Option<Rank>,
}

impl InsertBounds {
    fn lower_or_min(&self) -> Rank {
        self.lower.clone().unwrap_or_else(Rank::min)
    }

    fn upper_or_max(&self) -> Rank {
        self.upper.clone().unwrap_or_else(Rank::max)
    }
}

/// Where a new rank lands relative to its neighbours.
///
/// | situation                               | placement             |
/// |-----------------------------------------|-----------------------|
/// | no defined rank in the column           | `Initial`             |
/// | index 0, no lower bound                 | `Before(first)`       |
/// | index 0, lower bound known              | `Between(lower, first)` |
/// | index past the end, no upper bound      | `After(last)`         |
/// | index past the end, upper bound known   | `Between(last, upper)` |
/// | interior                                | `Between(before, after)` |
///
/// A missing neighbour rank is replaced by the nearest defined rank on the
/// same side, then by the bound, then by the min/max sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Initial,
    Before(Rank),
    After(Rank),
    Between(Rank, Rank),
}

impl Placement {
    /// Decide the placement for inserting at `index` into an ordered column
    pub fn resolve(column: &[Option<Rank>], index: usize, bounds: &InsertBounds) -> Placement {
        if column.iter().all(Option::is_none) {
            return Placement::Initial;
        }

        let index = index.min(column.len());
        let before = column[..index].iter().rev().flatten().next();
        let after = column[index..].iter().flatten().next();

        match (before, after) {
            (None, Some(first)) => match &bounds.lower {
                Some(lower) => Placement::Between(lower.clone(), first.clone()),
                None if index == 0 => Placement::Before(first.clone()),
                None => Placement::Between(Rank::min(), first.clone()),
            },
            (Some(last), None) => match &bounds.upper {
                Some(upper) => Placement::Between(last.clone(), upper.clone()),
                None if index == column.len() => Placement::After(last.clone()),
                None => Placement::Between(last.clone(), Rank::max()),
            },
            (Some(b), Some(a)) => Placement::Between(b.clone(), a.clone()),
            (None, None) => {
                Placement::Between(bounds.lower_or_min(), bounds.upper_or_max())
            }
        }
    }

    /// Produce the rank for this placement
    pub fn rank(&self) -> Result<Rank> {
        match self {
            Placement::Initial => Rank::min().next(),
            Placement::Before(first) => first.prev(),
            Placement::After(last) => last.next(),
            Placement::Between(lower, upper) => lower.between(upper),
        }
    }
}

/// Rank for inserting at `index` (0-based) into a column whose ranks are
/// already sorted. Missing ranks never block the insert.
pub fn allocate_for_insert(column: &[Option<Rank>], index: usize) -> Result<Rank> {
    allocate_within(column, index, &InsertBounds::default())
}

/// As [`allocate_for_insert`], with known outer bounds for the column
pub fn allocate_within(column: &[Option<Rank>], index: usize, bounds: &InsertBounds) -> Result<Rank> {
    let placement = Placement::resolve(column, index, bounds);
    tracing::debug!(?placement, index, column_len = column.len(), "allocating rank");
    placement.rank().map_err(|e| {
        tracing::error!(error = %e, ?placement, "rank allocation failed");
        e
    })
}

/// Parse stored rank strings, treating missing or malformed values as gaps
pub fn parse_column<'a, I>(raw: I) -> Vec<Option<Rank>>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    raw.into_iter()
        .map(|value| {
            value.and_then(|s| match Rank::parse(s) {
                Ok(rank) => Some(rank),
                Err(e) => {
                    tracing::warn!(rank = s, error = %e, "ignoring unparseable rank");
                    None
                }
            })
        })
        .collect()
}
