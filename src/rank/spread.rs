//! Evenly spaced rank generation for re-ranking whole columns

use crate::errors::{KanflowError, Result};

use super::Rank;

/// Default first rank of a spread: two steps above the minimum
pub fn default_spread_start() -> Result<Rank> {
    Rank::min().next()?.next()
}

/// Default last rank of a spread: two steps below the maximum
pub fn default_spread_end() -> Result<Rank> {
    Rank::max().prev()?.prev()
}

/// Generate `count` ranks spread between `start` and `end` inclusive.
///
/// The two ends are placed first; the widest remaining gap is then bisected
/// at its middle slot until every slot holds a rank. A single rank is the
/// midpoint of the range.
pub fn generate_spread(count: usize, start: Option<Rank>, end: Option<Rank>) -> Result<Vec<Rank>> {
    let start = match start {
        Some(rank) => rank,
        None => default_spread_start()?,
    };
    let end = match end {
        Some(rank) => rank,
        None => default_spread_end()?,
    };

    if start >= end {
        tracing::error!(%start, %end, count, "cannot spread ranks over an empty range");
        return Err(KanflowError::UnsatisfiableRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    match count {
        0 => return Ok(Vec::new()),
        1 => return Ok(vec![start.between(&end)?]),
        _ => {}
    }

    let mut slots: Vec<Option<Rank>> = vec![None; count];
    slots[0] = Some(start);
    slots[count - 1] = Some(end);

    while let Some((lo, hi)) = widest_gap(&slots) {
        let middle = (lo + hi) / 2;
        let rank = match (&slots[lo], &slots[hi]) {
            (Some(lower), Some(upper)) => lower.between(upper)?,
            _ => {
                return Err(KanflowError::InvariantViolation(format!(
                    "spread slots {} and {} are not both filled",
                    lo, hi
                )))
            }
        };
        slots[middle] = Some(rank);
    }

    let mut ranks: Vec<Rank> = slots.into_iter().flatten().collect();
    ranks.sort();
    Ok(ranks)
}

/// The pair of filled slots with the most empty slots between them
fn widest_gap(slots: &[Option<Rank>]) -> Option<(usize, usize)> {
    let filled: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| slot.as_ref().map(|_| i))
        .collect();

    filled
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .filter(|(lo, hi)| hi - lo > 1)
        .fold(None, |widest: Option<(usize, usize)>, gap| match widest {
            Some(w) if w.1 - w.0 >= gap.1 - gap.0 => Some(w),
            _ => Some(gap),
        })
}
