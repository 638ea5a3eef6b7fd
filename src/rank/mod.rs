//! Rank allocation: dense, lexicographically ordered sort keys
//!
//! Inserting between two cards never renumbers their siblings; a whole
//! column can be re-ranked with an even spread when its keys have drifted.

mod allocate;
mod lexo;
mod spread;

#[cfg(test)]
mod property_tests;

pub use allocate::{allocate_for_insert, allocate_within, parse_column, InsertBounds, Placement};
pub use lexo::Rank;
pub use spread::{default_spread_end, default_spread_start, generate_spread};
