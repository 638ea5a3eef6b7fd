//! Bucketed base-36 rank keys
//!
//! A rank prints as `B|IIIIII:FFF`: a bucket digit, a fixed-width base-36
//! integer part, and a base-36 fraction without trailing zeros. Because the
//! integer part is fixed width and the fraction is canonical, comparing the
//! printed strings gives the same order as comparing the values, and a new
//! rank can always be produced between two others by growing the fraction.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{KanflowError, Result};

const BASE: u32 = 36;
const INTEGER_WIDTH: usize = 6;
const MAX_DIGIT: u8 = 35;
const MID_DIGIT: u8 = 18;

/// Distance `next`/`prev` step away from an integer rank
const STEP: u64 = 8;

/// `zzzzzz`
const INTEGER_MAX: u64 = 2_176_782_335;

/// `100000`, the first rank handed out after the minimum
const INITIAL_MIN: u64 = 60_466_176;

/// `y00000`, the first rank handed out before the maximum
const INITIAL_MAX: u64 = 2_055_849_984;

lazy_static::lazy_static! {
    static ref RANK_PATTERN: Regex = Regex::new(
        r"^(?P<bucket>[0-2])\|(?P<integer>[0-9a-z]{6}):(?P<fraction>[0-9a-z]*)$"
    ).unwrap();
}

/// A dense, totally ordered sort key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank {
    bucket: u8,
    /// Integer digits followed by fraction digits, most significant first
    digits: Vec<u8>,
}

impl Rank {
    /// Lower sentinel: `0|000000:`
    pub fn min() -> Self {
        Rank::min_in(0)
    }

    /// Upper sentinel: `0|zzzzzz:`
    pub fn max() -> Self {
        Rank::max_in(0)
    }

    fn min_in(bucket: u8) -> Self {
        Rank {
            bucket,
            digits: vec![0; INTEGER_WIDTH],
        }
    }

    fn max_in(bucket: u8) -> Self {
        Rank {
            bucket,
            digits: vec![MAX_DIGIT; INTEGER_WIDTH],
        }
    }

    /// Parse a rank string, rejecting anything not in canonical form
    pub fn parse(value: &str) -> Result<Self> {
        value.parse()
    }

    pub fn bucket(&self) -> u8 {
        self.bucket
    }

    pub fn is_min(&self) -> bool {
        *self == Rank::min_in(self.bucket)
    }

    pub fn is_max(&self) -> bool {
        *self == Rank::max_in(self.bucket)
    }

    /// Number of fraction digits carried beyond the integer part
    pub fn precision(&self) -> usize {
        self.digits.len() - INTEGER_WIDTH
    }

    /// The adjacent rank above this one.
    ///
    /// Steps to the next integer plus eight; near the top it bisects toward
    /// the maximum instead.
    pub fn next(&self) -> Result<Rank> {
        let max = Rank::max_in(self.bucket);
        if *self >= max {
            return Err(KanflowError::RangeExhausted(format!("no rank after {}", self)));
        }
        if self.is_min() {
            return Ok(Rank::from_integer(self.bucket, INITIAL_MIN));
        }

        let ceil = self.integer() + u64::from(self.precision() > 0);
        let candidate = ceil + STEP;
        if candidate >= INTEGER_MAX {
            return self.between(&max);
        }
        Ok(Rank::from_integer(self.bucket, candidate))
    }

    /// The adjacent rank below this one.
    pub fn prev(&self) -> Result<Rank> {
        let min = Rank::min_in(self.bucket);
        if *self <= min {
            return Err(KanflowError::RangeExhausted(format!("no rank before {}", self)));
        }
        if self.is_max() {
            return Ok(Rank::from_integer(self.bucket, INITIAL_MAX));
        }

        let floor = self.integer();
        if floor <= STEP {
            return min.between(self);
        }
        Ok(Rank::from_integer(self.bucket, floor - STEP))
    }

    /// The exact midpoint of `self` and `upper`.
    ///
    /// Requires `self < upper` within the same bucket. Precision grows by at
    /// most one digit per call, so repeated bisection never collides.
    pub fn between(&self, upper: &Rank) -> Result<Rank> {
        if self.bucket != upper.bucket || self >= upper {
            return Err(KanflowError::InvalidRange {
                lower: self.to_string(),
                upper: upper.to_string(),
            });
        }

        let width = self.digits.len().max(upper.digits.len());
        let a = padded(&self.digits, width);
        let b = padded(&upper.digits, width);

        // sum[0] holds the carry out of the integer part
        let mut sum = vec![0u8; width + 1];
        let mut carry = 0u32;
        for i in (0..width).rev() {
            let s = u32::from(a[i]) + u32::from(b[i]) + carry;
            sum[i + 1] = (s % BASE) as u8;
            carry = s / BASE;
        }
        sum[0] = carry as u8;

        let mut half = Vec::with_capacity(width + 2);
        let mut rem = 0u32;
        for digit in &sum {
            let current = rem * BASE + u32::from(*digit);
            half.push((current / 2) as u8);
            rem = current % 2;
        }
        if rem == 1 {
            half.push(MID_DIGIT);
        }
        // The midpoint of two in-range values never overflows the integer width
        half.remove(0);

        Ok(Rank::from_digits(self.bucket, half))
    }

    fn from_integer(bucket: u8, value: u64) -> Self {
        let mut digits = vec![0u8; INTEGER_WIDTH];
        let mut rest = value;
        for slot in digits.iter_mut().rev() {
            *slot = (rest % u64::from(BASE)) as u8;
            rest /= u64::from(BASE);
        }
        Rank { bucket, digits }
    }

    fn from_digits(bucket: u8, mut digits: Vec<u8>) -> Self {
        while digits.len() > INTEGER_WIDTH && digits.last() == Some(&0) {
            digits.pop();
        }
        Rank { bucket, digits }
    }

    fn integer(&self) -> u64 {
        self.digits[..INTEGER_WIDTH]
            .iter()
            .fold(0, |acc, d| acc * u64::from(BASE) + u64::from(*d))
    }
}

fn padded(digits: &[u8], width: usize) -> Vec<u8> {
    let mut out = digits.to_vec();
    out.resize(width, 0);
    out
}

fn digit_char(digit: u8) -> char {
    std::char::from_digit(u32::from(digit), BASE).unwrap_or('0')
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|", self.bucket)?;
        for (i, digit) in self.digits.iter().enumerate() {
            if i == INTEGER_WIDTH {
                f.write_str(":")?;
            }
            write!(f, "{}", digit_char(*digit))?;
        }
        if self.digits.len() == INTEGER_WIDTH {
            f.write_str(":")?;
        }
        Ok(())
    }
}

impl FromStr for Rank {
    type Err = KanflowError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let caps = RANK_PATTERN
            .captures(s)
            .ok_or_else(|| KanflowError::InvalidRank(s.to_string()))?;

        let fraction = &caps["fraction"];
        if fraction.ends_with('0') {
            return Err(KanflowError::InvalidRank(format!(
                "{} (fraction has trailing zeros)",
                s
            )));
        }

        let bucket = caps["bucket"]
            .parse::<u8>()
            .map_err(|_| KanflowError::InvalidRank(s.to_string()))?;
        let digits = caps["integer"]
            .chars()
            .chain(fraction.chars())
            .map(|c| c.to_digit(BASE).map(|d| d as u8))
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(|| KanflowError::InvalidRank(s.to_string()))?;

        Ok(Rank { bucket, digits })
    }
}

impl Serialize for Rank {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(s: &str) -> Rank {
        Rank::parse(s).unwrap()
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(Rank::min().to_string(), "0|000000:");
        assert_eq!(Rank::max().to_string(), "0|zzzzzz:");
        assert!(Rank::min() < Rank::max());
        assert!(Rank::min().is_min());
        assert!(Rank::max().is_max());
    }

    #[test]
    fn test_next_from_min_and_integer() {
        assert_eq!(Rank::min().next().unwrap().to_string(), "0|100000:");
        assert_eq!(rank("0|100000:").next().unwrap().to_string(), "0|100008:");
        // a fractional rank first rounds up
        assert_eq!(rank("0|100000:i").next().unwrap().to_string(), "0|100009:");
    }

    #[test]
    fn test_prev_from_max_and_integer() {
        assert_eq!(Rank::max().prev().unwrap().to_string(), "0|y00000:");
        assert_eq!(rank("0|y00000:").prev().unwrap().to_string(), "0|xzzzzs:");
        assert_eq!(rank("0|100000:").prev().unwrap().to_string(), "0|0zzzzs:");
    }

    #[test]
    fn test_next_near_max_bisects() {
        let near = rank("0|zzzzzy:");
        let next = near.next().unwrap();
        assert!(near < next && next < Rank::max());
        assert_eq!(next.to_string(), "0|zzzzzy:i");
    }

    #[test]
    fn test_prev_near_min_bisects() {
        let near = rank("0|000004:");
        let prev = near.prev().unwrap();
        assert_eq!(prev.to_string(), "0|000002:");
        assert!(Rank::min() < prev);
    }

    #[test]
    fn test_sentinel_edges_exhausted() {
        assert_eq!(Rank::max().next().unwrap_err().code(), "RANGE_EXHAUSTED");
        assert_eq!(Rank::min().prev().unwrap_err().code(), "RANGE_EXHAUSTED");
    }

    #[test]
    fn test_between_exact_midpoint() {
        assert_eq!(rank("0|000000:").between(&rank("0|000002:")).unwrap().to_string(), "0|000001:");
        assert_eq!(rank("0|000001:").between(&rank("0|000002:")).unwrap().to_string(), "0|000001:i");
        assert_eq!(rank("0|000001:").between(&rank("0|000001:i")).unwrap().to_string(), "0|000001:9");
    }

    #[test]
    fn test_between_rejects_inverted_and_equal() {
        let a = rank("0|100000:");
        let b = rank("0|200000:");
        let err = b.between(&a).unwrap_err();
        assert_eq!(err.code(), "INVALID_RANGE");
        assert!(a.between(&a).is_err());
    }

    #[test]
    fn test_between_rejects_mixed_buckets() {
        assert!(rank("0|100000:").between(&rank("1|200000:")).is_err());
    }

    #[test]
    fn test_between_carries_across_digits() {
        let low = rank("0|0000zz:");
        let high = rank("0|000101:");
        let mid = low.between(&high).unwrap();
        assert!(low < mid && mid < high);
        assert_eq!(mid.to_string(), "0|000100:");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "0|i0000:", "3|000000:", "0|ABCDEF:", "0|000000", "0|000000:10", "x"] {
            assert_eq!(Rank::parse(bad).unwrap_err().code(), "INVALID_RANK", "{}", bad);
        }
    }

    #[test]
    fn test_ordering_matches_string_ordering() {
        let a = rank("0|hzzzzz:");
        let b = rank("0|hzzzzz:i");
        let c = rank("0|i00000:");
        assert!(a < b && b < c);
        assert!(a.to_string() < b.to_string() && b.to_string() < c.to_string());
    }

    #[test]
    fn test_serde_as_string() {
        let r = rank("0|i00000:4");
        assert_eq!(serde_json::to_string(&r).unwrap(), "\"0|i00000:4\"");
        let back: Rank = serde_json::from_str("\"0|i00000:4\"").unwrap();
        assert_eq!(back, r);
        assert!(serde_json::from_str::<Rank>("\"nope\"").is_err());
    }
}
