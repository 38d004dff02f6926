use std::{
    cmp::Ordering,
    fmt,
    num::ParseIntError,
    ops::{Add, Neg, Sub},
    str::FromStr,
};

use thiserror::Error;

/// Offsets of the 8 cells surrounding a cell, row by row
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A cell coordinate on the unbounded grid
///
/// Rows grow downward, so `y + 1` is the row below. Arithmetic wraps at the
/// `i32` limits instead of overflowing, which keeps every coordinate valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos2 {
    pub x: i32,
    pub y: i32,
}
impl Pos2 {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
    #[inline]
    pub fn zero() -> Self {
        Self { x: 0, y: 0 }
    }
    #[inline]
    pub fn one() -> Self {
        Self { x: 1, y: 1 }
    }

    /// The position shifted by `(dx, dy)`
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// The 8 surrounding cells, not including `self`
    #[inline]
    pub fn neighbors(self) -> impl Iterator<Item = Pos2> {
        NEIGHBOR_OFFSETS
            .into_iter()
            .map(move |(dx, dy)| self.offset(dx, dy))
    }

    /// The 3x3 block centered on `self`, row by row, `self` included
    #[inline]
    pub fn neighborhood(self) -> impl Iterator<Item = Pos2> {
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| self.offset(dx, dy)))
    }
}
impl Default for Pos2 {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}
impl PartialOrd for Pos2 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Pos2 {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        // row-major: y decides, x breaks ties
        Ord::cmp(&self.y, &other.y).then(Ord::cmp(&self.x, &other.x))
    }
}
impl Neg for Pos2 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self {
            x: self.x.wrapping_neg(),
            y: self.y.wrapping_neg(),
        }
    }
}
impl Add for Pos2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.offset(rhs.x, rhs.y)
    }
}
impl Sub for Pos2 {
    type Output = Pos2;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x.wrapping_sub(rhs.x),
            y: self.y.wrapping_sub(rhs.y),
        }
    }
}
impl fmt::Display for Pos2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParsePosError {
    #[error("expected \"X,Y\", found \"{0}\"")]
    MissingComma(String),

    #[error("invalid coordinate: {0}")]
    InvalidCoord(#[from] ParseIntError),
}

impl FromStr for Pos2 {
    type Err = ParsePosError;

    /// Parses `"X,Y"`, surrounding whitespace allowed
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((x, y)) = s.split_once(',') else {
            return Err(ParsePosError::MissingComma(s.to_owned()));
        };
        Ok(Self {
            x: x.trim().parse()?,
            y: y.trim().parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn neighbors_exclude_center() {
        let center = Pos2::new(5, -3);
        let neighbors: HashSet<Pos2> = center.neighbors().collect();

        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&center));
        assert!(neighbors.iter().all(|p| (p.x - 5).abs() <= 1 && (p.y + 3).abs() <= 1));
    }

    #[test]
    fn neighborhood_is_row_major_block() {
        let block: Vec<Pos2> = Pos2::zero().neighborhood().collect();

        assert_eq!(block.len(), 9);
        assert_eq!(block[0], Pos2::new(-1, -1));
        assert_eq!(block[4], Pos2::zero());
        assert_eq!(block[8], Pos2::new(1, 1));
        assert!(block.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn neighbors_wrap_at_limits() {
        let corner = Pos2::new(i32::MAX, i32::MIN);
        let neighbors: Vec<Pos2> = corner.neighbors().collect();

        assert!(neighbors.contains(&Pos2::new(i32::MIN, i32::MIN)));
        assert!(neighbors.contains(&Pos2::new(i32::MAX, i32::MAX)));
    }

    #[test]
    fn orders_by_row_then_column() {
        assert!(Pos2::new(9, 0) < Pos2::new(0, 1));
        assert!(Pos2::new(0, 1) < Pos2::new(1, 1));
    }

    #[test]
    fn parses_offsets() {
        assert_eq!("20,-4".parse::<Pos2>(), Ok(Pos2::new(20, -4)));
        assert_eq!(" 1 , 2 ".parse::<Pos2>(), Ok(Pos2::new(1, 2)));
        assert!(matches!(
            "12".parse::<Pos2>(),
            Err(ParsePosError::MissingComma(_))
        ));
        assert!(matches!(
            "a,2".parse::<Pos2>(),
            Err(ParsePosError::InvalidCoord(_))
        ));
    }
}
