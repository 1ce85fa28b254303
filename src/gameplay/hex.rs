//! Hex coordinate system for the battlefield (axial coordinates)
//!
//! Uses axial coordinates (q, r) for easy neighbor calculation.

use serde::{Deserialize, Serialize};

/// Axial hex coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct HexCoordinate {
    pub q: i32,
    pub r: i32,
}

impl HexCoordinate {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate S (derived from q and r)
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Hex distance (half the cube-coordinate Manhattan distance)
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Get all 6 neighboring hex coordinates
    pub fn neighbors(&self) -> [HexCoordinate; 6] {
        [
            HexCoordinate::new(self.q + 1, self.r),
            HexCoordinate::new(self.q + 1, self.r - 1),
            HexCoordinate::new(self.q, self.r - 1),
            HexCoordinate::new(self.q - 1, self.r),
            HexCoordinate::new(self.q - 1, self.r + 1),
            HexCoordinate::new(self.q, self.r + 1),
        ]
    }

    /// Get hex coordinates in a line from self to other (inclusive)
    pub fn line_to(&self, other: &Self) -> Vec<HexCoordinate> {
        let n = self.distance(other) as i32;
        if n == 0 {
            return vec![*self];
        }

        let mut results = Vec::with_capacity((n + 1) as usize);
        for i in 0..=n {
            let t = i as f32 / n as f32;
            let q = self.q as f32 + (other.q - self.q) as f32 * t;
            let r = self.r as f32 + (other.r - self.r) as f32 * t;
            results.push(Self::round(q, r));
        }
        results
    }

    /// Round floating point hex to nearest integer hex
    fn round(q: f32, r: f32) -> Self {
        let s = -q - r;
        let mut rq = q.round();
        let mut rr = r.round();
        let rs = s.round();

        let q_diff = (rq - q).abs();
        let r_diff = (rr - r).abs();
        let s_diff = (rs - s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rq = -rr - rs;
        } else if r_diff > s_diff {
            rr = -rq - rs;
        }

        Self::new(rq as i32, rr as i32)
    }

    /// Get all hexes within range (inclusive). Cardinality is 3r^2 + 3r + 1.
    pub fn hexes_in_radius(&self, range: u32) -> Vec<HexCoordinate> {
        let range = range as i32;
        let mut results = Vec::new();
        for q in -range..=range {
            for r in (-range).max(-q - range)..=range.min(-q + range) {
                results.push(HexCoordinate::new(self.q + q, self.r + r));
            }
        }
        results
    }

    /// Stable, collision-free string encoding, used as JSON map key
    pub fn to_key(&self) -> String {
        format!("{},{}", self.q, self.r)
    }

    /// Parse a key produced by [`to_key`](Self::to_key)
    pub fn from_key(key: &str) -> Option<Self> {
        let (q, r) = key.split_once(',')?;
        Some(Self::new(q.parse().ok()?, r.parse().ok()?))
    }
}

/// Facing direction for units (one of the 6 hexsides)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Facing {
    #[default]
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl Facing {
    /// Get the hex offset for this facing
    pub fn offset(&self) -> HexCoordinate {
        match self {
            Facing::East => HexCoordinate::new(1, 0),
            Facing::NorthEast => HexCoordinate::new(1, -1),
            Facing::NorthWest => HexCoordinate::new(0, -1),
            Facing::West => HexCoordinate::new(-1, 0),
            Facing::SouthWest => HexCoordinate::new(-1, 1),
            Facing::SouthEast => HexCoordinate::new(0, 1),
        }
    }

    /// Get opposite facing
    pub fn opposite(&self) -> Self {
        match self {
            Facing::East => Facing::West,
            Facing::NorthEast => Facing::SouthWest,
            Facing::NorthWest => Facing::SouthEast,
            Facing::West => Facing::East,
            Facing::SouthWest => Facing::NorthEast,
            Facing::SouthEast => Facing::NorthWest,
        }
    }

    /// All facings in counterclockwise rotational order
    pub fn all() -> [Facing; 6] {
        [
            Facing::East,
            Facing::NorthEast,
            Facing::NorthWest,
            Facing::West,
            Facing::SouthWest,
            Facing::SouthEast,
        ]
    }

    /// Index in rotational order (East = 0, counterclockwise)
    pub fn index(&self) -> usize {
        Self::all().iter().position(|f| f == self).unwrap_or(0)
    }

    /// Facing matching a single-hex step, if the step is one hexside
    pub fn from_step(from: HexCoordinate, to: HexCoordinate) -> Option<Facing> {
        let delta = HexCoordinate::new(to.q - from.q, to.r - from.r);
        Facing::all().into_iter().find(|f| f.offset() == delta)
    }
}
