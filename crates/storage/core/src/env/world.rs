use std::fmt;

/// Discrete world position in block coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Squared euclidean distance, saturating at `i64::MAX`.
    pub fn distance_squared(self, other: Position) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        let dz = i64::from(self.z) - i64::from(other.z);
        dx.saturating_mul(dx)
            .saturating_add(dy.saturating_mul(dy))
            .saturating_add(dz.saturating_mul(dz))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Permission identity of the acting player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub u32);

/// Loadable world region (chunk cluster) that discovery may scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionId(pub i32, pub i32);

/// Read-only view of the acting player and the regions around them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldSnapshot {
    pub player: PlayerId,
    pub position: Position,
    pub regions: Vec<RegionId>,
}

impl WorldSnapshot {
    pub fn new(player: PlayerId, position: Position, regions: Vec<RegionId>) -> Self {
        Self {
            player,
            position,
            regions,
        }
    }

    /// Returns true if `position` lies within `range` of the player.
    /// `None` is unlimited.
    pub fn is_within_range(&self, position: Position, range: Option<u32>) -> bool {
        match range {
            None => true,
            Some(range) => {
                let range = i64::from(range);
                self.position.distance_squared(position) <= range * range
            }
        }
    }

    pub fn is_region_loaded(&self, region: RegionId) -> bool {
        self.regions.contains(&region)
    }
}

/// Provides the current world snapshot, if a world session is active.
pub trait WorldOracle {
    fn snapshot(&self) -> Option<WorldSnapshot>;
}
