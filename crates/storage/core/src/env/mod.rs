//! Traits describing the host environment.
//!
//! Oracles expose item properties, the current world snapshot, and time. The
//! engine reads them but never computes what they report.
mod clock;
mod items;
mod world;

pub use clock::{Clock, ManualClock, SystemClock};
pub use items::ItemPropertiesOracle;
pub use world::{PlayerId, Position, RegionId, WorldOracle, WorldSnapshot};
