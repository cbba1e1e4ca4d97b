//! ECS components for tank entities
//!
//! Grouped by domain:
//! - tank: identity, health, rosters, lifecycle flags
//! - navigation: destination/speed handed to the external mover
//! - turret: independent aim rotation + muzzle pose

pub mod navigation;
pub mod tank;
pub mod turret;

pub use navigation::*;
pub use tank::*;
pub use turret::*;
