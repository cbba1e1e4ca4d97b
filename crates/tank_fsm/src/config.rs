//! Tank tunables (static per-tank configuration)
//!
//! Supplied at construction as a component. Can be authored in RON:
//!
//! ```ron
//! (
//!     spotting_range: 400.0,
//!     shoot_interval: 2.0,
//!     patrol_area: (min: (0.0, 0.0), max: (1000.0, 1000.0)),
//! )
//! ```
//!
//! Missing fields fall back to `TankConfig::default()`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors from loading a tank config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("Failed to read config '{path}': {details}")]
    Read { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in tank config: {0}")]
    Parse(String),

    /// Values parsed but make no sense together.
    #[error("Invalid tank config: {0}")]
    Invalid(String),
}

/// Rectangle on the XZ plane where patrol waypoints are picked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct PatrolArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for PatrolArea {
    fn default() -> Self {
        Self {
            min: Vec2::new(500.0, 500.0),
            max: Vec2::new(2500.0, 2500.0),
        }
    }
}

impl PatrolArea {
    fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.y && point.z <= self.max.y
    }
}

/// Per-tank tunables.
///
/// Distances are world units, times are seconds.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct TankConfig {
    /// Sight rays reach `spotting_range * 5`; Chase gives up past the same range.
    pub spotting_range: f32,
    /// Flee → Patrol once the remembered hostile is farther than this.
    pub flee_distance: f32,
    /// Chase → Flee once the hostile is closer than this.
    pub too_close_distance: f32,
    /// Reserved for Evade.
    pub evasion_distance: f32,
    /// Turret slerp factor per second.
    pub rotation_speed: f32,
    /// Minimum time between shots.
    pub shoot_interval: f32,
    /// Fire band lower edge; closer than this Chase drops to quarter speed.
    pub min_fire_distance: f32,
    /// Fire band upper edge.
    pub max_fire_distance: f32,
    /// A waypoint closer than this counts as reached.
    pub waypoint_reach_distance: f32,
    pub patrol_area: PatrolArea,
    pub max_health: i32,
    /// At or below this health the tank moves at half speed for good.
    pub cripple_health: i32,
    /// Turret pivot height above the hull origin.
    pub turret_height: f32,
    /// Muzzle offset forward of the turret pivot.
    pub muzzle_length: f32,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            spotting_range: 500.0,
            flee_distance: 200.0,
            too_close_distance: 100.0,
            evasion_distance: 150.0,
            rotation_speed: 10.0,
            shoot_interval: 3.0,
            min_fire_distance: 200.0,
            max_fire_distance: 300.0,
            waypoint_reach_distance: 100.0,
            patrol_area: PatrolArea::default(),
            max_health: 100,
            cripple_health: 50,
            turret_height: 2.0,
            muzzle_length: 3.0,
        }
    }
}

impl TankConfig {
    /// Max reach of sight rays (and the Chase give-up distance).
    pub fn sight_range(&self) -> f32 {
        self.spotting_range * 5.0
    }

    /// Parse from RON text and validate.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: TankConfig =
            ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a RON file and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;

        let config = Self::from_ron(&text)?;
        crate::logger::log_info(&format!("Loaded tank config from {:?}", path));
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("spotting_range", self.spotting_range),
            ("flee_distance", self.flee_distance),
            ("too_close_distance", self.too_close_distance),
            ("evasion_distance", self.evasion_distance),
            ("rotation_speed", self.rotation_speed),
            ("shoot_interval", self.shoot_interval),
            ("min_fire_distance", self.min_fire_distance),
            ("max_fire_distance", self.max_fire_distance),
            ("waypoint_reach_distance", self.waypoint_reach_distance),
            ("muzzle_length", self.muzzle_length),
        ];

        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if self.min_fire_distance > self.max_fire_distance {
            return Err(ConfigError::Invalid(format!(
                "fire band is empty: min {} > max {}",
                self.min_fire_distance, self.max_fire_distance
            )));
        }

        if !self.turret_height.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "turret_height must be a finite number, got {}",
                self.turret_height
            )));
        }

        if !self.patrol_area.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "patrol area bounds must be finite, got min {:?} max {:?}",
                self.patrol_area.min, self.patrol_area.max
            )));
        }

        if self.patrol_area.min.x > self.patrol_area.max.x
            || self.patrol_area.min.y > self.patrol_area.max.y
        {
            return Err(ConfigError::Invalid(format!(
                "patrol area min {:?} exceeds max {:?}",
                self.patrol_area.min, self.patrol_area.max
            )));
        }

        if self.max_health <= 0 {
            return Err(ConfigError::Invalid(format!(
                "max_health must be positive, got {}",
                self.max_health
            )));
        }

        // 0 disables crippling: health <= 0 is already Dead
        if self.cripple_health < 0 || self.cripple_health >= self.max_health {
            return Err(ConfigError::Invalid(format!(
                "cripple_health must be in 0..{}, got {}",
                self.max_health, self.cripple_health
            )));
        }

        Ok(())
    }
}
