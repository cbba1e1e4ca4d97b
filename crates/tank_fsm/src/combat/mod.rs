//! Combat module (fire control + damage intake)
//!
//! ECS responsibility:
//! - Cannon cooldown, fire decision, muzzle pose
//! - Health loss from bullet contacts, cripple threshold
//!
//! Host engine responsibility:
//! - Projectile spawn/flight/collision (`ProjectileSpawnRequest` → ... → `ContactEvent`)

pub mod cannon;
pub mod damage;


pub use cannon::{Cannon, FireDecision, ProjectileSpawnRequest};
pub use damage::{
    apply_contact_damage, apply_damage, ContactEvent, DamageDealt, DamageOutcome,
    DEFAULT_BULLET_DAMAGE,
};
