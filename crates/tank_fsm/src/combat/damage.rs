//! Damage intake
//!
//! The physics collaborator reports contacts (`ContactEvent`); bullets are
//! turned into health loss here, before the FSM reads `Health` in the same
//! frame. Crossing the cripple threshold halves cruise speed for good.

use bevy::prelude::*;

use crate::components::{Health, NavigationAgent, Tank, TankLifecycle};
use crate::config::TankConfig;
use crate::spatial::ColliderTag;

/// Damage of one bullet when the contact doesn't say otherwise.
pub const DEFAULT_BULLET_DAMAGE: i32 = 25;

/// Event: something touched a tank (host engine → ECS).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ContactEvent {
    /// Tank that was touched
    pub tank: Entity,

    /// Tag of the other collider
    pub tag: ColliderTag,

    /// Damage carried by the contact (bullets only)
    pub damage: i32,
}

impl ContactEvent {
    pub fn bullet(tank: Entity) -> Self {
        Self {
            tank,
            tag: ColliderTag::Bullet,
            damage: DEFAULT_BULLET_DAMAGE,
        }
    }
}

/// Event: damage applied (for HUD/effects on the host side).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub target: Entity,
    pub damage: i32,
    pub remaining_health: i32,
    pub crippled: bool,
    /// This hit brought health to zero or below
    pub lethal: bool,
}

/// Result of one `apply_damage` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageOutcome {
    /// This hit pushed health to the cripple threshold (first time only)
    pub crippled: bool,
    /// Health is now <= 0
    pub lethal: bool,
}

/// Subtract `amount` from health; cripple on crossing the threshold.
pub fn apply_damage(
    health: &mut Health,
    navigation: &mut NavigationAgent,
    config: &TankConfig,
    amount: i32,
) -> DamageOutcome {
    health.take_damage(amount);

    let crippled = health.current <= config.cripple_health && navigation.cripple();

    DamageOutcome {
        crippled,
        lethal: !health.is_alive(),
    }
}

/// System: bullets → health
///
/// Non-bullet contacts are ignored. Tanks already torn down ignore everything.
pub fn apply_contact_damage(
    mut contacts: EventReader<ContactEvent>,
    mut tanks: Query<
        (&mut Health, &mut NavigationAgent, &TankConfig, &TankLifecycle),
        With<Tank>,
    >,
    mut dealt: EventWriter<DamageDealt>,
) {
    for contact in contacts.read() {
        if contact.tag != ColliderTag::Bullet {
            continue;
        }

        let Ok((mut health, mut navigation, config, lifecycle)) = tanks.get_mut(contact.tank) else {
            continue;
        };

        if lifecycle.torn_down {
            continue;
        }

        let before = health.current;
        let outcome = apply_damage(&mut health, &mut navigation, config, contact.damage);

        crate::log(&format!(
            "💥 Tank {:?} hit for {} (HP: {} → {})",
            contact.tank, contact.damage, before, health.current
        ));

        if outcome.lethal {
            crate::log(&format!("☠️ Tank {:?} took a lethal hit", contact.tank));
        } else if outcome.crippled {
            crate::log(&format!(
                "Tank {:?} crippled, cruise speed {:.1}",
                contact.tank,
                navigation.cruise_speed()
            ));
        }

        dealt.write(DamageDealt {
            target: contact.tank,
            damage: contact.damage,
            remaining_health: health.current,
            crippled: outcome.crippled,
            lethal: outcome.lethal,
        });
    }
}
