//! Spawn cadence, level progression, and the boss lifecycle
//!
//! The director only injects entities and flips progression state; it never
//! resolves combat. It runs before the entity updates each frame and is
//! re-entered by the combat layer when a boss falls or XP fills up.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::entity::{Boss, Enemy, Helper};
use super::tick::FrameEvent;
use super::world::World;

/// Grunt population target while no boss is up
fn enemy_cap(level: u32, boss_alive: bool) -> usize {
    if boss_alive {
        // Existing grunts stay; only new spawns are held back
        5
    } else {
        (20 + level * 3) as usize
    }
}

/// Frames between spawn attempts; shrinks with level to a floor of 20
fn spawn_interval(level: u32) -> u64 {
    (60i64 - level as i64 * 3).max(20) as u64
}

/// Spawn a grunt on the cadence while the population is below the cap
pub fn update_spawns(world: &mut World) {
    let cap = enemy_cap(world.progression.level, world.boss.is_some());
    if world.enemies.len() >= cap {
        return;
    }
    if world.frame % spawn_interval(world.progression.level) != 0 {
        return;
    }

    // Off-screen ring around the player, clamped to the arena
    let angle = world.rng.random_range(0.0..TAU);
    let distance = world.rng.random_range(500.0..800.0);
    let mut pos = world.player.body.pos + Vec2::from_angle(angle) * distance;
    pos.x = pos.x.clamp(0.0, world.config.width);
    pos.y = pos.y.clamp(0.0, world.config.height);

    let level = world.progression.level;
    let enemy = Enemy::new(pos, level, &mut world.rng);
    world.enemies.push(enemy);
}

/// Called whenever XP changes: once the bar fills and no boss is up, spawn
/// exactly one boss and hold XP at the threshold until it falls
pub fn check_level_up(world: &mut World, events: &mut Vec<FrameEvent>) {
    if world.progression.xp < world.progression.next_level_xp {
        return;
    }
    if world.boss.is_none() {
        spawn_boss(world, events);
    }
    world.progression.xp = world.progression.next_level_xp;
}

fn spawn_boss(world: &mut World, events: &mut Vec<FrameEvent>) {
    let center = world.arena_center();
    let level = world.progression.level;
    world.boss = Some(Boss::new(center, level));
    events.push(FrameEvent::BossSpawned {
        pos: center,
        magnitude: 20.0,
    });
    log::info!("boss spawned at level {level}");
}

/// Boss-defeat sequence: the actual level-up
///
/// Clears the boss, bumps the level, resets XP, grows the threshold, heals
/// the player, speeds up the weapon, grants a helper, and sweeps all hostile
/// projectiles off the field.
pub fn defeat_boss(world: &mut World, events: &mut Vec<FrameEvent>) {
    world.boss = None;
    world.progression.level += 1;
    world.progression.xp = 0;
    world.progression.next_level_xp =
        (world.progression.next_level_xp as f32 * 1.5).floor() as u32;
    world.weapon.improve();
    world.player.health = world.player.max_health;
    world.helpers.push(Helper::new(world.player.body.pos));
    world.enemy_bullets.clear();

    let level = world.progression.level;
    events.push(FrameEvent::BossDefeated {
        level,
        magnitude: 30.0,
    });
    events.push(FrameEvent::LevelUp { level });
    log::info!("boss defeated; level is now {level}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BASE_XP_THRESHOLD;
    use crate::settings::WorldConfig;
    use crate::sim::world::GamePhase;

    fn playing_world() -> World {
        let mut world = World::new(WorldConfig::with_seed(11));
        world.reset_game();
        world
    }

    #[test]
    fn spawn_cadence_honors_interval_and_cap() {
        let mut world = playing_world();
        let interval = spawn_interval(1);
        assert_eq!(interval, 57);

        // Off-cadence frames spawn nothing
        world.frame = 1;
        update_spawns(&mut world);
        assert!(world.enemies.is_empty());

        // On-cadence frames spawn one grunt
        world.frame = interval;
        update_spawns(&mut world);
        assert_eq!(world.enemies.len(), 1);

        // A full population blocks further spawns
        while world.enemies.len() < enemy_cap(1, false) {
            let e = Enemy::new(Vec2::ZERO, 1, &mut world.rng);
            world.enemies.push(e);
        }
        world.frame = interval * 2;
        update_spawns(&mut world);
        assert_eq!(world.enemies.len(), enemy_cap(1, false));
    }

    #[test]
    fn spawn_interval_has_a_floor() {
        assert_eq!(spawn_interval(1), 57);
        assert_eq!(spawn_interval(13), 21);
        assert_eq!(spawn_interval(14), 20);
        assert_eq!(spawn_interval(100), 20);
    }

    #[test]
    fn boss_presence_drops_the_cap_without_despawning() {
        let mut world = playing_world();
        for _ in 0..10 {
            let e = Enemy::new(Vec2::ZERO, 1, &mut world.rng);
            world.enemies.push(e);
        }
        world.boss = Some(Boss::new(world.arena_center(), 1));
        world.frame = spawn_interval(1);
        update_spawns(&mut world);
        // Existing ten grunts all survive; no new one appears
        assert_eq!(world.enemies.len(), 10);
    }

    #[test]
    fn spawned_enemies_land_inside_the_arena() {
        let mut world = playing_world();
        // Park the player in a corner so the ring would leave the map
        world.player.body.pos = Vec2::new(50.0, 50.0);
        for i in 0..40u64 {
            world.frame = spawn_interval(1) * (i + 1);
            update_spawns(&mut world);
        }
        for e in &world.enemies {
            assert!(e.body.pos.x >= 0.0 && e.body.pos.x <= world.config.width);
            assert!(e.body.pos.y >= 0.0 && e.body.pos.y <= world.config.height);
        }
    }

    #[test]
    fn full_xp_spawns_exactly_one_boss() {
        let mut world = playing_world();
        let mut events = Vec::new();

        world.progression.xp = world.progression.next_level_xp;
        check_level_up(&mut world, &mut events);
        assert!(world.boss.is_some());
        assert!(matches!(events[0], FrameEvent::BossSpawned { .. }));

        // XP keeps arriving while the boss lives: capped, no second boss
        world.progression.xp = world.progression.next_level_xp + 50;
        check_level_up(&mut world, &mut events);
        assert_eq!(world.progression.xp, world.progression.next_level_xp);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, FrameEvent::BossSpawned { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn below_threshold_xp_never_triggers() {
        let mut world = playing_world();
        let mut events = Vec::new();
        world.progression.xp = world.progression.next_level_xp - 1;
        check_level_up(&mut world, &mut events);
        assert!(world.boss.is_none());
        assert!(events.is_empty());
    }

    #[test]
    fn defeat_sequence_applies_every_reward() {
        let mut world = playing_world();
        let mut events = Vec::new();
        world.boss = Some(Boss::new(world.arena_center(), 1));
        world.progression.xp = world.progression.next_level_xp;
        world.player.health = 10;
        world.enemy_bullets.push(crate::sim::Projectile::new(
            Vec2::ZERO,
            Vec2::X,
            crate::sim::ProjectileOwner::Boss,
            6.0,
            40.0,
            15,
        ));
        let old_rate = world.weapon.fire_rate;

        defeat_boss(&mut world, &mut events);

        assert!(world.boss.is_none());
        assert_eq!(world.progression.level, 2);
        assert_eq!(world.progression.xp, 0);
        assert_eq!(
            world.progression.next_level_xp,
            (BASE_XP_THRESHOLD as f32 * 1.5) as u32
        );
        assert_eq!(world.weapon.fire_rate, old_rate - 2);
        assert_eq!(world.player.health, world.player.max_health);
        assert_eq!(world.helpers.len(), 2);
        assert!(world.enemy_bullets.is_empty());
        assert_eq!(world.phase, GamePhase::Playing);
        assert!(events.iter().any(|e| matches!(e, FrameEvent::LevelUp { level: 2 })));
    }
}
