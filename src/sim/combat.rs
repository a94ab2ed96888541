//! Hit testing and ordered combat resolution
//!
//! Pass order is load-bearing: player bullets resolve against the boss before
//! grunts, hostile fire resolves before orb pickup, and melee runs last. Each
//! pass iterates in reverse index order with swap-and-pop removal so in-place
//! deletions never skip or double-visit an element. A bullet registers at
//! most one hit per frame. Health may go transiently negative inside a pass;
//! the removal check at the hit site is what clears the entity.

use glam::Vec2;
use rand::Rng;

use super::director;
use super::entity::{Footprint, Orb, Particle};
use super::tick::FrameEvent;
use super::world::{GamePhase, World};

/// Particle tints for the different impact kinds
const BOSS_HIT_COLOR: [u8; 3] = [255, 50, 50];
const ENEMY_DEATH_COLOR: [u8; 3] = [50, 255, 50];
const PLAYER_HIT_COLOR: [u8; 3] = [255, 200, 50];
const KAMIKAZE_BLAST_COLOR: [u8; 3] = [255, 50, 0];

/// Circle-circle overlap test
pub fn overlaps(a: &impl Footprint, b: &impl Footprint) -> bool {
    a.pos().distance(b.pos()) < a.radius() + b.radius()
}

fn spawn_burst(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    pos: Vec2,
    color: [u8; 3],
    count: usize,
) {
    for _ in 0..count {
        particles.push(Particle::new(pos, color, rng));
    }
}

/// Passes 1 and 2: player/helper bullets against the boss, then grunts
///
/// Orbs dropped by kills go into `spawned_orbs` and only join the world after
/// the orb pass, so a fresh drop is never hit-tested the frame it appears.
pub fn resolve_player_bullets(
    world: &mut World,
    events: &mut Vec<FrameEvent>,
    spawned_orbs: &mut Vec<Orb>,
) {
    for i in (0..world.player_bullets.len()).rev() {
        world.player_bullets[i].update();
        if world.player_bullets[i].is_expired() {
            world.player_bullets.swap_remove(i);
            continue;
        }

        // Pass 1: the boss soaks the hit before any grunt is considered
        let mut boss_hit = false;
        let mut boss_down = false;
        if let Some(boss) = world.boss.as_mut() {
            if overlaps(&world.player_bullets[i], boss) {
                boss.health -= world.player_bullets[i].damage;
                boss_hit = true;
                boss_down = boss.health <= 0;
            }
        }
        if boss_hit {
            let shot = world.player_bullets.swap_remove(i);
            spawn_burst(
                &mut world.particles,
                &mut world.rng,
                shot.body.pos,
                BOSS_HIT_COLOR,
                1,
            );
            if boss_down {
                director::defeat_boss(world, events);
            }
            continue;
        }

        // Pass 2: grunts; the bullet stops at its first match
        for j in (0..world.enemies.len()).rev() {
            if !overlaps(&world.player_bullets[i], &world.enemies[j]) {
                continue;
            }
            world.enemies[j].health -= world.player_bullets[i].damage;
            if world.enemies[j].health <= 0 {
                let enemy = world.enemies.swap_remove(j);
                spawn_burst(
                    &mut world.particles,
                    &mut world.rng,
                    enemy.body.pos,
                    ENEMY_DEATH_COLOR,
                    8,
                );
                spawned_orbs.push(Orb::new(enemy.body.pos));
                world.progression.score += 10 * world.progression.level as u64;
                events.push(FrameEvent::Explosion {
                    pos: enemy.body.pos,
                    magnitude: 2.0,
                });
            }
            world.player_bullets.swap_remove(i);
            break;
        }
    }
}

/// Pass 3: hostile bullets against the player
pub fn resolve_enemy_bullets(world: &mut World, events: &mut Vec<FrameEvent>) {
    for i in (0..world.enemy_bullets.len()).rev() {
        world.enemy_bullets[i].update();
        if world.enemy_bullets[i].is_expired() {
            world.enemy_bullets.swap_remove(i);
            continue;
        }
        if !overlaps(&world.enemy_bullets[i], &world.player) {
            continue;
        }

        // The bullet is spent even if invincibility soaked the damage
        let shot = world.enemy_bullets.swap_remove(i);
        world.player.take_damage(shot.damage);
        spawn_burst(
            &mut world.particles,
            &mut world.rng,
            world.player.body.pos,
            PLAYER_HIT_COLOR,
            5,
        );
        events.push(FrameEvent::Explosion {
            pos: world.player.body.pos,
            magnitude: 10.0,
        });
        if world.player.health <= 0 {
            trigger_game_over(world, events);
        }
    }
}

/// Pass 4: orb pursuit and pickup; pickup feeds XP and may wake the director
pub fn resolve_orbs(world: &mut World, events: &mut Vec<FrameEvent>) {
    let player_pos = world.player.body.pos;
    let pickup_radius = world.player.size;
    for i in (0..world.orbs.len()).rev() {
        world.orbs[i].update(player_pos);
        if world.orbs[i].body.pos.distance(player_pos) >= pickup_radius {
            continue;
        }
        let orb = world.orbs.swap_remove(i);
        world.progression.xp += orb.value;
        events.push(FrameEvent::OrbCollected {
            pos: orb.body.pos,
            value: orb.value,
        });
        director::check_level_up(world, events);
    }
}

/// Pass 5: enemy melee against the player
///
/// Kamikazes detonate: full damage, self-destruct, big burst, no orb drop.
/// Everything else deals contact damage and knocks itself back instead.
pub fn resolve_melee(world: &mut World, events: &mut Vec<FrameEvent>) {
    for i in (0..world.enemies.len()).rev() {
        if !overlaps(&world.enemies[i], &world.player) {
            continue;
        }
        let damage = world.enemies[i].damage;
        let pos = world.enemies[i].body.pos;

        if world.enemies[i].is_kamikaze() {
            world.player.take_damage(damage);
            world.enemies[i].health = 0;
            spawn_burst(
                &mut world.particles,
                &mut world.rng,
                pos,
                KAMIKAZE_BLAST_COLOR,
                15,
            );
            events.push(FrameEvent::Explosion {
                pos,
                magnitude: 20.0,
            });
        } else {
            world.player.take_damage(damage);
            events.push(FrameEvent::Explosion {
                pos: world.player.body.pos,
                magnitude: 5.0,
            });
            // The attacker bounces off; the player holds their ground
            let push = (pos - world.player.body.pos).normalize_or_zero() * 10.0;
            world.enemies[i].body.pos += push;
        }

        if world.enemies[i].health <= 0 {
            let enemy = world.enemies.swap_remove(i);
            if !enemy.is_kamikaze() {
                spawn_burst(
                    &mut world.particles,
                    &mut world.rng,
                    enemy.body.pos,
                    ENEMY_DEATH_COLOR,
                    8,
                );
            }
            // Contact deaths score like any kill but never drop an orb
            world.progression.score += 10 * world.progression.level as u64;
        }

        if world.player.health <= 0 {
            trigger_game_over(world, events);
        }
    }
}

/// End the run once; records the high score for external storage
pub fn trigger_game_over(world: &mut World, events: &mut Vec<FrameEvent>) {
    if world.phase != GamePhase::Playing {
        return;
    }
    world.phase = GamePhase::GameOver;
    if world.progression.score > world.high_score {
        world.high_score = world.progression.score;
    }
    events.push(FrameEvent::GameOver {
        score: world.progression.score,
    });
    log::info!(
        "game over at level {} with score {}",
        world.progression.level,
        world.progression.score
    );
}
