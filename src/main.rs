//! Headless demo driver
//!
//! Runs the simulation with scripted input and logs the notable events.
//! Useful for sanity-checking balance changes without a renderer attached:
//! `RUST_LOG=info cargo run --release -- [seed] [frames]`

use glam::Vec2;
use space_survivor::highscores::{FileStore, ScoreStore, record_if_beaten};
use space_survivor::settings::WorldConfig;
use space_survivor::sim::{FrameEvent, GamePhase, TickInput, World, tick};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(0);
    let frames: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(7200);

    let mut store = FileStore::new("highscore.json".into());
    let best = store.load().unwrap_or(0);

    let mut world = World::new(WorldConfig::with_seed(seed));
    world.high_score = best;
    world.reset_game();

    for frame in 0..frames {
        // Scripted wandering: a slow figure-eight keeps the run interesting
        let t = frame as f32 / 120.0;
        let input = TickInput {
            dir: Vec2::new(t.cos(), (2.0 * t).sin()),
            ..Default::default()
        };

        for event in tick(&mut world, &input) {
            match event {
                FrameEvent::LevelUp { level } => log::info!("[{frame}] reached level {level}"),
                FrameEvent::BossSpawned { pos, .. } => {
                    log::info!("[{frame}] boss incoming at ({:.0}, {:.0})", pos.x, pos.y)
                }
                FrameEvent::BossDefeated { level, .. } => {
                    log::info!("[{frame}] boss down, level {level}")
                }
                FrameEvent::OrbCollected { .. } => log::debug!("[{frame}] orb collected"),
                FrameEvent::Explosion { magnitude, .. } if magnitude >= 10.0 => {
                    log::debug!("[{frame}] big explosion ({magnitude})")
                }
                _ => {}
            }
        }

        if world.phase == GamePhase::GameOver {
            break;
        }
    }

    let p = &world.progression;
    println!(
        "seed {seed}: survived {} frames, score {}, level {}, {} helpers, {} enemies on field",
        world.frame,
        p.score,
        p.level,
        world.helpers.len(),
        world.enemies.len(),
    );

    let new_best = record_if_beaten(&mut store, best, p.score);
    if new_best > best {
        println!("new high score: {new_best} (was {best})");
    }
}
