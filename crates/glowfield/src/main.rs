//! Headless demo loop
//!
//! Runs the simulation for a fixed number of frames with a synthetic input
//! that sweeps the aim point in a circle, logging wave and bullet activity.
//! Windowing and rendering are host concerns; this binary exercises the
//! whole core without them.

use glowfield::{Game, GameConfig, InputState, NullParticles};
use vector_engine::foundation::math::Vec2;

const FRAMES: u32 = 600;
const DT: f32 = 1.0 / 60.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    vector_engine::foundation::logging::init();

    let config = GameConfig::load_or_default("glowfield.toml");
    let mut game = Game::new(config)?;
    let mut particles = NullParticles;

    for frame in 0..FRAMES {
        let t = frame as f32 * DT;
        let input = InputState {
            pointer: Vec2::new(
                640.0 + 300.0 * t.cos(),
                360.0 + 200.0 * t.sin(),
            ),
            screen_width: 1280.0,
            screen_height: 720.0,
            firing: true,
        };
        let output = game.step(&input, &mut particles, DT)?;

        if frame % 60 == 0 {
            log::info!(
                "frame {frame}: wave {} | {} instances | {} bullets",
                game.waves().level(),
                output.instances.len(),
                output.bullet_count,
            );
        }
    }

    log::info!(
        "done: wave {}, {} bullets live",
        game.waves().level(),
        game.bullet_count()
    );
    Ok(())
}
