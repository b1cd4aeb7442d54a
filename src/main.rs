//! Page Breaker headless demo
//!
//! Plays one run over a synthetic page with an autopilot at the controls and
//! logs the outcome. Usage: `page-breaker [SETTINGS.json] [--seed N]`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = demo::run() {
        log::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `Game` directly
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use page_breaker::platform::{HeadlessPage, RecordingRenderer};
    use page_breaker::sim::{GameMode, GameState, Rect};
    use page_breaker::{Game, GameError, RunState, Settings};

    const FRAME: f64 = 1.0 / 60.0;
    /// Give up after ten minutes of game time
    const MAX_FRAMES: u64 = 60 * 60 * 10;
    const WINDOW: Vec2 = Vec2::new(960.0, 720.0);

    struct Args {
        settings: Option<String>,
        seed: u64,
    }

    fn parse_args() -> Args {
        let mut args = Args {
            settings: None,
            seed: 0x5eed,
        };
        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            if arg == "--seed" {
                match iter.next().map(|s| s.parse()) {
                    Some(Ok(seed)) => args.seed = seed,
                    _ => log::warn!("--seed needs an integer, keeping {}", args.seed),
                }
            } else {
                args.settings = Some(arg);
            }
        }
        args
    }

    pub fn run() -> Result<(), GameError> {
        let args = parse_args();
        let settings = match &args.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        let page = HeadlessPage::grid(Vec2::new(120.0, 90.0), 5, 8, Vec2::new(72.0, 22.0), 18.0)
            .with_help_block(Rect::new(330.0, 400.0, 300.0, 48.0));
        let mut game = Game::new(page, RecordingRenderer::default(), settings, args.seed);
        game.resize(WINDOW.x, WINDOW.y)?;
        game.init()?;
        log::info!("Page Breaker (headless) starting, seed {}", args.seed);

        let mut time = 0.0;
        for frame in 0..MAX_FRAMES {
            autopilot(&mut game, frame);
            let result = game.update(time)?;
            time += FRAME;

            if result.state != RunState::Running {
                log::info!(
                    "Run finished after {frame} frames: {:?}, score {}, {} blocks destroyed, {} frames drawn",
                    result.state,
                    result.score,
                    game.page().destroyed.len(),
                    game.renderer().frames
                );
                return Ok(());
            }
        }

        log::info!(
            "Stopping after {MAX_FRAMES} frames with score {}",
            game.state().scoreboard.score
        );
        game.request_quit();
        game.update(time)?;
        Ok(())
    }

    /// Follow the lowest falling ball and relaunch whenever one is attached
    fn autopilot(game: &mut Game<HeadlessPage, RecordingRenderer>, frame: u64) {
        let state = game.state();
        if state.mode != GameMode::Play {
            return;
        }

        if let Some(x) = target_x(state, frame) {
            game.mousemove(x, WINDOW.y / 2.0);
        }

        // Serve every half second; spawns a ball too when none is attached
        if frame % 30 == 0 {
            game.keyup("Space");
        }
    }

    fn target_x(state: &GameState, frame: u64) -> Option<f32> {
        let ball = state
            .balls
            .iter()
            .filter(|b| !b.attached && b.velocity.y > 0.0)
            .max_by(|a, b| {
                a.position
                    .y
                    .partial_cmp(&b.position.y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;
        // Oscillating offset so rallies don't settle into a loop
        let wobble = (frame as f32 * 0.05).sin() * state.paddle.width * 0.3;
        Some(ball.center().x + wobble)
    }
}
