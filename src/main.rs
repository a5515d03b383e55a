//! Neon Runner entry point
//!
//! On the web this boots the browser frame loop. Natively it runs a headless
//! session with a simple lane-dodging autopilot and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    neon_runner::platform::web::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Runner (native) starting...");
    log::info!("Rendering needs a browser - run with `trunk serve` for the web version");

    headless::run(42, 60 * 120);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use neon_runner::Tuning;
    use neon_runner::ads::{AdAdapter, LogBridge, NoGlobals};
    use neon_runner::consts::DEFAULT_FRAME_DT;
    use neon_runner::scene::SceneGraph;
    use neon_runner::settings::Settings;
    use neon_runner::sim::{Game, Lane, LaneStep};
    use neon_runner::ui::NullHud;

    /// Lane the autopilot wants: the one whose nearest obstacle is farthest
    fn safest_lane(game: &Game) -> Lane {
        let nearest = |lane: Lane| {
            game.obstacles()
                .iter()
                .filter(|o| o.lane == lane && o.position.z < 2.0)
                .map(|o| o.position.z)
                .fold(f32::NEG_INFINITY, f32::max)
        };
        Lane::ALL
            .into_iter()
            .min_by(|a, b| nearest(*a).total_cmp(&nearest(*b)))
            .unwrap_or(Lane::Center)
    }

    pub fn run(seed: u64, frames: u32) {
        let tuning = Tuning::load();
        let ads = AdAdapter::new(&NoGlobals, Box::new(LogBridge), tuning.ads.store_url.clone());
        let mut game = Game::new(
            seed,
            tuning,
            Settings::load(),
            SceneGraph::new(),
            Box::new(NullHud),
            Box::new(ads),
        );

        game.start();
        let mut best = 0;
        for frame in 0..frames {
            let want = safest_lane(&game);
            let have = game.player().lane();
            if want.index() < have.index() {
                game.push_input(LaneStep::Left);
            } else if want.index() > have.index() {
                game.push_input(LaneStep::Right);
            }

            game.tick(DEFAULT_FRAME_DT, frame as f64 * DEFAULT_FRAME_DT as f64);

            if !game.session().is_playing() {
                best = best.max(game.session().display_score());
                game.start();
            }
        }
        best = best.max(game.session().display_score());

        log::info!(
            "Headless session done: {} runs, best score {}, {} obstacles spawned",
            game.session().runs,
            best,
            game.obstacles().spawned()
        );
        game.request_install();

        let scene = game.dispose();
        log::info!("Scene nodes after dispose: {}", scene.len());
    }
}
