//! Game loop
//!
//! [`Game`] owns every simulation component plus the injected scene, HUD and
//! lifecycle sink, and advances them one frame per [`Game::tick`].

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::camera::Camera;
use super::obstacles::ObstacleField;
use super::particles::ParticleSystem;
use super::player::{LaneStep, Player};
use super::state::{GamePhase, Session};
use super::world::World;
use crate::ads::LifecycleSink;
use crate::consts::MAX_FRAME_DT;
use crate::sanitize_delta;
use crate::scene::{SceneGraph, TemplateLibrary};
use crate::settings::{QualityPreset, Settings};
use crate::tuning::Tuning;
use crate::ui::Hud;

/// The whole running game
pub struct Game {
    tuning: Tuning,
    settings: Settings,
    session: Session,
    world: World,
    player: Player,
    obstacles: ObstacleField,
    particles: ParticleSystem,
    camera: Camera,
    scene: SceneGraph,
    hud: Box<dyn Hud>,
    lifecycle: Box<dyn LifecycleSink>,
    rng: Pcg32,
    /// Lane steps received since the last frame
    pending: Vec<LaneStep>,
    /// Last score pushed to the HUD
    shown_score: u32,
    running: bool,
}

impl Game {
    /// Build the scene, show the start panel and report `game_ready`
    pub fn new(
        seed: u64,
        tuning: Tuning,
        settings: Settings,
        mut scene: SceneGraph,
        mut hud: Box<dyn Hud>,
        mut lifecycle: Box<dyn LifecycleSink>,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let templates = TemplateLibrary::new(&tuning.obstacles, &tuning.track);

        let world = World::new(
            &mut scene,
            &templates,
            tuning.track,
            settings.quality.star_count(),
            &mut rng,
        );
        let player = Player::new(&mut scene, &templates, tuning.player);
        let obstacles = ObstacleField::new(
            tuning.obstacles,
            tuning.player.lane_width,
            templates.obstacle.clone(),
        );
        let particles = ParticleSystem::new(tuning.particles);

        hud.set_score(0);
        hud.set_start_visible(true);
        hud.set_game_over_visible(false);
        lifecycle.game_ready();

        log::info!(
            "Game created (seed {}, quality {})",
            seed,
            settings.quality.as_str()
        );

        Self {
            tuning,
            settings,
            session: Session::default(),
            world,
            player,
            obstacles,
            particles,
            camera: Camera::default(),
            scene,
            hud,
            lifecycle,
            rng,
            pending: Vec::new(),
            shown_score: 0,
            running: true,
        }
    }

    /// Begin a run, or restart the current one
    pub fn start(&mut self) {
        self.session.begin(self.tuning.session.base_speed);
        self.obstacles.reset(&mut self.scene);
        self.player.reset(&mut self.scene);
        self.pending.clear();

        self.shown_score = 0;
        self.hud.set_score(0);
        self.hud.set_start_visible(false);
        self.hud.set_game_over_visible(false);
        self.lifecycle.game_started();

        log::info!("Run {} started", self.session.runs);
    }

    /// Queue a lane step for the next frame
    pub fn push_input(&mut self, step: LaneStep) {
        self.pending.push(step);
    }

    /// Forward the call-to-action to the lifecycle sink
    pub fn request_install(&mut self) {
        self.lifecycle.install_requested();
    }

    /// Advance one frame of `dt` seconds; `time` is wall-clock seconds
    pub fn tick(&mut self, dt: f32, time: f64) {
        if !self.running {
            return;
        }
        let dt = sanitize_delta(dt).min(MAX_FRAME_DT);

        for step in self.pending.drain(..) {
            if self.player.apply(step) {
                log::debug!("Lane changed to {:?}", self.player.lane());
            }
        }

        match self.session.phase {
            GamePhase::Playing => self.tick_playing(dt, time),
            GamePhase::Idle => {
                let idle_speed = self.tuning.session.idle_speed;
                self.world.update(dt, idle_speed, &mut self.scene);
                self.particles.update(dt, &mut self.scene);
            }
        }
    }

    fn tick_playing(&mut self, dt: f32, time: f64) {
        self.session.speed += self.tuning.session.acceleration * dt;
        self.session.elapsed += dt;
        let speed = self.session.speed;

        self.world.update(dt, speed, &mut self.scene);
        self.player.update(dt, time, &mut self.scene);
        self.obstacles.update(dt, speed, &mut self.scene, &mut self.rng);
        self.particles.update(dt, &mut self.scene);

        self.session.score += speed * dt * self.tuning.session.score_rate;
        let score = self.session.display_score();
        if score != self.shown_score {
            self.shown_score = score;
            self.hud.set_score(score);
        }

        if self.obstacles.check_collision(&self.player) {
            self.game_over();
        } else {
            self.camera.follow(self.player.position().x, dt);
        }
    }

    fn game_over(&mut self) {
        self.session.phase = GamePhase::Idle;

        let count = self
            .tuning
            .session
            .crash_burst
            .min(self.settings.max_particles());
        self.particles.explode(
            self.player.position(),
            self.tuning.session.crash_color,
            count,
            &mut self.scene,
            &mut self.rng,
        );

        self.hud.set_game_over_visible(true);
        self.lifecycle.game_ended();

        if self.settings.effective_camera_shake() {
            let offset = self.rng.random::<f32>() - 0.5;
            self.camera.jolt(offset);
        }

        log::info!(
            "Run {} ended: score {} after {:.1}s",
            self.session.runs,
            self.session.display_score(),
            self.session.elapsed
        );
    }

    /// Switch to the next quality preset and persist it
    ///
    /// Affects the crash burst cap immediately; the starfield keeps its
    /// density until the page reloads.
    pub fn cycle_quality(&mut self) -> QualityPreset {
        self.settings.quality = self.settings.quality.next();
        self.settings.save();
        log::info!("Quality set to {}", self.settings.quality.as_str());
        self.settings.quality
    }

    /// Stop ticking; the frame loop ends on its next check
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop and detach every node, handing back the empty scene
    pub fn dispose(mut self) -> SceneGraph {
        self.stop();
        self.particles.clear(&mut self.scene);
        self.obstacles.reset(&mut self.scene);
        self.player.dispose(&mut self.scene);
        self.world.dispose(&mut self.scene);
        log::info!("Game disposed");
        self.scene
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}
