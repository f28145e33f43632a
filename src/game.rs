//! The game aggregate
//!
//! Owns the simulation state, the input state and the high-score
//! collaborator. The host calls `tick` then `render` once per frame.

use crate::Viewport;
use crate::highscores::{HighScoreEntry, HighScoreStore};
use crate::platform::{InputState, now_ms};
use crate::renderer::{self, Surface};
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GameState};

pub struct Game {
    state: GameState,
    input: InputState,
    scores: Box<dyn HighScoreStore>,
    high_scores: Vec<HighScoreEntry>,
    /// Events produced by the last tick
    events: Vec<GameEvent>,
}

impl Game {
    /// New session in name entry. The level seed comes from the settings or
    /// the clock.
    pub fn new(settings: &Settings, viewport: Viewport, mut scores: Box<dyn HighScoreStore>) -> Self {
        let seed = settings.seed.unwrap_or_else(|| now_ms() as u64);
        log::info!("Game initialized with seed: {seed}");
        let high_scores = scores.load_high_scores();

        Self {
            state: GameState::new(settings, viewport, seed),
            input: InputState::new(),
            scores,
            high_scores,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Host input wiring writes here
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn high_scores(&self) -> &[HighScoreEntry] {
        &self.high_scores
    }

    pub fn best_score(&self) -> Option<u64> {
        self.high_scores.first().map(|e| e.score)
    }

    /// Events from the last tick (landings, stomps, pickups, ...)
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Name typed into a host text field
    pub fn submit_name(&mut self, name: &str) -> bool {
        sim::submit_name(&mut self.state, name)
    }

    /// Advance one frame (`dt` in ms, clamped by the simulation)
    pub fn tick(&mut self, dt: f32, viewport: Viewport) {
        sim::tick(&mut self.state, &mut self.input, viewport, dt);

        self.events = std::mem::take(&mut self.state.events);
        let finished = self.events.iter().find_map(|event| match event {
            GameEvent::RunEnded { score, .. } => Some(*score),
            _ => None,
        });
        if let Some(score) = finished {
            self.record_score(score);
        }
    }

    /// Draw the current frame
    pub fn render(&self, surface: &mut impl Surface, viewport: Viewport) {
        surface.begin(viewport);
        for sprite in renderer::frame(&self.state, viewport, self.best_score()) {
            surface.draw(&sprite);
        }
    }

    fn record_score(&mut self, score: u64) {
        if self.state.player_name.is_empty() {
            log::info!("Run ended without a name, score {score} not saved");
            return;
        }
        self.scores.save_high_score(&self.state.player_name, score);
        self.high_scores = self.scores.load_high_scores();
    }
}
