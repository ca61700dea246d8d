//! Session controller
//!
//! Owns the game state and everything around it: phase transitions, the
//! per-frame step, and turning simulation events into sound and storage
//! writes. Platform code only forwards raw events here and reads the state
//! back for drawing.

use crate::audio::{AudioSink, cue_for};
use crate::highscores::HighScore;
use crate::platform::{Command, InputSampler, KeyValueStore, key_command};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, Metrics, tick};

pub struct Session {
    state: GameState,
    input: InputSampler,
    high_score: HighScore,
    settings: Settings,
    storage: Box<dyn KeyValueStore>,
    audio: Box<dyn AudioSink>,
    /// Final counters of the last finished run
    last_run: Option<Metrics>,
}

impl Session {
    /// Load persisted state and sit on the title screen
    pub fn new(storage: Box<dyn KeyValueStore>, mut audio: Box<dyn AudioSink>) -> Self {
        let high_score = HighScore::load(storage.as_ref());
        let settings = Settings::load(storage.as_ref());
        audio.set_volume(settings.effective_volume());

        Self {
            state: GameState::new(high_score.best()),
            input: InputSampler::new(),
            high_score,
            settings,
            storage,
            audio,
            last_run: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Live counters
    pub fn metrics(&self) -> Metrics {
        self.state.metrics
    }

    /// Snapshot taken when the last run ended
    pub fn last_run(&self) -> Option<Metrics> {
        self.last_run
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Begin a run from the title or game-over screen
    ///
    /// Returns false (and does nothing) from any other phase.
    pub fn start(&mut self) -> bool {
        match self.state.phase {
            GamePhase::Start | GamePhase::GameOver => {}
            GamePhase::Playing | GamePhase::Paused => return false,
        }

        self.input.clear();
        self.state.reset_for_play();
        self.state.metrics.high_score = self.high_score.best();
        log::info!("Run started (best {})", self.high_score.best());
        true
    }

    /// Flip between playing and paused
    ///
    /// Returns false (and does nothing) on the title and game-over screens.
    pub fn toggle_pause(&mut self) -> bool {
        self.state.phase = match self.state.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::Start | GamePhase::GameOver => return false,
        };
        log::info!("{:?}", self.state.phase);
        true
    }

    /// Flip mute and persist the preference. Returns the new mute state.
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.settings.toggle_mute();
        self.audio.set_volume(self.settings.effective_volume());
        if let Err(e) = self.settings.save(self.storage.as_ref()) {
            log::warn!("Could not save settings: {}", e);
        }
        muted
    }

    /// Handle a DOM key-down value
    pub fn key_down(&mut self, key: &str) {
        let Some(command) = key_command(key) else {
            return;
        };
        if self.input.key_down(command) {
            return;
        }
        match command {
            Command::TogglePause => {
                self.toggle_pause();
            }
            Command::ToggleMute => {
                self.toggle_mute();
            }
            Command::Start => {
                self.start();
            }
            Command::MoveLeft | Command::MoveRight => {}
        }
    }

    /// Handle a DOM key-up value
    pub fn key_up(&mut self, key: &str) {
        if let Some(command) = key_command(key) {
            self.input.key_up(command);
        }
    }

    /// Forget held movement keys (window lost focus)
    pub fn release_keys(&mut self) {
        self.input.clear();
    }

    /// Pointer moved to a logical x coordinate
    ///
    /// Moves the paddle immediately, paused or not. Only the next playing
    /// tick clamps it.
    pub fn pointer_moved(&mut self, logical_x: f32) {
        match self.state.phase {
            GamePhase::Playing | GamePhase::Paused => {
                InputSampler::pointer_moved(&mut self.state.paddle, logical_x);
            }
            GamePhase::Start | GamePhase::GameOver => {}
        }
    }

    /// Run one display frame
    ///
    /// Advances the simulation if playing and applies every resulting side
    /// effect before returning, so the caller can draw straight away.
    pub fn frame(&mut self) -> Vec<GameEvent> {
        let input = self.input.sample();
        let events = tick(&mut self.state, &input);
        for event in &events {
            self.dispatch(event);
        }
        events
    }

    fn dispatch(&mut self, event: &GameEvent) {
        if let Some(effect) = cue_for(event) {
            self.audio.play(effect);
        }

        match *event {
            GameEvent::HighScore(score) => {
                self.high_score.submit(score, self.storage.as_ref());
            }
            GameEvent::GameOver(metrics) => {
                log::info!(
                    "Game over: score {}, best combo {}, high score {}",
                    metrics.score,
                    metrics.max_combo,
                    metrics.high_score
                );
                self.last_run = Some(metrics);
            }
            GameEvent::WallHit(_)
            | GameEvent::PaddleHit { .. }
            | GameEvent::PaddleShrunk { .. }
            | GameEvent::MetricsChanged(_) => {}
        }
    }
}
