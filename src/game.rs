//! Frame-loop runner
//!
//! Turns wall-clock timestamps into clamped simulation steps, handles
//! pause/resume/restart between frames and reports the end of a run once.

use crate::renderer::{Renderer, draw_frame};
use crate::settings::{Settings, Viewport};
use crate::sim::{GameState, RunReport, TickInput, tick};

/// What happened on a frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Simulated and drawn
    Running,
    /// Paused: nothing simulated or drawn
    Paused,
    /// The run ended on this frame
    Ended(RunReport),
    /// The run ended on an earlier frame
    Stopped,
}

pub struct Game {
    settings: Settings,
    state: GameState,
    /// Timestamp of the previous frame in seconds
    last_time: Option<f64>,
    paused: bool,
    report: Option<RunReport>,
}

impl Game {
    pub fn new(settings: Settings, seed: u64) -> Self {
        log::info!(
            "New run: seed {seed}, viewport {}x{}",
            settings.viewport.width,
            settings.viewport.height
        );
        let state = GameState::new(&settings, seed);
        Self {
            settings,
            state,
            last_time: None,
            paused: false,
            report: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Final report, once the run is over
    pub fn report(&self) -> Option<&RunReport> {
        self.report.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop scheduling steps. The frame in flight is unaffected.
    pub fn pause(&mut self) {
        if !self.paused {
            log::info!("Paused");
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            log::info!("Resumed");
            self.paused = false;
            // The pause gap is not simulated
            self.last_time = None;
        }
    }

    /// Throw the current run away and start a fresh one
    pub fn restart(&mut self, seed: u64) {
        log::info!("Restarting with seed {seed}");
        self.state = GameState::new(&self.settings, seed);
        self.last_time = None;
        self.paused = false;
        self.report = None;
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.settings.viewport = viewport;
        self.state.resize(viewport);
    }

    /// Clamp a raw frame delta to `[0, max_frame_dt]`
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.settings.max_frame_dt)
        } else {
            0.0
        }
    }

    /// Advance by an explicit delta without drawing
    pub fn step(&mut self, dt: f32, input: &TickInput) -> FrameOutcome {
        if self.report.is_some() {
            return FrameOutcome::Stopped;
        }
        if self.paused {
            return FrameOutcome::Paused;
        }
        let dt = self.clamp_dt(dt);
        match tick(&mut self.state, input, dt) {
            Some(report) => {
                self.report = Some(report.clone());
                FrameOutcome::Ended(report)
            }
            None => FrameOutcome::Running,
        }
    }

    /// Run one display frame at timestamp `now` (seconds) and draw it
    pub fn frame(&mut self, now: f64, input: &TickInput, renderer: &mut impl Renderer) -> FrameOutcome {
        if self.report.is_some() {
            return FrameOutcome::Stopped;
        }
        if self.paused {
            return FrameOutcome::Paused;
        }
        let dt = match self.last_time {
            Some(last) => (now - last) as f32,
            None => 0.0,
        };
        self.last_time = Some(now);

        let outcome = self.step(dt, input);
        draw_frame(renderer, &self.state);
        outcome
    }
}
