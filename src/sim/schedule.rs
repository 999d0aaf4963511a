//! Scavenge-phase timers: combo decay, difficulty curve, bonus time,
//! golden blocks and the one-shot mini-boss triggers

use rand::Rng;

use crate::consts::*;

/// Something the schedule asks the orchestrator to do this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledEvent {
    BonusTimeStarted,
    BonusTimeEnded,
    GoldenBlock,
    MiniBoss,
}

/// Consecutive block breaks inside a rolling window
#[derive(Debug, Clone, Default)]
pub struct Combo {
    count: u32,
    max: u32,
    timer: f32,
}

impl Combo {
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Longest combo reached this run
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Count a block break and restart the window. Returns the new count.
    pub fn register_break(&mut self) -> u32 {
        self.count += 1;
        self.timer = 0.0;
        self.max = self.max.max(self.count);
        self.count
    }

    /// Score bonus for the current count
    pub fn bonus(&self) -> u64 {
        COMBO_SCORE * self.count as u64
    }

    /// Advance the window. Returns true when the combo just lapsed.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.count == 0 {
            return false;
        }
        self.timer += dt;
        if self.timer > COMBO_WINDOW {
            self.count = 0;
            self.timer = 0.0;
            return true;
        }
        false
    }
}

/// Scroll speed and row spawn interval for a point in the run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    pub scroll_speed: f32,
    pub spawn_interval: f32,
}

impl Difficulty {
    pub fn at(elapsed: f32) -> Self {
        let elapsed = elapsed.max(0.0);
        Self {
            scroll_speed: BASE_SCROLL_SPEED + elapsed * SCROLL_SPEED_PER_SECOND,
            spawn_interval: (BASE_SPAWN_INTERVAL - elapsed * SPAWN_INTERVAL_PER_SECOND)
                .max(MIN_SPAWN_INTERVAL),
        }
    }
}

/// Randomized event timers, each re-armed when it fires
#[derive(Debug, Clone)]
pub struct EventSchedule {
    bonus_active: bool,
    bonus_timer: f32,
    next_bonus: f32,
    golden_timer: f32,
    golden_interval: f32,
    mini_boss_spawned: [bool; MINI_BOSS_THRESHOLDS.len()],
}

impl EventSchedule {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            bonus_active: false,
            bonus_timer: 0.0,
            next_bonus: roll_bonus_wait(rng),
            golden_timer: 0.0,
            golden_interval: roll_golden_wait(rng),
            mini_boss_spawned: [false; MINI_BOSS_THRESHOLDS.len()],
        }
    }

    /// Item drops are doubled while active
    pub fn bonus_active(&self) -> bool {
        self.bonus_active
    }

    /// Advance every timer. `time_remaining` is the scavenge countdown.
    pub fn update(&mut self, dt: f32, time_remaining: f32, rng: &mut impl Rng) -> Vec<ScheduledEvent> {
        let mut events = Vec::new();

        self.bonus_timer += dt;
        if self.bonus_active {
            if self.bonus_timer >= BONUS_TIME_DURATION {
                self.bonus_active = false;
                self.bonus_timer = 0.0;
                self.next_bonus = roll_bonus_wait(rng);
                events.push(ScheduledEvent::BonusTimeEnded);
            }
        } else if self.bonus_timer >= self.next_bonus {
            self.bonus_active = true;
            self.bonus_timer = 0.0;
            events.push(ScheduledEvent::BonusTimeStarted);
        }

        self.golden_timer += dt;
        if self.golden_timer >= self.golden_interval {
            self.golden_timer = 0.0;
            self.golden_interval = roll_golden_wait(rng);
            events.push(ScheduledEvent::GoldenBlock);
        }

        for (spawned, threshold) in self.mini_boss_spawned.iter_mut().zip(MINI_BOSS_THRESHOLDS) {
            if !*spawned && time_remaining <= threshold {
                *spawned = true;
                events.push(ScheduledEvent::MiniBoss);
            }
        }

        events
    }
}

fn roll_bonus_wait(rng: &mut impl Rng) -> f32 {
    rng.random_range(BONUS_TIME_MIN_WAIT..BONUS_TIME_MAX_WAIT)
}

fn roll_golden_wait(rng: &mut impl Rng) -> f32 {
    rng.random_range(GOLDEN_MIN_WAIT..GOLDEN_MAX_WAIT)
}
