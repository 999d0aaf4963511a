//! Break Block Build - a falling-block brawler
//!
//! Core modules:
//! - `sim`: Simulation (entities, combat resolution, boss AI, event timers)
//! - `game`: Frame loop runner (delta clamping, pause, restart)
//! - `renderer`: Draw contract consumed by any front end
//! - `settings`: Injected configuration (viewport, run length, seed)
//! - `highscores`: End-of-run leaderboard

pub mod game;
pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{FrameOutcome, Game};
pub use highscores::HighScores;
pub use settings::{Settings, Viewport};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest simulation step accepted per frame (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Scavenge phase length (seconds)
    pub const SCAVENGE_SECONDS: f32 = 60.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_START_HP: f32 = 100.0;
    pub const PLAYER_BASE_SPEED: f32 = 400.0;
    pub const PLAYER_BASE_ATK: f32 = 5.0;
    pub const PLAYER_BASE_DEF: f32 = 1.0;
    /// Per-item growth factors
    pub const SPEED_GROWTH: f32 = 1.10;
    pub const ATK_GROWTH: f32 = 1.30;
    pub const DEF_GROWTH: f32 = 1.20;
    pub const HP_GAIN_BASE: f32 = 20.0;
    pub const HP_GAIN_GROWTH: f32 = 1.5;
    /// Attack upgrades needed before plain contact breaks blocks
    pub const BREAK_ON_CONTACT_ATK_COUNT: u32 = 5;

    /// Charge / dash
    pub const CHARGE_RATE: f32 = 5.0;
    pub const MAX_CHARGE_POWER: f32 = 20.0;
    pub const DASH_DURATION: f32 = 0.5;
    pub const DASH_BASE_SPEED: f32 = 500.0;
    pub const DASH_SPEED_PER_CHARGE: f32 = 50.0;
    /// Charge power drained per block struck during a dash
    pub const DASH_CHARGE_DRAIN: f32 = 3.0;

    /// Shake gesture
    pub const SHAKE_INPUT_THRESHOLD: f32 = 0.8;
    pub const SHAKE_WINDOW: f32 = 0.2;
    pub const SHAKE_REVERSALS: u32 = 3;

    /// Beam weapon
    pub const BEAM_FIRE_INTERVAL: f32 = 0.05;
    pub const BEAM_SPEED: f32 = 800.0;
    pub const BEAM_MUZZLE_OFFSET: f32 = 20.0;

    /// Sword orbit (player)
    pub const SWORD_ORBIT_RADIUS: f32 = 70.0;
    pub const SWORD_SIZE: f32 = 20.0;
    pub const SWORD_SPIN_RATE: f32 = 5.0;

    /// Timed power-ups
    pub const INVINCIBLE_DURATION: f32 = 5.0;
    pub const MAGNET_DURATION: f32 = 10.0;
    pub const MAGNET_RANGE: f32 = 200.0;
    pub const MAGNET_PULL_SPEED: f32 = 300.0;

    /// Blocks
    pub const BLOCK_SIZE: f32 = PLAYER_RADIUS * 4.0;
    pub const BLOCK_BASE_HP: f32 = 10.0;
    pub const HARD_BLOCK_HP_MULT: f32 = 3.0;
    pub const GOLDEN_BLOCK_HP: f32 = 3.0;
    pub const BLOCK_SCORE: u64 = 100;
    pub const GOLDEN_BLOCK_SCORE: u64 = 1000;
    pub const COMBO_SCORE: u64 = 10;

    /// Items
    pub const ITEM_RADIUS: f32 = 15.0;
    pub const ITEM_PICKUP_SCORE: u64 = 50;
    /// Horizontal offset of the second drop during bonus time
    pub const BONUS_DROP_OFFSET: f32 = 20.0;

    /// Scroll and spawn difficulty curve
    pub const BASE_SCROLL_SPEED: f32 = 70.0;
    pub const SCROLL_SPEED_PER_SECOND: f32 = 2.0;
    pub const BASE_SPAWN_INTERVAL: f32 = 1.0;
    pub const SPAWN_INTERVAL_PER_SECOND: f32 = 0.01;
    pub const MIN_SPAWN_INTERVAL: f32 = 0.5;

    /// Event windows
    pub const COMBO_WINDOW: f32 = 2.0;
    pub const BONUS_TIME_DURATION: f32 = 5.0;
    pub const BONUS_TIME_MIN_WAIT: f32 = 15.0;
    pub const BONUS_TIME_MAX_WAIT: f32 = 25.0;
    pub const GOLDEN_MIN_WAIT: f32 = 8.0;
    pub const GOLDEN_MAX_WAIT: f32 = 12.0;
    /// Remaining scavenge seconds at which each mini-boss appears
    pub const MINI_BOSS_THRESHOLDS: [f32; 2] = [30.0, 15.0];

    /// Mini-boss
    pub const MINI_BOSS_SIZE: f32 = 80.0;
    pub const MINI_BOSS_HP: f32 = 50.0;
    pub const MINI_BOSS_FALL_SPEED: f32 = 50.0;
    pub const MINI_BOSS_DRIFT_SPEED: f32 = 30.0;
    pub const MINI_BOSS_SCORE: u64 = 500;

    /// Boss
    pub const BOSS_SIZE: f32 = 100.0;
    pub const BOSS_HP: f32 = 1000.0;
    pub const BOSS_TOP: f32 = 50.0;
    /// Damage the boss body deals per tick of contact
    pub const BOSS_CONTACT_DAMAGE: f32 = 1.0;
    pub const BOSS_SWORD_ORBIT_RADIUS: f32 = 90.0;
    pub const BOSS_SWORD_SIZE: f32 = 15.0;
    pub const BOSS_SWORD_SPIN_RATE: f32 = 2.0;

    /// Projectiles
    pub const HOMING_TURN_RATE: f32 = 2.0;
    pub const HOMING_LIFETIME: f32 = 8.0;
    pub const BOOMERANG_LIFETIME: f32 = 6.0;
    /// Score per point of damage dealt to a boss
    pub const DAMAGE_SCORE: f32 = 10.0;
    pub const INTERCEPT_SCORE: u64 = 50;

    /// Collection caps (oldest evicted first)
    pub const MAX_BLOCKS: usize = 40;
    pub const MAX_ITEMS: usize = 30;
    pub const MAX_PROJECTILES: usize = 50;
    pub const MAX_FLOATING_TEXTS: usize = 20;
    pub const MAX_MINI_BOSSES: usize = 4;
    /// Margin beyond the viewport before an entity is culled
    pub const CULL_MARGIN: f32 = 100.0;

    pub const FLOATING_TEXT_LIFETIME: f32 = 1.0;
    pub const FLOATING_TEXT_RISE: f32 = 50.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Turn `current` toward `target` (both radians) by at most `max_delta`,
/// always along the shorter way around. Lands exactly on `target` when it is
/// within reach.
pub fn rotate_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = normalize_angle(target - current);
    let clamped = delta.clamp(-max_delta, max_delta);
    normalize_angle(current + clamped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_toward_takes_short_way() {
        // From just below +π to just above -π: short way crosses the seam
        let current = PI - 0.1;
        let target = -PI + 0.1;
        let turned = rotate_toward(current, target, 0.05);
        assert!((normalize_angle(turned - current) - 0.05).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_toward_snaps_within_reach() {
        let turned = rotate_toward(0.0, 0.3, 1.0);
        assert!((turned - 0.3).abs() < 1e-6);
    }
}
