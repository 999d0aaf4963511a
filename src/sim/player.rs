//! The player: movement, exponential stats, charge/dash and beam weapon
//!
//! Stats are derived from upgrade counters on every read. Counters only grow
//! within a run.

use glam::Vec2;

use super::entity::{ItemKind, ProjectileKind, ProjectileSpawn};
use super::physics::{Collider, Shape, orbit_points};
use super::tick::TickInput;
use crate::consts::*;
use crate::settings::Viewport;

/// Which branch of the state machine the player is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMode {
    /// Free movement (includes standing still)
    Moving,
    /// Action held without beam: accumulating charge, rooted in place
    Charging,
    /// Action released without beam: fixed-duration dash
    Dashing,
    /// Action held with beam unlocked: firing, half speed
    BeamFiring,
}

/// Counts horizontal input reversals inside a rolling window
#[derive(Debug, Clone, Default)]
pub struct ShakeDetector {
    last_sign: f32,
    reversals: u32,
    timer: f32,
}

impl ShakeDetector {
    /// Feed one frame of horizontal input. Returns whether the gesture is live.
    pub fn update(&mut self, input_x: f32, dt: f32) -> bool {
        self.timer += dt;
        if self.timer > SHAKE_WINDOW {
            self.reversals = 0;
            self.timer = 0.0;
        }

        if input_x.abs() > SHAKE_INPUT_THRESHOLD {
            let sign = input_x.signum();
            if self.last_sign != 0.0 && sign != self.last_sign {
                self.reversals += 1;
                self.timer = 0.0;
            }
            self.last_sign = sign;
        }

        self.reversals > SHAKE_REVERSALS
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    /// Center
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,

    // Upgrade counters
    pub atk_count: u32,
    pub spd_count: u32,
    pub def_count: u32,
    pub hp_count: u32,

    pub has_beam: bool,
    pub has_magnet: bool,
    pub invincible: bool,
    pub is_charging: bool,
    /// Dashing, or firing the beam when it is unlocked
    pub is_attacking: bool,
    pub is_shaking: bool,

    /// 0..=MAX_CHARGE_POWER
    pub charge_power: f32,
    /// Dash time left
    pub attack_timer: f32,
    /// Unit vector captured on release
    pub charge_direction: Vec2,
    pub invincible_timer: f32,
    pub magnet_timer: f32,
    /// Time since the last beam shot
    pub weapon_timer: f32,

    pub sword_count: u32,
    pub sword_angle: f32,
    pub sword_radius: f32,

    shake: ShakeDetector,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: PLAYER_RADIUS,
            hp: PLAYER_START_HP,
            atk_count: 0,
            spd_count: 0,
            def_count: 0,
            hp_count: 0,
            has_beam: false,
            has_magnet: false,
            invincible: false,
            is_charging: false,
            is_attacking: false,
            is_shaking: false,
            charge_power: 0.0,
            attack_timer: 0.0,
            charge_direction: Vec2::NEG_Y,
            invincible_timer: 0.0,
            magnet_timer: 0.0,
            weapon_timer: 0.0,
            sword_count: 0,
            sword_angle: 0.0,
            sword_radius: SWORD_ORBIT_RADIUS,
            shake: ShakeDetector::default(),
        }
    }

    /// `base · 1.10^spd`, doubled while invincible
    pub fn speed(&self) -> f32 {
        let speed = PLAYER_BASE_SPEED * SPEED_GROWTH.powi(self.spd_count as i32);
        if self.invincible { speed * 2.0 } else { speed }
    }

    /// `base · 1.30^atk`
    pub fn atk(&self) -> f32 {
        PLAYER_BASE_ATK * ATK_GROWTH.powi(self.atk_count as i32)
    }

    /// `base · 1.20^def`
    pub fn def(&self) -> f32 {
        PLAYER_BASE_DEF * DEF_GROWTH.powi(self.def_count as i32)
    }

    /// Enough attack upgrades that touching a block damages it
    pub fn can_break_on_contact(&self) -> bool {
        self.atk_count >= BREAK_ON_CONTACT_ATK_COUNT
    }

    pub fn mode(&self) -> PlayerMode {
        match (self.has_beam, self.is_attacking, self.is_charging) {
            (true, true, _) => PlayerMode::BeamFiring,
            (false, true, _) => PlayerMode::Dashing,
            (false, false, true) => PlayerMode::Charging,
            _ => PlayerMode::Moving,
        }
    }

    pub fn is_dashing(&self) -> bool {
        self.mode() == PlayerMode::Dashing
    }

    pub fn is_beam_firing(&self) -> bool {
        self.mode() == PlayerMode::BeamFiring
    }

    /// Render color: interpolates toward red as charge builds
    pub fn color(&self) -> u32 {
        if self.is_charging {
            let ratio = (self.charge_power / MAX_CHARGE_POWER).clamp(0.0, 1.0);
            let r = (255.0 * ratio).floor() as u32;
            let g = (240.0 * (1.0 - ratio)).floor() as u32;
            (r << 16) | (g << 8) | 0xff
        } else {
            0x00f0ff
        }
    }

    /// Apply a collected power-up
    pub fn upgrade(&mut self, kind: ItemKind) {
        match kind {
            ItemKind::Atk => self.atk_count += 1,
            ItemKind::Spd => self.spd_count += 1,
            ItemKind::Def => self.def_count += 1,
            ItemKind::Hp => {
                self.hp_count += 1;
                self.hp += HP_GAIN_BASE * HP_GAIN_GROWTH.powi(self.hp_count as i32);
            }
            ItemKind::Beam => {
                if !self.has_beam {
                    // Beam replaces the dash branch outright
                    self.has_beam = true;
                    self.is_charging = false;
                    self.is_attacking = false;
                    self.charge_power = 0.0;
                    self.attack_timer = 0.0;
                }
            }
            ItemKind::Sword => self.sword_count += 1,
            ItemKind::Magnet => {
                self.has_magnet = true;
                self.magnet_timer = MAGNET_DURATION;
            }
            ItemKind::Invincible => {
                self.invincible = true;
                self.invincible_timer = INVINCIBLE_DURATION;
            }
        }
    }

    /// Advance one frame of movement and state
    pub fn update(&mut self, dt: f32, input: &TickInput, viewport: &Viewport) {
        if self.has_magnet {
            self.magnet_timer -= dt;
            if self.magnet_timer <= 0.0 {
                self.has_magnet = false;
                self.magnet_timer = 0.0;
            }
        }

        if self.invincible {
            self.invincible_timer -= dt;
            if self.invincible_timer <= 0.0 {
                self.invincible = false;
                self.invincible_timer = 0.0;
            }
        }

        let movement = input.movement();

        if self.has_beam {
            self.is_charging = false;
            self.is_attacking = input.action;
            let speed = if self.is_attacking {
                self.speed() * 0.5
            } else {
                self.speed()
            };
            if !self.is_attacking {
                self.is_shaking = self.shake.update(movement.x, dt);
            } else {
                self.is_shaking = false;
                self.shake.reset();
            }
            self.pos += movement * speed * dt;
        } else {
            if input.action {
                self.is_charging = true;
                self.charge_power = (self.charge_power + dt * CHARGE_RATE).min(MAX_CHARGE_POWER);
            } else if self.is_charging {
                self.release_charge(movement);
            }

            if self.is_attacking {
                self.attack_timer -= dt;
                if self.attack_timer <= 0.0 {
                    self.is_attacking = false;
                    self.attack_timer = 0.0;
                    self.charge_power = 0.0;
                } else {
                    let dash_speed = DASH_BASE_SPEED + self.charge_power * DASH_SPEED_PER_CHARGE;
                    self.pos += self.charge_direction * dash_speed * dt;
                }
            } else if !self.is_charging {
                self.is_shaking = self.shake.update(movement.x, dt);
                self.pos += movement * self.speed() * dt;
            }

            if self.is_charging || self.is_attacking {
                self.is_shaking = false;
                self.shake.reset();
            }
        }

        if self.sword_count > 0 {
            self.sword_angle += dt * SWORD_SPIN_RATE;
        }

        self.clamp_to(viewport);
    }

    /// Start a dash along the current input direction (straight up if idle)
    fn release_charge(&mut self, movement: Vec2) {
        self.charge_direction = movement.try_normalize().unwrap_or(Vec2::NEG_Y);
        self.is_charging = false;
        self.is_attacking = true;
        self.attack_timer = DASH_DURATION;
        self.charge_power = self.charge_power.max(1.0);
    }

    /// End a dash early (a block it struck survived)
    pub fn stop_dash(&mut self) {
        if self.is_dashing() {
            self.is_attacking = false;
            self.attack_timer = 0.0;
        }
    }

    pub fn clamp_to(&mut self, viewport: &Viewport) {
        self.pos.x = self.pos.x.clamp(self.radius, (viewport.width - self.radius).max(self.radius));
        self.pos.y = self.pos.y.clamp(self.radius, (viewport.height - self.radius).max(self.radius));
    }

    /// Emit a beam shot when the fire interval has elapsed
    pub fn fire_beam(&mut self, dt: f32) -> Option<ProjectileSpawn> {
        self.weapon_timer += dt;
        if self.weapon_timer > BEAM_FIRE_INTERVAL {
            self.weapon_timer = 0.0;
            return Some(ProjectileSpawn::new(
                self.pos - Vec2::new(0.0, BEAM_MUZZLE_OFFSET),
                Vec2::new(0.0, -BEAM_SPEED),
                ProjectileKind::Beam,
            ));
        }
        None
    }

    /// Current sword centers
    pub fn sword_positions(&self) -> impl Iterator<Item = Vec2> {
        orbit_points(self.pos, self.sword_count, self.sword_angle, self.sword_radius)
    }

    /// Crushed against, or pushed past, the bottom of the play field
    pub fn is_off_bottom(&self, viewport: &Viewport) -> bool {
        self.pos.y > viewport.height - self.radius
    }
}

impl Collider for Player {
    fn shape(&self) -> Shape {
        Shape::circle(self.pos, self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 800.0)
    }

    fn hold(movement: Vec2, action: bool) -> TickInput {
        TickInput::new(movement, action)
    }

    #[test]
    fn test_charge_caps_at_twenty() {
        let mut player = Player::new(Vec2::new(400.0, 400.0));
        for _ in 0..600 {
            player.update(DT, &hold(Vec2::ZERO, true), &viewport());
        }
        assert!(player.is_charging);
        assert_eq!(player.charge_power, MAX_CHARGE_POWER);
        assert_eq!(player.mode(), PlayerMode::Charging);
        // Full charge is fully red
        assert_eq!(player.color(), 0xff00ff);
    }

    #[test]
    fn test_charging_roots_player() {
        let mut player = Player::new(Vec2::new(400.0, 400.0));
        player.update(DT, &hold(Vec2::X, true), &viewport());
        assert_eq!(player.pos, Vec2::new(400.0, 400.0));
    }

    #[test]
    fn test_release_dashes_up_by_default() {
        let mut player = Player::new(Vec2::new(400.0, 700.0));
        for _ in 0..60 {
            player.update(DT, &hold(Vec2::ZERO, true), &viewport());
        }
        let charge = player.charge_power;
        player.update(DT, &hold(Vec2::ZERO, false), &viewport());
        assert_eq!(player.mode(), PlayerMode::Dashing);
        assert_eq!(player.charge_direction, Vec2::NEG_Y);
        let expected = 700.0 - (DASH_BASE_SPEED + charge * DASH_SPEED_PER_CHARGE) * DT;
        assert!((player.pos.y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_dash_expires_and_resets_charge() {
        let mut player = Player::new(Vec2::new(400.0, 400.0));
        player.update(DT, &hold(Vec2::ZERO, true), &viewport());
        player.update(DT, &hold(Vec2::X, false), &viewport());
        assert_eq!(player.charge_direction, Vec2::X);
        for _ in 0..40 {
            player.update(DT, &hold(Vec2::ZERO, false), &viewport());
        }
        assert!(!player.is_attacking);
        assert_eq!(player.charge_power, 0.0);
        assert_eq!(player.mode(), PlayerMode::Moving);
    }

    #[test]
    fn test_beam_mode_fires_and_halves_speed() {
        let mut player = Player::new(Vec2::new(400.0, 400.0));
        player.upgrade(ItemKind::Beam);
        player.update(DT, &hold(Vec2::X, true), &viewport());
        assert!(player.is_beam_firing());
        assert!(!player.is_charging);
        let moved = player.pos.x - 400.0;
        assert!((moved - player.speed() * 0.5 * DT).abs() < 1e-3);

        player.update(DT, &hold(Vec2::X, false), &viewport());
        assert!(!player.is_attacking);
        assert_eq!(player.charge_power, 0.0);
    }

    #[test]
    fn test_fire_beam_cadence() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        let shots = (0..60).filter_map(|_| player.fire_beam(0.02)).count();
        // The interval must be strictly exceeded: every third 20 ms frame
        assert_eq!(shots, 20);
        let shot = player.fire_beam(1.0).unwrap();
        assert_eq!(shot.kind, ProjectileKind::Beam);
        assert_eq!(shot.pos, Vec2::new(100.0, 80.0));
        assert_eq!(shot.vel, Vec2::new(0.0, -BEAM_SPEED));
    }

    #[test]
    fn test_shake_detection() {
        let mut player = Player::new(Vec2::new(400.0, 400.0));
        for i in 0..6 {
            let x = if i % 2 == 0 { 1.0 } else { -1.0 };
            player.update(DT, &hold(Vec2::new(x, 0.0), false), &viewport());
        }
        assert!(player.is_shaking);

        // Steady movement never counts as shaking
        let mut steady = Player::new(Vec2::new(400.0, 400.0));
        for _ in 0..30 {
            steady.update(DT, &hold(Vec2::new(1.0, 0.0), false), &viewport());
        }
        assert!(!steady.is_shaking);
    }

    #[test]
    fn test_shake_decays_after_window() {
        let mut detector = ShakeDetector::default();
        for i in 0..6 {
            detector.update(if i % 2 == 0 { 1.0 } else { -1.0 }, DT);
        }
        assert!(detector.update(0.0, DT));
        assert!(!detector.update(0.0, SHAKE_WINDOW + 0.01));
    }

    #[test]
    fn test_weak_input_is_not_a_reversal() {
        let mut detector = ShakeDetector::default();
        for i in 0..20 {
            let live = detector.update(if i % 2 == 0 { 0.5 } else { -0.5 }, DT);
            assert!(!live);
        }
    }

    #[test]
    fn test_position_clamped() {
        let mut player = Player::new(Vec2::new(790.0, 10.0));
        player.update(DT, &hold(Vec2::new(1.0, -1.0).normalize(), false), &viewport());
        assert_eq!(player.pos, Vec2::new(780.0, 20.0));
    }

    #[test]
    fn test_hp_upgrade_heals_exponentially() {
        let mut player = Player::new(Vec2::ZERO);
        player.upgrade(ItemKind::Hp);
        assert!((player.hp - (100.0 + 30.0)).abs() < 1e-4);
        player.upgrade(ItemKind::Hp);
        assert!((player.hp - (130.0 + 45.0)).abs() < 1e-4);
    }

    #[test]
    fn test_timed_powerups_expire() {
        let mut player = Player::new(Vec2::new(400.0, 400.0));
        player.upgrade(ItemKind::Magnet);
        player.upgrade(ItemKind::Invincible);
        assert!(player.invincible);
        let base = PLAYER_BASE_SPEED * 2.0;
        assert!((player.speed() - base).abs() < 1e-3);
        for _ in 0..(11 * 60) {
            player.update(DT, &TickInput::default(), &viewport());
        }
        assert!(!player.has_magnet);
        assert!(!player.invincible);
    }

    #[test]
    fn test_sword_orbit_spins() {
        let mut player = Player::new(Vec2::new(400.0, 400.0));
        player.upgrade(ItemKind::Sword);
        player.upgrade(ItemKind::Sword);
        player.update(0.1, &TickInput::default(), &viewport());
        assert!((player.sword_angle - 0.5).abs() < 1e-5);
        let swords: Vec<Vec2> = player.sword_positions().collect();
        assert_eq!(swords.len(), 2);
        for sword in swords {
            assert!((sword.distance(player.pos) - SWORD_ORBIT_RADIUS).abs() < 1e-3);
        }
    }

    proptest! {
        #[test]
        fn prop_stats_follow_growth_curves(n in 0u32..30) {
            let mut player = Player::new(Vec2::ZERO);
            for _ in 0..n {
                player.upgrade(ItemKind::Atk);
                player.upgrade(ItemKind::Spd);
                player.upgrade(ItemKind::Def);
            }
            let atk = PLAYER_BASE_ATK * 1.3f32.powi(n as i32);
            let spd = PLAYER_BASE_SPEED * 1.1f32.powi(n as i32);
            let def = PLAYER_BASE_DEF * 1.2f32.powi(n as i32);
            prop_assert!((player.atk() - atk).abs() <= atk * 1e-5);
            prop_assert!((player.speed() - spd).abs() <= spd * 1e-5);
            prop_assert!((player.def() - def).abs() <= def * 1e-5);

            let before = (player.atk(), player.speed(), player.def());
            player.upgrade(ItemKind::Atk);
            player.upgrade(ItemKind::Spd);
            player.upgrade(ItemKind::Def);
            prop_assert!(player.atk() > before.0);
            prop_assert!(player.speed() > before.1);
            prop_assert!(player.def() > before.2);

            player.upgrade(ItemKind::Invincible);
            prop_assert!((player.speed() - 2.0 * 1.1f32.powi(n as i32 + 1) * PLAYER_BASE_SPEED).abs() <= spd * 1e-4);
        }
    }
}
