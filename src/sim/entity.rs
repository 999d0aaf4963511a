//! Self-updating entities: blocks, items, projectiles, floating texts, mini-bosses
//!
//! Each entity owns its own per-frame motion. Cross-entity effects (damage,
//! pickups, score) are resolved by the orchestrator after every entity moved.

use glam::Vec2;
use rand::Rng;

use super::physics::{Collider, Shape};
use super::pool::Entity;
use crate::consts::*;
use crate::{polar_to_cartesian, rotate_toward};

/// Block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockKind {
    #[default]
    Normal,
    Hard,
    Resource,
    Golden,
}

impl BlockKind {
    pub fn base_hp(self) -> f32 {
        match self {
            BlockKind::Normal | BlockKind::Resource => BLOCK_BASE_HP,
            BlockKind::Hard => BLOCK_BASE_HP * HARD_BLOCK_HP_MULT,
            BlockKind::Golden => GOLDEN_BLOCK_HP,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            BlockKind::Normal => 0xaaaaaa,
            BlockKind::Hard => 0xff0055,
            BlockKind::Resource => 0x00ff00,
            BlockKind::Golden => 0xffd700,
        }
    }

    /// Score before the combo bonus
    pub fn base_score(self) -> u64 {
        match self {
            BlockKind::Golden => GOLDEN_BLOCK_SCORE,
            _ => BLOCK_SCORE,
        }
    }

    /// Roll the spawner's type for a regular row block
    pub fn roll(rng: &mut impl Rng) -> Self {
        if rng.random::<f32>() > 0.8 {
            BlockKind::Hard
        } else if rng.random::<f32>() > 0.8 {
            BlockKind::Resource
        } else {
            BlockKind::Normal
        }
    }

    /// Roll the item dropped when a block of this kind breaks.
    /// Golden blocks always drop a rare item; normal blocks often drop nothing.
    pub fn roll_drop(self, rng: &mut impl Rng) -> Option<ItemKind> {
        let roll: f32 = rng.random();
        match self {
            BlockKind::Golden => {
                let idx = rng.random_range(0..ItemKind::RARE.len());
                Some(ItemKind::RARE[idx])
            }
            BlockKind::Resource => Some(if roll < 0.15 {
                ItemKind::Atk
            } else if roll < 0.30 {
                ItemKind::Spd
            } else if roll < 0.45 {
                ItemKind::Def
            } else if roll < 0.70 {
                ItemKind::Beam
            } else {
                ItemKind::Magnet
            }),
            BlockKind::Hard => Some(if roll > 0.7 {
                ItemKind::Sword
            } else {
                ItemKind::Atk
            }),
            BlockKind::Normal => {
                if roll > 0.95 {
                    Some(ItemKind::Invincible)
                } else if roll > 0.90 {
                    Some(ItemKind::Beam)
                } else if roll > 0.7 {
                    Some(ItemKind::Hp)
                } else {
                    None
                }
            }
        }
    }
}

/// A breakable block scrolling down the play field
#[derive(Debug, Clone)]
pub struct Block {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: BlockKind,
    pub hp: f32,
    pub max_hp: f32,
    pub active: bool,
}

impl Block {
    pub fn new(id: u32, pos: Vec2, size: f32, kind: BlockKind) -> Self {
        let hp = kind.base_hp();
        Self {
            id,
            pos,
            size: Vec2::splat(size),
            kind,
            hp,
            max_hp: hp,
            active: true,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn update(&mut self, dt: f32, scroll_speed: f32) {
        self.pos.y += scroll_speed * dt;
    }

    /// Apply damage. Returns true only on the hit that destroys the block;
    /// a dead block absorbs nothing.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.active {
            return false;
        }
        self.hp -= amount;
        if self.hp <= 0.0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Break outright regardless of remaining hp
    pub fn shatter(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.hp = 0.0;
        self.active = false;
        true
    }
}

impl Collider for Block {
    fn shape(&self) -> Shape {
        Shape::Box {
            min: self.pos,
            size: self.size,
        }
    }
}

impl Entity for Block {
    fn id(&self) -> u32 {
        self.id
    }
    fn is_active(&self) -> bool {
        self.active
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Atk,
    Spd,
    Def,
    Hp,
    Beam,
    Sword,
    Magnet,
    Invincible,
}

impl ItemKind {
    /// Pool golden blocks draw from
    pub const RARE: [ItemKind; 6] = [
        ItemKind::Atk,
        ItemKind::Spd,
        ItemKind::Def,
        ItemKind::Beam,
        ItemKind::Sword,
        ItemKind::Magnet,
    ];

    pub fn color(self) -> u32 {
        match self {
            ItemKind::Atk => 0xff0055,
            ItemKind::Spd => 0x00f0ff,
            ItemKind::Def => 0xffff00,
            ItemKind::Hp => 0x00ff00,
            _ => 0xffffff,
        }
    }

    /// Text flashed on pickup
    pub fn pickup_text(self) -> &'static str {
        match self {
            ItemKind::Atk => "+ATK",
            ItemKind::Spd => "+SPD",
            ItemKind::Def => "+DEF",
            ItemKind::Hp => "+HP",
            ItemKind::Beam => "BEAM UNLOCKED!",
            ItemKind::Sword => "SWORD EQUIPPED!",
            ItemKind::Magnet => "MAGNET ACTIVE!",
            ItemKind::Invincible => "INVINCIBLE!",
        }
    }
}

/// A falling power-up
#[derive(Debug, Clone)]
pub struct Item {
    pub id: u32,
    /// Center
    pub pos: Vec2,
    pub radius: f32,
    pub kind: ItemKind,
    /// Animation phase for the renderer
    pub pulse: f32,
    pub active: bool,
}

impl Item {
    pub fn new(id: u32, pos: Vec2, kind: ItemKind) -> Self {
        Self {
            id,
            pos,
            radius: ITEM_RADIUS,
            kind,
            pulse: 0.0,
            active: true,
        }
    }

    pub fn update(&mut self, dt: f32, scroll_speed: f32) {
        self.pos.y += scroll_speed * dt;
        self.pulse += dt * 5.0;
    }

    /// Drift toward `target` when within `range`
    pub fn attract(&mut self, target: Vec2, range: f32, speed: f32, dt: f32) {
        let to_target = target - self.pos;
        let dist = to_target.length();
        if dist > f32::EPSILON && dist < range {
            self.pos += to_target / dist * speed * dt;
        }
    }
}

impl Collider for Item {
    fn shape(&self) -> Shape {
        Shape::circle(self.pos, self.radius)
    }
}

impl Entity for Item {
    fn id(&self) -> u32 {
        self.id
    }
    fn is_active(&self) -> bool {
        self.active
    }
}

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Faction {
    Player,
    Boss,
}

/// Projectile types, each with fixed shape and damage class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileKind {
    Beam,
    Bullet,
    BossBullet,
    HomingMissile,
    BossBeam,
    Boomerang,
    DeathRay,
}

impl ProjectileKind {
    pub fn faction(self) -> Faction {
        match self {
            ProjectileKind::Beam | ProjectileKind::Bullet => Faction::Player,
            _ => Faction::Boss,
        }
    }

    /// Beam-class projectiles are drawn and collided as tall boxes
    pub fn is_beam_class(self) -> bool {
        matches!(
            self,
            ProjectileKind::Beam | ProjectileKind::BossBeam | ProjectileKind::DeathRay
        )
    }

    pub fn shape_at(self, center: Vec2) -> Shape {
        match self {
            ProjectileKind::Beam | ProjectileKind::BossBeam => {
                Shape::centered_box(center, Vec2::new(20.0, 40.0))
            }
            ProjectileKind::DeathRay => Shape::centered_box(center, Vec2::new(40.0, 80.0)),
            ProjectileKind::Bullet | ProjectileKind::BossBullet => Shape::circle(center, 5.0),
            ProjectileKind::HomingMissile => Shape::circle(center, 6.0),
            ProjectileKind::Boomerang => Shape::circle(center, 10.0),
        }
    }

    /// Damage a player projectile deals to a block or boss per hit
    pub fn hit_damage(self) -> f32 {
        if self == ProjectileKind::Beam { 0.5 } else { 1.0 }
    }

    /// Player beams tick through targets instead of being consumed
    pub fn pierces(self) -> bool {
        self == ProjectileKind::Beam
    }

    /// Damage to the player when no explicit override is set
    pub fn default_player_damage(self) -> f32 {
        if self.is_beam_class() { 20.0 } else { 5.0 }
    }

    pub fn color(self) -> u32 {
        match self {
            ProjectileKind::Beam | ProjectileKind::Bullet => 0xffffff,
            ProjectileKind::BossBullet => 0xff3300,
            ProjectileKind::HomingMissile => 0xff8800,
            ProjectileKind::BossBeam => 0xaa00ff,
            ProjectileKind::Boomerang => 0x00ffaa,
            ProjectileKind::DeathRay => 0xff0000,
        }
    }
}

/// Per-projectile steering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Linear,
    /// Turns toward the target by at most `turn_rate` radians per second
    Homing { turn_rate: f32 },
    /// Curves outward under `gravity`, then flips and accelerates back
    Boomerang {
        return_after: f32,
        gravity: f32,
        accel: f32,
        returning: bool,
    },
}

impl Motion {
    pub fn for_kind(kind: ProjectileKind) -> Self {
        match kind {
            ProjectileKind::HomingMissile => Motion::Homing {
                turn_rate: HOMING_TURN_RATE,
            },
            ProjectileKind::Boomerang => Motion::Boomerang {
                return_after: 1.0,
                gravity: 200.0,
                accel: 400.0,
                returning: false,
            },
            _ => Motion::Linear,
        }
    }

    fn lifetime(&self) -> Option<f32> {
        match self {
            Motion::Linear => None,
            Motion::Homing { .. } => Some(HOMING_LIFETIME),
            Motion::Boomerang { .. } => Some(BOOMERANG_LIFETIME),
        }
    }
}

/// A projectile spawn request; the orchestrator assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSpawn {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ProjectileKind,
    pub damage: Option<f32>,
}

impl ProjectileSpawn {
    pub fn new(pos: Vec2, vel: Vec2, kind: ProjectileKind) -> Self {
        Self {
            pos,
            vel,
            kind,
            damage: None,
        }
    }

    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn into_projectile(self, id: u32) -> Projectile {
        let mut projectile = Projectile::new(id, self.pos, self.vel, self.kind);
        projectile.damage = self.damage;
        projectile
    }
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ProjectileKind,
    /// Fixed damage overriding the kind default
    pub damage: Option<f32>,
    pub motion: Motion,
    /// Seconds since launch
    pub age: f32,
    pub active: bool,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, kind: ProjectileKind) -> Self {
        Self {
            id,
            pos,
            vel,
            kind,
            damage: None,
            motion: Motion::for_kind(kind),
            age: 0.0,
            active: true,
        }
    }

    /// Damage dealt to the player on contact
    pub fn player_damage(&self) -> f32 {
        self.damage
            .unwrap_or_else(|| self.kind.default_player_damage())
    }

    /// Advance one frame. `target` is the point homing projectiles steer at.
    pub fn update(&mut self, dt: f32, target: Vec2) {
        self.age += dt;
        match &mut self.motion {
            Motion::Linear => {}
            Motion::Homing { turn_rate } => {
                let to_target = target - self.pos;
                let speed = self.vel.length();
                if to_target.length_squared() > f32::EPSILON && speed > f32::EPSILON {
                    let heading = self.vel.y.atan2(self.vel.x);
                    let desired = to_target.y.atan2(to_target.x);
                    let heading = rotate_toward(heading, desired, *turn_rate * dt);
                    self.vel = polar_to_cartesian(speed, heading);
                }
            }
            Motion::Boomerang {
                return_after,
                gravity,
                accel,
                returning,
            } => {
                if !*returning {
                    self.vel.y += *gravity * dt;
                    if self.age >= *return_after {
                        *returning = true;
                        self.vel = -self.vel;
                    }
                } else {
                    self.vel += self.vel.normalize_or_zero() * *accel * dt;
                }
            }
        }
        self.pos += self.vel * dt;

        if let Some(lifetime) = self.motion.lifetime() {
            if self.age >= lifetime {
                self.active = false;
            }
        }
    }
}

impl Collider for Projectile {
    fn shape(&self) -> Shape {
        self.kind.shape_at(self.pos)
    }
}

impl Entity for Projectile {
    fn id(&self) -> u32 {
        self.id
    }
    fn is_active(&self) -> bool {
        self.active
    }
}

/// Cosmetic rising label
#[derive(Debug, Clone)]
pub struct FloatingText {
    pub id: u32,
    pub pos: Vec2,
    pub text: String,
    pub color: u32,
    /// Seconds left
    pub life: f32,
    pub active: bool,
}

impl FloatingText {
    pub fn new(id: u32, pos: Vec2, text: impl Into<String>, color: u32) -> Self {
        Self {
            id,
            pos,
            text: text.into(),
            color,
            life: FLOATING_TEXT_LIFETIME,
            active: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.life -= dt;
        self.pos.y -= FLOATING_TEXT_RISE * dt;
        if self.life <= 0.0 {
            self.active = false;
        }
    }
}

impl Entity for FloatingText {
    fn id(&self) -> u32 {
        self.id
    }
    fn is_active(&self) -> bool {
        self.active
    }
}

/// Scavenge-phase elite: sinks slowly while drifting toward the player
#[derive(Debug, Clone)]
pub struct MiniBoss {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub active: bool,
}

impl MiniBoss {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            size: Vec2::splat(MINI_BOSS_SIZE),
            hp: MINI_BOSS_HP,
            max_hp: MINI_BOSS_HP,
            active: true,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn update(&mut self, dt: f32, player_x: f32) {
        self.pos.y += MINI_BOSS_FALL_SPEED * dt;
        let dx = player_x - self.center().x;
        if dx.abs() > f32::EPSILON {
            self.pos.x += dx.signum() * MINI_BOSS_DRIFT_SPEED * dt;
        }
    }

    /// Returns true on the killing hit
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.active {
            return false;
        }
        self.hp -= amount;
        if self.hp <= 0.0 {
            self.active = false;
            return true;
        }
        false
    }
}

impl Collider for MiniBoss {
    fn shape(&self) -> Shape {
        Shape::Box {
            min: self.pos,
            size: self.size,
        }
    }
}

impl Entity for MiniBoss {
    fn id(&self) -> u32 {
        self.id
    }
    fn is_active(&self) -> bool {
        self.active
    }
}
