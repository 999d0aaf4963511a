//! Boss AI: hp-gated phases, movement patterns and an attack table
//!
//! Attacks never touch the projectile pool directly. They push spawn requests
//! into a bounded `ProjectileQueue`, which the orchestrator drains once per
//! frame with `Boss::poll_projectiles`.

use std::collections::VecDeque;
use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;

use super::entity::{ProjectileKind, ProjectileSpawn};
use super::physics::{Collider, Shape, orbit_points};
use crate::consts::*;
use crate::polar_to_cartesian;
use crate::settings::Viewport;

/// hp fraction at or below which phase 2 starts
pub const PHASE_TWO_HP_FRACTION: f32 = 0.66;
/// hp fraction at or below which phase 3 starts
pub const PHASE_THREE_HP_FRACTION: f32 = 0.33;

/// Maximum queued spawn requests before the oldest are dropped
pub const PROJECTILE_QUEUE_CAP: usize = 64;

const TRACK_SPEED: f32 = 100.0;
const TRACK_DEADZONE: f32 = 10.0;
const HOVER_AMPLITUDE: f32 = 20.0;
const ORBIT_RADIUS: f32 = 220.0;
const ORBIT_ANGULAR_SPEED: f32 = 1.0;
const ORBIT_MAX_SPEED: f32 = 250.0;
const ZIGZAG_SPEED: f32 = 300.0;
const ZIGZAG_AMPLITUDE: f32 = 40.0;

const BULLET_SPEED: f32 = 400.0;
const MISSILE_COOLDOWN: f32 = 5.0;
const MISSILE_BURST_DELAY: f32 = 0.5;
const MISSILE_LAUNCH_VEL: Vec2 = Vec2::new(150.0, 50.0);
const BEAM_COOLDOWN: f32 = 6.0;
/// Seconds the beam charges after arming
pub const BEAM_CHARGE_TIME: f32 = 1.0;
const BEAM_SEGMENTS: u32 = 3;
const BEAM_SEGMENT_SPACING: f32 = 40.0;
const BEAM_SPEED: f32 = 600.0;
/// Fixed damage of each boss beam segment
pub const BOSS_BEAM_DAMAGE: f32 = 12.0;
const BARRAGE_COOLDOWN: f32 = 4.0;
const BARRAGE_COUNT: u32 = 9;
const BARRAGE_SPREAD: f32 = 2.0 * PI / 3.0;
const BARRAGE_SPEED: f32 = 250.0;
const BOOMERANG_COOLDOWN: f32 = 5.0;
const BOOMERANG_LAUNCH_VEL: Vec2 = Vec2::new(300.0, -150.0);

/// Boss difficulty tier. Only ever increases within a fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BossPhase {
    One = 1,
    Two = 2,
    Three = 3,
}

impl BossPhase {
    /// Phase implied by the remaining hp fraction
    pub fn for_hp_fraction(fraction: f32) -> Self {
        if fraction <= PHASE_THREE_HP_FRACTION {
            BossPhase::Three
        } else if fraction <= PHASE_TWO_HP_FRACTION {
            BossPhase::Two
        } else {
            BossPhase::One
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Sword shields orbiting the boss in this phase
    pub fn sword_count(self) -> u32 {
        match self {
            BossPhase::One => 0,
            BossPhase::Two => 2,
            BossPhase::Three => 4,
        }
    }

    /// Cooldown of the aimed direct-fire shot
    pub fn direct_fire_cooldown(self) -> f32 {
        match self {
            BossPhase::One => 2.0,
            BossPhase::Two => 1.5,
            BossPhase::Three => 1.0,
        }
    }

    pub fn missile_burst_size(self) -> u32 {
        if self == BossPhase::Three { 5 } else { 3 }
    }

    pub fn movement(self) -> Movement {
        match self {
            BossPhase::One => Movement::Track,
            BossPhase::Two => Movement::Orbit,
            BossPhase::Three => Movement::ZigZag,
        }
    }
}

/// Movement pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Follow the player horizontally, bob vertically
    Track,
    /// Circle around the player
    Orbit,
    /// Bounce between the side walls with a fast vertical wave
    ZigZag,
}

/// Bounded FIFO of projectile spawn requests with an atomic drain
#[derive(Debug, Clone)]
pub struct ProjectileQueue {
    items: VecDeque<ProjectileSpawn>,
    cap: usize,
}

impl ProjectileQueue {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Enqueue, dropping the oldest request when full
    pub fn push(&mut self, spawn: ProjectileSpawn) {
        if self.cap == 0 {
            return;
        }
        if self.items.len() >= self.cap {
            self.items.pop_front();
        }
        self.items.push_back(spawn);
    }

    /// Take every queued request, leaving the queue empty
    pub fn drain(&mut self) -> Vec<ProjectileSpawn> {
        std::mem::take(&mut self.items).into()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// What an attack may read about the fight
#[derive(Debug, Clone, Copy)]
pub struct AttackContext {
    /// Boss top-left corner
    pub boss_min: Vec2,
    pub boss_size: Vec2,
    /// Player center
    pub player: Vec2,
    pub phase: BossPhase,
}

impl AttackContext {
    pub fn boss_center(&self) -> Vec2 {
        self.boss_min + self.boss_size * 0.5
    }

    /// Player directly below the boss body
    pub fn player_beneath(&self) -> bool {
        self.player.x >= self.boss_min.x
            && self.player.x <= self.boss_min.x + self.boss_size.x
            && self.player.y > self.boss_min.y + self.boss_size.y
    }
}

/// Progress through a missile burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub fired: u32,
    pub delay: f32,
}

/// One entry of the attack table. Each variant owns its cooldown and state.
#[derive(Debug, Clone, PartialEq)]
pub enum Attack {
    /// Aimed shot at the player's position at fire time
    DirectFire { timer: f32 },
    /// Pairs of homing missiles from both flanks
    MissileBurst { timer: f32, burst: Option<Burst> },
    /// Arms when the player is beneath, charges, then fires a beam column
    Beam { timer: f32, charge: Option<f32> },
    /// Wide fan of bullets
    Barrage { timer: f32 },
    /// Boomerangs from both flanks
    Boomerang { timer: f32 },
}

impl Attack {
    /// Full attack table in firing-priority order
    pub fn table() -> Vec<Attack> {
        vec![
            Attack::DirectFire { timer: 0.0 },
            Attack::MissileBurst {
                timer: 0.0,
                burst: None,
            },
            Attack::Beam {
                timer: 0.0,
                charge: None,
            },
            Attack::Barrage { timer: 0.0 },
            Attack::Boomerang { timer: 0.0 },
        ]
    }

    /// First phase in which this attack is live
    pub fn min_phase(&self) -> BossPhase {
        match self {
            Attack::DirectFire { .. } | Attack::MissileBurst { .. } | Attack::Beam { .. } => {
                BossPhase::One
            }
            Attack::Barrage { .. } => BossPhase::Two,
            Attack::Boomerang { .. } => BossPhase::Three,
        }
    }

    pub fn is_unlocked(&self, phase: BossPhase) -> bool {
        phase >= self.min_phase()
    }

    pub fn cooldown(&self, phase: BossPhase) -> f32 {
        match self {
            Attack::DirectFire { .. } => phase.direct_fire_cooldown(),
            Attack::MissileBurst { .. } => MISSILE_COOLDOWN,
            Attack::Beam { .. } => BEAM_COOLDOWN,
            Attack::Barrage { .. } => BARRAGE_COOLDOWN,
            Attack::Boomerang { .. } => BOOMERANG_COOLDOWN,
        }
    }

    /// Advance this attack's timers, pushing any shots into `out`
    pub fn tick(&mut self, dt: f32, ctx: &AttackContext, out: &mut ProjectileQueue) {
        let cooldown = self.cooldown(ctx.phase);
        match self {
            Attack::DirectFire { timer } => {
                *timer += dt;
                if *timer >= cooldown {
                    *timer = 0.0;
                    fire_direct(ctx, out);
                }
            }
            Attack::MissileBurst { timer, burst } => {
                // The cooldown runs during a burst, so bursts start a cooldown apart
                *timer += dt;
                if burst.is_none() && *timer > cooldown {
                    *timer = 0.0;
                    *burst = Some(Burst {
                        fired: 0,
                        delay: 0.0,
                    });
                }
                if let Some(state) = burst {
                    state.delay -= dt;
                    if state.delay <= 0.0 {
                        fire_missile_pair(ctx, out);
                        state.fired += 1;
                        state.delay = MISSILE_BURST_DELAY;
                        if state.fired >= ctx.phase.missile_burst_size() {
                            *burst = None;
                        }
                    }
                }
            }
            Attack::Beam { timer, charge } => match charge {
                Some(progress) => {
                    *progress += dt;
                    if *progress >= BEAM_CHARGE_TIME {
                        fire_beam(ctx, out);
                        *charge = None;
                        *timer = 0.0;
                    }
                }
                None => {
                    *timer = (*timer + dt).min(cooldown);
                    if *timer >= cooldown && ctx.player_beneath() {
                        *charge = Some(0.0);
                    }
                }
            },
            Attack::Barrage { timer } => {
                *timer += dt;
                if *timer >= cooldown {
                    *timer = 0.0;
                    fire_barrage(ctx, out);
                }
            }
            Attack::Boomerang { timer } => {
                *timer += dt;
                if *timer >= cooldown {
                    *timer = 0.0;
                    fire_boomerangs(ctx, out);
                }
            }
        }
    }
}

fn fire_direct(ctx: &AttackContext, out: &mut ProjectileQueue) {
    let origin = ctx.boss_center();
    let dir = (ctx.player - origin).try_normalize().unwrap_or(Vec2::Y);
    out.push(ProjectileSpawn::new(
        origin,
        dir * BULLET_SPEED,
        ProjectileKind::BossBullet,
    ));
}

fn fire_missile_pair(ctx: &AttackContext, out: &mut ProjectileQueue) {
    let mid_y = ctx.boss_min.y + ctx.boss_size.y * 0.5;
    out.push(ProjectileSpawn::new(
        Vec2::new(ctx.boss_min.x, mid_y),
        Vec2::new(-MISSILE_LAUNCH_VEL.x, MISSILE_LAUNCH_VEL.y),
        ProjectileKind::HomingMissile,
    ));
    out.push(ProjectileSpawn::new(
        Vec2::new(ctx.boss_min.x + ctx.boss_size.x, mid_y),
        MISSILE_LAUNCH_VEL,
        ProjectileKind::HomingMissile,
    ));
}

fn fire_beam(ctx: &AttackContext, out: &mut ProjectileQueue) {
    let x = ctx.boss_center().x;
    let bottom = ctx.boss_min.y + ctx.boss_size.y;
    for i in 0..BEAM_SEGMENTS {
        let y = bottom + BEAM_SEGMENT_SPACING * (i as f32 + 0.5);
        out.push(
            ProjectileSpawn::new(Vec2::new(x, y), Vec2::new(0.0, BEAM_SPEED), ProjectileKind::BossBeam)
                .with_damage(BOSS_BEAM_DAMAGE),
        );
    }
}

fn fire_barrage(ctx: &AttackContext, out: &mut ProjectileQueue) {
    let origin = ctx.boss_center();
    let step = BARRAGE_SPREAD / (BARRAGE_COUNT - 1) as f32;
    let start = FRAC_PI_2 - BARRAGE_SPREAD / 2.0;
    for i in 0..BARRAGE_COUNT {
        let angle = start + step * i as f32;
        out.push(ProjectileSpawn::new(
            origin,
            polar_to_cartesian(BARRAGE_SPEED, angle),
            ProjectileKind::BossBullet,
        ));
    }
}

fn fire_boomerangs(ctx: &AttackContext, out: &mut ProjectileQueue) {
    let origin = ctx.boss_center();
    for side in [-1.0, 1.0] {
        out.push(ProjectileSpawn::new(
            origin,
            Vec2::new(BOOMERANG_LAUNCH_VEL.x * side, BOOMERANG_LAUNCH_VEL.y),
            ProjectileKind::Boomerang,
        ));
    }
}

#[derive(Debug, Clone)]
pub struct Boss {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub phase: BossPhase,
    /// Seconds since the fight began
    pub timer: f32,
    pub sword_count: u32,
    pub sword_angle: f32,
    orbit_angle: f32,
    zigzag_dir: f32,
    attacks: Vec<Attack>,
    queue: ProjectileQueue,
}

impl Boss {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(BOSS_SIZE),
            hp: BOSS_HP,
            max_hp: BOSS_HP,
            phase: BossPhase::One,
            timer: 0.0,
            sword_count: 0,
            sword_angle: 0.0,
            orbit_angle: -FRAC_PI_2,
            zigzag_dir: 1.0,
            attacks: Attack::table(),
            queue: ProjectileQueue::with_cap(PROJECTILE_QUEUE_CAP),
        }
    }

    /// Spawned centered horizontally at the top of the viewport
    pub fn spawn(viewport: &Viewport) -> Self {
        Self::new(Vec2::new(viewport.width / 2.0 - BOSS_SIZE / 2.0, BOSS_TOP))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0.0
    }

    /// Reduce hp and advance the phase if a threshold was crossed
    pub fn take_damage(&mut self, amount: f32) {
        self.hp -= amount;
        self.sync_phase();
    }

    /// Raise the phase to match hp. Never lowers it.
    fn sync_phase(&mut self) {
        let target = BossPhase::for_hp_fraction(self.hp / self.max_hp);
        if target > self.phase {
            log::info!(
                "Boss phase {} -> {} ({:.0}/{:.0} hp)",
                self.phase.number(),
                target.number(),
                self.hp.max(0.0),
                self.max_hp
            );
            self.phase = target;
            self.sword_count = self.sword_count.max(target.sword_count());
        }
    }

    pub fn movement(&self) -> Movement {
        self.phase.movement()
    }

    /// Advance movement, sword rotation and every unlocked attack
    pub fn update(&mut self, dt: f32, player: Vec2, viewport: &Viewport) {
        self.timer += dt;
        self.sync_phase();

        match self.movement() {
            Movement::Track => {
                let dx = player.x - self.center().x;
                if dx.abs() > TRACK_DEADZONE {
                    self.pos.x += dx.signum() * TRACK_SPEED * dt;
                }
                self.pos.y = BOSS_TOP + (self.timer * 2.0).sin() * HOVER_AMPLITUDE;
            }
            Movement::Orbit => {
                self.orbit_angle += ORBIT_ANGULAR_SPEED * dt;
                let target = player + polar_to_cartesian(ORBIT_RADIUS, self.orbit_angle);
                let to_target = target - self.center();
                let step = ORBIT_MAX_SPEED * dt;
                if to_target.length() <= step {
                    self.pos += to_target;
                } else {
                    self.pos += to_target.normalize() * step;
                }
            }
            Movement::ZigZag => {
                self.pos.x += self.zigzag_dir * ZIGZAG_SPEED * dt;
                if self.pos.x <= 0.0 {
                    self.zigzag_dir = 1.0;
                } else if self.pos.x + self.size.x >= viewport.width {
                    self.zigzag_dir = -1.0;
                }
                self.pos.y = BOSS_TOP + ZIGZAG_AMPLITUDE + (self.timer * 6.0).sin() * ZIGZAG_AMPLITUDE;
            }
        }
        self.clamp_to(viewport);

        if self.sword_count > 0 {
            self.sword_angle += BOSS_SWORD_SPIN_RATE * dt;
        }

        let ctx = AttackContext {
            boss_min: self.pos,
            boss_size: self.size,
            player,
            phase: self.phase,
        };
        let phase = self.phase;
        for attack in self.attacks.iter_mut().filter(|a| a.is_unlocked(phase)) {
            attack.tick(dt, &ctx, &mut self.queue);
        }
    }

    fn clamp_to(&mut self, viewport: &Viewport) {
        self.pos.x = self.pos.x.clamp(0.0, (viewport.width - self.size.x).max(0.0));
        self.pos.y = self.pos.y.clamp(0.0, (viewport.height - self.size.y).max(0.0));
    }

    /// Drain every queued projectile. Each request is delivered at most once.
    pub fn poll_projectiles(&mut self) -> Vec<ProjectileSpawn> {
        self.queue.drain()
    }

    pub fn queued_projectiles(&self) -> usize {
        self.queue.len()
    }

    pub fn is_charging_beam(&self) -> bool {
        self.beam_charge().is_some()
    }

    /// 0..1 while the beam charges, 0 otherwise
    pub fn beam_charge_progress(&self) -> f32 {
        self.beam_charge()
            .map(|c| (c / BEAM_CHARGE_TIME).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }

    fn beam_charge(&self) -> Option<f32> {
        self.attacks.iter().find_map(|a| match a {
            Attack::Beam { charge, .. } => *charge,
            _ => None,
        })
    }

    /// Current sword-shield centers
    pub fn sword_positions(&self) -> impl Iterator<Item = Vec2> {
        orbit_points(
            self.center(),
            self.sword_count,
            self.sword_angle,
            BOSS_SWORD_ORBIT_RADIUS,
        )
    }
}

impl Collider for Boss {
    fn shape(&self) -> Shape {
        Shape::Box {
            min: self.pos,
            size: self.size,
        }
    }
}
