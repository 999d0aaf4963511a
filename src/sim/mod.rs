//! Simulation module
//!
//! All gameplay logic lives here:
//! - Variable timestep, driven by the caller
//! - Seeded RNG only, owned by `GameState`
//! - Entity self-updates finish before any collision is resolved
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod boss;
pub mod combat;
pub mod entity;
pub mod physics;
pub mod player;
pub mod pool;
pub mod schedule;
pub mod state;
pub mod tick;

pub use autopilot::autopilot;
pub use boss::{Attack, Boss, BossPhase, Movement, ProjectileQueue};
pub use entity::{
    Block, BlockKind, Faction, FloatingText, Item, ItemKind, MiniBoss, Motion, Projectile,
    ProjectileKind, ProjectileSpawn,
};
pub use physics::{Collider, Shape, box_overlap, circle_overlap};
pub use player::{Player, PlayerMode};
pub use pool::{Entity, EntityPool};
pub use schedule::{Combo, Difficulty, EventSchedule, ScheduledEvent};
pub use state::{GamePhase, GameState, Hud, RunOutcome, RunReport};
pub use tick::{TickInput, tick};
