//! Run state and the spawners that populate it
//!
//! `GameState` is the single owner of every entity. Spawners live here so
//! ids and randomness always come from the same place.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::entity::{Block, BlockKind, FloatingText, Item, ItemKind, MiniBoss, Projectile, ProjectileSpawn};
use super::player::Player;
use super::pool::EntityPool;
use super::schedule::{Combo, Difficulty, EventSchedule};
use crate::consts::*;
use crate::settings::{Settings, Viewport};

/// Player spawn height above the bottom edge
const PLAYER_SPAWN_OFFSET: f32 = 100.0;
const MINI_BOSS_SPAWN_Y: f32 = -100.0;
const MINI_BOSS_DROP_SPREAD: f32 = 50.0;

const COLOR_COMBO: u32 = 0xffff00;
const COLOR_GOLDEN: u32 = 0xffd700;
const COLOR_MINI_BOSS: u32 = 0xff00ff;
const COLOR_BOSS: u32 = 0xff3300;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Timed block breaking
    Scavenge,
    /// Boss fight
    Boss,
    /// Boss defeated
    Won,
    /// Player died or was crushed
    Lost,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Victory,
    Defeat,
}

/// End-of-run summary handed to the shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: u64,
    pub score: u64,
    pub outcome: RunOutcome,
    pub max_combo: u32,
    /// Seconds simulated
    pub elapsed: f32,
}

/// Values the HUD displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    /// Scavenge countdown rounded up
    pub time: u32,
    /// Floored, never negative
    pub hp: u32,
    pub atk: u32,
    pub spd: u32,
    pub def: u32,
    pub combo: u32,
    pub bonus_time: bool,
    pub phase: GamePhase,
}

#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub viewport: Viewport,
    /// Configured scavenge length
    pub scavenge_seconds: f32,
    pub phase: GamePhase,
    pub score: u64,
    pub combo: Combo,
    /// Scavenge countdown
    pub time_remaining: f32,
    /// Seconds simulated this run
    pub elapsed: f32,
    pub difficulty: Difficulty,
    /// Time since the last block row
    pub spawn_timer: f32,
    pub schedule: EventSchedule,
    pub player: Player,
    pub blocks: EntityPool<Block>,
    pub items: EntityPool<Item>,
    pub projectiles: EntityPool<Projectile>,
    pub floating_texts: EntityPool<FloatingText>,
    pub mini_bosses: EntityPool<MiniBoss>,
    pub boss: Option<Boss>,
    next_id: u32,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let schedule = EventSchedule::new(&mut rng);
        let viewport = settings.viewport;
        let mut state = Self {
            seed,
            rng,
            viewport,
            scavenge_seconds: settings.scavenge_seconds,
            phase: GamePhase::Scavenge,
            score: 0,
            combo: Combo::default(),
            time_remaining: settings.scavenge_seconds,
            elapsed: 0.0,
            difficulty: Difficulty::at(0.0),
            spawn_timer: 0.0,
            schedule,
            player: Player::new(player_spawn(&viewport)),
            blocks: EntityPool::with_cap(MAX_BLOCKS),
            items: EntityPool::with_cap(MAX_ITEMS),
            projectiles: EntityPool::with_cap(MAX_PROJECTILES),
            floating_texts: EntityPool::with_cap(MAX_FLOATING_TEXTS),
            mini_bosses: EntityPool::with_cap(MAX_MINI_BOSSES),
            boss: None,
            next_id: 1,
        };

        // First row appears immediately
        state.spawn_block_row();
        state
    }

    /// Get next entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::Won | GamePhase::Lost)
    }

    pub fn bonus_time(&self) -> bool {
        self.schedule.bonus_active()
    }

    /// Adopt new play-field bounds, keeping the player inside them
    pub fn resize(&mut self, viewport: Viewport) {
        log::debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
        self.player.clamp_to(&viewport);
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            time: self.time_remaining.max(0.0).ceil() as u32,
            hp: self.player.hp.max(0.0).floor() as u32,
            atk: self.player.atk_count,
            spd: self.player.spd_count,
            def: self.player.def_count,
            combo: self.combo.count(),
            bonus_time: self.bonus_time(),
            phase: self.phase,
        }
    }

    pub fn report(&self, outcome: RunOutcome) -> RunReport {
        RunReport {
            seed: self.seed,
            score: self.score,
            outcome,
            max_combo: self.combo.max(),
            elapsed: self.elapsed,
        }
    }

    pub fn spawn_text(&mut self, pos: Vec2, text: impl Into<String>, color: u32) {
        let id = self.next_entity_id();
        self.floating_texts.push(FloatingText::new(id, pos, text, color));
    }

    pub fn spawn_item(&mut self, pos: Vec2, kind: ItemKind) {
        let id = self.next_entity_id();
        self.items.push(Item::new(id, pos, kind));
    }

    pub fn spawn_projectile(&mut self, spawn: ProjectileSpawn) {
        let id = self.next_entity_id();
        self.projectiles.push(spawn.into_projectile(id));
    }

    fn spawn_block(&mut self, pos: Vec2, kind: BlockKind) {
        let id = self.next_entity_id();
        self.blocks.push(Block::new(id, pos, BLOCK_SIZE, kind));
    }

    /// Spawn a row of blocks just above the viewport, leaving one or two gaps
    pub fn spawn_block_row(&mut self) {
        if self.phase != GamePhase::Scavenge || self.blocks.len() >= MAX_BLOCKS {
            return;
        }

        let cols = (self.viewport.width / BLOCK_SIZE).floor() as usize;
        if cols == 0 {
            return;
        }
        let start_x = (self.viewport.width - cols as f32 * BLOCK_SIZE) / 2.0;

        let mut gap1 = Some(self.rng.random_range(0..cols));
        // A single column must not always be a gap
        if cols == 1 && self.rng.random::<f32>() > 0.5 {
            gap1 = None;
        }
        let gap2 = if self.rng.random::<f32>() > 0.5 && cols > 2 {
            Some(self.rng.random_range(0..cols))
        } else {
            None
        };

        for col in 0..cols {
            if Some(col) == gap1 || Some(col) == gap2 {
                continue;
            }
            let kind = BlockKind::roll(&mut self.rng);
            let pos = Vec2::new(start_x + col as f32 * BLOCK_SIZE, -BLOCK_SIZE);
            self.spawn_block(pos, kind);
        }
    }

    pub fn spawn_golden_block(&mut self) {
        let max_x = (self.viewport.width - BLOCK_SIZE).max(0.0);
        let x = self.rng.random::<f32>() * max_x;
        let pos = Vec2::new(x, -BLOCK_SIZE);
        self.spawn_block(pos, BlockKind::Golden);
        self.spawn_text(pos, "GOLDEN BLOCK!", COLOR_GOLDEN);
        log::debug!("Golden block at x={x:.0}");
    }

    pub fn spawn_mini_boss(&mut self) {
        let max_x = (self.viewport.width - MINI_BOSS_SIZE).max(0.0);
        let x = self.rng.random::<f32>() * max_x;
        let id = self.next_entity_id();
        self.mini_bosses.push(MiniBoss::new(id, Vec2::new(x, MINI_BOSS_SPAWN_Y)));
        let banner = Vec2::new(self.viewport.width / 2.0, 100.0);
        self.spawn_text(banner, "MINI-BOSS APPEARS!", COLOR_MINI_BOSS);
        log::info!("Mini-boss spawned ({:.0}s left)", self.time_remaining.max(0.0));
    }

    /// Roll and spawn the drop for a destroyed block. Bonus time adds a second
    /// item beside the first: same kind, or a fresh rare roll for golden blocks.
    pub fn drop_items(&mut self, center: Vec2, kind: BlockKind) {
        let Some(item) = kind.roll_drop(&mut self.rng) else {
            return;
        };
        self.spawn_item(center, item);
        if self.bonus_time() {
            let second = if kind == BlockKind::Golden {
                kind.roll_drop(&mut self.rng).unwrap_or(item)
            } else {
                item
            };
            self.spawn_item(center + Vec2::new(BONUS_DROP_OFFSET, 0.0), second);
        }
    }

    /// Combo, score and drop for a block that just died
    pub fn break_block(&mut self, block: &Block) {
        let combo = self.combo.register_break();
        let bonus = self.combo.bonus();
        self.score += block.kind.base_score() + bonus;
        self.drop_items(block.center(), block.kind);
        if combo > 1 {
            self.spawn_text(block.pos, format!("x{combo} COMBO! +{bonus}"), COLOR_COMBO);
        }
    }

    /// Three stat items scattered where a mini-boss died
    pub fn kill_mini_boss(&mut self, pos: Vec2) {
        self.score += MINI_BOSS_SCORE;
        self.spawn_text(pos, format!("+{MINI_BOSS_SCORE} MINI-BOSS!"), COLOR_MINI_BOSS);
        for kind in [ItemKind::Atk, ItemKind::Spd, ItemKind::Def] {
            let offset = self.rng.random::<f32>() * MINI_BOSS_DROP_SPREAD;
            self.spawn_item(pos + Vec2::new(offset, 0.0), kind);
        }
        log::info!("Mini-boss defeated");
    }

    /// End the scavenge phase: clear the field and bring in the boss
    pub fn start_boss_phase(&mut self) {
        self.phase = GamePhase::Boss;
        self.time_remaining = 0.0;
        self.blocks.clear();
        self.items.clear();
        self.mini_bosses.clear();
        self.boss = Some(Boss::spawn(&self.viewport));
        let banner = Vec2::new(self.viewport.width / 2.0, 100.0);
        self.spawn_text(banner, "BOSS INCOMING!", COLOR_BOSS);
        log::info!("Boss phase started (score {})", self.score);
    }
}

fn player_spawn(viewport: &Viewport) -> Vec2 {
    Vec2::new(viewport.width / 2.0, viewport.height - PLAYER_SPAWN_OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(seed: u64) -> GameState {
        GameState::new(&Settings::default(), seed)
    }

    #[test]
    fn test_new_run() {
        let state = state(1);
        assert_eq!(state.phase, GamePhase::Scavenge);
        assert_eq!(state.player.pos, Vec2::new(240.0, 700.0));
        assert!(!state.blocks.is_empty());
        assert!(state.boss.is_none());
    }

    #[test]
    fn test_entity_ids_unique() {
        let mut state = state(1);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
        let mut ids: Vec<u32> = state.blocks.iter().map(|b| b.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), state.blocks.len());
    }

    #[test]
    fn test_block_row_leaves_a_gap() {
        let mut state = state(7);
        for _ in 0..50 {
            state.blocks.clear();
            state.spawn_block_row();
            let cols = (state.viewport.width / BLOCK_SIZE).floor() as usize;
            assert!(state.blocks.len() < cols);
            assert!(state.blocks.len() >= cols - 2);
            for block in state.blocks.iter() {
                assert_eq!(block.pos.y, -BLOCK_SIZE);
                assert!(block.pos.x >= 0.0 && block.pos.x + BLOCK_SIZE <= state.viewport.width);
            }
        }
    }

    #[test]
    fn test_block_row_skipped_when_crowded() {
        let mut state = state(2);
        while state.blocks.len() < MAX_BLOCKS {
            state.spawn_block(Vec2::ZERO, BlockKind::Normal);
        }
        let before = state.blocks.len();
        state.spawn_block_row();
        assert_eq!(state.blocks.len(), before);
    }

    #[test]
    fn test_golden_block_scores_and_drops_one_rare() {
        let mut state = state(3);
        state.items.clear();
        state.score = 0;
        state.combo.register_break();
        let block = Block::new(99, Vec2::ZERO, BLOCK_SIZE, BlockKind::Golden);
        state.break_block(&block);
        assert_eq!(state.score, GOLDEN_BLOCK_SCORE + COMBO_SCORE * 2);
        assert_eq!(state.items.len(), 1);
        assert!(ItemKind::RARE.contains(&state.items[0].kind));
    }

    #[test]
    fn test_golden_block_drops_two_in_bonus_time() {
        let mut state = state(4);
        state.items.clear();
        // Run the schedule until bonus time opens
        while !state.bonus_time() {
            state.schedule.update(0.1, 1000.0, &mut state.rng);
        }
        let block = Block::new(99, Vec2::ZERO, BLOCK_SIZE, BlockKind::Golden);
        state.break_block(&block);
        assert_eq!(state.items.len(), 2);
        assert!(state.items.iter().all(|i| ItemKind::RARE.contains(&i.kind)));
        assert_eq!(state.items[1].pos.x - state.items[0].pos.x, BONUS_DROP_OFFSET);
    }

    #[test]
    fn test_mini_boss_kill_drops_stat_items() {
        let mut state = state(5);
        state.items.clear();
        state.score = 0;
        state.kill_mini_boss(Vec2::new(100.0, 100.0));
        assert_eq!(state.score, MINI_BOSS_SCORE);
        let kinds: Vec<ItemKind> = state.items.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![ItemKind::Atk, ItemKind::Spd, ItemKind::Def]);
    }

    #[test]
    fn test_boss_phase_clears_field() {
        let mut state = state(6);
        state.spawn_mini_boss();
        state.spawn_item(Vec2::ZERO, ItemKind::Hp);
        state.start_boss_phase();
        assert_eq!(state.phase, GamePhase::Boss);
        assert!(state.blocks.is_empty());
        assert!(state.items.is_empty());
        assert!(state.mini_bosses.is_empty());
        assert!(state.boss.is_some());
        // No rows during the boss fight
        state.spawn_block_row();
        assert!(state.blocks.is_empty());
    }

    #[test]
    fn test_hud_rounding() {
        let mut state = state(8);
        state.time_remaining = 12.2;
        state.player.hp = 42.9;
        let hud = state.hud();
        assert_eq!(hud.time, 13);
        assert_eq!(hud.hp, 42);
        state.player.hp = -3.0;
        assert_eq!(state.hud().hp, 0);
    }

    #[test]
    fn test_resize_clamps_player() {
        let mut state = state(9);
        state.resize(Viewport::new(200.0, 300.0));
        assert!(state.player.pos.x <= 180.0);
        assert!(state.player.pos.y <= 280.0);
    }
}
