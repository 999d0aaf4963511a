//! Per-frame simulation step
//!
//! Order within a frame: player, entity self-updates, collision resolution,
//! pruning, then the scavenge timers and the end-of-run check.

use glam::Vec2;

use super::combat::{self, BlockContact, BossContact};
use super::entity::{Block, Faction};
use super::physics::{Shape, box_overlap, circle_overlap};
use super::schedule::{Difficulty, ScheduledEvent};
use super::state::{GamePhase, GameState, RunOutcome, RunReport};
use crate::consts::*;

const COLOR_SLASH: u32 = 0xffaa00;
const COLOR_BLOCKED: u32 = 0xff3300;
const COLOR_BOSS_HIT: u32 = 0x00f0ff;
const COLOR_DASH_HIT: u32 = 0xff0055;
const COLOR_BONUS: u32 = 0xffff00;

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Movement direction, magnitude at most 1
    movement: Vec2,
    /// Action button held (charge, or fire when the beam is unlocked)
    pub action: bool,
}

impl TickInput {
    /// Non-finite movement is treated as no input; longer vectors are shortened to 1
    pub fn new(movement: Vec2, action: bool) -> Self {
        let movement = if movement.is_finite() {
            movement.clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        };
        Self { movement, action }
    }

    pub fn movement(&self) -> Vec2 {
        self.movement
    }
}

/// Advance the run by `dt` seconds.
///
/// Returns the report on the frame the run ends and `None` otherwise,
/// including every frame after the end.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Option<RunReport> {
    if state.is_over() {
        return None;
    }
    state.elapsed += dt;

    update_player(state, input, dt);
    update_entities(state, dt);

    resolve_player_blocks(state);
    resolve_items(state);
    resolve_mini_bosses(state);
    resolve_projectiles(state);
    resolve_swords(state);
    resolve_boss_contact(state);

    prune(state);

    if state.phase == GamePhase::Scavenge {
        advance_schedule(state, dt);
    }

    check_end(state)
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let viewport = state.viewport;
    state.player.update(dt, input, &viewport);
    if state.player.is_beam_firing() {
        if let Some(shot) = state.player.fire_beam(dt) {
            state.spawn_projectile(shot);
        }
    }
}

fn update_entities(state: &mut GameState, dt: f32) {
    let scroll = state.difficulty.scroll_speed;
    let player_pos = state.player.pos;

    for block in state.blocks.iter_mut() {
        block.update(dt, scroll);
    }

    let magnet = state.player.has_magnet;
    for item in state.items.iter_mut() {
        item.update(dt, scroll);
        if magnet && item.active {
            item.attract(player_pos, MAGNET_RANGE, MAGNET_PULL_SPEED, dt);
        }
    }

    for projectile in state.projectiles.iter_mut() {
        projectile.update(dt, player_pos);
    }

    for text in state.floating_texts.iter_mut() {
        text.update(dt);
    }

    for mini_boss in state.mini_bosses.iter_mut() {
        mini_boss.update(dt, player_pos.x);
    }

    let viewport = state.viewport;
    let shots = match state.boss.as_mut() {
        Some(boss) => {
            boss.update(dt, player_pos, &viewport);
            boss.poll_projectiles()
        }
        None => Vec::new(),
    };
    for shot in shots {
        state.spawn_projectile(shot);
    }
}

fn resolve_player_blocks(state: &mut GameState) {
    let mut broken = Vec::new();

    for block in state.blocks.iter_mut() {
        if !block.active || !box_overlap(&state.player, &*block) {
            continue;
        }
        let contact = combat::block_contact(&state.player);
        let destroyed = match contact {
            BlockContact::Bump => false,
            _ => block.take_damage(contact.damage()),
        };
        if let BlockContact::Dash { drain, .. } = contact {
            state.player.charge_power = (state.player.charge_power - drain).max(0.0);
        }

        if destroyed {
            broken.push(block.clone());
        } else {
            state.player.pos.y += contact.pushback();
            if matches!(contact, BlockContact::Dash { .. }) {
                state.player.stop_dash();
            }
        }
    }

    for block in &broken {
        state.break_block(block);
    }
}

fn resolve_items(state: &mut GameState) {
    let mut collected = Vec::new();
    for item in state.items.iter_mut() {
        if item.active && circle_overlap(&state.player, &*item) {
            item.active = false;
            collected.push((item.pos, item.kind));
        }
    }

    for (pos, kind) in collected {
        state.player.upgrade(kind);
        state.score += ITEM_PICKUP_SCORE;
        state.spawn_text(pos, kind.pickup_text(), kind.color());
        log::debug!("Picked up {kind:?}");
    }
}

fn resolve_mini_bosses(state: &mut GameState) {
    let Some(damage) = combat::mini_boss_damage(&state.player) else {
        return;
    };

    let mut killed = Vec::new();
    for mini_boss in state.mini_bosses.iter_mut() {
        if mini_boss.active && box_overlap(&state.player, &*mini_boss) && mini_boss.take_damage(damage) {
            killed.push(mini_boss.pos);
        }
    }

    for pos in killed {
        state.kill_mini_boss(pos);
    }
}

fn resolve_projectiles(state: &mut GameState) {
    // Boss sword shields eat player shots before anything else sees them
    if let Some(boss) = &state.boss {
        let shields: Vec<Shape> = boss
            .sword_positions()
            .map(|pos| Shape::circle(pos, BOSS_SWORD_SIZE))
            .collect();
        let mut blocked = Vec::new();
        for projectile in state.projectiles.iter_mut() {
            if !projectile.active || projectile.kind.faction() != Faction::Player {
                continue;
            }
            if let Some(shield) = shields.iter().find(|s| circle_overlap(*s, &*projectile)) {
                projectile.active = false;
                blocked.push(shield.center());
            }
        }
        for pos in blocked {
            state.spawn_text(pos, "BLOCKED!", COLOR_BLOCKED);
        }
    }

    let mut broken: Vec<Block> = Vec::new();
    let mut boss_hits = Vec::new();
    let mut player_damage = 0.0;

    for projectile in state.projectiles.iter_mut() {
        if !projectile.active {
            continue;
        }
        match projectile.kind.faction() {
            Faction::Player => {
                let hit = combat::projectile_hit(projectile.kind);
                for block in state.blocks.iter_mut() {
                    if !block.active || !box_overlap(&*projectile, &*block) {
                        continue;
                    }
                    if block.take_damage(hit.damage) {
                        broken.push(block.clone());
                    }
                    if hit.consumed {
                        projectile.active = false;
                        break;
                    }
                }
                if !projectile.active {
                    continue;
                }
                if let Some(boss) = state.boss.as_mut() {
                    if box_overlap(&*projectile, &*boss) {
                        boss.take_damage(hit.damage);
                        boss_hits.push((boss.center(), hit.damage));
                        if hit.consumed {
                            projectile.active = false;
                        }
                    }
                }
            }
            Faction::Boss => {
                if circle_overlap(&state.player, &*projectile) {
                    if let Some(damage) = combat::incoming_damage(&state.player, projectile) {
                        player_damage += damage;
                    }
                    projectile.active = false;
                }
            }
        }
    }

    state.player.hp -= player_damage;
    for block in &broken {
        state.break_block(block);
    }
    for (pos, damage) in boss_hits {
        award_boss_damage(state, pos, damage, COLOR_BOSS_HIT);
    }
}

fn resolve_swords(state: &mut GameState) {
    if state.player.sword_count == 0 {
        return;
    }
    let blades: Vec<Shape> = state
        .player
        .sword_positions()
        .map(|pos| Shape::circle(pos, SWORD_SIZE))
        .collect();

    let mut slashed: Vec<Block> = Vec::new();
    let mut intercepted = Vec::new();
    let mut boss_damage = 0.0;

    for blade in &blades {
        for block in state.blocks.iter_mut() {
            if block.active && box_overlap(blade, &*block) && block.shatter() {
                slashed.push(block.clone());
            }
        }

        for projectile in state.projectiles.iter_mut() {
            if projectile.active
                && projectile.kind.faction() == Faction::Boss
                && circle_overlap(blade, &*projectile)
            {
                projectile.active = false;
                intercepted.push(projectile.pos);
            }
        }

        if let Some(boss) = state.boss.as_mut() {
            if circle_overlap(blade, &*boss) {
                let damage = combat::sword_boss_damage(&state.player);
                boss.take_damage(damage);
                boss_damage += damage;
            }
        }
    }

    for block in &slashed {
        state.break_block(block);
        state.spawn_text(block.pos, "SLASH!", COLOR_SLASH);
    }
    for pos in intercepted {
        state.score += INTERCEPT_SCORE;
        state.spawn_text(pos, format!("BLOCK! +{INTERCEPT_SCORE}"), COLOR_SLASH);
    }
    if boss_damage > 0.0 {
        state.score += combat::damage_score(boss_damage);
    }
}

fn resolve_boss_contact(state: &mut GameState) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    if !box_overlap(&state.player, &*boss) {
        return;
    }
    match combat::boss_contact(&state.player) {
        BossContact::HurtBoss(damage) => {
            boss.take_damage(damage);
            let pos = boss.center();
            award_boss_damage(state, pos, damage, COLOR_DASH_HIT);
        }
        BossContact::HurtPlayer(damage) => state.player.hp -= damage,
        BossContact::None => {}
    }
}

fn award_boss_damage(state: &mut GameState, pos: Vec2, damage: f32, color: u32) {
    let points = combat::damage_score(damage);
    state.score += points;
    state.spawn_text(pos, format!("+{points}"), color);
}

fn prune(state: &mut GameState) {
    let width = state.viewport.width;
    let height = state.viewport.height;
    let below = height + CULL_MARGIN;

    state.blocks.prune(|b| b.pos.y < below);
    state.items.prune(|i| i.pos.y < below);
    state.projectiles.prune(|p| {
        p.pos.x > -CULL_MARGIN && p.pos.x < width + CULL_MARGIN && p.pos.y > -CULL_MARGIN && p.pos.y < below
    });
    state.floating_texts.prune(|_| true);
    state.mini_bosses.prune(|m| m.pos.y < below);
}

fn advance_schedule(state: &mut GameState, dt: f32) {
    if state.combo.update(dt) {
        log::debug!("Combo lapsed");
    }

    let events = state.schedule.update(dt, state.time_remaining, &mut state.rng);
    for event in events {
        match event {
            ScheduledEvent::BonusTimeStarted => {
                let banner = Vec2::new(state.viewport.width / 2.0, 100.0);
                state.spawn_text(banner, "BONUS TIME! x2 ITEMS!", COLOR_BONUS);
                log::info!("Bonus time started");
            }
            ScheduledEvent::BonusTimeEnded => log::info!("Bonus time ended"),
            ScheduledEvent::GoldenBlock => state.spawn_golden_block(),
            ScheduledEvent::MiniBoss => state.spawn_mini_boss(),
        }
    }

    state.difficulty = Difficulty::at(state.scavenge_seconds - state.time_remaining);
    state.spawn_timer += dt;
    if state.spawn_timer > state.difficulty.spawn_interval {
        state.spawn_block_row();
        state.spawn_timer = 0.0;
    }

    state.time_remaining -= dt;
    if state.time_remaining <= 0.0 {
        state.start_boss_phase();
    }
}

/// Victory wins a frame where both sides fall
fn check_end(state: &mut GameState) -> Option<RunReport> {
    let outcome = if state.boss.as_ref().is_some_and(|b| b.is_defeated()) {
        RunOutcome::Victory
    } else if state.player.hp <= 0.0 || state.player.is_off_bottom(&state.viewport) {
        RunOutcome::Defeat
    } else {
        return None;
    };

    state.phase = match outcome {
        RunOutcome::Victory => GamePhase::Won,
        RunOutcome::Defeat => GamePhase::Lost,
    };
    log::info!(
        "Run ended: {:?} with score {} after {:.1}s",
        outcome,
        state.score,
        state.elapsed
    );
    Some(state.report(outcome))
}
