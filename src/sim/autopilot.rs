//! Demo-mode AI
//!
//! Produces the same `TickInput` a human would, so the simulation cannot
//! tell the difference. Deterministic: depends only on the state.

use glam::Vec2;

use super::entity::{Faction, ProjectileKind};
use super::state::{GamePhase, GameState};
use super::tick::TickInput;

/// Boss shots closer than this are dodged
const DODGE_RADIUS: f32 = 120.0;
/// Blocks this close above the player trigger a shake
const SHAKE_REACH: f32 = 90.0;
/// Items farther than this are ignored
const ITEM_REACH: f32 = 300.0;
/// Fraction of the viewport height the player patrols at
const PATROL_HEIGHT: f32 = 0.75;
/// Seconds spent charging before each dash at the boss
const DASH_CHARGE_TIME: f32 = 1.0;
const DASH_CYCLE: f32 = 1.2;

pub fn autopilot(state: &GameState) -> TickInput {
    match state.phase {
        GamePhase::Scavenge => scavenge(state),
        GamePhase::Boss => boss_fight(state),
        GamePhase::Won | GamePhase::Lost => TickInput::default(),
    }
}

fn scavenge(state: &GameState) -> TickInput {
    let player = &state.player;

    let block_overhead = state.blocks.active().any(|b| {
        let center = b.center();
        (center.x - player.pos.x).abs() < b.size.x * 0.5 + player.radius
            && center.y < player.pos.y
            && player.pos.y - center.y < SHAKE_REACH
    });
    if block_overhead && !player.has_beam {
        // Alternate full-left and full-right every frame
        let frame = (state.elapsed * 60.0) as i64;
        let x = if frame % 2 == 0 { 1.0 } else { -1.0 };
        return TickInput::new(Vec2::new(x, 0.0), false);
    }

    let target = state
        .items
        .active()
        .map(|i| i.pos)
        .filter(|pos| pos.distance(player.pos) < ITEM_REACH)
        .min_by(|a, b| {
            a.distance_squared(player.pos)
                .partial_cmp(&b.distance_squared(player.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(Vec2::new(
            state.viewport.width / 2.0,
            state.viewport.height * PATROL_HEIGHT,
        ));

    TickInput::new(steer(player.pos, target), player.has_beam)
}

fn boss_fight(state: &GameState) -> TickInput {
    let player = &state.player;
    let Some(boss) = &state.boss else {
        return TickInput::default();
    };

    let threat = state
        .projectiles
        .active()
        .filter(|p| p.kind.faction() == Faction::Boss)
        .map(|p| (p.pos, p.kind))
        .filter(|(pos, _)| pos.distance(player.pos) < DODGE_RADIUS)
        .min_by(|a, b| {
            a.0.distance_squared(player.pos)
                .partial_cmp(&b.0.distance_squared(player.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if player.has_beam {
        // Stay under the boss and keep firing, stepping aside from shots
        let mut target = Vec2::new(boss.center().x, state.viewport.height * PATROL_HEIGHT);
        if let Some((pos, kind)) = threat {
            let side = if pos.x > player.pos.x { -1.0 } else { 1.0 };
            let step = if kind == ProjectileKind::BossBeam { 2.0 } else { 1.0 };
            target.x = player.pos.x + side * DODGE_RADIUS * step;
        }
        return TickInput::new(steer(player.pos, target), true);
    }

    if let Some((pos, _)) = threat {
        return TickInput::new((player.pos - pos).normalize_or_zero(), false);
    }

    // Charge, then release aimed at the boss
    let phase = state.elapsed % DASH_CYCLE;
    if phase < DASH_CHARGE_TIME {
        TickInput::new(Vec2::ZERO, true)
    } else {
        let aim = (boss.center() - player.pos).normalize_or_zero();
        TickInput::new(aim, false)
    }
}

/// Direction toward `target`, slowing inside a small dead zone
fn steer(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    if dist < 4.0 {
        Vec2::ZERO
    } else {
        delta / dist * (dist / 40.0).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::tick::tick;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_inputs_are_well_formed() {
        let mut state = GameState::new(&Settings::default(), 77);
        for _ in 0..(20 * 60) {
            let input = autopilot(&state);
            assert!(input.movement().length() <= 1.0 + 1e-5);
            if tick(&mut state, &input, DT).is_some() {
                break;
            }
        }
    }

    #[test]
    fn test_autopilot_is_deterministic() {
        let settings = Settings::default();
        let mut a = GameState::new(&settings, 5);
        let mut b = GameState::new(&settings, 5);
        for _ in 0..(15 * 60) {
            let ia = autopilot(&a);
            let ib = autopilot(&b);
            assert_eq!(ia, ib);
            tick(&mut a, &ia, DT);
            tick(&mut b, &ib, DT);
        }
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn test_fires_beam_in_boss_fight() {
        let mut state = GameState::new(&Settings::default(), 3);
        state.start_boss_phase();
        state.player.upgrade(crate::sim::ItemKind::Beam);
        assert!(autopilot(&state).action);
    }

    #[test]
    fn test_idle_when_over() {
        let mut state = GameState::new(&Settings::default(), 3);
        state.phase = GamePhase::Lost;
        assert_eq!(autopilot(&state), TickInput::default());
    }
}
