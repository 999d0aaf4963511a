//! Renderer that draws nothing and counts what it was asked to draw

use serde::Serialize;

use super::Renderer;
use crate::settings::Viewport;
use crate::sim::{Block, Boss, FloatingText, Hud, Item, MiniBoss, Player, Projectile};

/// Running totals of draw calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrawCounts {
    pub frames: u64,
    pub blocks: u64,
    pub items: u64,
    pub projectiles: u64,
    pub floating_texts: u64,
    pub mini_bosses: u64,
    pub bosses: u64,
    pub players: u64,
}

#[derive(Debug, Default)]
pub struct Headless {
    pub counts: DrawCounts,
    /// HUD from the most recent frame
    pub last_hud: Option<Hud>,
}

impl Headless {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for Headless {
    fn clear(&mut self, _viewport: &Viewport) {
        self.counts.frames += 1;
    }

    fn draw_block(&mut self, _block: &Block) {
        self.counts.blocks += 1;
    }

    fn draw_item(&mut self, _item: &Item) {
        self.counts.items += 1;
    }

    fn draw_projectile(&mut self, _projectile: &Projectile) {
        self.counts.projectiles += 1;
    }

    fn draw_floating_text(&mut self, _text: &FloatingText) {
        self.counts.floating_texts += 1;
    }

    fn draw_mini_boss(&mut self, _mini_boss: &MiniBoss) {
        self.counts.mini_bosses += 1;
    }

    fn draw_boss(&mut self, _boss: &Boss) {
        self.counts.bosses += 1;
    }

    fn draw_player(&mut self, _player: &Player) {
        self.counts.players += 1;
    }

    fn draw_hud(&mut self, hud: &Hud) {
        self.last_hud = Some(hud.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::draw_frame;
    use crate::settings::Settings;
    use crate::sim::GameState;

    #[test]
    fn test_draws_each_live_entity_once() {
        let state = GameState::new(&Settings::default(), 1);
        let mut renderer = Headless::new();
        draw_frame(&mut renderer, &state);
        assert_eq!(renderer.counts.frames, 1);
        assert_eq!(renderer.counts.players, 1);
        assert_eq!(renderer.counts.blocks, state.blocks.len() as u64);
        assert_eq!(renderer.counts.bosses, 0);
        assert_eq!(renderer.last_hud, Some(state.hud()));
    }

    #[test]
    fn test_skips_inactive_entities() {
        let mut state = GameState::new(&Settings::default(), 1);
        let total = state.blocks.len() as u64;
        state.blocks[0].active = false;
        let mut renderer = Headless::new();
        draw_frame(&mut renderer, &state);
        assert_eq!(renderer.counts.blocks, total - 1);
    }

    #[test]
    fn test_boss_drawn_in_boss_phase() {
        let mut state = GameState::new(&Settings::default(), 1);
        state.start_boss_phase();
        let mut renderer = Headless::new();
        draw_frame(&mut renderer, &state);
        assert_eq!(renderer.counts.bosses, 1);
        assert_eq!(renderer.counts.blocks, 0);
    }
}
