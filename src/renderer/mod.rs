//! Rendering contract
//!
//! The simulation never draws. A front end implements `Renderer` and
//! `draw_frame` walks the state once per frame, handing each live entity to
//! the matching draw call. Renderers only ever see shared references.

pub mod headless;

pub use headless::{DrawCounts, Headless};

use crate::settings::Viewport;
use crate::sim::{Block, Boss, FloatingText, GameState, Hud, Item, MiniBoss, Player, Projectile};

pub trait Renderer {
    fn clear(&mut self, viewport: &Viewport);
    fn draw_block(&mut self, block: &Block);
    fn draw_item(&mut self, item: &Item);
    fn draw_projectile(&mut self, projectile: &Projectile);
    fn draw_floating_text(&mut self, text: &FloatingText);
    fn draw_mini_boss(&mut self, mini_boss: &MiniBoss);
    /// Sword shields and the beam charge indicator are read off the boss
    fn draw_boss(&mut self, boss: &Boss);
    fn draw_player(&mut self, player: &Player);
    fn draw_hud(&mut self, _hud: &Hud) {}
}

/// Draw one frame, back to front
pub fn draw_frame(renderer: &mut impl Renderer, state: &GameState) {
    renderer.clear(&state.viewport);

    for block in state.blocks.active() {
        renderer.draw_block(block);
    }
    for item in state.items.active() {
        renderer.draw_item(item);
    }
    for projectile in state.projectiles.active() {
        renderer.draw_projectile(projectile);
    }
    for text in state.floating_texts.active() {
        renderer.draw_floating_text(text);
    }
    for mini_boss in state.mini_bosses.active() {
        renderer.draw_mini_boss(mini_boss);
    }
    if let Some(boss) = &state.boss {
        renderer.draw_boss(boss);
    }
    renderer.draw_player(&state.player);
    renderer.draw_hud(&state.hud());
}
