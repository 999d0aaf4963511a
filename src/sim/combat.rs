//! Damage rules shared by every collision pair
//!
//! These functions only decide *what* a contact does. Applying the result
//! (hp, score, pushback, drops) is the orchestrator's job.

use super::entity::{Projectile, ProjectileKind};
use super::player::Player;
use crate::consts::*;

/// Pushback after a surviving block absorbs a contact strike
pub const CONTACT_PUSHBACK: f32 = 2.0;
/// Pushback after a surviving block stops a dash
pub const DASH_PUSHBACK: f32 = 10.0;
/// Pushback from an unarmed bump
pub const BUMP_PUSHBACK: f32 = 5.0;
/// Fraction of `atk` a player sword deals to the boss per tick
pub const SWORD_BOSS_DAMAGE: f32 = 0.5;

/// What touching a live block does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockContact {
    /// Contact damage from invincibility, shaking, or high attack
    Strike { damage: f32 },
    /// Dash hit: drains charge; a surviving block stops the dash
    Dash { damage: f32, drain: f32 },
    /// No damage, player is pushed down
    Bump,
}

impl BlockContact {
    pub fn damage(&self) -> f32 {
        match *self {
            BlockContact::Strike { damage } | BlockContact::Dash { damage, .. } => damage,
            BlockContact::Bump => 0.0,
        }
    }

    /// Downward pushback applied when the block survives
    pub fn pushback(&self) -> f32 {
        match self {
            BlockContact::Strike { .. } => CONTACT_PUSHBACK,
            BlockContact::Dash { .. } => DASH_PUSHBACK,
            BlockContact::Bump => BUMP_PUSHBACK,
        }
    }
}

/// Classify a player-block contact
pub fn block_contact(player: &Player) -> BlockContact {
    let shaking = player.is_shaking && !player.is_charging && !player.is_attacking;
    if player.invincible || shaking || player.can_break_on_contact() {
        BlockContact::Strike {
            damage: player.atk(),
        }
    } else if player.is_dashing() {
        BlockContact::Dash {
            damage: player.atk() + player.charge_power,
            drain: DASH_CHARGE_DRAIN,
        }
    } else {
        BlockContact::Bump
    }
}

/// Effect of a player projectile hitting a block or boss
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileHit {
    pub damage: f32,
    /// Removed on this hit
    pub consumed: bool,
}

pub fn projectile_hit(kind: ProjectileKind) -> ProjectileHit {
    ProjectileHit {
        damage: kind.hit_damage(),
        consumed: !kind.pierces(),
    }
}

/// What touching the boss body does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossContact {
    /// Dash into the boss
    HurtBoss(f32),
    /// Boss body damages the player
    HurtPlayer(f32),
    /// Invincible: nothing happens
    None,
}

pub fn boss_contact(player: &Player) -> BossContact {
    if player.is_dashing() {
        BossContact::HurtBoss(player.atk())
    } else if !player.invincible {
        BossContact::HurtPlayer(BOSS_CONTACT_DAMAGE)
    } else {
        BossContact::None
    }
}

/// Damage a boss projectile deals to the player, `None` while invincible
pub fn incoming_damage(player: &Player, projectile: &Projectile) -> Option<f32> {
    (!player.invincible).then(|| projectile.player_damage())
}

/// Mini-bosses only take damage from an armed player and never hurt back
pub fn mini_boss_damage(player: &Player) -> Option<f32> {
    (player.is_dashing() || player.is_beam_firing() || player.invincible).then(|| player.atk())
}

pub fn sword_boss_damage(player: &Player) -> f32 {
    player.atk() * SWORD_BOSS_DAMAGE
}

/// Score for dealing `damage` to a boss
pub fn damage_score(damage: f32) -> u64 {
    (damage * DAMAGE_SCORE).floor().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Block, BlockKind, ItemKind};
    use glam::Vec2;

    fn dashing_player() -> Player {
        let mut player = Player::new(Vec2::new(400.0, 400.0));
        player.is_attacking = true;
        player.attack_timer = DASH_DURATION;
        player
    }

    #[test]
    fn test_dash_breaks_normal_block_in_two_hits() {
        let mut player = dashing_player();
        player.charge_power = 0.0;
        let mut block = Block::new(1, Vec2::ZERO, BLOCK_SIZE, BlockKind::Normal);

        let first = block_contact(&player);
        assert_eq!(first, BlockContact::Dash { damage: 5.0, drain: DASH_CHARGE_DRAIN });
        assert!(!block.take_damage(first.damage()));
        assert_eq!(block.hp, 5.0);

        let second = block_contact(&player);
        assert!(block.take_damage(second.damage()));
        assert!(!block.active);
    }

    #[test]
    fn test_dash_adds_charge_power() {
        let mut player = dashing_player();
        player.charge_power = 12.0;
        assert_eq!(block_contact(&player).damage(), 17.0);
    }

    #[test]
    fn test_contact_strike_sources() {
        let mut player = Player::new(Vec2::ZERO);
        assert_eq!(block_contact(&player), BlockContact::Bump);

        player.upgrade(ItemKind::Invincible);
        assert!(matches!(block_contact(&player), BlockContact::Strike { .. }));

        let mut shaker = Player::new(Vec2::ZERO);
        shaker.is_shaking = true;
        assert!(matches!(block_contact(&shaker), BlockContact::Strike { .. }));
        // Shaking does not count mid-charge
        shaker.is_charging = true;
        assert_eq!(block_contact(&shaker), BlockContact::Bump);

        let mut strong = Player::new(Vec2::ZERO);
        for _ in 0..BREAK_ON_CONTACT_ATK_COUNT {
            strong.upgrade(ItemKind::Atk);
        }
        assert_eq!(block_contact(&strong), BlockContact::Strike { damage: strong.atk() });
    }

    #[test]
    fn test_projectile_hit_classes() {
        assert_eq!(
            projectile_hit(ProjectileKind::Beam),
            ProjectileHit { damage: 0.5, consumed: false }
        );
        assert_eq!(
            projectile_hit(ProjectileKind::Bullet),
            ProjectileHit { damage: 1.0, consumed: true }
        );
    }

    #[test]
    fn test_boss_contact() {
        assert_eq!(boss_contact(&dashing_player()), BossContact::HurtBoss(5.0));
        let mut player = Player::new(Vec2::ZERO);
        assert_eq!(boss_contact(&player), BossContact::HurtPlayer(BOSS_CONTACT_DAMAGE));
        player.upgrade(ItemKind::Invincible);
        assert_eq!(boss_contact(&player), BossContact::None);
    }

    #[test]
    fn test_incoming_damage_respects_invincibility() {
        let bullet = Projectile::new(1, Vec2::ZERO, Vec2::ZERO, ProjectileKind::BossBullet);
        let mut player = Player::new(Vec2::ZERO);
        assert_eq!(incoming_damage(&player, &bullet), Some(5.0));
        player.upgrade(ItemKind::Invincible);
        assert_eq!(incoming_damage(&player, &bullet), None);
    }

    #[test]
    fn test_mini_boss_needs_armed_player() {
        assert_eq!(mini_boss_damage(&Player::new(Vec2::ZERO)), None);
        assert_eq!(mini_boss_damage(&dashing_player()), Some(5.0));
    }

    #[test]
    fn test_damage_score_floors() {
        assert_eq!(damage_score(0.5), 5);
        assert_eq!(damage_score(2.55), 25);
        assert_eq!(damage_score(0.0), 0);
    }
}
