//! Capped, insertion-ordered entity collection

use std::ops::{Deref, DerefMut};

/// Entities that can be culled by the orchestrator
pub trait Entity {
    fn id(&self) -> u32;
    fn is_active(&self) -> bool;
}

/// Insertion-ordered collection with a hard cap.
///
/// Entities are owned by value, so one entity can never sit in two pools.
/// A push into a full pool evicts first, so the cap holds at every point of
/// the frame. Everything else leaves through `prune`.
#[derive(Debug, Clone)]
pub struct EntityPool<T> {
    items: Vec<T>,
    cap: usize,
}

impl<T: Entity> EntityPool<T> {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            items: Vec::with_capacity(cap),
            cap,
        }
    }

    /// Append an entity. When full, the oldest dead entity makes room, or
    /// the oldest live one if none are dead.
    pub fn push(&mut self, entity: T) {
        if self.cap == 0 {
            return;
        }
        if self.items.len() >= self.cap {
            let victim = self.items.iter().position(|e| !e.is_active()).unwrap_or(0);
            self.items.remove(victim);
        }
        self.items.push(entity);
    }

    /// Drop inactive entities and those failing `keep`. Returns how many
    /// entities were removed.
    pub fn prune(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|e| e.is_active() && keep(e));
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn active(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|e| e.is_active())
    }
}

impl<T> Deref for EntityPool<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> DerefMut for EntityPool<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}
