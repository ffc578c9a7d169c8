//! Entity store: ordered transient entities (obstacles, cards)
//!
//! Iteration order is spawn order, which is also the order collisions are
//! resolved in.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::session::SessionState;

pub type EntityId = u32;

/// A transient entity with a variant-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity<P> {
    pub id: EntityId,
    pub rect: Rect,
    /// Pixels per second at speed scale 1.0
    pub vel: Vec2,
    pub payload: P,
    /// Cleared by collisions; dead entities are dropped on the next prune
    pub alive: bool,
}

/// What happens when an entity leaves the visible bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "points", rename_all = "snake_case")]
pub enum ExitPolicy {
    /// Exiting means the player survived it
    Credit(u64),
    /// Exiting means the player failed to catch it
    LoseLife,
    /// Silently discarded
    Discard,
}

impl Default for ExitPolicy {
    fn default() -> Self {
        ExitPolicy::Credit(1)
    }
}

/// Summary of one prune pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Entities that left the bounds this pass
    pub exited: u32,
    /// Dead entities (collided/consumed) that were dropped
    pub removed_dead: u32,
    /// Points credited by the exit policy
    pub credited: u64,
    /// Lives taken by the exit policy
    pub lives_lost: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStore<P> {
    entities: Vec<Entity<P>>,
    next_id: EntityId,
}

impl<P> Default for EntityStore<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> EntityStore<P> {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a new live entity and return its id
    pub fn spawn(&mut self, rect: Rect, vel: Vec2, payload: P) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.push(Entity {
            id,
            rect,
            vel,
            payload,
            alive: true,
        });
        id
    }

    /// Move every live entity by `vel * dt * speed_scale`
    pub fn advance(&mut self, dt: f32, speed_scale: f32) {
        for entity in self.entities.iter_mut().filter(|e| e.alive) {
            entity.rect.pos += entity.vel * dt * speed_scale;
        }
    }

    /// Drop dead entities and entities outside `bounds`, applying `policy`
    /// once per exiting entity
    pub fn prune(
        &mut self,
        bounds: &Rect,
        policy: ExitPolicy,
        session: &mut SessionState,
    ) -> PruneReport {
        let mut report = PruneReport::default();
        self.entities.retain(|entity| {
            if !entity.alive {
                report.removed_dead += 1;
                return false;
            }
            if !entity.rect.has_exited(bounds) {
                return true;
            }
            report.exited += 1;
            match policy {
                ExitPolicy::Credit(points) => {
                    session.credit(points);
                    report.credited += points;
                }
                ExitPolicy::LoseLife => {
                    if session.lives > 0 {
                        session.lose_life();
                        report.lives_lost += 1;
                    }
                }
                ExitPolicy::Discard => {}
            }
            false
        });
        report
    }

    /// Drop entities marked dead by a collision or match
    pub fn remove_dead(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| e.alive);
        before - self.entities.len()
    }

    /// First live entity containing `point`, in store order
    pub fn pick_at(&self, point: Vec2) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|e| e.alive && e.rect.contains(point))
            .map(|e| e.id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity<P>> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity<P>> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity<P>> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity<P>> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Remove everything; ids keep increasing across clears
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}
