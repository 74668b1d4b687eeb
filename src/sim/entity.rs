//! Shared entity lifecycle
//!
//! Every simulated object is either active or inactive. Deactivation is
//! terminal: an inactive entity never moves, takes damage or collides again,
//! and it is filtered out of its owning collection at the end of the tick.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Stable identifier, unique within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out entity IDs in increasing order
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Common lifecycle capability set
pub trait Entity {
    fn id(&self) -> EntityId;

    fn position(&self) -> Vec3;

    fn is_active(&self) -> bool;

    /// Deactivate the entity.
    ///
    /// Returns `true` only for the call that actually deactivated it; later
    /// calls are no-ops.
    fn destroy(&mut self) -> bool;
}

/// Drop inactive entities, returning the IDs that were removed
pub fn retain_active<E: Entity>(items: &mut Vec<E>) -> Vec<EntityId> {
    let removed = items
        .iter()
        .filter(|e| !e.is_active())
        .map(|e| e.id())
        .collect();
    items.retain(|e| e.is_active());
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy {
        id: EntityId,
        active: bool,
    }

    impl Entity for Dummy {
        fn id(&self) -> EntityId {
            self.id
        }
        fn position(&self) -> Vec3 {
            Vec3::ZERO
        }
        fn is_active(&self) -> bool {
            self.active
        }
        fn destroy(&mut self) -> bool {
            std::mem::replace(&mut self.active, false)
        }
    }

    #[test]
    fn test_ids_increase() {
        let mut ids = IdAllocator::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b > a);
    }

    #[test]
    fn test_retain_active_reports_removed() {
        let mut items = vec![
            Dummy { id: EntityId(1), active: true },
            Dummy { id: EntityId(2), active: true },
        ];
        assert!(items[1].destroy());
        assert!(!items[1].destroy());

        let removed = retain_active(&mut items);
        assert_eq!(removed, vec![EntityId(2)]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id(), EntityId(1));
    }
}
