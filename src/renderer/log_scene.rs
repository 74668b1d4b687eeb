//! Headless scene that keeps visuals in a map and logs changes

use std::collections::HashMap;

use glam::Vec3;

use super::{Scene, SceneError, Visual};
use crate::sim::EntityId;

/// In-memory scene for native runs and tests
#[derive(Debug, Default)]
pub struct LogScene {
    visuals: HashMap<EntityId, Visual>,
    limit: Option<usize>,
}

impl LogScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse new visuals past `limit`
    pub fn with_limit(limit: usize) -> Self {
        Self {
            visuals: HashMap::new(),
            limit: Some(limit),
        }
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Visual> {
        self.visuals.get(&id)
    }

    fn visual_mut(&mut self, id: EntityId) -> Result<&mut Visual, SceneError> {
        self.visuals.get_mut(&id).ok_or(SceneError::UnknownVisual(id))
    }
}

impl Scene for LogScene {
    fn add_visual(&mut self, id: EntityId, visual: Visual) -> Result<(), SceneError> {
        if self.visuals.contains_key(&id) {
            return Err(SceneError::DuplicateVisual(id));
        }
        if let Some(limit) = self.limit
            && self.visuals.len() >= limit
        {
            return Err(SceneError::CapacityExceeded { limit });
        }
        log::trace!("+ {:?} {:?}", id, visual.kind);
        self.visuals.insert(id, visual);
        Ok(())
    }

    fn remove_visual(&mut self, id: EntityId) -> Result<(), SceneError> {
        self.visuals
            .remove(&id)
            .map(|_| log::trace!("- {:?}", id))
            .ok_or(SceneError::UnknownVisual(id))
    }

    fn set_position(&mut self, id: EntityId, pos: Vec3) -> Result<(), SceneError> {
        self.visual_mut(id)?.pos = pos;
        Ok(())
    }

    fn set_color(&mut self, id: EntityId, color: u32) -> Result<(), SceneError> {
        self.visual_mut(id)?.color = color;
        Ok(())
    }
}
