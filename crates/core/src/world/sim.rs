use std::collections::{HashMap, HashSet};

use glam::{DQuat, DVec3};

use crate::catalog::TemplateId;

use super::{World, WorldError};

#[derive(Debug, Clone)]
pub struct SimEntity {
    pub id: u32,
    pub template: TemplateId,
    pub position: Option<DVec3>,
    pub orientation: DQuat,
    pub dynamics_enabled: bool,
}

impl SimEntity {
    pub fn new(id: u32, template: TemplateId) -> Self {
        Self {
            id,
            template,
            position: None,
            orientation: DQuat::IDENTITY,
            dynamics_enabled: true,
        }
    }
}

/// In-memory world backing the gateway monitor and tests.
///
/// With no registered templates every template name is accepted.
#[derive(Debug, Default)]
pub struct SimWorld {
    entities: HashMap<u32, SimEntity>,
    templates: HashSet<TemplateId>,
    next_entity_id: u32,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_templates(templates: impl IntoIterator<Item = TemplateId>) -> Self {
        Self {
            templates: templates.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn get(&self, handle: u32) -> Option<&SimEntity> {
        self.entities.get(&handle)
    }

    pub fn get_mut(&mut self, handle: u32) -> Option<&mut SimEntity> {
        self.entities.get_mut(&handle)
    }

    pub fn entities(&self) -> impl Iterator<Item = &SimEntity> {
        self.entities.values()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    fn allocate_id(&mut self) -> u32 {
        self.next_entity_id += 1;
        self.next_entity_id
    }
}

impl World for SimWorld {
    type Handle = u32;

    fn create_entity(&mut self, template: &TemplateId) -> Result<u32, WorldError> {
        if !self.templates.is_empty() && !self.templates.contains(template) {
            return Err(WorldError::UnknownTemplate(template.clone()));
        }

        let id = self.allocate_id();
        self.entities.insert(id, SimEntity::new(id, template.clone()));
        Ok(id)
    }

    fn set_dynamics_enabled(&mut self, handle: u32, enabled: bool) {
        if let Some(entity) = self.entities.get_mut(&handle) {
            entity.dynamics_enabled = enabled;
        }
    }

    fn set_position(&mut self, handle: u32, position: DVec3) {
        if let Some(entity) = self.entities.get_mut(&handle) {
            entity.position = Some(position);
        }
    }

    fn set_orientation(&mut self, handle: u32, orientation: DQuat) {
        if let Some(entity) = self.entities.get_mut(&handle) {
            entity.orientation = orientation;
        }
    }

    fn position(&self, handle: u32) -> Option<DVec3> {
        self.entities.get(&handle).and_then(|entity| entity.position)
    }

    fn remove_entity(&mut self, handle: u32) {
        self.entities.remove(&handle);
    }
}
