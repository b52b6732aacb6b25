use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use glam::DVec3;

use crate::catalog::{EntityTypeDescriptor, TemplateId};
use crate::pdu::{EntityId, EntityStatePdu};
use crate::reckoning::DeadReckoningModel;

/// Local mirror of one remote DIS entity.
#[derive(Debug, Clone)]
pub struct TrackedEntity<H> {
    pub handle: H,
    pub template: TemplateId,
    pub entity_type: EntityTypeDescriptor,
    pub marking: String,
    pub updated_this_frame: bool,
    pub dead_reckoning: DeadReckoningModel,
    pub linear_velocity: DVec3,
    pub linear_acceleration: DVec3,
    /// Radians per second about the entity's own axes.
    pub angular_velocity: DVec3,
    pub last_update_secs: f64,
}

impl<H> TrackedEntity<H> {
    pub fn new(handle: H, template: TemplateId, entity_type: EntityTypeDescriptor) -> Self {
        Self {
            handle,
            template,
            entity_type,
            marking: String::new(),
            updated_this_frame: false,
            dead_reckoning: DeadReckoningModel::default(),
            linear_velocity: DVec3::ZERO,
            linear_acceleration: DVec3::ZERO,
            angular_velocity: DVec3::ZERO,
            last_update_secs: 0.0,
        }
    }

    /// Folds the kinematic state of a fresh update into this entity.
    pub fn apply_state(&mut self, pdu: &EntityStatePdu, now_secs: f64) {
        let parameters = &pdu.dead_reckoning;

        self.linear_velocity = pdu.linear_velocity.as_dvec3();
        self.dead_reckoning = DeadReckoningModel::from(parameters.algorithm);
        self.linear_acceleration = parameters.linear_acceleration.as_dvec3();
        self.angular_velocity = parameters.angular_velocity.as_dvec3();
        self.marking.clone_from(&pdu.marking);
        self.updated_this_frame = true;
        self.last_update_secs = now_secs;
    }

    pub fn extrapolate(&self, position: DVec3, dt: f64) -> Option<DVec3> {
        self.dead_reckoning.extrapolate(
            position,
            self.linear_velocity,
            self.linear_acceleration,
            dt,
        )
    }
}

#[derive(Debug)]
pub struct EntityTable<H> {
    entities: BTreeMap<EntityId, TrackedEntity<H>>,
}

impl<H> Default for EntityTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> EntityTable<H> {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn get(&self, id: &EntityId) -> Option<&TrackedEntity<H>> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut TrackedEntity<H>> {
        self.entities.get_mut(id)
    }

    /// Returns the entry for `id`, creating it with `create` on first sighting.
    /// The flag is true when the entry was created by this call.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        id: EntityId,
        create: impl FnOnce() -> Result<TrackedEntity<H>, E>,
    ) -> Result<(&mut TrackedEntity<H>, bool), E> {
        match self.entities.entry(id) {
            Entry::Occupied(entry) => Ok((entry.into_mut(), false)),
            Entry::Vacant(entry) => Ok((entry.insert(create()?), true)),
        }
    }

    pub fn insert(&mut self, id: EntityId, entity: TrackedEntity<H>) -> Option<TrackedEntity<H>> {
        self.entities.insert(id, entity)
    }

    pub fn remove(&mut self, id: &EntityId) -> Option<TrackedEntity<H>> {
        self.entities.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &TrackedEntity<H>)> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&EntityId, &mut TrackedEntity<H>)> {
        self.entities.iter_mut()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = (EntityId, TrackedEntity<H>)> {
        std::mem::take(&mut self.entities).into_iter()
    }
}
