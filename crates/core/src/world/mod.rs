mod sim;

use std::fmt::Debug;

use glam::{DQuat, DVec3};

use crate::catalog::TemplateId;

pub use sim::{SimEntity, SimWorld};

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("unknown template: {0}")]
    UnknownTemplate(TemplateId),
}

/// Host simulation that mirrored entities live in.
///
/// Handles are owned by the world; the gateway only keeps copies of them.
/// Calls are made from a single thread and are never reentrant.
pub trait World {
    type Handle: Copy + Eq + Debug;

    fn create_entity(&mut self, template: &TemplateId) -> Result<Self::Handle, WorldError>;

    /// Disabling dynamics leaves the pose to be driven externally.
    fn set_dynamics_enabled(&mut self, handle: Self::Handle, enabled: bool);

    fn set_position(&mut self, handle: Self::Handle, position: DVec3);

    fn set_orientation(&mut self, handle: Self::Handle, orientation: DQuat);

    fn position(&self, handle: Self::Handle) -> Option<DVec3>;

    fn remove_entity(&mut self, handle: Self::Handle);
}
