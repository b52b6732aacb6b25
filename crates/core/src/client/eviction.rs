use crate::entity::TrackedEntity;
use crate::pdu::EntityId;

/// Decides when a tracked entity should be dropped.
///
/// Consulted once per entity at the end of every client update. `now_secs` is
/// the client clock, comparable with `TrackedEntity::last_update_secs`.
pub trait EvictionPolicy<H> {
    fn should_evict(&mut self, id: &EntityId, entity: &TrackedEntity<H>, now_secs: f64) -> bool;
}

/// Keeps every entity until the client shuts down.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverEvict;

impl<H> EvictionPolicy<H> for NeverEvict {
    fn should_evict(&mut self, _: &EntityId, _: &TrackedEntity<H>, _: f64) -> bool {
        false
    }
}

impl<H, F> EvictionPolicy<H> for F
where
    F: FnMut(&EntityId, &TrackedEntity<H>, f64) -> bool,
{
    fn should_evict(&mut self, id: &EntityId, entity: &TrackedEntity<H>, now_secs: f64) -> bool {
        self(id, entity, now_secs)
    }
}
