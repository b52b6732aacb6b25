use std::sync::Arc;

use crate::catalog::{Resolution, TypeCatalog};
use crate::entity::{EntityTable, TrackedEntity};
use crate::geo;
use crate::pdu::{self, EntityStatePdu, Pdu, PduError};
use crate::world::{World, WorldError};

/// Outcome of dispatching one datagram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub created: usize,
    pub updated: usize,
    pub ignored: usize,
}

impl DispatchSummary {
    pub fn pdus(&self) -> usize {
        self.updated + self.ignored
    }
}

/// Routes decoded PDUs into the entity table and the host world.
pub struct Dispatcher {
    catalog: Arc<TypeCatalog>,
}

impl Dispatcher {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Decodes `bytes` in full, then applies each PDU in order.
    ///
    /// A decode error returns before the table or world is touched.
    pub fn dispatch_datagram<W: World>(
        &self,
        bytes: &[u8],
        table: &mut EntityTable<W::Handle>,
        world: &mut W,
        now_secs: f64,
    ) -> Result<DispatchSummary, PduError> {
        let pdus = pdu::decode_datagram(bytes)?;
        let mut summary = DispatchSummary::default();

        for pdu in pdus {
            match pdu {
                Pdu::EntityState(state) => {
                    if let Some(created) = self.apply_entity_state(&state, table, world, now_secs) {
                        summary.updated += 1;
                        if created {
                            summary.created += 1;
                        }
                    } else {
                        summary.ignored += 1;
                    }
                }
                Pdu::Unsupported(header) => {
                    log::debug!("Ignoring PDU type {}", u8::from(header.kind));
                    summary.ignored += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Returns whether the entity was created, or `None` when the world
    /// refused to create it.
    fn apply_entity_state<W: World>(
        &self,
        state: &EntityStatePdu,
        table: &mut EntityTable<W::Handle>,
        world: &mut W,
        now_secs: f64,
    ) -> Option<bool> {
        let inserted = table.get_or_try_insert_with(state.entity_id, || {
            let (template, resolution) = self.catalog.resolve_with_level(state.entity_type);
            match resolution {
                Resolution::Exact => {}
                Resolution::Generalized(field) => log::debug!(
                    "Type {} matched template {template} after relaxing {field:?}",
                    state.entity_type
                ),
                Resolution::Fallback => log::debug!(
                    "Type {} has no template, using fallback {template}",
                    state.entity_type
                ),
            }

            let handle = world.create_entity(template)?;
            world.set_dynamics_enabled(handle, false);
            log::info!(
                "Created entity {} ({}) as {template}",
                state.entity_id,
                state.entity_type
            );
            Ok::<_, WorldError>(TrackedEntity::new(handle, template.clone(), state.entity_type))
        });

        let (entity, created) = match inserted {
            Ok(inserted) => inserted,
            Err(e) => {
                log::warn!("Skipping entity {}: {e}", state.entity_id);
                return None;
            }
        };

        entity.apply_state(state, now_secs);
        world.set_position(entity.handle, state.location);
        world.set_orientation(
            entity.handle,
            geo::orientation_from_dis(state.orientation, state.location),
        );

        Some(created)
    }
}
