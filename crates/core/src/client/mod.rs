mod eviction;

use std::sync::Arc;

pub use eviction::{EvictionPolicy, NeverEvict};

use crate::catalog::{CatalogEntry, CatalogError, TypeCatalog};
use crate::config::{self, ClientConfig};
use crate::dispatch::{DispatchSummary, Dispatcher};
use crate::entity::EntityTable;
use crate::net::{ClientStats, RECEIVE_BUFFER_SIZE, Transport, TransportError, UdpTransport};
use crate::pdu::EntityId;
use crate::reckoning;
use crate::world::World;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Mirrors remote DIS entities into a host world.
///
/// Driven by the host once per frame through [`DisClient::update`].
pub struct DisClient<W: World, T: Transport = UdpTransport> {
    transport: T,
    dispatcher: Dispatcher,
    table: EntityTable<W::Handle>,
    eviction: Box<dyn EvictionPolicy<W::Handle>>,
    stats: ClientStats,
    clock_secs: f64,
    recv_buffer: [u8; RECEIVE_BUFFER_SIZE],
}

impl<W: World> DisClient<W, UdpTransport> {
    pub fn connect(config: &ClientConfig, catalog: Arc<TypeCatalog>) -> Result<Self, ClientError> {
        let transport = UdpTransport::bind(config)?;
        Ok(Self::with_transport(transport, catalog))
    }

    /// Connects with a catalog built from `entries`, adding the unknown-entity
    /// fallback when none is configured.
    pub fn from_entries(
        config: &ClientConfig,
        entries: Vec<CatalogEntry>,
    ) -> Result<Self, ClientError> {
        let catalog = config::build_catalog(entries)?;
        Self::connect(config, Arc::new(catalog))
    }
}

impl<W: World, T: Transport> DisClient<W, T> {
    pub fn with_transport(transport: T, catalog: Arc<TypeCatalog>) -> Self {
        Self {
            transport,
            dispatcher: Dispatcher::new(catalog),
            table: EntityTable::new(),
            eviction: Box::new(NeverEvict),
            stats: ClientStats::default(),
            clock_secs: 0.0,
            recv_buffer: [0u8; RECEIVE_BUFFER_SIZE],
        }
    }

    pub fn set_eviction_policy(&mut self, policy: impl EvictionPolicy<W::Handle> + 'static) {
        self.eviction = Box::new(policy);
    }

    pub fn entities(&self) -> &EntityTable<W::Handle> {
        &self.table
    }

    pub fn catalog(&self) -> &TypeCatalog {
        self.dispatcher.catalog()
    }

    pub fn stats(&self) -> &ClientStats {
        &self.stats
    }

    /// Seconds accumulated from every `dt` passed to `update`.
    pub fn clock_secs(&self) -> f64 {
        self.clock_secs
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Runs one frame: at most one datagram is received and dispatched, then
    /// entities without a fresh update are dead reckoned and the eviction
    /// policy is applied.
    pub fn update(&mut self, world: &mut W, dt: f64) -> DispatchSummary {
        self.clock_secs += dt;

        let summary = self.poll(world);
        reckoning::advance(&mut self.table, world, dt);
        self.evict(world);

        summary
    }

    /// Removes every mirrored entity from the world.
    pub fn shutdown(&mut self, world: &mut W) {
        let mut removed = 0;
        for (_, entity) in self.table.drain() {
            world.remove_entity(entity.handle);
            removed += 1;
        }
        log::info!("DIS client shut down, removed {removed} entities");
    }

    fn poll(&mut self, world: &mut W) -> DispatchSummary {
        let size = match self.transport.receive(&mut self.recv_buffer) {
            Ok(0) => return DispatchSummary::default(),
            Ok(size) => size,
            Err(TransportError::Oversize { max }) => {
                log::warn!("Dropping datagram larger than {max} bytes");
                self.stats.datagrams_oversize += 1;
                return DispatchSummary::default();
            }
            Err(e) => {
                log::warn!("Receive failed: {e}");
                return DispatchSummary::default();
            }
        };

        self.stats.datagrams_received += 1;
        self.stats.bytes_received += size as u64;
        log::trace!("Dispatching {size} byte datagram");

        match self.dispatcher.dispatch_datagram(
            &self.recv_buffer[..size],
            &mut self.table,
            world,
            self.clock_secs,
        ) {
            Ok(summary) => {
                self.stats.pdus_dispatched += summary.updated as u64;
                self.stats.pdus_ignored += summary.ignored as u64;
                self.stats.entities_created += summary.created as u64;
                summary
            }
            Err(e) => {
                log::warn!("Dropping {size} byte datagram: {e}");
                self.stats.datagrams_dropped += 1;
                DispatchSummary::default()
            }
        }
    }

    fn evict(&mut self, world: &mut W) {
        let now = self.clock_secs;
        let eviction = &mut self.eviction;
        let expired: Vec<EntityId> = self
            .table
            .iter()
            .filter(|(id, entity)| eviction.should_evict(id, entity, now))
            .map(|(id, _)| *id)
            .collect();

        for id in expired {
            if let Some(entity) = self.table.remove(&id) {
                world.remove_entity(entity.handle);
                self.stats.entities_evicted += 1;
                log::info!("Evicted entity {id}");
            }
        }
    }
}
