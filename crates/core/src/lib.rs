pub mod catalog;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod entity;
pub mod geo;
pub mod net;
pub mod pdu;
pub mod reckoning;
pub mod world;

pub use catalog::{CatalogEntry, CatalogError, EntityTypeDescriptor, TemplateId, TypeCatalog};
pub use client::{ClientError, DisClient, EvictionPolicy, NeverEvict};
pub use config::ClientConfig;
pub use dispatch::{DispatchSummary, Dispatcher};
pub use entity::{EntityTable, TrackedEntity};
pub use net::{ClientStats, MemoryTransport, Transport, TransportError, UdpTransport};
pub use pdu::{EntityId, EntityStatePdu, Pdu, PduError, PduHeader, PduKind};
pub use reckoning::DeadReckoningModel;
pub use world::{SimWorld, World, WorldError};
