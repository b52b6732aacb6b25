mod descriptor;
mod resolver;

pub use descriptor::{EntityTypeDescriptor, GENERALIZATION_ORDER, TypeField};
pub use resolver::{CatalogEntry, CatalogError, Resolution, TemplateId, TypeCatalog};
