use std::fmt;

use serde::{Deserialize, Serialize};

use super::descriptor::{EntityTypeDescriptor, GENERALIZATION_ORDER, TypeField};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TemplateId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TemplateId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub descriptor: EntityTypeDescriptor,
    pub template: TemplateId,
}

impl CatalogEntry {
    pub fn new(descriptor: EntityTypeDescriptor, template: impl Into<TemplateId>) -> Self {
        Self {
            descriptor,
            template: template.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("type catalog has no entries")]
    Empty,
}

/// How far a lookup had to broaden before it found a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Exact,
    /// Matched after clearing this field and every field before it in
    /// [`GENERALIZATION_ORDER`].
    Generalized(TypeField),
    Fallback,
}

/// Sorted, immutable mapping from entity type descriptors to templates.
///
/// Entry 0 is the fallback returned when no generalization of a descriptor is
/// present. After sorting it holds the smallest descriptor, normally the
/// all-zero "unknown" type.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    entries: Vec<CatalogEntry>,
}

impl TypeCatalog {
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Result<Self, CatalogError> {
        let mut entries: Vec<CatalogEntry> = entries.into_iter().collect();
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        entries.sort_by(|a, b| a.descriptor.cmp(&b.descriptor));
        entries.dedup_by(|later, earlier| {
            let duplicate = later.descriptor == earlier.descriptor;
            if duplicate {
                log::warn!(
                    "Duplicate catalog entry for {}: keeping {}, ignoring {}",
                    later.descriptor,
                    earlier.template,
                    later.template
                );
            }
            duplicate
        });

        if !entries[0].descriptor.is_unknown() {
            log::warn!(
                "Catalog has no entry for the unknown type, falling back to {} ({})",
                entries[0].template,
                entries[0].descriptor
            );
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fallback(&self) -> &TemplateId {
        &self.entries[0].template
    }

    pub fn resolve(&self, descriptor: EntityTypeDescriptor) -> &TemplateId {
        self.resolve_with_level(descriptor).0
    }

    pub fn resolve_with_level(&self, descriptor: EntityTypeDescriptor) -> (&TemplateId, Resolution) {
        if let Some(entry) = self.find(&descriptor) {
            return (&entry.template, Resolution::Exact);
        }

        for (field, key) in GENERALIZATION_ORDER.iter().zip(descriptor.generalizations()) {
            if let Some(entry) = self.find(&key) {
                return (&entry.template, Resolution::Generalized(*field));
            }
        }

        (self.fallback(), Resolution::Fallback)
    }

    fn find(&self, key: &EntityTypeDescriptor) -> Option<&CatalogEntry> {
        self.entries
            .binary_search_by(|entry| entry.descriptor.cmp(key))
            .ok()
            .map(|index| &self.entries[index])
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn d(kind: u8, domain: u8, country: u16, category: u8, sub: u8, specific: u8) -> EntityTypeDescriptor {
        EntityTypeDescriptor::new(kind, domain, country, category, sub, specific, 0)
    }

    fn small_catalog() -> TypeCatalog {
        TypeCatalog::new([
            CatalogEntry::new(d(1, 2, 0, 20, 0, 0), "Jaguar"),
            CatalogEntry::new(EntityTypeDescriptor::UNKNOWN, "Unknown"),
            CatalogEntry::new(d(1, 0, 0, 0, 0, 0), "Frigate"),
        ])
        .unwrap()
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(TypeCatalog::new([]), Err(CatalogError::Empty)));
    }

    #[test]
    fn entries_are_sorted_after_construction() {
        let catalog = TypeCatalog::new([
            CatalogEntry::new(d(1, 2, 225, 20, 2, 10), "UH60"),
            CatalogEntry::new(d(1, 1, 0, 1, 0, 0), "Shuttle"),
            CatalogEntry::new(d(1, 2, 0, 20, 0, 0), "SepecatJaguar"),
            CatalogEntry::new(EntityTypeDescriptor::UNKNOWN, "DisUnknownEntity"),
            CatalogEntry::new(d(1, 0, 0, 0, 0, 0), "Frigate"),
        ])
        .unwrap();

        assert!(
            catalog
                .entries()
                .windows(2)
                .all(|pair| pair[0].descriptor <= pair[1].descriptor)
        );
        assert_eq!(catalog.fallback().as_str(), "DisUnknownEntity");
    }

    #[test]
    fn duplicate_descriptors_keep_first_entry() {
        let catalog = TypeCatalog::new([
            CatalogEntry::new(EntityTypeDescriptor::UNKNOWN, "Unknown"),
            CatalogEntry::new(d(1, 0, 0, 0, 0, 0), "Frigate"),
            CatalogEntry::new(d(1, 0, 0, 0, 0, 0), "Destroyer"),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.resolve(d(1, 0, 0, 0, 0, 0)).as_str(), "Frigate");
    }

    #[test]
    fn exact_match() {
        let catalog = small_catalog();
        let (template, level) = catalog.resolve_with_level(d(1, 2, 0, 20, 0, 0));

        assert_eq!(template.as_str(), "Jaguar");
        assert_eq!(level, Resolution::Exact);
    }

    #[test]
    fn generalizes_down_to_category() {
        let catalog = small_catalog();
        let (template, level) = catalog.resolve_with_level(d(1, 2, 225, 20, 2, 10));

        assert_eq!(template.as_str(), "Jaguar");
        assert_eq!(level, Resolution::Generalized(TypeField::Country));
    }

    #[test]
    fn generalizes_down_to_kind() {
        let catalog = small_catalog();

        assert_eq!(catalog.resolve(d(1, 3, 225, 4, 1, 1)).as_str(), "Frigate");
    }

    #[test]
    fn unmatched_kind_resolves_to_fallback_entry() {
        let catalog = small_catalog();

        assert_eq!(catalog.resolve(d(9, 9, 9, 9, 9, 9)).as_str(), "Unknown");
    }

    #[test]
    fn fallback_without_unknown_entry_is_first_entry() {
        let catalog = TypeCatalog::new([
            CatalogEntry::new(d(2, 0, 0, 0, 0, 0), "Munition"),
            CatalogEntry::new(d(1, 0, 0, 0, 0, 0), "Frigate"),
        ])
        .unwrap();
        let (template, level) = catalog.resolve_with_level(d(3, 1, 1, 1, 1, 1));

        assert_eq!(template.as_str(), "Frigate");
        assert_eq!(level, Resolution::Fallback);
    }

    #[test]
    fn catalog_entry_from_json() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{"kind": 1, "domain": 2, "category": 20, "template": "SepecatJaguar"}"#)
                .unwrap();

        assert_eq!(entry.descriptor, d(1, 2, 0, 20, 0, 0));
        assert_eq!(entry.template.as_str(), "SepecatJaguar");
    }

    fn arb_descriptor() -> impl Strategy<Value = EntityTypeDescriptor> {
        (
            0u8..4,
            0u8..4,
            prop_oneof![Just(0u16), Just(225u16), Just(13u16)],
            0u8..25,
            0u8..4,
            0u8..12,
            0u8..3,
        )
            .prop_map(|(kind, domain, country, category, sub, specific, extra)| {
                EntityTypeDescriptor::new(kind, domain, country, category, sub, specific, extra)
            })
    }

    proptest! {
        #[test]
        fn every_catalog_descriptor_resolves_to_itself(
            descriptors in prop::collection::btree_set(arb_descriptor(), 1..64)
        ) {
            let entries: Vec<CatalogEntry> = descriptors
                .iter()
                .rev()
                .map(|descriptor| CatalogEntry::new(*descriptor, TemplateId::new(descriptor.to_string())))
                .collect();
            let catalog = TypeCatalog::new(entries).unwrap();

            prop_assert!(
                catalog
                    .entries()
                    .windows(2)
                    .all(|pair| pair[0].descriptor <= pair[1].descriptor)
            );
            for descriptor in &descriptors {
                prop_assert_eq!(catalog.resolve(*descriptor).as_str(), descriptor.to_string());
            }
        }

        #[test]
        fn resolution_never_picks_a_more_specific_entry(
            descriptors in prop::collection::btree_set(arb_descriptor(), 1..64),
            query in arb_descriptor(),
        ) {
            let entries: Vec<CatalogEntry> = descriptors
                .iter()
                .map(|descriptor| CatalogEntry::new(*descriptor, TemplateId::new(descriptor.to_string())))
                .collect();
            let catalog = TypeCatalog::new(entries).unwrap();

            let (template, level) = catalog.resolve_with_level(query);
            match level {
                Resolution::Exact => prop_assert_eq!(template.as_str(), query.to_string()),
                Resolution::Generalized(_) => {
                    let candidates: Vec<String> =
                        query.generalizations().map(|key| key.to_string()).collect();
                    prop_assert!(candidates.iter().any(|key| key == template.as_str()));
                }
                Resolution::Fallback => prop_assert_eq!(template, catalog.fallback()),
            }
        }
    }
}
