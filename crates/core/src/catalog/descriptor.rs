use std::fmt;

use serde::{Deserialize, Serialize};

/// Seven-level DIS entity type code, most significant field first.
///
/// Field order matters: the derived `Ord` compares fields lexicographically in
/// declaration order, which is the sort and search key of the type catalog.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(default)]
pub struct EntityTypeDescriptor {
    pub kind: u8,
    pub domain: u8,
    pub country: u16,
    pub category: u8,
    pub subcategory: u8,
    pub specific: u8,
    pub extra: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeField {
    Kind,
    Domain,
    Country,
    Category,
    Subcategory,
    Specific,
    Extra,
}

/// Fields cleared one at a time when an exact lookup misses. Country is
/// relaxed before category.
pub const GENERALIZATION_ORDER: [TypeField; 7] = [
    TypeField::Extra,
    TypeField::Specific,
    TypeField::Subcategory,
    TypeField::Country,
    TypeField::Category,
    TypeField::Domain,
    TypeField::Kind,
];

impl EntityTypeDescriptor {
    pub const UNKNOWN: Self = Self::new(0, 0, 0, 0, 0, 0, 0);

    pub const fn new(
        kind: u8,
        domain: u8,
        country: u16,
        category: u8,
        subcategory: u8,
        specific: u8,
        extra: u8,
    ) -> Self {
        Self {
            kind,
            domain,
            country,
            category,
            subcategory,
            specific,
            extra,
        }
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }

    pub fn clear(&mut self, field: TypeField) {
        match field {
            TypeField::Kind => self.kind = 0,
            TypeField::Domain => self.domain = 0,
            TypeField::Country => self.country = 0,
            TypeField::Category => self.category = 0,
            TypeField::Subcategory => self.subcategory = 0,
            TypeField::Specific => self.specific = 0,
            TypeField::Extra => self.extra = 0,
        }
    }

    /// Successively broader search keys, one per entry of
    /// [`GENERALIZATION_ORDER`]. Each key keeps the fields cleared by the
    /// previous ones, so the last key is always all-zero.
    pub fn generalizations(self) -> impl Iterator<Item = Self> {
        GENERALIZATION_ORDER.iter().scan(self, |key, &field| {
            key.clear(field);
            Some(*key)
        })
    }
}

impl fmt::Display for EntityTypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}.{}.{}.{}",
            self.kind,
            self.domain,
            self.country,
            self.category,
            self.subcategory,
            self.specific,
            self.extra
        )
    }
}
