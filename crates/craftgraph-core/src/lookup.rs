//! Read-only lookup tables supplied by the host application.
//!
//! Two tables drive material resolution:
//!
//! - [`MaterialTable`]: raw material name -> canonical [`MaterialType`].
//! - [`ItemNameTable`]: (type, variant) -> display metadata, searchable by
//!   exact pair or by type alone (first entry wins).
//!
//! Both are built once and never mutated by the merge.

use crate::id::MaterialType;
use serde::Serialize;
use std::collections::HashMap;

// ===========================================================================
// Material table
// ===========================================================================

/// Maps raw material strings to canonical types.
#[derive(Debug, Clone, Default)]
pub struct MaterialTable {
    types: HashMap<String, MaterialType>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, material: impl Into<String>, item_type: MaterialType) {
        self.types.insert(material.into(), item_type);
    }

    pub fn get(&self, material: &str) -> Option<&MaterialType> {
        self.types.get(material)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, MaterialType)> for MaterialTable {
    fn from_iter<I: IntoIterator<Item = (S, MaterialType)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (material, item_type) in iter {
            table.insert(material, item_type);
        }
        table
    }
}

// ===========================================================================
// Item name table
// ===========================================================================

/// Display metadata for one (type, variant) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemMeta {
    pub item_type: MaterialType,
    pub variant: u32,
    pub name: String,
}

impl ItemMeta {
    pub fn new(item_type: impl Into<String>, variant: u32, name: impl Into<String>) -> Self {
        Self {
            item_type: MaterialType::new(item_type),
            variant,
            name: name.into(),
        }
    }
}

/// Ordered item metadata with exact and type-only indexes.
///
/// Entry order matters: when several entries share a type (or a type and
/// variant), the earliest one is the one returned.
#[derive(Debug, Clone, Default)]
pub struct ItemNameTable {
    entries: Vec<ItemMeta>,
    exact: HashMap<(MaterialType, u32), usize>,
    by_type: HashMap<MaterialType, usize>,
}

impl ItemNameTable {
    pub fn new(entries: Vec<ItemMeta>) -> Self {
        let mut exact = HashMap::new();
        let mut by_type = HashMap::new();
        for (idx, meta) in entries.iter().enumerate() {
            exact
                .entry((meta.item_type.clone(), meta.variant))
                .or_insert(idx);
            by_type.entry(meta.item_type.clone()).or_insert(idx);
        }
        Self {
            entries,
            exact,
            by_type,
        }
    }

    /// Entry for exactly this type and variant.
    pub fn find_exact(&self, item_type: &MaterialType, variant: u32) -> Option<&ItemMeta> {
        self.exact
            .get(&(item_type.clone(), variant))
            .map(|&idx| &self.entries[idx])
    }

    /// First entry with this type, whatever its variant.
    pub fn find_by_type(&self, item_type: &MaterialType) -> Option<&ItemMeta> {
        self.by_type.get(item_type).map(|&idx| &self.entries[idx])
    }

    /// Exact lookup, falling back to the first entry of the type.
    pub fn lookup(&self, item_type: &MaterialType, variant: u32) -> Option<&ItemMeta> {
        self.find_exact(item_type, variant)
            .or_else(|| self.find_by_type(item_type))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ItemMeta> for ItemNameTable {
    fn from_iter<I: IntoIterator<Item = ItemMeta>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ===========================================================================
// Combined
// ===========================================================================

/// Both lookup tables, as handed to the resolver.
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    pub materials: MaterialTable,
    pub item_names: ItemNameTable,
}

impl LookupTables {
    pub fn new(materials: MaterialTable, item_names: ItemNameTable) -> Self {
        Self {
            materials,
            item_names,
        }
    }
}
