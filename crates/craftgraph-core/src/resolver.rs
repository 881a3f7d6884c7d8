use crate::lookup::LookupTables;
use crate::source::{RecipeItemRef, ResolvedItem};

/// Raw material names with no table entry of their own, and the material
/// whose canonical type they share.
const MATERIAL_SYNONYMS: &[(&str, &str)] = &[("REDSTONE_LAMP", "REDSTONE_LAMP_OFF")];

/// Display name prefix for wildcard-variant lines.
const WILDCARD_PREFIX: &str = "Any ";

/// Fatal failures while resolving a raw recipe line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("unknown material '{material}' in recipe item {item:?}")]
    UnknownMaterial { material: String, item: RecipeItemRef },

    #[error("unknown item type/variant {item_type}:{variant} in recipe item {item:?}")]
    UnknownItem {
        item_type: String,
        variant: u32,
        item: RecipeItemRef,
    },
}

/// Resolves raw recipe lines to canonical type, variant and display name.
#[derive(Debug, Clone, Copy)]
pub struct MaterialResolver<'t> {
    tables: &'t LookupTables,
}

impl<'t> MaterialResolver<'t> {
    pub fn new(tables: &'t LookupTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'t LookupTables {
        self.tables
    }

    pub fn resolve(&self, item: &RecipeItemRef) -> Result<ResolvedItem, ResolveError> {
        let item_type = self
            .tables
            .materials
            .get(&item.material)
            .or_else(|| {
                MATERIAL_SYNONYMS
                    .iter()
                    .find(|(alias, _)| *alias == item.material)
                    .and_then(|(_, canonical)| self.tables.materials.get(canonical))
            })
            .ok_or_else(|| ResolveError::UnknownMaterial {
                material: item.material.clone(),
                item: item.clone(),
            })?;

        let variant = item.canonical_variant();
        let meta = self
            .tables
            .item_names
            .lookup(item_type, variant)
            .ok_or_else(|| ResolveError::UnknownItem {
                item_type: item_type.to_string(),
                variant,
                item: item.clone(),
            })?;

        let display_name = if item.is_wildcard() {
            format!("{WILDCARD_PREFIX}{}", meta.name)
        } else {
            meta.name.clone()
        };

        Ok(ResolvedItem {
            item_type: item_type.clone(),
            variant,
            display_name,
        })
    }
}
