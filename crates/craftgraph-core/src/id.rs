use serde::{Serialize, Serializer};
use std::fmt;

slotmap::new_key_type! {
    /// Identifies a recipe in the graph's recipe arena. Stable across
    /// overwrites of the same recipe key.
    pub struct RecipeId;
}

/// Canonical material type, as produced by the material lookup table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MaterialType(pub String);

impl MaterialType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a canonical item: material type plus variant.
///
/// Rendered (and serialized) as `TYPE:variant`, e.g. `IRON_INGOT:0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemKey {
    pub item_type: MaterialType,
    pub variant: u32,
}

impl ItemKey {
    pub fn new(item_type: impl Into<String>, variant: u32) -> Self {
        Self {
            item_type: MaterialType::new(item_type),
            variant,
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.item_type, self.variant)
    }
}

impl Serialize for ItemKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
