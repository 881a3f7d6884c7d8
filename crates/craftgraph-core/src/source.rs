//! Typed recipe source model.
//!
//! A [`RecipeSource`] is the validated form of one raw input document. Raw
//! documents are parsed elsewhere (see `craftgraph-data`) and must pass
//! through [`RecipeDef::new`] and [`RecipeKind::classify`], so a malformed
//! recipe fails here instead of deep inside a merge.

use crate::id::{ItemKey, MaterialType};
use serde::Serialize;
use std::collections::BTreeMap;

/// Type tag that marks a recipe as a factory upgrade.
pub const UPGRADE_TAG: &str = "UPGRADE";

/// First word of a recipe name that marks it as a downgrade.
pub const DOWNGRADE_PREFIX: &str = "Downgrade";

// ===========================================================================
// Errors
// ===========================================================================

/// Structural problems found while validating a raw recipe source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// An UPGRADE recipe does not name the factory it produces.
    #[error("upgrade recipe '{recipe}' has no target factory")]
    MissingUpgradeTarget { recipe: String },

    /// A factory has an empty display name.
    #[error("factory '{factory}' has an empty name")]
    EmptyFactoryName { factory: String },
}

// ===========================================================================
// Documents
// ===========================================================================

/// One validated input document: factories and recipes, each keyed.
#[derive(Debug, Clone, Default)]
pub struct RecipeSource {
    pub factories: BTreeMap<String, FactoryDef>,
    pub recipes: BTreeMap<String, RecipeDef>,
}

impl RecipeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_factory(mut self, key: impl Into<String>, factory: FactoryDef) -> Self {
        self.factories.insert(key.into(), factory);
        self
    }

    pub fn with_recipe(mut self, key: impl Into<String>, recipe: RecipeDef) -> Self {
        self.recipes.insert(key.into(), recipe);
        self
    }
}

/// A factory as declared by a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryDef {
    pub name: String,
    /// Recipe keys this factory can run, in declaration order.
    pub recipes: Vec<String>,
}

impl FactoryDef {
    pub fn new(
        key: &str,
        name: impl Into<String>,
        recipes: Vec<String>,
    ) -> Result<Self, SourceError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SourceError::EmptyFactoryName {
                factory: key.to_string(),
            });
        }
        Ok(Self { name, recipes })
    }
}

/// What a recipe does to factories, derived from its type tag and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RecipeKind {
    /// Any recipe that is neither an upgrade nor a downgrade.
    Craft,
    /// Advances a factory to the factory with display name `target`.
    Upgrade { target: String },
    /// Named "Downgrade ...". Never assigned as a factory upgrade.
    Downgrade { target: Option<String> },
}

impl RecipeKind {
    /// Classify a recipe. A "Downgrade" first word wins over the type tag.
    pub fn classify(
        key: &str,
        type_tag: &str,
        name: &str,
        factory: Option<&str>,
    ) -> Result<Self, SourceError> {
        if name.split(' ').next() == Some(DOWNGRADE_PREFIX) {
            return Ok(RecipeKind::Downgrade {
                target: factory.map(str::to_string),
            });
        }
        if type_tag == UPGRADE_TAG {
            return match factory {
                Some(target) if !target.is_empty() => Ok(RecipeKind::Upgrade {
                    target: target.to_string(),
                }),
                _ => Err(SourceError::MissingUpgradeTarget {
                    recipe: key.to_string(),
                }),
            };
        }
        Ok(RecipeKind::Craft)
    }

    pub fn is_downgrade(&self) -> bool {
        matches!(self, RecipeKind::Downgrade { .. })
    }

    /// Target factory display name of an upgrade recipe.
    pub fn upgrade_target(&self) -> Option<&str> {
        match self {
            RecipeKind::Upgrade { target } => Some(target),
            _ => None,
        }
    }
}

/// A recipe as declared by a source.
#[derive(Debug, Clone)]
pub struct RecipeDef {
    pub name: String,
    /// Raw type tag, e.g. `PRODUCTION` or `UPGRADE`.
    pub type_tag: String,
    pub kind: RecipeKind,
    pub input: Vec<RecipeItemRef>,
    pub output: Option<Vec<RecipeItemRef>>,
}

impl RecipeDef {
    pub fn new(
        key: &str,
        type_tag: impl Into<String>,
        name: impl Into<String>,
        factory: Option<&str>,
        input: Vec<RecipeItemRef>,
        output: Option<Vec<RecipeItemRef>>,
    ) -> Result<Self, SourceError> {
        let type_tag = type_tag.into();
        let name = name.into();
        let kind = RecipeKind::classify(key, &type_tag, &name, factory)?;
        Ok(Self {
            name,
            type_tag,
            kind,
            input,
            output,
        })
    }
}

// ===========================================================================
// Recipe lines
// ===========================================================================

/// One quantity line inside a recipe's input or output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeItemRef {
    /// Slot key the line was declared under.
    pub slot: String,
    /// Raw material string, e.g. `IRON_INGOT`.
    pub material: String,
    /// Raw variant. `-1` accepts any variant; absent means 0.
    pub durability: Option<i32>,
    pub amount: u32,
    /// Custom display name carried by the raw item.
    pub custom_name: Option<String>,
    pub lore: Vec<String>,
    /// Filled in by the merge once the line has been resolved.
    pub resolved: Option<ResolvedItem>,
}

/// Raw variant value meaning "any variant accepted".
pub const WILDCARD_VARIANT: i32 = -1;

impl RecipeItemRef {
    pub fn new(slot: impl Into<String>, material: impl Into<String>, amount: u32) -> Self {
        Self {
            slot: slot.into(),
            material: material.into(),
            durability: None,
            amount,
            custom_name: None,
            lore: Vec::new(),
            resolved: None,
        }
    }

    pub fn with_durability(mut self, durability: i32) -> Self {
        self.durability = Some(durability);
        self
    }

    pub fn with_custom_name(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }

    pub fn with_lore(mut self, lore: Vec<String>) -> Self {
        self.lore = lore;
        self
    }

    /// Whether the raw variant is the "any variant" wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.durability == Some(WILDCARD_VARIANT)
    }

    /// Variant used for lookup: negative or absent values become 0.
    pub fn canonical_variant(&self) -> u32 {
        self.durability.unwrap_or(0).max(0) as u32
    }

    /// Canonical item key, once resolved.
    pub fn item_key(&self) -> Option<ItemKey> {
        self.resolved.as_ref().map(ResolvedItem::key)
    }
}

/// Canonical identity and display name of a resolved line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedItem {
    pub item_type: MaterialType,
    pub variant: u32,
    pub display_name: String,
}

impl ResolvedItem {
    pub fn key(&self) -> ItemKey {
        ItemKey {
            item_type: self.item_type.clone(),
            variant: self.variant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_plain_craft() {
        let kind = RecipeKind::classify("r", "PRODUCTION", "Smelt Iron", None).unwrap();
        assert_eq!(kind, RecipeKind::Craft);
    }

    #[test]
    fn classify_upgrade_requires_target() {
        let kind =
            RecipeKind::classify("r", "UPGRADE", "Upgrade to Forge", Some("Forge")).unwrap();
        assert_eq!(kind.upgrade_target(), Some("Forge"));

        let err = RecipeKind::classify("r", "UPGRADE", "Upgrade to Forge", None).unwrap_err();
        assert_eq!(
            err,
            SourceError::MissingUpgradeTarget {
                recipe: "r".to_string()
            }
        );
    }

    #[test]
    fn downgrade_prefix_wins_over_upgrade_tag() {
        let kind =
            RecipeKind::classify("r", "UPGRADE", "Downgrade to Smelter", Some("Smelter")).unwrap();
        assert!(kind.is_downgrade());
        assert_eq!(kind.upgrade_target(), None);
    }

    #[test]
    fn downgrade_needs_exact_first_word() {
        let kind = RecipeKind::classify("r", "PRODUCTION", "Downgraded Ore", None).unwrap();
        assert_eq!(kind, RecipeKind::Craft);
    }

    #[test]
    fn empty_recipe_name_is_accepted() {
        let def = RecipeDef::new("r1", "PRODUCTION", "", None, vec![], None).unwrap();
        assert_eq!(def.name, "");
        assert_eq!(def.kind, RecipeKind::Craft);
    }

    #[test]
    fn empty_factory_name_rejected() {
        let err = FactoryDef::new("f1", "", vec![]).unwrap_err();
        assert!(format!("{err}").contains("f1"));
    }

    #[test]
    fn canonical_variant_clamps_negative_and_absent() {
        let any = RecipeItemRef::new("a", "WOOL", 1).with_durability(-1);
        assert_eq!(any.canonical_variant(), 0);
        assert!(any.is_wildcard());

        let absent = RecipeItemRef::new("a", "WOOL", 1);
        assert_eq!(absent.canonical_variant(), 0);
        assert!(!absent.is_wildcard());

        let odd = RecipeItemRef::new("a", "WOOL", 1).with_durability(-5);
        assert_eq!(odd.canonical_variant(), 0);
        assert!(!odd.is_wildcard());

        let orange = RecipeItemRef::new("a", "WOOL", 1).with_durability(1);
        assert_eq!(orange.canonical_variant(), 1);
    }

    #[test]
    fn source_builder_collects_entries() {
        let source = RecipeSource::new()
            .with_factory("F1", FactoryDef::new("F1", "Smelter", vec!["R1".into()]).unwrap())
            .with_recipe(
                "R1",
                RecipeDef::new("R1", "PRODUCTION", "Smelt Iron", None, vec![], None).unwrap(),
            );
        assert_eq!(source.factories.len(), 1);
        assert_eq!(source.recipes.len(), 1);
    }
}
