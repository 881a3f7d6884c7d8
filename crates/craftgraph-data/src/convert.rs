//! Validation of raw data structs into `craftgraph_core` types.

use craftgraph_core::id::MaterialType;
use craftgraph_core::lookup::{ItemMeta, ItemNameTable, MaterialTable};
use craftgraph_core::source::{FactoryDef, RecipeDef, RecipeItemRef, RecipeSource, SourceError};
use std::collections::BTreeMap;

use crate::schema::*;

/// Validate a raw source document.
pub fn recipe_source_from_data(data: RecipeSourceData) -> Result<RecipeSource, SourceError> {
    let mut source = RecipeSource::new();

    for (key, factory) in data.factories {
        let def = FactoryDef::new(&key, factory.name, factory.recipes)?;
        source.factories.insert(key, def);
    }

    for (key, recipe) in data.recipes {
        let input = lines_from_data(recipe.input);
        let output = recipe.output.map(lines_from_data);
        let def = RecipeDef::new(
            &key,
            recipe.type_tag,
            recipe.name,
            recipe.factory.as_deref(),
            input,
            output,
        )?;
        source.recipes.insert(key, def);
    }

    Ok(source)
}

fn lines_from_data(lines: BTreeMap<String, RecipeItemData>) -> Vec<RecipeItemRef> {
    lines
        .into_iter()
        .map(|(slot, item)| {
            let mut line =
                RecipeItemRef::new(slot, item.material, item.amount).with_lore(item.lore);
            line.durability = item.durability;
            line.custom_name = item.name;
            line
        })
        .collect()
}

pub fn material_table_from_data(data: MaterialsData) -> MaterialTable {
    data.into_iter()
        .map(|(material, item_type)| (material, MaterialType::new(item_type)))
        .collect()
}

pub fn item_name_table_from_data(data: Vec<ItemNameData>) -> ItemNameTable {
    data.into_iter()
        .map(|entry| ItemMeta::new(entry.item_type, entry.meta, entry.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftgraph_core::source::RecipeKind;

    fn parse(json: &str) -> Result<RecipeSource, SourceError> {
        recipe_source_from_data(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn converts_lines_with_slots_and_extras() {
        let source = parse(
            r#"{"recipes": {"R1": {
                "type": "CRAFT",
                "name": "Write Charter",
                "input": {"p": {"material": "PAPER", "amount": 3}},
                "output": {"c": {"material": "PAPER", "amount": 1, "durability": -1,
                                 "name": "Charter", "lore": ["Sealed"]}}
            }}}"#,
        )
        .unwrap();

        let r1 = &source.recipes["R1"];
        assert_eq!(r1.kind, RecipeKind::Craft);
        assert_eq!(r1.input[0].slot, "p");
        assert_eq!(r1.input[0].amount, 3);
        let out = &r1.output.as_ref().unwrap()[0];
        assert!(out.is_wildcard());
        assert_eq!(out.custom_name.as_deref(), Some("Charter"));
        assert_eq!(out.lore, vec!["Sealed".to_string()]);
    }

    #[test]
    fn upgrade_without_factory_fails_fast() {
        let err = parse(r#"{"recipes": {"UP": {"type": "UPGRADE", "name": "Upgrade to Forge"}}}"#)
            .unwrap_err();
        assert_eq!(
            err,
            SourceError::MissingUpgradeTarget {
                recipe: "UP".to_string()
            }
        );
    }

    #[test]
    fn downgrade_classified_from_name() {
        let source = parse(
            r#"{"recipes": {"D": {"type": "UPGRADE", "name": "Downgrade to Smelter", "factory": "Smelter"}}}"#,
        )
        .unwrap();
        assert!(source.recipes["D"].kind.is_downgrade());
        assert_eq!(source.recipes["D"].type_tag, "UPGRADE");
    }

    #[test]
    fn empty_factory_name_rejected() {
        let err = parse(r#"{"factories": {"F1": {"name": ""}}}"#).unwrap_err();
        assert!(matches!(err, SourceError::EmptyFactoryName { .. }));
    }

    #[test]
    fn tables_from_data() {
        let mut materials = MaterialsData::new();
        materials.insert("REDSTONE_LAMP_OFF".to_string(), "123".to_string());
        let table = material_table_from_data(materials);
        assert_eq!(table.get("REDSTONE_LAMP_OFF"), Some(&MaterialType::new("123")));

        let names = item_name_table_from_data(vec![ItemNameData {
            item_type: "123".to_string(),
            meta: 0,
            name: "Redstone Lamp".to_string(),
        }]);
        assert_eq!(
            names.lookup(&MaterialType::new("123"), 4).unwrap().name,
            "Redstone Lamp"
        );
    }
}
