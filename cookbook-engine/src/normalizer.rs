//! Ingredient normalization and catalog conversion
//!
//! Turns a catalog record's positional ingredient/measure slots into the
//! canonical ingredient list, and a whole record into a `Recipe`.
//!
//! # Rules
//! - Slots are read 1..20 in order; output order mirrors slot order
//! - A slot contributes iff its name is non-blank after trimming
//! - Amount is the trimmed measure, or `"1"` when the measure is blank/absent
//! - Unit is always empty and `custom` is false for catalog ingredients
//! - No contributing slot → one placeholder `Main Item / 1 / serving`

use crate::catalog::{CatalogRecord, INGREDIENT_SLOTS};
use crate::types::{Ingredient, Recipe};
use cookbook_common::time::now_millis;

/// Amount used when a slot has a name but no measure
pub const DEFAULT_AMOUNT: &str = "1";

pub const PLACEHOLDER_NAME: &str = "Main Item";
pub const PLACEHOLDER_AMOUNT: &str = "1";
pub const PLACEHOLDER_UNIT: &str = "serving";

/// Category given to catalog records that carry none
pub const DEFAULT_CATEGORY: &str = "Other";

/// Converts catalog records into canonical recipes
pub struct IngredientNormalizer;

impl IngredientNormalizer {
    /// Canonical, never-empty ingredient list for a catalog record
    pub fn normalize(record: &CatalogRecord) -> Vec<Ingredient> {
        let mut ingredients: Vec<Ingredient> = (0..INGREDIENT_SLOTS)
            .filter_map(|slot| {
                let name = non_blank(record.ingredients[slot].as_deref())?;
                let amount = non_blank(record.measures[slot].as_deref()).unwrap_or(DEFAULT_AMOUNT);
                Some(Ingredient::new(name, amount, ""))
            })
            .collect();

        if ingredients.is_empty() {
            ingredients.push(Self::placeholder());
        }
        ingredients
    }

    pub fn placeholder() -> Ingredient {
        Ingredient::new(PLACEHOLDER_NAME, PLACEHOLDER_AMOUNT, PLACEHOLDER_UNIT)
    }

    /// Catalog record → `Recipe` (provenance true, no owner, not favorite)
    pub fn to_recipe(record: CatalogRecord) -> Recipe {
        let ingredients = Self::normalize(&record);
        Recipe {
            id: None,
            catalog_id: record.id,
            title: record.title.unwrap_or_default(),
            category: record
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            area: record.area,
            ingredients,
            instructions: record.instructions.unwrap_or_default(),
            image_url: record.image_url,
            owner_id: None,
            favorite: false,
            created_at: now_millis(),
            imported_from_catalog: true,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
