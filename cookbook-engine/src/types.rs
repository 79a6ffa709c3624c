//! Core recipe types
//!
//! Defines the canonical `Recipe` shape shared by both sources, its
//! `Ingredient` list, and the single-dimension `Filter` used for queries.

use cookbook_common::time::now_millis;
use serde::{Deserialize, Serialize};

// ============================================================================
// Ingredient
// ============================================================================

/// One line of a recipe's ingredient list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// Free-form quantity ("2", "1 cup", "pinch")
    pub amount: String,
    /// Free-form unit, empty for catalog-derived ingredients
    #[serde(default)]
    pub unit: String,
    /// True when entered by the user rather than derived from the catalog
    #[serde(default, rename = "isCustom")]
    pub custom: bool,
}

impl Ingredient {
    /// Catalog-derived ingredient (custom = false)
    pub fn new(
        name: impl Into<String>,
        amount: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            unit: unit.into(),
            custom: false,
        }
    }

    /// User-entered ingredient (custom = true)
    pub fn custom(
        name: impl Into<String>,
        amount: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            custom: true,
            ..Self::new(name, amount, unit)
        }
    }
}

// ============================================================================
// Recipe
// ============================================================================

/// Canonical recipe representation shared by the store and the catalog
///
/// Invariants:
/// - `imported_from_catalog == false` implies `owner_id.is_some()` once persisted
/// - `favorite == true` implies `id.is_some()` (catalog favorites are promoted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Authoritative store id; `None` until persisted
    pub id: Option<String>,
    /// External catalog id for catalog-derived recipes
    pub catalog_id: Option<String>,
    pub title: String,
    pub category: String,
    /// Cuisine/area reported by the catalog
    pub area: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    pub image_url: Option<String>,
    /// Owning user; `None` for catalog items before promotion
    pub owner_id: Option<String>,
    pub favorite: bool,
    /// Creation wall-clock time, Unix milliseconds
    pub created_at: i64,
    /// True when the recipe was converted from a catalog record
    pub imported_from_catalog: bool,
}

impl Recipe {
    /// New user-authored recipe (owner set, provenance false, not yet persisted)
    pub fn authored(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        ingredients: Vec<Ingredient>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            catalog_id: None,
            title: title.into(),
            category: category.into(),
            area: None,
            ingredients,
            instructions: instructions.into(),
            image_url: None,
            owner_id: Some(owner_id.into()),
            favorite: false,
            created_at: now_millis(),
            imported_from_catalog: false,
        }
    }

    /// Identifier used in events: store id when persisted, else catalog id
    pub fn key(&self) -> String {
        self.id
            .clone()
            .or_else(|| self.catalog_id.clone())
            .unwrap_or_default()
    }

    /// True once the recipe has a row in the authoritative store
    pub fn is_persisted(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// True when the recipe exists only in the catalog (never promoted)
    pub fn is_catalog_only(&self) -> bool {
        self.imported_from_catalog && !self.is_persisted()
    }
}

// ============================================================================
// Filter
// ============================================================================

/// Filter dimension; only one is active per query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterType {
    Category,
    Area,
    Ingredient,
    FreeText,
}

impl std::fmt::Display for FilterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterType::Category => write!(f, "Category"),
            FilterType::Area => write!(f, "Area"),
            FilterType::Ingredient => write!(f, "Ingredient"),
            FilterType::FreeText => write!(f, "FreeText"),
        }
    }
}

/// A single-dimension query filter
///
/// When both are present, `values[0] == value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub filter_type: FilterType,
    pub value: Option<String>,
    pub values: Vec<String>,
}

impl Filter {
    /// Single-value filter
    pub fn new(filter_type: FilterType, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            filter_type,
            values: vec![value.clone()],
            value: Some(value),
        }
    }

    /// Multi-select filter; the first value becomes the primary value
    pub fn with_values(filter_type: FilterType, values: Vec<String>) -> Self {
        Self {
            filter_type,
            value: values.first().cloned(),
            values,
        }
    }

    pub fn by_category(category: impl Into<String>) -> Self {
        Self::new(FilterType::Category, category)
    }

    pub fn by_area(area: impl Into<String>) -> Self {
        Self::new(FilterType::Area, area)
    }

    pub fn by_ingredient(ingredient: impl Into<String>) -> Self {
        Self::new(FilterType::Ingredient, ingredient)
    }

    pub fn by_text(query: impl Into<String>) -> Self {
        Self::new(FilterType::FreeText, query)
    }

    /// The catalog has no vegan category; Vegetarian is the closest match
    pub fn vegan_only() -> Self {
        Self::by_category("Vegetarian")
    }

    pub fn vegetarian_only() -> Self {
        Self::by_category("Vegetarian")
    }

    pub fn gluten_free_only() -> Self {
        Self::by_category("Miscellaneous")
    }

    /// Primary value when non-blank
    pub fn active_value(&self) -> Option<&str> {
        self.value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    pub fn is_active(&self) -> bool {
        self.active_value().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_values_uses_first_as_primary() {
        let filter = Filter::with_values(
            FilterType::Area,
            vec!["Italian".to_string(), "French".to_string()],
        );
        assert_eq!(filter.value.as_deref(), Some("Italian"));
        assert_eq!(filter.values[0], "Italian");
    }

    #[test]
    fn test_with_empty_values_has_no_primary() {
        let filter = Filter::with_values(FilterType::Category, vec![]);
        assert!(filter.value.is_none());
        assert!(!filter.is_active());
    }

    #[test]
    fn test_blank_value_is_inactive() {
        assert!(!Filter::by_category("   ").is_active());
        assert_eq!(Filter::by_category(" Dessert ").active_value(), Some("Dessert"));
    }

    #[test]
    fn test_dietary_presets() {
        assert_eq!(Filter::vegan_only(), Filter::by_category("Vegetarian"));
        assert_eq!(Filter::vegetarian_only().active_value(), Some("Vegetarian"));
        assert_eq!(Filter::gluten_free_only().active_value(), Some("Miscellaneous"));
    }

    #[test]
    fn test_authored_recipe_shape() {
        let recipe = Recipe::authored("u1", "Soup", "Starter", vec![], "Boil.");
        assert_eq!(recipe.owner_id.as_deref(), Some("u1"));
        assert!(!recipe.imported_from_catalog);
        assert!(!recipe.favorite);
        assert!(!recipe.is_persisted());
        assert!(recipe.created_at > 0);
    }

    #[test]
    fn test_key_prefers_store_id() {
        let mut recipe = Recipe::authored("u1", "Soup", "Starter", vec![], "");
        recipe.catalog_id = Some("52772".to_string());
        assert_eq!(recipe.key(), "52772");
        recipe.id = Some("store-1".to_string());
        assert_eq!(recipe.key(), "store-1");
    }

    #[test]
    fn test_ingredient_serde_uses_is_custom() {
        let json = serde_json::to_value(Ingredient::custom("Salt", "1", "tsp")).unwrap();
        assert_eq!(json["isCustom"], true);
    }
}
