//! Catalog raw record
//!
//! The catalog's flat meal shape: scalar fields plus twenty positional
//! `strIngredientN` / `strMeasureN` pairs. The slots are collected into
//! fixed-size arrays here and only the normalizer reads them.

use serde::Deserialize;
use std::collections::HashMap;

/// Number of positional ingredient/measure slots in a catalog record
pub const INGREDIENT_SLOTS: usize = 20;

/// One meal as returned by the catalog, before normalization
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawCatalogRecord")]
pub struct CatalogRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
    /// `strIngredient1..20`, slot 1 at index 0
    pub ingredients: [Option<String>; INGREDIENT_SLOTS],
    /// `strMeasure1..20`, slot 1 at index 0
    pub measures: [Option<String>; INGREDIENT_SLOTS],
}

impl CatalogRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    /// Fill a 1-based slot. Out-of-range slots are ignored.
    pub fn with_slot(mut self, slot: usize, name: Option<&str>, measure: Option<&str>) -> Self {
        if (1..=INGREDIENT_SLOTS).contains(&slot) {
            self.ingredients[slot - 1] = name.map(str::to_string);
            self.measures[slot - 1] = measure.map(str::to_string);
        }
        self
    }
}

#[derive(Deserialize)]
struct RawCatalogRecord {
    #[serde(rename = "idMeal")]
    id: Option<String>,
    #[serde(rename = "strMeal")]
    title: Option<String>,
    #[serde(rename = "strCategory")]
    category: Option<String>,
    #[serde(rename = "strArea")]
    area: Option<String>,
    #[serde(rename = "strInstructions")]
    instructions: Option<String>,
    #[serde(rename = "strMealThumb")]
    image_url: Option<String>,
    #[serde(flatten)]
    rest: HashMap<String, serde_json::Value>,
}

impl From<RawCatalogRecord> for CatalogRecord {
    fn from(raw: RawCatalogRecord) -> Self {
        let slot = |prefix: &str, index: usize| -> Option<String> {
            raw.rest
                .get(&format!("{}{}", prefix, index + 1))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };

        let ingredients = std::array::from_fn(|i| slot("strIngredient", i));
        let measures = std::array::from_fn(|i| slot("strMeasure", i));

        Self {
            id: raw.id,
            title: raw.title,
            category: raw.category,
            area: raw.area,
            instructions: raw.instructions,
            image_url: raw.image_url,
            ingredients,
            measures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_positional_slots() {
        let json = r#"{
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strInstructions": "Preheat oven.",
            "strMealThumb": "https://example.test/t.jpg",
            "strIngredient1": "soy sauce",
            "strIngredient2": "water",
            "strIngredient3": "",
            "strIngredient20": null,
            "strMeasure1": "3/4 cup",
            "strMeasure2": "1/2 cup",
            "strMeasure3": " ",
            "strSource": null,
            "dateModified": null
        }"#;

        let record: CatalogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id.as_deref(), Some("52772"));
        assert_eq!(record.area.as_deref(), Some("Japanese"));
        assert_eq!(record.ingredients[0].as_deref(), Some("soy sauce"));
        assert_eq!(record.measures[1].as_deref(), Some("1/2 cup"));
        assert_eq!(record.ingredients[2].as_deref(), Some(""));
        assert!(record.ingredients[19].is_none());
        assert!(record.measures[5].is_none());
    }

    #[test]
    fn test_filter_endpoint_shape_has_no_slots() {
        // filter.php only returns id, title and thumbnail
        let json = r#"{"strMeal":"Chick-Fil-A Sandwich","strMealThumb":"x.jpg","idMeal":"53016"}"#;
        let record: CatalogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title.as_deref(), Some("Chick-Fil-A Sandwich"));
        assert!(record.category.is_none());
        assert!(record.ingredients.iter().all(Option::is_none));
    }

    #[test]
    fn test_with_slot_ignores_out_of_range() {
        let record = CatalogRecord::new("1", "Soup")
            .with_slot(0, Some("salt"), None)
            .with_slot(21, Some("pepper"), None)
            .with_slot(20, Some("water"), Some("1 l"));
        assert!(record.ingredients[..19].iter().all(Option::is_none));
        assert_eq!(record.ingredients[19].as_deref(), Some("water"));
    }
}
