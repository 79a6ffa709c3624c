//! Recipe table operations

use crate::error::StoreError;
use crate::types::{Ingredient, Recipe};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

/// Upper bound appended to a prefix for a sorted range scan
///
/// Private-use code point that sorts after ordinary text.
pub const PREFIX_RANGE_END: char = '\u{f8ff}';

/// Owner-scoped predicate for reading recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipePredicate {
    Owner,
    /// `title >= prefix AND title <= prefix + U+F8FF` (case-sensitive)
    TitlePrefix(String),
    Category(String),
    /// Ingredient list contains an ingredient with this exact name
    Ingredient(String),
    Favorites,
}

#[derive(Debug, FromRow)]
struct RecipeRow {
    id: String,
    catalog_id: Option<String>,
    title: String,
    category: String,
    area: Option<String>,
    ingredients: String,
    instructions: String,
    image_url: Option<String>,
    user_id: Option<String>,
    favorite: bool,
    created_at: i64,
    imported_from_catalog: bool,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = StoreError;

    fn try_from(row: RecipeRow) -> Result<Self, Self::Error> {
        let ingredients: Vec<Ingredient> = serde_json::from_str(&row.ingredients)
            .map_err(|e| StoreError::Corrupt(format!("recipe {} ingredients: {}", row.id, e)))?;

        Ok(Recipe {
            id: Some(row.id),
            catalog_id: row.catalog_id,
            title: row.title,
            category: row.category,
            area: row.area,
            ingredients,
            instructions: row.instructions,
            image_url: row.image_url,
            owner_id: row.user_id,
            favorite: row.favorite,
            created_at: row.created_at,
            imported_from_catalog: row.imported_from_catalog,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, catalog_id, title, category, area, ingredients, \
     instructions, image_url, user_id, favorite, created_at, imported_from_catalog FROM recipes";

/// Load an owner's recipes matching `predicate`
pub async fn query_recipes(
    pool: &SqlitePool,
    owner_id: &str,
    predicate: &RecipePredicate,
) -> Result<Vec<Recipe>, StoreError> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_COLUMNS);
    builder.push(" WHERE user_id = ").push_bind(owner_id.to_string());

    match predicate {
        RecipePredicate::Owner => {
            builder.push(" ORDER BY created_at, id");
        }
        RecipePredicate::TitlePrefix(prefix) => {
            builder
                .push(" AND title >= ")
                .push_bind(prefix.clone())
                .push(" AND title <= ")
                .push_bind(format!("{}{}", prefix, PREFIX_RANGE_END))
                .push(" ORDER BY title, id");
        }
        RecipePredicate::Category(category) => {
            builder
                .push(" AND category = ")
                .push_bind(category.clone())
                .push(" ORDER BY created_at, id");
        }
        RecipePredicate::Ingredient(name) => {
            builder
                .push(
                    " AND EXISTS (SELECT 1 FROM json_each(recipes.ingredients) AS item \
                     WHERE json_extract(item.value, '$.name') = ",
                )
                .push_bind(name.clone())
                .push(") ORDER BY created_at, id");
        }
        RecipePredicate::Favorites => {
            builder.push(" AND favorite = 1 ORDER BY created_at, id");
        }
    }

    let rows = builder
        .build_query_as::<RecipeRow>()
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(Recipe::try_from).collect()
}

/// Load one recipe by id
pub async fn load_recipe(pool: &SqlitePool, id: &str) -> Result<Option<Recipe>, StoreError> {
    let row: Option<RecipeRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(Recipe::try_from).transpose()
}

/// Write `recipe` under `id`, replacing any existing row
pub async fn save_recipe(pool: &SqlitePool, id: &str, recipe: &Recipe) -> Result<(), StoreError> {
    let ingredients = serde_json::to_string(&recipe.ingredients)
        .map_err(|e| StoreError::Corrupt(format!("serialize ingredients: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO recipes (
            id, catalog_id, title, category, area, ingredients, instructions,
            image_url, user_id, favorite, created_at, imported_from_catalog
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            catalog_id = excluded.catalog_id,
            title = excluded.title,
            category = excluded.category,
            area = excluded.area,
            ingredients = excluded.ingredients,
            instructions = excluded.instructions,
            image_url = excluded.image_url,
            user_id = excluded.user_id,
            favorite = excluded.favorite,
            created_at = excluded.created_at,
            imported_from_catalog = excluded.imported_from_catalog
        "#,
    )
    .bind(id)
    .bind(&recipe.catalog_id)
    .bind(&recipe.title)
    .bind(&recipe.category)
    .bind(&recipe.area)
    .bind(ingredients)
    .bind(&recipe.instructions)
    .bind(&recipe.image_url)
    .bind(&recipe.owner_id)
    .bind(recipe.favorite)
    .bind(recipe.created_at)
    .bind(recipe.imported_from_catalog)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update only the favorite column of one of `owner_id`'s rows
///
/// A row owned by someone else is reported as not found.
pub async fn update_favorite(
    pool: &SqlitePool,
    owner_id: &str,
    id: &str,
    favorite: bool,
) -> Result<(), StoreError> {
    let result = sqlx::query("UPDATE recipes SET favorite = ? WHERE id = ? AND user_id = ?")
        .bind(favorite)
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(id.to_string()));
    }
    Ok(())
}

/// Delete one of `owner_id`'s rows; deleting a missing row is not an error
///
/// Rows owned by someone else are left untouched.
pub async fn delete_recipe(
    pool: &SqlitePool,
    owner_id: &str,
    id: &str,
) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM recipes WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(())
}
