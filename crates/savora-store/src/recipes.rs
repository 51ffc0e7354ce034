//! CRUD operations for [`Recipe`] records.

use rusqlite::params;
use uuid::Uuid;

use crate::database::{column_string_list, column_timestamp, column_uuid, Database};
use crate::error::{Result, StoreError};
use crate::models::Recipe;

impl Database {
    // ------------------------------------------------------------------
    // Create / Update
    // ------------------------------------------------------------------

    /// Insert a new recipe.
    pub fn insert_recipe(&self, recipe: &Recipe) -> Result<()> {
        self.conn().execute(
            "INSERT INTO recipes (id, name, image, category, description, ingredients, \
             instructions, time, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                recipe.id.to_string(),
                recipe.name,
                recipe.image,
                recipe.category,
                recipe.description,
                serde_json::to_string(&recipe.ingredients)?,
                serde_json::to_string(&recipe.instructions)?,
                recipe.time,
                recipe.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Overwrite an existing recipe's content fields.
    pub fn update_recipe(&self, recipe: &Recipe) -> Result<()> {
        let affected = self.conn().execute(
            "UPDATE recipes SET name = ?2, image = ?3, category = ?4, description = ?5, \
             ingredients = ?6, instructions = ?7, time = ?8 WHERE id = ?1",
            params![
                recipe.id.to_string(),
                recipe.name,
                recipe.image,
                recipe.category,
                recipe.description,
                serde_json::to_string(&recipe.ingredients)?,
                serde_json::to_string(&recipe.instructions)?,
                recipe.time,
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single recipe by UUID.
    pub fn get_recipe(&self, id: Uuid) -> Result<Recipe> {
        self.conn()
            .query_row(
                "SELECT id, name, image, category, description, ingredients, instructions, \
                 time, created_at
                 FROM recipes
                 WHERE id = ?1",
                params![id.to_string()],
                row_to_recipe,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List all recipes, newest first.
    pub fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, name, image, category, description, ingredients, instructions, \
             time, created_at
             FROM recipes
             ORDER BY created_at DESC",
        )?;

        let rows = stmt.query_map([], row_to_recipe)?;

        let mut recipes = Vec::new();
        for row in rows {
            recipes.push(row?);
        }
        Ok(recipes)
    }

    /// Total number of recipes (admin dashboard).
    pub fn count_recipes(&self) -> Result<u32> {
        let count = self
            .conn()
            .query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a recipe by UUID.  Returns `true` if a row was deleted.
    pub fn delete_recipe(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM recipes WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Recipe`].
fn row_to_recipe(row: &rusqlite::Row<'_>) -> rusqlite::Result<Recipe> {
    let id_str: String = row.get(0)?;
    let ingredients_str: String = row.get(5)?;
    let instructions_str: String = row.get(6)?;
    let created_str: String = row.get(8)?;

    Ok(Recipe {
        id: column_uuid(0, &id_str)?,
        name: row.get(1)?,
        image: row.get(2)?,
        category: row.get(3)?,
        description: row.get(4)?,
        ingredients: column_string_list(5, &ingredients_str)?,
        instructions: column_string_list(6, &instructions_str)?,
        time: row.get(7)?,
        created_at: column_timestamp(8, &created_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::tests::test_db;
    use chrono::Utc;

    fn sample_recipe(name: &str) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            name: name.to_string(),
            image: "https://cdn.example.com/soup.jpg".to_string(),
            category: "soups".to_string(),
            description: "A light vegetable soup.".to_string(),
            ingredients: vec!["2 carrots".to_string(), "1 onion".to_string()],
            instructions: vec!["Chop everything.".to_string(), "Simmer 20 min.".to_string()],
            time: Some("30 min".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn insert_get_round_trip() {
        let (_dir, db) = test_db();
        let recipe = sample_recipe("Vegetable soup");
        db.insert_recipe(&recipe).unwrap();

        let stored = db.get_recipe(recipe.id).unwrap();
        assert_eq!(stored.name, "Vegetable soup");
        assert_eq!(stored.ingredients, recipe.ingredients);
        assert_eq!(stored.instructions.len(), 2);
    }

    #[test]
    fn update_overwrites_content() {
        let (_dir, db) = test_db();
        let mut recipe = sample_recipe("Soup");
        db.insert_recipe(&recipe).unwrap();

        recipe.name = "Hearty soup".to_string();
        recipe.ingredients.push("salt".to_string());
        db.update_recipe(&recipe).unwrap();

        let stored = db.get_recipe(recipe.id).unwrap();
        assert_eq!(stored.name, "Hearty soup");
        assert_eq!(stored.ingredients.len(), 3);
    }

    #[test]
    fn update_missing_recipe_is_not_found() {
        let (_dir, db) = test_db();
        assert!(matches!(
            db.update_recipe(&sample_recipe("Ghost")),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn delete_and_count() {
        let (_dir, db) = test_db();
        let recipe = sample_recipe("Soup");
        db.insert_recipe(&recipe).unwrap();
        assert_eq!(db.count_recipes().unwrap(), 1);

        assert!(db.delete_recipe(recipe.id).unwrap());
        assert!(!db.delete_recipe(recipe.id).unwrap());
        assert_eq!(db.count_recipes().unwrap(), 0);
    }
}
