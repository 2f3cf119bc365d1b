use chrono::{DateTime, Utc};
use diesel::prelude::*;
use larder_core::{Recipe, RepositoryError};
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeRow {
    pub id: Uuid,
    pub title: String,
    pub image: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub category: String,
    pub difficulty: String,
    pub description: String,
    pub estimated_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecipeRow {
    /// Convert a row into the domain type. Fails only if the enum columns hold
    /// something the CHECK constraints should have rejected.
    pub fn into_recipe(self) -> Result<Recipe, RepositoryError> {
        let id = self.id;
        let corrupt = |reason: String| RepositoryError::CorruptRecord {
            id: id.to_string(),
            reason,
        };
        let category = self.category.parse().map_err(|e| corrupt(format!("{e}")))?;
        let difficulty = self
            .difficulty
            .parse()
            .map_err(|e| corrupt(format!("{e}")))?;

        Ok(Recipe {
            id: self.id,
            title: self.title,
            image: self.image,
            ingredients: self.ingredients,
            steps: self.steps,
            category,
            difficulty,
            description: self.description,
            estimated_time: self.estimated_time,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub title: &'a str,
    pub image: &'a str,
    pub ingredients: &'a [String],
    pub steps: &'a [String],
    pub category: &'a str,
    pub difficulty: &'a str,
    pub description: &'a str,
    pub estimated_time: &'a str,
}

/// Partial update; `None` leaves the column untouched.
#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::recipes)]
pub struct RecipeChanges<'a> {
    pub title: Option<&'a str>,
    pub image: Option<&'a str>,
    pub ingredients: Option<&'a [String]>,
    pub steps: Option<&'a [String]>,
    pub category: Option<&'a str>,
    pub difficulty: Option<&'a str>,
    pub description: Option<&'a str>,
    pub estimated_time: Option<&'a str>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::feedback)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Feedback {
    pub id: Uuid,
    pub name: String,
    pub rate: i32,
    #[diesel(column_name = feedback_text)]
    pub feedback: String,
    pub exp: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::feedback)]
pub struct NewFeedback<'a> {
    pub name: &'a str,
    pub rate: i32,
    #[diesel(column_name = feedback_text)]
    pub feedback: &'a str,
    pub exp: &'a str,
    pub image: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::stored_objects)]
pub struct NewStoredObject<'a> {
    pub bucket: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}
