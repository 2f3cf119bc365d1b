use crate::api::form::{parse_string_list, store_image, FormData};
use crate::api::{error_response, ErrorResponse, RecipeResponse};
use crate::auth::AuthUser;
use crate::get_conn;
use crate::models::{RecipeChanges, RecipeRow};
use crate::schema::recipes;
use crate::storage::Bucket;
use crate::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use larder_core::{Category, Difficulty};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Every field is optional; absent or blank fields keep their value.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    /// JSON array of strings
    pub ingredients: Option<String>,
    /// JSON array of strings
    pub steps: Option<String>,
    pub category: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
    pub difficulty: Option<String>,
    pub description: Option<String>,
    pub estimated_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateRecipeResponse {
    pub message: String,
    pub recipe: RecipeResponse,
}

/// Owned, validated values behind a [`RecipeChanges`].
#[derive(Debug, Default, PartialEq)]
struct RecipeEdit {
    title: Option<String>,
    ingredients: Option<Vec<String>>,
    steps: Option<Vec<String>>,
    category: Option<Category>,
    difficulty: Option<Difficulty>,
    description: Option<String>,
    estimated_time: Option<String>,
}

impl RecipeEdit {
    fn from_form(form: &FormData) -> Result<Self, String> {
        let list = |name: &str| -> Result<Option<Vec<String>>, String> {
            match form.text(name) {
                Some(raw) => {
                    let items = parse_string_list(name, raw)?;
                    Ok(Some(items).filter(|items| !items.is_empty()))
                }
                None => Ok(None),
            }
        };

        Ok(RecipeEdit {
            title: form.text("title").map(str::to_string),
            ingredients: list("ingredients")?,
            steps: list("steps")?,
            category: form
                .text("category")
                .map(str::parse::<Category>)
                .transpose()
                .map_err(|e| format!("{e}"))?,
            difficulty: form
                .text("difficulty")
                .map(str::parse::<Difficulty>)
                .transpose()
                .map_err(|e| format!("{e}"))?,
            description: form.text("description").map(str::to_string),
            estimated_time: form.text("estimated_time").map(str::to_string),
        })
    }

    fn changes<'a>(&'a self, image: Option<&'a str>) -> RecipeChanges<'a> {
        RecipeChanges {
            title: self.title.as_deref(),
            image,
            ingredients: self.ingredients.as_deref(),
            steps: self.steps.as_deref(),
            category: self.category.map(|c| c.as_str()),
            difficulty: self.difficulty.map(|d| d.as_str()),
            description: self.description.as_deref(),
            estimated_time: self.estimated_time.as_deref(),
        }
    }
}

impl RecipeChanges<'_> {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.image.is_none()
            && self.ingredients.is_none()
            && self.steps.is_none()
            && self.category.is_none()
            && self.difficulty.is_none()
            && self.description.is_none()
            && self.estimated_time.is_none()
    }
}

#[utoipa::path(
    put,
    path = "/api/recipe/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body(content_type = "multipart/form-data", content = UpdateRecipeRequest),
    responses(
        (status = 200, description = "Recipe updated successfully", body = UpdateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut form = match FormData::read(&mut multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let edit = match RecipeEdit::from_form(&form) {
        Ok(edit) => edit,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let mut conn = get_conn!(state.pool);

    let exists: bool = match diesel::select(diesel::dsl::exists(recipes::table.find(id)))
        .get_result(&mut conn)
    {
        Ok(exists) => exists,
        Err(e) => {
            tracing::error!(error = %e, "Failed to look up recipe");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update recipe");
        }
    };
    if !exists {
        return error_response(StatusCode::NOT_FOUND, "Recipe not found");
    }

    let image_url = match form.take_file("image") {
        Some(image) => match store_image(
            state.objects.as_ref(),
            &state.config.public_base_url,
            Bucket::Recipe,
            &image,
        )
        .await
        {
            Ok(url) => Some(url),
            Err(response) => return response,
        },
        None => None,
    };

    let changes = edit.changes(image_url.as_deref());
    let result = if changes.is_empty() {
        recipes::table
            .find(id)
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .optional()
    } else {
        diesel::update(recipes::table.find(id))
            .set(&changes)
            .returning(RecipeRow::as_returning())
            .get_result(&mut conn)
            .optional()
    };

    let row = match result {
        Ok(Some(row)) => row,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to update recipe");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update recipe");
        }
    };

    let recipe = match row.into_recipe() {
        Ok(recipe) => recipe,
        Err(e) => return super::repository_failure(e, "Failed to update recipe"),
    };

    tracing::info!(recipe_id = %recipe.id, user_id = %user.id, "Recipe updated");

    (
        StatusCode::OK,
        Json(UpdateRecipeResponse {
            message: "Recipe updated successfully".to_string(),
            recipe: recipe.into(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_keep_their_value() {
        let form = FormData::from_fields(&[("title", "  "), ("ingredients", "[]")]);
        let edit = RecipeEdit::from_form(&form).unwrap();
        assert_eq!(edit, RecipeEdit::default());
        assert!(edit.changes(None).is_empty());
    }

    #[test]
    fn test_partial_edit() {
        let form = FormData::from_fields(&[
            ("title", "Crepes"),
            ("steps", r#"["Whisk", "Rest", "Fry"]"#),
            ("difficulty", "medium"),
        ]);
        let edit = RecipeEdit::from_form(&form).unwrap();
        let changes = edit.changes(Some("http://img"));
        assert_eq!(changes.title, Some("Crepes"));
        assert_eq!(changes.steps.map(|s| s.len()), Some(3));
        assert_eq!(changes.difficulty, Some("Medium"));
        assert_eq!(changes.image, Some("http://img"));
        assert!(changes.category.is_none());
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_invalid_edit_is_rejected() {
        let form = FormData::from_fields(&[("category", "Supper")]);
        assert_eq!(
            RecipeEdit::from_form(&form).unwrap_err(),
            "Unknown category: Supper"
        );

        let form = FormData::from_fields(&[("ingredients", "eggs")]);
        assert_eq!(
            RecipeEdit::from_form(&form).unwrap_err(),
            "ingredients must be a JSON array of strings"
        );
    }
}
