use crate::api::form::{parse_string_list, store_image, FormData};
use crate::api::{error_response, ErrorResponse, RecipeResponse};
use crate::auth::AuthUser;
use crate::get_conn;
use crate::models::{NewRecipe, RecipeRow};
use crate::schema::recipes;
use crate::storage::Bucket;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use larder_core::{Category, Difficulty};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct AddRecipeRequest {
    pub title: String,
    /// JSON array of strings
    #[schema(example = r#"["2 eggs", "1 cup milk"]"#)]
    pub ingredients: String,
    /// JSON array of strings
    #[schema(example = r#"["Whisk", "Fry"]"#)]
    pub steps: String,
    #[schema(example = "Breakfast")]
    pub category: String,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
    #[schema(example = "Easy")]
    pub difficulty: Option<String>,
    pub description: Option<String>,
    pub estimated_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AddRecipeResponse {
    pub message: String,
    pub recipe: RecipeResponse,
}

/// Validated text fields of a new recipe.
#[derive(Debug, PartialEq)]
struct RecipeInput {
    title: String,
    ingredients: Vec<String>,
    steps: Vec<String>,
    category: Category,
    difficulty: Difficulty,
    description: String,
    estimated_time: String,
}

fn required<'a>(form: &'a FormData, name: &str) -> Result<&'a str, String> {
    form.text(name).ok_or_else(|| format!("{name} is required"))
}

fn non_empty_list(name: &str, raw: &str) -> Result<Vec<String>, String> {
    let items = parse_string_list(name, raw)?;
    if items.is_empty() {
        return Err(format!("{name} must not be empty"));
    }
    Ok(items)
}

fn parse_recipe_input(form: &FormData) -> Result<RecipeInput, String> {
    let title = required(form, "title")?.to_string();
    let ingredients = non_empty_list("ingredients", required(form, "ingredients")?)?;
    let steps = non_empty_list("steps", required(form, "steps")?)?;
    let category = required(form, "category")?
        .parse::<Category>()
        .map_err(|e| format!("{e}"))?;
    let difficulty = match form.text("difficulty") {
        Some(d) => d.parse::<Difficulty>().map_err(|e| format!("{e}"))?,
        None => Difficulty::default(),
    };

    Ok(RecipeInput {
        title,
        ingredients,
        steps,
        category,
        difficulty,
        description: form.text("description").unwrap_or_default().to_string(),
        estimated_time: form.text("estimated_time").unwrap_or_default().to_string(),
    })
}

#[utoipa::path(
    post,
    path = "/api/recipe/add",
    tag = "recipes",
    request_body(content_type = "multipart/form-data", content = AddRecipeRequest),
    responses(
        (status = 201, description = "Recipe created", body = AddRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut form = match FormData::read(&mut multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let input = match parse_recipe_input(&form) {
        Ok(input) => input,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let Some(image) = form.take_file("image") else {
        return error_response(StatusCode::BAD_REQUEST, "image is required");
    };

    let image_url = match store_image(
        state.objects.as_ref(),
        &state.config.public_base_url,
        Bucket::Recipe,
        &image,
    )
    .await
    {
        Ok(url) => url,
        Err(response) => return response,
    };

    let mut conn = get_conn!(state.pool);

    let new_recipe = NewRecipe {
        title: &input.title,
        image: &image_url,
        ingredients: &input.ingredients,
        steps: &input.steps,
        category: input.category.as_str(),
        difficulty: input.difficulty.as_str(),
        description: &input.description,
        estimated_time: &input.estimated_time,
    };

    let row: RecipeRow = match diesel::insert_into(recipes::table)
        .values(&new_recipe)
        .returning(RecipeRow::as_returning())
        .get_result(&mut conn)
    {
        Ok(row) => row,
        Err(e) => {
            tracing::error!(error = %e, "Failed to insert recipe");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create recipe");
        }
    };

    let recipe = match row.into_recipe() {
        Ok(recipe) => recipe,
        Err(e) => return super::repository_failure(e, "Failed to create recipe"),
    };

    tracing::info!(recipe_id = %recipe.id, user_id = %user.id, "Recipe created");

    (
        StatusCode::CREATED,
        Json(AddRecipeResponse {
            message: "Recipe created".to_string(),
            recipe: recipe.into(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)]) -> FormData {
        FormData::from_fields(fields)
    }

    fn valid_fields() -> Vec<(&'static str, &'static str)> {
        vec![
            ("title", " Pancakes "),
            ("ingredients", r#"["egg", "milk", "flour"]"#),
            ("steps", r#"["Mix", "Fry"]"#),
            ("category", "breakfast"),
        ]
    }

    #[test]
    fn test_parse_recipe_input_defaults() {
        let input = parse_recipe_input(&form(&valid_fields())).unwrap();
        assert_eq!(input.title, "Pancakes");
        assert_eq!(input.ingredients, vec!["egg", "milk", "flour"]);
        assert_eq!(input.category, Category::Breakfast);
        assert_eq!(input.difficulty, Difficulty::Easy);
        assert_eq!(input.description, "");
    }

    #[test]
    fn test_parse_recipe_input_missing_field() {
        let fields: Vec<_> = valid_fields()
            .into_iter()
            .filter(|(k, _)| *k != "steps")
            .collect();
        assert_eq!(
            parse_recipe_input(&form(&fields)).unwrap_err(),
            "steps is required"
        );
    }

    #[test]
    fn test_parse_recipe_input_rejects_unknown_enums() {
        let mut fields = valid_fields();
        fields.push(("difficulty", "Extreme"));
        assert_eq!(
            parse_recipe_input(&form(&fields)).unwrap_err(),
            "Unknown difficulty: Extreme"
        );

        let mut fields = valid_fields();
        fields.retain(|(k, _)| *k != "category");
        fields.push(("category", "Brunch"));
        assert_eq!(
            parse_recipe_input(&form(&fields)).unwrap_err(),
            "Unknown category: Brunch"
        );
    }

    #[test]
    fn test_parse_recipe_input_rejects_empty_lists() {
        let mut fields = valid_fields();
        fields.retain(|(k, _)| *k != "ingredients");
        fields.push(("ingredients", "[]"));
        assert_eq!(
            parse_recipe_input(&form(&fields)).unwrap_err(),
            "ingredients must not be empty"
        );
    }
}
