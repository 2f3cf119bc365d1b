//! Prompt templates.

use serde::Serialize;

use crate::types::{Category, Recipe};

/// The slice of a recipe the ranking model gets to see.
#[derive(Debug, Serialize)]
struct RankCandidate<'a> {
    id: String,
    title: &'a str,
    ingredients: &'a [String],
    category: Category,
}

/// Render the re-ranking prompt for the given search tokens and candidates.
pub fn render_rank_prompt(tokens: &[String], candidates: &[Recipe]) -> String {
    let projection: Vec<RankCandidate<'_>> = candidates
        .iter()
        .map(|r| RankCandidate {
            id: r.id.to_string(),
            title: &r.title,
            ingredients: &r.ingredients,
            category: r.category,
        })
        .collect();

    // Serializing borrowed strings and a unit enum cannot fail.
    let recipes_json = serde_json::to_string_pretty(&projection).unwrap_or_default();

    format!(
        r#"The user searched for: "{query}".
Rank the recipes below by how well their ingredients match that search, best match first.

Respond with a JSON array of recipe ids only, no other text: ["id1", "id2"]

Recipes:
{recipes_json}"#,
        query = tokens.join(", "),
        recipes_json = recipes_json
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Difficulty;
    use chrono::Utc;
    use uuid::Uuid;

    fn recipe(title: &str, ingredients: &[&str]) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            title: title.to_string(),
            image: "https://img.example/x.jpg".to_string(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            steps: vec!["secret step".to_string()],
            category: Category::Breakfast,
            difficulty: Difficulty::Easy,
            description: "hidden description".to_string(),
            estimated_time: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_prompt() {
        let pancakes = recipe("Pancakes", &["egg", "milk", "flour"]);
        let prompt = render_rank_prompt(
            &["egg".to_string(), "milk".to_string()],
            std::slice::from_ref(&pancakes),
        );

        assert!(prompt.contains("The user searched for: \"egg, milk\""));
        assert!(prompt.contains(&pancakes.id.to_string()));
        assert!(prompt.contains("\"title\": \"Pancakes\""));
        assert!(prompt.contains("\"category\": \"Breakfast\""));
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn test_prompt_only_projects_ranking_fields() {
        let prompt = render_rank_prompt(&["egg".to_string()], &[recipe("Omelette", &["egg"])]);
        assert!(!prompt.contains("secret step"));
        assert!(!prompt.contains("hidden description"));
        assert!(!prompt.contains("img.example"));
    }
}
