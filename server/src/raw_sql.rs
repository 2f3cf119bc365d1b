//! Raw SQL fragments that can't be expressed in Diesel's type-safe DSL.
//!
//! # Safety
//!
//! User input is ALWAYS passed via `.bind()` parameters. No string
//! concatenation or interpolation with user data.

/// Filter expression: at least one element of `recipes.ingredients` matches at
/// least one of the given `ILIKE` patterns.
///
/// # Safety
/// The patterns are passed via `.bind()`, not interpolated.
///
/// # Why raw SQL?
/// Diesel has no DSL for `unnest()` inside an `EXISTS` subquery.
#[macro_export]
macro_rules! ingredient_matches_any {
    ($patterns:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>(
            "EXISTS (SELECT 1 FROM unnest(recipes.ingredients) AS ing WHERE ing ILIKE ANY(",
        )
        .bind::<diesel::sql_types::Array<diesel::sql_types::Text>, _>($patterns)
        .sql("))")
    };
}

/// Filter expression: `users.username` equals the given name, ignoring case.
///
/// # Safety
/// The name is passed via `.bind()`, not interpolated.
///
/// # Why raw SQL?
/// Diesel's DSL has no `LOWER()`.
#[macro_export]
macro_rules! username_matches {
    ($username:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>("LOWER(users.username) = LOWER(")
            .bind::<diesel::sql_types::Text, _>($username)
            .sql(")")
    };
}

/// Turn a search token into an `ILIKE` pattern that matches it literally
/// anywhere in the value.
pub fn contains_pattern(token: &str) -> String {
    let escaped = token
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
