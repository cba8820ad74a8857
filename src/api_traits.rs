use serde_json::Value;

use crate::{keys::RecipeId, recipe::ListRecipeArgs, Result};

/// Authoritative source of recipes. Returns the response as received, which
/// is normally an envelope holding the recipe under `data`.
///
/// Transport failures and non-success statuses are errors so that callers
/// can fall back to cached copies.
pub trait RecipeFetcher {
    fn fetch_recipe(&self, id: &RecipeId) -> Result<Value>;
}

impl<T: RecipeFetcher + ?Sized> RecipeFetcher for &T {
    fn fetch_recipe(&self, id: &RecipeId) -> Result<Value> {
        (**self).fetch_recipe(id)
    }
}

pub trait RecipeApi: RecipeFetcher {
    fn list(&self, args: &ListRecipeArgs) -> Result<Value>;
    fn create(&self, recipe: &Value) -> Result<Value>;
    /// Full replacement, every field is required.
    fn update(&self, id: &RecipeId, recipe: &Value) -> Result<Value>;
    /// Partial update, only the given fields change.
    fn patch(&self, id: &RecipeId, fields: &Value) -> Result<Value>;
    fn delete(&self, id: &RecipeId) -> Result<Value>;
}
