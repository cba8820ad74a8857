use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::Value;

use crate::api_traits::RecipeApi;
use crate::cache::DurableStore;
use crate::cli::recipe::RecipeOptions;
use crate::display::{self, Column, DisplayBody};
use crate::error::{AddContext, RCError};
use crate::keys::RecipeId;
use crate::log_debug;
use crate::service::RecipeCache;
use crate::storage::FastStore;
use crate::Result;

/// Row of `rc list`.
pub struct RecipeSummary {
    id: String,
    name: String,
    category: String,
    difficulty: String,
    prep_time: String,
}

impl From<&Value> for RecipeSummary {
    fn from(recipe: &Value) -> Self {
        RecipeSummary {
            id: display::field(recipe, "id"),
            name: display::field(recipe, "name"),
            category: display::field(recipe, "category"),
            difficulty: display::field(recipe, "difficulty"),
            prep_time: display::field(recipe, "prep_time"),
        }
    }
}

impl From<RecipeSummary> for DisplayBody {
    fn from(recipe: RecipeSummary) -> Self {
        DisplayBody::new(vec![
            Column::new("ID", recipe.id),
            Column::new("Name", recipe.name),
            Column::new("Category", recipe.category),
            Column::new("Difficulty", recipe.difficulty),
            Column::new("Prep Time", recipe.prep_time),
        ])
    }
}

pub fn execute<A: RecipeApi, D: DurableStore, S: FastStore, W: Write>(
    options: RecipeOptions,
    api: &A,
    cache: &RecipeCache<&A, D, S>,
    mut writer: W,
) -> Result<()> {
    match options {
        RecipeOptions::Get { id, fetch_options } => {
            let result = cache.fetch(&id, fetch_options)?;
            writeln!(writer, "{}", serde_json::to_string_pretty(&result)?)?;
        }
        RecipeOptions::List { args, format_args } => {
            let response = api.list(&args)?;
            let recipes = recipe_list(&response)?
                .iter()
                .map(RecipeSummary::from)
                .collect::<Vec<_>>();
            display::print(
                &mut writer,
                recipes,
                format_args.no_headers,
                &format_args.format,
            )?;
        }
        RecipeOptions::Create { file } => {
            let recipe = read_recipe_file(&file)?;
            let created = api.create(&recipe)?;
            writeln!(writer, "{}", serde_json::to_string_pretty(&created)?)?;
        }
        RecipeOptions::Update { id, file } => {
            let recipe = read_recipe_file(&file)?;
            let updated = api.update(&id, &recipe)?;
            invalidate(cache, &id)?;
            writeln!(writer, "{}", serde_json::to_string_pretty(&updated)?)?;
        }
        RecipeOptions::Patch { id, file } => {
            let fields = read_recipe_file(&file)?;
            let patched = api.patch(&id, &fields)?;
            invalidate(cache, &id)?;
            writeln!(writer, "{}", serde_json::to_string_pretty(&patched)?)?;
        }
        RecipeOptions::Delete { id } => {
            api.delete(&id)?;
            invalidate(cache, &id)?;
            writeln!(writer, "Recipe {id} deleted")?;
        }
    }
    Ok(())
}

// The API accepted a change, cached copies of the recipe are now stale.
fn invalidate<A: RecipeApi, D: DurableStore, S: FastStore>(
    cache: &RecipeCache<&A, D, S>,
    id: &RecipeId,
) -> Result<()> {
    cache.invalidate(id)?;
    log_debug!("Cached copies of recipe {} invalidated", id);
    Ok(())
}

/// Recipes of a list response. Accepts the usual `{"data": [...]}` envelope
/// or a bare array.
fn recipe_list(response: &Value) -> Result<&Vec<Value>> {
    let list = match response.get("data") {
        Some(data) => data.as_array(),
        None => response.as_array(),
    };
    list.ok_or_else(|| {
        RCError::MalformedResponse(format!("expected a list of recipes, got: {response}")).into()
    })
}

fn read_recipe_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .err_context(format!("Unable to read recipe file {}", path.display()))?;
    let recipe = serde_json::from_str(&data)
        .err_context(format!("Recipe file {} is not valid JSON", path.display()))?;
    Ok(recipe)
}
