//! Cache key derivation. Every key the stores see is built here.

use std::fmt::{self, Display, Formatter};

use regex::Regex;

use crate::api_defaults::{FAST_KEY_PREFIX, RECIPES_API_PATH};
use crate::error::RCError;

/// Identifier of a recipe as accepted by the REST API.
///
/// Ids end up verbatim as the last segment of the request URL and as the
/// suffix of the fast store key, so anything that would change the shape of
/// the URL is rejected up front.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for RecipeId {
    type Error = RCError;

    fn try_from(id: &str) -> Result<Self, Self::Error> {
        lazy_static! {
            static ref RE_ID: Regex = Regex::new(r"^[^/?#%\s]+$").unwrap();
        }
        if RE_ID.is_match(id) {
            Ok(RecipeId(id.to_string()))
        } else {
            Err(RCError::InvalidRecipeId(format!(
                "{id:?} - ids must be non-empty and cannot contain '/', '?', '#', '%' or whitespace"
            )))
        }
    }
}

impl TryFrom<String> for RecipeId {
    type Error = RCError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        RecipeId::try_from(id.as_str())
    }
}

impl Display for RecipeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Path of the recipe resource, relative to the API base url.
pub fn recipe_path(id: &RecipeId) -> String {
    format!("{RECIPES_API_PATH}/{id}")
}

/// Full request URL. This is the durable store key.
pub fn durable_key(base_url: &str, id: &RecipeId) -> String {
    let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
    format!("{base_url}{}", recipe_path(id))
}

/// Fast store key.
pub fn fast_key(id: &RecipeId) -> String {
    format!("{FAST_KEY_PREFIX}{id}")
}
