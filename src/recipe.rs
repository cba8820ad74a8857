//! REST client for the recipes API.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::api_defaults::RECIPES_API_PATH;
use crate::api_traits::{RecipeApi, RecipeFetcher};
use crate::error::RCError;
use crate::http::{Method, Request};
use crate::io::{HttpRunner, Response};
use crate::keys::{self, RecipeId};
use crate::log_debug;
use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Category {
    Food,
    Drink,
}

impl Category {
    fn as_str(&self) -> &str {
        match self {
            Category::Food => "makanan",
            Category::Drink => "minuman",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    fn as_str(&self) -> &str {
        match self {
            Difficulty::Easy => "mudah",
            Difficulty::Medium => "sedang",
            Difficulty::Hard => "sulit",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// Filters for listing recipes. Anything left out uses the server defaults:
/// page 1, 10 per page, sorted by `created_at` descending.
#[derive(Builder, Clone, Debug, Default)]
pub struct ListRecipeArgs {
    #[builder(setter(into, strip_option), default)]
    pub page: Option<u32>,
    #[builder(setter(into, strip_option), default)]
    pub limit: Option<u32>,
    #[builder(setter(into, strip_option), default)]
    pub category: Option<Category>,
    #[builder(setter(into, strip_option), default)]
    pub difficulty: Option<Difficulty>,
    #[builder(setter(into, strip_option), default)]
    pub search: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub sort_by: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub order: Option<SortOrder>,
}

impl ListRecipeArgs {
    pub fn builder() -> ListRecipeArgsBuilder {
        ListRecipeArgsBuilder::default()
    }

    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(category) = &self.category {
            query.push(("category".to_string(), category.as_str().to_string()));
        }
        if let Some(difficulty) = &self.difficulty {
            query.push(("difficulty".to_string(), difficulty.as_str().to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search".to_string(), search.clone()));
        }
        if let Some(sort_by) = &self.sort_by {
            query.push(("sort_by".to_string(), sort_by.clone()));
        }
        if let Some(order) = &self.order {
            query.push(("order".to_string(), order.to_string()));
        }
        query
    }
}

pub struct RecipeClient<R> {
    base_url: String,
    runner: Arc<R>,
}

impl<R> RecipeClient<R> {
    pub fn new(base_url: &str, runner: Arc<R>) -> Self {
        RecipeClient {
            base_url: base_url.strip_suffix('/').unwrap_or(base_url).to_string(),
            runner,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl<R: HttpRunner<Response = Response>> RecipeClient<R> {
    fn send<T: Serialize>(&self, mut request: Request<T>) -> Result<Value> {
        request.set_header("Accept", "application/json");
        let response = self.runner.run(&mut request)?;
        if !response.is_ok() {
            return Err(RCError::RemoteServerError(response.status, response.body).into());
        }
        Ok(parse_body(&response.body))
    }
}

/// Bodies that are not JSON are handed back as a JSON string, the caller
/// decides whether it can live with that.
fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => {
            log_debug!("Response body is not JSON: {}", err);
            Value::String(body.to_string())
        }
    }
}

impl<R: HttpRunner<Response = Response>> RecipeFetcher for RecipeClient<R> {
    fn fetch_recipe(&self, id: &RecipeId) -> Result<Value> {
        let url = self.url(&keys::recipe_path(id));
        self.send(Request::<()>::new(&url, Method::GET))
    }
}

impl<R: HttpRunner<Response = Response>> RecipeApi for RecipeClient<R> {
    fn list(&self, args: &ListRecipeArgs) -> Result<Value> {
        let mut request = Request::<()>::new(&self.url(RECIPES_API_PATH), Method::GET);
        for (key, value) in args.query() {
            request.add_query(key, value);
        }
        self.send(request)
    }

    fn create(&self, recipe: &Value) -> Result<Value> {
        let request = Request::new(&self.url(RECIPES_API_PATH), Method::POST).with_body(recipe);
        self.send(request)
    }

    fn update(&self, id: &RecipeId, recipe: &Value) -> Result<Value> {
        let url = self.url(&keys::recipe_path(id));
        self.send(Request::new(&url, Method::PUT).with_body(recipe))
    }

    fn patch(&self, id: &RecipeId, fields: &Value) -> Result<Value> {
        let url = self.url(&keys::recipe_path(id));
        self.send(Request::new(&url, Method::PATCH).with_body(fields))
    }

    fn delete(&self, id: &RecipeId) -> Result<Value> {
        let url = self.url(&keys::recipe_path(id));
        self.send(Request::<()>::new(&url, Method::DELETE))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use serde_json::json;

    use crate::test::utils::MockRunner;

    fn response(status: u16, body: &str) -> Response {
        Response::builder()
            .status(status)
            .body(body.to_string())
            .build()
            .unwrap()
    }

    fn id(id: &str) -> RecipeId {
        RecipeId::try_from(id).unwrap()
    }

    #[test]
    fn test_fetch_recipe_returns_envelope() {
        let runner = Arc::new(MockRunner::new(vec![response(
            200,
            r#"{"data":{"id":"42","name":"Soto"}}"#,
        )]));
        let client = RecipeClient::new("https://api.example.com/", runner.clone());
        let value = client.fetch_recipe(&id("42")).unwrap();
        assert_eq!(json!({"data": {"id": "42", "name": "Soto"}}), value);
        assert_eq!("https://api.example.com/api/v1/recipes/42", *runner.url());
        assert_eq!(Method::GET, runner.http_method.borrow()[0]);
        assert_eq!(
            Some(&"application/json".to_string()),
            runner.headers().get("Accept")
        );
    }

    #[test]
    fn test_fetch_recipe_not_found_is_remote_server_error() {
        let runner = Arc::new(MockRunner::new(vec![response(404, "not found")]));
        let client = RecipeClient::new("http://localhost", runner);
        let err = client.fetch_recipe(&id("1")).unwrap_err();
        match err.downcast_ref::<RCError>() {
            Some(RCError::RemoteServerError(404, body)) => assert_eq!("not found", body),
            _ => panic!("Expected RemoteServerError"),
        }
    }

    #[test]
    fn test_fetch_recipe_non_json_body_is_string() {
        let runner = Arc::new(MockRunner::new(vec![response(200, "<html>hi</html>")]));
        let client = RecipeClient::new("http://localhost", runner);
        let value = client.fetch_recipe(&id("1")).unwrap();
        assert_eq!(Value::String("<html>hi</html>".to_string()), value);
    }

    #[test]
    fn test_list_recipes_query_params() {
        let runner = Arc::new(MockRunner::new(vec![response(200, r#"{"data":[]}"#)]));
        let client = RecipeClient::new("http://localhost", runner.clone());
        let args = ListRecipeArgs::builder()
            .page(2u32)
            .limit(5u32)
            .category(Category::Drink)
            .difficulty(Difficulty::Easy)
            .search("teh")
            .order(SortOrder::Asc)
            .build()
            .unwrap();
        client.list(&args).unwrap();
        assert_eq!("http://localhost/api/v1/recipes", *runner.url());
        let query = runner.query();
        assert_eq!(
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "5".to_string()),
                ("category".to_string(), "minuman".to_string()),
                ("difficulty".to_string(), "mudah".to_string()),
                ("search".to_string(), "teh".to_string()),
                ("order".to_string(), "asc".to_string()),
            ],
            *query
        );
    }

    #[test]
    fn test_create_recipe_posts_body() {
        let runner = Arc::new(MockRunner::new(vec![response(201, r#"{"data":{"id":"7"}}"#)]));
        let client = RecipeClient::new("http://localhost", runner.clone());
        let recipe = json!({"name": "Es Teh"});
        let created = client.create(&recipe).unwrap();
        assert_eq!(json!({"data": {"id": "7"}}), created);
        assert_eq!(Method::POST, runner.http_method.borrow()[0]);
        assert_eq!(r#"{"name":"Es Teh"}"#, *runner.request_body());
    }

    #[test]
    fn test_update_and_patch_target_recipe_url() {
        let runner = Arc::new(MockRunner::new(vec![
            response(200, "{}"),
            response(200, "{}"),
        ]));
        let client = RecipeClient::new("http://localhost", runner.clone());
        client.update(&id("3"), &json!({"name": "x"})).unwrap();
        client.patch(&id("3"), &json!({"name": "y"})).unwrap();
        assert_eq!("http://localhost/api/v1/recipes/3", *runner.url());
        assert_eq!(
            vec![Method::PUT, Method::PATCH],
            *runner.http_method.borrow()
        );
    }

    #[test]
    fn test_delete_empty_body_is_null() {
        let runner = Arc::new(MockRunner::new(vec![response(204, "")]));
        let client = RecipeClient::new("http://localhost", runner.clone());
        assert_eq!(Value::Null, client.delete(&id("3")).unwrap());
        assert_eq!(Method::DELETE, runner.http_method.borrow()[0]);
    }
}
