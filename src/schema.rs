//! Query and mutation roots of the GraphQL schema.

use crate::context::Context;
use crate::store::StoreError;
use crate::types::{nullable_list, NullableList, Recipe, User};
use failure::Fail;
use juniper::FieldResult;

#[derive(Debug, Fail, PartialEq)]
pub enum SchemaError {
    #[fail(display = "User not logged in")]
    NotLoggedIn,
}

// An empty id argument counts as no id at all.
fn given(id: Option<String>) -> Option<String> {
    id.filter(|id| !id.is_empty())
}

pub struct Query;

#[juniper::object(Context = Context)]
impl Query {
    #[graphql(arguments(name(default = "stranger".to_owned())))]
    fn hello(name: String) -> Option<String> {
        Some(format!("Hello {}", name))
    }

    ///
    /// All users, or the one user with the given id. Unknown ids yield an empty list.
    ///
    fn users(context: &Context, id: Option<String>) -> NullableList<User> {
        let ids = match given(id) {
            Some(id) => vec![id],
            None => context.store.all_user_ids(),
        };
        let users = context.store.users_by_ids(&ids).into_iter().flatten().collect();
        nullable_list(users)
    }

    ///
    /// All recipes, or the one recipe with the given id. Unknown ids yield an empty list.
    ///
    fn recipes(context: &Context, id: Option<String>) -> NullableList<Recipe> {
        let recipes = match given(id) {
            Some(id) => context.store.recipe_by_id(&id).into_iter().collect(),
            None => context.store.all_recipes(),
        };
        nullable_list(recipes)
    }

    ///
    /// The user the request was made by
    ///
    fn me(context: &Context) -> FieldResult<Option<User>> {
        let user = context
            .user_id
            .as_ref()
            .and_then(|id| context.store.user_by_id(id))
            .ok_or(SchemaError::NotLoggedIn)?;
        Ok(Some(user))
    }
}

///
/// Why `addRecipe` could not store the recipe
///
#[derive(juniper::GraphQLEnum, Clone, Copy, Debug, PartialEq)]
pub enum AddRecipeError {
    /// the store refused writes
    StoreUnavailable,
    /// the generated id was already taken
    DuplicateId,
}

impl From<&StoreError> for AddRecipeError {
    fn from(err: &StoreError) -> Self {
        match err {
            StoreError::Unavailable => AddRecipeError::StoreUnavailable,
            StoreError::DuplicateId(_) => AddRecipeError::DuplicateId,
        }
    }
}

///
/// Outcome of `addRecipe`. Failures are reported here rather than as GraphQL errors.
///
#[derive(Clone, Debug, PartialEq)]
pub struct AddRecipePayload {
    pub ok: bool,
    pub recipe: Option<Recipe>,
    pub error: Option<AddRecipeError>,
}

impl From<Result<Recipe, StoreError>> for AddRecipePayload {
    fn from(result: Result<Recipe, StoreError>) -> Self {
        match result {
            Ok(recipe) => Self {
                ok: true,
                recipe: Some(recipe),
                error: None,
            },
            Err(err) => {
                tracing::warn!(error = %err, "recipe not added");
                Self {
                    ok: false,
                    recipe: None,
                    error: Some(AddRecipeError::from(&err)),
                }
            }
        }
    }
}

#[juniper::object(Context = Context)]
impl AddRecipePayload {
    fn ok(&self) -> Option<bool> {
        Some(self.ok)
    }

    fn recipe(&self) -> Option<&Recipe> {
        self.recipe.as_ref()
    }

    fn error(&self) -> Option<AddRecipeError> {
        self.error
    }
}

pub struct Mutation;

#[juniper::object(Context = Context)]
impl Mutation {
    ///
    /// Create new recipe in the store
    ///
    fn add_recipe(context: &Context, name: Option<String>) -> Option<AddRecipePayload> {
        Some(AddRecipePayload::from(context.store.add_recipe(name)))
    }
}

pub type Schema = juniper::RootNode<'static, Query, Mutation>;

pub fn schema() -> Schema {
    Schema::new(Query, Mutation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Store, SAMANTHA_ID};
    use juniper::Variables;
    use serde_json::{json, Value};
    use std::sync::Arc;

    const SPAGHETTI_ID: &str = "c9f063f4-2121-4394-860c-ed939096390b";

    fn run(context: &Context, doc: &str) -> (Value, Vec<String>) {
        let (value, errors) =
            juniper::execute(doc, None, &schema(), &Variables::new(), context).unwrap();
        let messages = errors
            .iter()
            .map(|err| err.error().message().to_owned())
            .collect();
        (serde_json::to_value(&value).unwrap(), messages)
    }

    fn logged_in() -> Context {
        Context::new(Arc::new(Store::seeded()), Some(SAMANTHA_ID.to_owned()))
    }

    fn type_name(ty: &Value) -> String {
        match ty["kind"].as_str() {
            Some("NON_NULL") => format!("{}!", type_name(&ty["ofType"])),
            Some("LIST") => format!("[{}]", type_name(&ty["ofType"])),
            _ => ty["name"].as_str().unwrap_or_default().to_owned(),
        }
    }

    fn field_types(object: &str) -> Vec<(String, String)> {
        let doc = format!(
            r#"{{ __type(name: "{}") {{ fields {{ name type {{
                kind name ofType {{ kind name ofType {{ kind name ofType {{ kind name }} }} }}
            }} }} }} }}"#,
            object
        );
        let (data, errors) = run(&logged_in(), &doc);
        assert!(errors.is_empty());
        data["__type"]["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|field| {
                (
                    field["name"].as_str().unwrap().to_owned(),
                    type_name(&field["type"]),
                )
            })
            .collect()
    }

    fn assert_fields(object: &str, expected: &[(&str, &str)]) {
        let actual = field_types(object);
        for (name, ty) in expected {
            let found = actual.iter().find(|(field, _)| field == name);
            assert_eq!(
                found.map(|(_, actual_ty)| actual_ty.as_str()),
                Some(*ty),
                "{}.{}",
                object,
                name
            );
        }
    }

    #[test]
    fn published_field_types() {
        assert_fields(
            "Query",
            &[
                ("hello", "String"),
                ("users", "[User]"),
                ("recipes", "[Recipe]"),
                ("me", "User"),
            ],
        );
        assert_fields(
            "User",
            &[
                ("id", "ID!"),
                ("firstName", "String!"),
                ("lastName", "String!"),
                ("recipes", "[Recipe]"),
            ],
        );
        assert_fields(
            "Recipe",
            &[("id", "ID!"), ("name", "String"), ("users", "[User]")],
        );
        assert_fields("Mutation", &[("addRecipe", "AddRecipePayload")]);
        assert_fields(
            "AddRecipePayload",
            &[("ok", "Boolean"), ("recipe", "Recipe"), ("error", "AddRecipeError")],
        );
    }

    #[test]
    fn hello_defaults_to_stranger() {
        let ctx = logged_in();
        let (data, _) = run(&ctx, r#"{ a: hello b: hello(name: "Sam") }"#);
        assert_eq!(data, json!({"a": "Hello stranger", "b": "Hello Sam"}));
    }

    #[test]
    fn users_without_id_lists_everyone() {
        let (data, _) = run(&logged_in(), "{ users { firstName lastName } }");
        assert_eq!(
            data,
            json!({"users": [
                {"firstName": "Samantha", "lastName": "Stevenson"},
                {"firstName": "James", "lastName": "Jones"},
                {"firstName": "Pat", "lastName": "Peterson"},
            ]})
        );
    }

    #[test]
    fn unknown_ids_give_empty_lists() {
        let (data, errors) = run(
            &logged_in(),
            r#"{ users(id: "missing") { id } recipes(id: "missing") { id } }"#,
        );
        assert!(errors.is_empty());
        assert_eq!(data, json!({"users": [], "recipes": []}));
    }

    #[test]
    fn me_resolves_recipes_of_samantha() {
        let (data, _) = run(&logged_in(), "{ me { firstName recipes { name } } }");
        assert_eq!(
            data,
            json!({"me": {
                "firstName": "Samantha",
                "recipes": [{"name": "Chocolate Cake"}, {"name": "Spaghetti"}],
            }})
        );
    }

    #[test]
    fn me_without_known_user_is_an_error() {
        let ctx = Context::new(Arc::new(Store::default()), Some(SAMANTHA_ID.to_owned()));
        let (data, errors) = run(&ctx, "{ me { id } }");
        assert_eq!(data, json!({"me": null}));
        assert_eq!(errors, vec!["User not logged in".to_owned()]);

        let anonymous = Context::new(Arc::new(Store::seeded()), None);
        let (_, errors) = run(&anonymous, "{ me { id } }");
        assert_eq!(errors, vec!["User not logged in".to_owned()]);
    }

    #[test]
    fn recipe_users_join_back() {
        let doc = format!(r#"{{ recipes(id: "{}") {{ name users {{ lastName }} }} }}"#, SPAGHETTI_ID);
        let (data, _) = run(&logged_in(), &doc);
        assert_eq!(
            data,
            json!({"recipes": [{
                "name": "Spaghetti",
                "users": [{"lastName": "Stevenson"}, {"lastName": "Peterson"}],
            }]})
        );
    }

    #[test]
    fn add_recipe_reports_new_record() {
        let ctx = logged_in();
        let (data, errors) = run(
            &ctx,
            r#"mutation { addRecipe(name: "Tacos") { ok error recipe { id name users { id } } } }"#,
        );
        assert!(errors.is_empty());
        let payload = &data["addRecipe"];
        assert_eq!(payload["ok"], json!(true));
        assert_eq!(payload["error"], Value::Null);
        assert_eq!(payload["recipe"]["name"], json!("Tacos"));
        assert_eq!(payload["recipe"]["users"], json!([]));

        let id = payload["recipe"]["id"].as_str().unwrap();
        assert_eq!(
            ctx.store.recipe_by_id(id).and_then(|r| r.name),
            Some("Tacos".to_owned())
        );
    }

    #[test]
    fn failed_store_write_becomes_payload() {
        let payload = AddRecipePayload::from(Err(StoreError::DuplicateId("x".into())));
        assert_eq!(
            payload,
            AddRecipePayload {
                ok: false,
                recipe: None,
                error: Some(AddRecipeError::DuplicateId),
            }
        );
    }
}
