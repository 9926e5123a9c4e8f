use crate::context::Context;
use crate::types::{nullable_list, NullableList, Recipe};
use juniper::ID;

///
/// Stored user record
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct User {
    /// unique identification of user
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// ids of the user's recipes, dangling ids are tolerated
    pub recipe_ids: Vec<String>,
}

impl User {
    pub fn new<S: Into<String>>(id: S, first_name: S, last_name: S, recipe_ids: Vec<S>) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            recipe_ids: recipe_ids.into_iter().map(Into::into).collect(),
        }
    }
}

///
/// GraphQL type for a user
///
#[juniper::object(Context = Context)]
impl User {
    /// unique identification of user
    fn id(&self) -> ID {
        ID::from(self.id.to_owned())
    }

    fn first_name(&self) -> &str {
        &self.first_name
    }

    fn last_name(&self) -> &str {
        &self.last_name
    }

    ///
    /// Recipes of the user, in the order the store keeps them
    ///
    fn recipes(&self, context: &Context) -> NullableList<Recipe> {
        nullable_list(context.store.recipes_for_user(self))
    }
}
