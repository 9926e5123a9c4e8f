use crate::context::Context;
use crate::types::{nullable_list, NullableList, User};
use juniper::ID;

///
/// Stored recipe record
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recipe {
    /// unique identification of recipe
    pub id: String,
    pub name: Option<String>,
}

impl Recipe {
    pub fn new<S: Into<String>>(id: S, name: S) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }
}

///
/// GraphQL type for a recipe
///
#[juniper::object(Context = Context)]
impl Recipe {
    /// unique identification of recipe
    fn id(&self) -> ID {
        ID::from(self.id.to_owned())
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    ///
    /// Users that list this recipe. Computed by scanning every user.
    ///
    fn users(&self, context: &Context) -> NullableList<User> {
        nullable_list(context.store.users_for_recipe(self))
    }
}
