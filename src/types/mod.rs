//! Stored records and the GraphQL objects they resolve as.

pub mod recipe;
pub mod user;

pub use recipe::Recipe;
pub use user::User;

/// GraphQL `[T]`: a nullable list of nullable items.
pub type NullableList<T> = Option<Vec<Option<T>>>;

pub(crate) fn nullable_list<T>(items: Vec<T>) -> NullableList<T> {
    Some(items.into_iter().map(Some).collect())
}
