//! In-memory record store for users and recipes.
//!
//! Users are fixed at construction. Recipes are append-only and sit behind a
//! single [`RwLock`], so any number of resolvers may read while the
//! `addRecipe` mutation is the only writer.

use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use failure::Fail;
use tracing::{debug, info};
use uuid::Uuid;

use crate::types::{Recipe, User};

/// Id of the seeded user who plays the logged in user.
pub const SAMANTHA_ID: &str = "e2b23275-3a78-448a-b4c8-8e1c82e4344d";

const CHOCOLATE_CAKE_ID: &str = "4f56d71c-0988-4dad-97b3-108266827c0c";
const SPAGHETTI_ID: &str = "c9f063f4-2121-4394-860c-ed939096390b";
const BROWNIES_ID: &str = "62320110-dde3-4068-8b47-2dda783bb3db";
const LASAGNA_ID: &str = "6b912110-3984-4384-a351-7f30595a638d";

#[derive(Debug, Fail, PartialEq)]
pub enum StoreError {
    #[fail(display = "Recipe store is unavailable")]
    Unavailable,
    #[fail(display = "Recipe id {} already exists", _0)]
    DuplicateId(String),
}

///
/// Process wide backing store, shared with every request through the context
///
#[derive(Debug, Default)]
pub struct Store {
    users: Vec<User>,
    recipes: RwLock<Vec<Recipe>>,
}

impl Store {
    pub fn new(users: Vec<User>, recipes: Vec<Recipe>) -> Self {
        Self {
            users,
            recipes: RwLock::new(recipes),
        }
    }

    ///
    /// Store holding the demo data set: three users sharing four recipes
    ///
    pub fn seeded() -> Self {
        let recipes = vec![
            Recipe::new(CHOCOLATE_CAKE_ID, "Chocolate Cake"),
            Recipe::new(SPAGHETTI_ID, "Spaghetti"),
            Recipe::new(BROWNIES_ID, "Brownies"),
            Recipe::new(LASAGNA_ID, "Lasagna"),
        ];
        let users = vec![
            User::new(
                SAMANTHA_ID,
                "Samantha",
                "Stevenson",
                vec![CHOCOLATE_CAKE_ID, SPAGHETTI_ID],
            ),
            User::new(
                "45f82425-2796-4b6a-9db4-b484d9512605",
                "James",
                "Jones",
                vec![BROWNIES_ID, LASAGNA_ID],
            ),
            User::new(
                "593dedc5-e22e-482d-a17a-9d350b664abe",
                "Pat",
                "Peterson",
                vec![SPAGHETTI_ID, BROWNIES_ID, LASAGNA_ID],
            ),
        ];
        Self::new(users, recipes)
    }

    // Appends never leave the vector half written, so a poisoned lock still
    // guards consistent data for readers.
    fn read_recipes(&self) -> RwLockReadGuard<'_, Vec<Recipe>> {
        self.recipes.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every user id, in store order.
    pub fn all_user_ids(&self) -> Vec<String> {
        self.users.iter().map(|user| user.id.to_owned()).collect()
    }

    pub fn user_by_id(&self, id: &str) -> Option<User> {
        debug!(user_id = id, "fetching user");
        self.users.iter().find(|user| user.id == id).cloned()
    }

    ///
    /// Resolve each id in turn. Unknown ids keep their position as `None`,
    /// so the result is always as long as the input.
    ///
    pub fn users_by_ids<S: AsRef<str>>(&self, ids: &[S]) -> Vec<Option<User>> {
        ids.iter().map(|id| self.user_by_id(id.as_ref())).collect()
    }

    pub fn all_recipes(&self) -> Vec<Recipe> {
        self.read_recipes().clone()
    }

    pub fn recipe_by_id(&self, id: &str) -> Option<Recipe> {
        self.read_recipes()
            .iter()
            .find(|recipe| recipe.id == id)
            .cloned()
    }

    /// Recipes referenced by `user`, in recipe collection order.
    pub fn recipes_for_user(&self, user: &User) -> Vec<Recipe> {
        self.read_recipes()
            .iter()
            .filter(|recipe| user.recipe_ids.contains(&recipe.id))
            .cloned()
            .collect()
    }

    /// Users whose recipe list mentions `recipe`, in user collection order.
    pub fn users_for_recipe(&self, recipe: &Recipe) -> Vec<User> {
        let ids: Vec<&str> = self
            .users
            .iter()
            .filter(|user| user.recipe_ids.contains(&recipe.id))
            .map(|user| user.id.as_str())
            .collect();
        self.users_by_ids(&ids).into_iter().flatten().collect()
    }

    ///
    /// Create a recipe under a fresh id and append it to the store
    ///
    pub fn add_recipe(&self, name: Option<String>) -> Result<Recipe, StoreError> {
        let recipe = Recipe {
            id: Uuid::new_v4().to_string(),
            name,
        };
        self.insert_recipe(recipe)
    }

    pub(crate) fn insert_recipe(&self, recipe: Recipe) -> Result<Recipe, StoreError> {
        let mut recipes = self.recipes.write().map_err(|_| StoreError::Unavailable)?;
        if recipes.iter().any(|existing| existing.id == recipe.id) {
            return Err(StoreError::DuplicateId(recipe.id));
        }
        recipes.push(recipe.to_owned());
        info!(recipe_id = %recipe.id, "recipe added");
        Ok(recipe)
    }
}
