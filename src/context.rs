//! Per-request resolver context.

use crate::store::Store;
use std::sync::Arc;

///
/// Context for Juniper, built fresh for every request
///
pub struct Context {
    // shared record store, the same instance for every request
    pub store: Arc<Store>,
    // id of the user the request was made by, if the identity provider knows one
    pub user_id: Option<String>,
}

impl juniper::Context for Context {}

impl Context {
    pub fn new(store: Arc<Store>, user_id: Option<String>) -> Self {
        Self { store, user_id }
    }
}
