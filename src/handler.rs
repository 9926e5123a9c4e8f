//! Request handling: identity, context and execution for one proxy event.

use std::convert::TryFrom;
use std::sync::Arc;

use aws_lambda_events::event::apigw::ApiGatewayProxyResponse;
use http::{method::Method, status::StatusCode};
use juniper::{FieldError, Value};
use serde_json::json;
use tracing::{debug, warn};

use crate::auth::IdentityProvider;
use crate::config::Explorer;
use crate::context::Context;
use crate::http::{self as gql_http, GraphQLRequest, ProxyRequest};
use crate::schema::Schema;
use crate::store::Store;

/// Api Gateway GraphQL handler for GET and POST requests
///
/// Every request gets its own [`Context`], holding the shared store and
/// whatever user id the identity provider resolves for it.
pub struct GraphQLHandler {
    root_node: Schema,
    store: Arc<Store>,
    identity: Box<dyn IdentityProvider>,
    explorer: Explorer,
    endpoint: String,
}

impl GraphQLHandler {
    pub fn new<I>(root_node: Schema, store: Arc<Store>, identity: I) -> Self
    where
        I: IdentityProvider + 'static,
    {
        Self {
            root_node,
            store,
            identity: Box::new(identity),
            explorer: Explorer::default(),
            endpoint: "/".into(),
        }
    }

    pub fn with_explorer<S: Into<String>>(mut self, explorer: Explorer, endpoint: S) -> Self {
        self.explorer = explorer;
        self.endpoint = endpoint.into();
        self
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn handle(&self, req: ProxyRequest) -> ApiGatewayProxyResponse {
        let method = match req.method() {
            Ok(method) => method,
            Err(err) => return reject(err),
        };
        if method == Method::GET && req.query.is_empty() {
            return self.explorer_page();
        }

        let gql_req = match GraphQLRequest::try_from(&req) {
            Ok(gql_req) => gql_req,
            Err(err) => return reject(err),
        };
        let context = Context::new(Arc::clone(&self.store), self.identity.current_user_id(&req));
        debug!(
            operations = ?gql_req.operation_names(),
            user_id = ?context.user_id,
            "executing graphql request"
        );
        gql_req.execute(&self.root_node, &context)
    }

    fn explorer_page(&self) -> ApiGatewayProxyResponse {
        match self.explorer {
            Explorer::GraphiQL => gql_http::graphiql_source(&self.endpoint),
            Explorer::Playground => gql_http::playground_source(&self.endpoint),
        }
    }
}

fn reject(err: failure::Error) -> ApiGatewayProxyResponse {
    let status_code = err
        .downcast_ref::<gql_http::Error>()
        .map_or(StatusCode::BAD_REQUEST, gql_http::Error::status_code);
    warn!(error = %err, status = %status_code, "rejected graphql request");
    if status_code == StatusCode::METHOD_NOT_ALLOWED {
        gql_http::custom(status_code, json!({"errors": [{"message": err.to_string()}]}))
    } else {
        gql_http::error(FieldError::new(err, Value::null()))
    }
}
