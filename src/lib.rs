/*!

# recipe_graphql

A small [GraphQL][GraphQL] API over an in-memory set of users and their recipes,
built with [Juniper][Juniper] and served as an [AWS Api Gateway][AWS Api Gateway]
proxy integration on the [AWS Lambda Runtime][AWS Lambda Runtime].

## Schema

```graphql
type Query {
  hello(name: String = "stranger"): String
  users(id: String): [User]
  recipes(id: String): [Recipe]
  me: User
}

type User { id: ID!, firstName: String!, lastName: String!, recipes: [Recipe] }
type Recipe { id: ID!, name: String, users: [User] }

type Mutation {
  addRecipe(name: String): AddRecipePayload
}

type AddRecipePayload { ok: Boolean, recipe: Recipe, error: AddRecipeError }
```

A `GET` without query string serves GraphiQL (or GraphQL Playground), a `GET`
with `query`/`operationName`/`variables` or a `POST` with a JSON body executes
the document. Mutations are only accepted over `POST`.

## Usage

```no_run
use std::sync::Arc;
use recipe_graphql::{schema, GraphQLHandler, ProxyRequest, StaticIdentity, Store};

let handler = GraphQLHandler::new(schema(), Arc::new(Store::seeded()), StaticIdentity::default());
let response = handler.handle(ProxyRequest::post(r#"{"query": "{ me { firstName } }"}"#));
assert_eq!(response.status_code, 200);
```

[AWS Api Gateway]: https://aws.amazon.com/api-gateway/
[AWS Lambda Runtime]: https://github.com/awslabs/aws-lambda-rust-runtime
[Juniper]: https://github.com/graphql-rust/juniper
[GraphQL]: http://graphql.org

*/

extern crate serde_derive;

pub mod auth;
pub mod config;
pub mod context;
pub mod handler;
pub mod http;
pub mod schema;
pub mod store;
pub mod types;

pub use auth::{IdentityProvider, StaticIdentity};
pub use config::{Config, Explorer};
pub use context::Context;
pub use handler::GraphQLHandler;
pub use http::ProxyRequest;
pub use schema::{schema, Schema};
pub use store::Store;
