use std::sync::Arc;

use aws_lambda_events::event::apigw::ApiGatewayProxyRequest;
use failure::Fail;
use lambda_runtime::{service_fn, LambdaEvent};
use recipe_graphql::{schema, Config, GraphQLHandler, StaticIdentity, Store};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env().map_err(Fail::compat)?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let handler = Arc::new(
        GraphQLHandler::new(
            schema(),
            Arc::new(Store::seeded()),
            StaticIdentity::new(config.current_user_id.to_owned()),
        )
        .with_explorer(config.explorer, config.endpoint.to_owned()),
    );
    info!(endpoint = %config.endpoint, explorer = ?config.explorer, "serving graphql");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<ApiGatewayProxyRequest>| {
        let handler = Arc::clone(&handler);
        async move { Ok::<_, Error>(handler.handle(event.payload.into())) }
    }))
    .await
}
