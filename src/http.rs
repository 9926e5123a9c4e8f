//! GraphQL over HTTP on top of API Gateway proxy events.

use std::collections::HashMap;
use std::convert::{TryFrom, TryInto};

use apollo_parser::ast;
use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use failure::{Error as Failure, Fail};
use http::{header, method::Method, status::StatusCode};
use juniper::{http as juniper_http, DefaultScalarValue, FieldError, GraphQLType, RootNode};
use juniper_http::GraphQLRequest as GqlR;
use maplit::hashmap;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Unknown method {}", _0)]
    UnknownMethod(String),
    #[fail(display = "Method {} is not allowed", _0)]
    InvalidMethod(Method),
    #[fail(display = "Missing query argument")]
    MissingQuery,
    #[fail(display = "Missing post body")]
    MissingPostBody,
    #[fail(display = "Invalid body")]
    InvalidBody,
    #[fail(display = "Prohibit extra field {}", _0)]
    ProhibitExtraField(String),
    #[fail(display = "Query parameter must not occur more than once")]
    MultipleQueryParameter,
    #[fail(display = "Operation name parameter must not occur more than once")]
    MultipleOperationNameParameter,
    #[fail(display = "Variables parameter must not occur more than once")]
    MultipleVariablesParameter,
    #[fail(display = "Invalid variables parameter")]
    InvalidVariablesParameter,
    #[fail(display = "Can only perform a mutation operation from a POST request.")]
    MutationOverGet,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidMethod(_) | Error::MutationOverGet => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

///
/// Whether the operation `operation_name` picks out of `document` is a
/// mutation. Documents that do not parse, or where no single operation is
/// selected, are left for the executor to report.
///
fn selects_mutation(document: &str, operation_name: Option<&str>) -> bool {
    let tree = apollo_parser::Parser::new(document).parse();
    if tree.errors().next().is_some() {
        return false;
    }
    let operations: Vec<ast::OperationDefinition> = tree
        .document()
        .definitions()
        .filter_map(|definition| match definition {
            ast::Definition::OperationDefinition(operation) => Some(operation),
            _ => None,
        })
        .collect();
    let selected = match operation_name {
        Some(wanted) => operations.into_iter().find(|operation| {
            operation
                .name()
                .map_or(false, |name| name.text().to_string() == wanted)
        }),
        None if operations.len() == 1 => operations.into_iter().next(),
        None => None,
    };
    selected
        .and_then(|operation| operation.operation_type())
        .map_or(false, |kind| kind.mutation_token().is_some())
}

///
/// The parts of an API Gateway proxy event the endpoint looks at
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProxyRequest {
    pub method: String,
    pub query: HashMap<String, Vec<String>>,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl ProxyRequest {
    pub fn get(params: &[(&str, &str)]) -> Self {
        let mut query: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in params {
            query
                .entry((*key).to_owned())
                .or_default()
                .push((*value).to_owned());
        }
        Self {
            method: Method::GET.to_string(),
            query,
            ..Default::default()
        }
    }

    pub fn post<S: Into<String>>(body: S) -> Self {
        Self {
            method: Method::POST.to_string(),
            headers: hashmap! {header::CONTENT_TYPE.to_string() => "application/json".to_owned()},
            body: Some(body.into()),
            ..Default::default()
        }
    }

    pub fn method(&self) -> Result<Method, Failure> {
        match Method::try_from(self.method.as_str()) {
            Ok(method) => Ok(method),
            Err(_err) => Err(Error::UnknownMethod(self.method.to_owned()).into()),
        }
    }
}

impl From<ApiGatewayProxyRequest> for ProxyRequest {
    fn from(req: ApiGatewayProxyRequest) -> Self {
        // REST APIs fill both maps, test consoles sometimes only the single valued one
        let query = if req.multi_value_query_string_parameters.is_empty() {
            req.query_string_parameters
                .into_iter()
                .map(|(key, value)| (key, vec![value]))
                .collect()
        } else {
            req.multi_value_query_string_parameters
        };
        Self {
            method: req.http_method.unwrap_or_default(),
            query,
            headers: req.headers,
            body: req.body,
        }
    }
}

#[derive(Debug, serde_derive::Deserialize, PartialEq)]
#[serde(untagged)]
enum GraphQLBatchRequest {
    Single(GqlR<DefaultScalarValue>),
    Batch(Vec<GqlR<DefaultScalarValue>>),
}

impl GraphQLBatchRequest {
    fn execute<'a, CtxT, QueryT, MutationT>(
        &'a self,
        root_node: &'a RootNode<QueryT, MutationT>,
        context: &CtxT,
    ) -> GraphQLBatchResponse<'a>
    where
        QueryT: GraphQLType<DefaultScalarValue, Context = CtxT>,
        MutationT: GraphQLType<DefaultScalarValue, Context = CtxT>,
    {
        match self {
            GraphQLBatchRequest::Single(request) => {
                GraphQLBatchResponse::Single(request.execute(root_node, context))
            }
            GraphQLBatchRequest::Batch(requests) => GraphQLBatchResponse::Batch(
                requests
                    .iter()
                    .map(|request| request.execute(root_node, context))
                    .collect(),
            ),
        }
    }

    fn operation_names(&self) -> Vec<Option<&str>> {
        match self {
            GraphQLBatchRequest::Single(req) => vec![req.operation_name()],
            GraphQLBatchRequest::Batch(reqs) => {
                reqs.iter().map(|req| req.operation_name()).collect()
            }
        }
    }
}

#[derive(serde_derive::Serialize)]
#[serde(untagged)]
enum GraphQLBatchResponse<'a> {
    Single(juniper_http::GraphQLResponse<'a>),
    Batch(Vec<juniper_http::GraphQLResponse<'a>>),
}

impl<'a> GraphQLBatchResponse<'a> {
    fn is_ok(&self) -> bool {
        match self {
            GraphQLBatchResponse::Single(response) => response.is_ok(),
            GraphQLBatchResponse::Batch(responses) => {
                responses.iter().all(|response| response.is_ok())
            }
        }
    }
}

fn response(
    status_code: StatusCode,
    content_type: String,
    body: String,
) -> ApiGatewayProxyResponse {
    ApiGatewayProxyResponse {
        status_code: status_code.as_u16() as i64,
        multi_value_headers: HashMap::with_capacity(0),
        headers: hashmap! {header::CONTENT_TYPE.to_string() => content_type},
        is_base64_encoded: Some(false),
        body: Some(body),
    }
}

fn html(body: String) -> ApiGatewayProxyResponse {
    response(StatusCode::OK, "text/html".into(), body)
}

fn json<T: Serialize>(status_code: StatusCode, value: &T) -> ApiGatewayProxyResponse {
    match serde_json::to_string(value) {
        Ok(body) => response(status_code, "application/json".into(), body),
        Err(err) => {
            warn!(error = %err, "could not serialize response");
            response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "text/plain".into(),
                "Internal Server Error".into(),
            )
        }
    }
}

/// Query string form of a request, `variables` still JSON encoded.
#[derive(Clone, PartialEq, Debug)]
struct GetGraphQLRequest {
    query: String,
    operation_name: Option<String>,
    variables: Option<String>,
}

impl TryFrom<GetGraphQLRequest> for GqlR<DefaultScalarValue> {
    type Error = Failure;

    fn try_from(get_req: GetGraphQLRequest) -> Result<Self, Self::Error> {
        let GetGraphQLRequest {
            query,
            operation_name,
            variables,
        } = get_req;
        let variables = match variables {
            Some(variables) => match serde_json::from_str(&variables) {
                Ok(variables) => Some(variables),
                Err(_) => return Err(Error::InvalidVariablesParameter.into()),
            },
            None => None,
        };
        Ok(Self::new(query, operation_name, variables))
    }
}

/// Simple wrapper around an incoming GraphQL request
///
/// Built from the query string of a GET or the JSON body of a POST, either a
/// single request object or an array of them.
#[derive(Debug, PartialEq)]
pub struct GraphQLRequest(GraphQLBatchRequest);

impl GraphQLRequest {
    fn from_get(req: &ProxyRequest) -> Result<Self, Failure> {
        let mut query: Option<String> = None;
        let mut operation_name: Option<String> = None;
        let mut variables: Option<String> = None;
        for (key, value) in &req.query {
            match key.as_str() {
                "query" => {
                    if value.is_empty() {
                        return Err(Error::MissingQuery.into());
                    } else if value.len() > 1 {
                        return Err(Error::MultipleQueryParameter.into());
                    } else {
                        query.replace(value[0].to_owned());
                    }
                }
                "operationName" | "operation_name" => {
                    if value.len() > 1 || operation_name.is_some() {
                        return Err(Error::MultipleOperationNameParameter.into());
                    }
                    operation_name = value.first().cloned();
                }
                "variables" => {
                    if value.len() > 1 {
                        return Err(Error::MultipleVariablesParameter.into());
                    }
                    variables = value.first().cloned();
                }
                _ => return Err(Error::ProhibitExtraField(key.to_owned()).into()),
            }
        }
        let query = query.ok_or(Error::MissingQuery)?;
        if selects_mutation(&query, operation_name.as_deref()) {
            return Err(Error::MutationOverGet.into());
        }
        let req = GetGraphQLRequest {
            variables,
            operation_name,
            query,
        };
        Ok(Self(GraphQLBatchRequest::Single(req.try_into()?)))
    }

    fn from_post(req: &ProxyRequest) -> Result<Self, Failure> {
        let body = req.body.as_ref().ok_or(Error::MissingPostBody)?;
        match serde_json::from_str::<GraphQLBatchRequest>(body) {
            Ok(batch) => Ok(Self(batch)),
            Err(_) => Err(Error::InvalidBody.into()),
        }
    }

    /// Execute an incoming GraphQL query
    pub fn execute<CtxT, QueryT, MutationT>(
        &self,
        root_node: &RootNode<QueryT, MutationT>,
        context: &CtxT,
    ) -> ApiGatewayProxyResponse
    where
        QueryT: GraphQLType<DefaultScalarValue, Context = CtxT>,
        MutationT: GraphQLType<DefaultScalarValue, Context = CtxT>,
    {
        let response = self.0.execute(root_node, context);
        let status_code = if response.is_ok() {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        };
        json(status_code, &response)
    }

    /// Returns the operation names associated with this request.
    ///
    /// For batch requests there will be multiple names.
    pub fn operation_names(&self) -> Vec<Option<&str>> {
        self.0.operation_names()
    }
}

impl TryFrom<&ProxyRequest> for GraphQLRequest {
    type Error = Failure;

    fn try_from(req: &ProxyRequest) -> Result<Self, Self::Error> {
        match req.method()? {
            Method::GET => Ok(Self::from_get(req)?),
            Method::POST => Ok(Self::from_post(req)?),
            raw_method => Err(Error::InvalidMethod(raw_method).into()),
        }
    }
}

/// Constructs an error response outside of the normal execution flow
pub fn error(error: FieldError) -> ApiGatewayProxyResponse {
    let response = juniper_http::GraphQLResponse::error(error);
    json(StatusCode::BAD_REQUEST, &response)
}

/// Constructs a custom response outside of the normal execution flow
pub fn custom(status_code: StatusCode, response: serde_json::Value) -> ApiGatewayProxyResponse {
    json(status_code, &response)
}

/// Generate an HTML page containing GraphiQL
pub fn graphiql_source(graphql_endpoint_url: &str) -> ApiGatewayProxyResponse {
    html(juniper::http::graphiql::graphiql_source(
        graphql_endpoint_url,
    ))
}

/// Generate an HTML page containing GraphQL Playground
pub fn playground_source(graphql_endpoint_url: &str) -> ApiGatewayProxyResponse {
    html(juniper::http::playground::playground_source(
        graphql_endpoint_url,
    ))
}
