mod body_read;
pub mod content_type;
pub mod error;
pub mod executor;
pub mod handler;
pub mod request_params;

use std::sync::Arc;

use ntex::web::{self, HttpRequest};
use tracing::warn;

pub use crate::{
    body_read::{read_body_stream, ReadBodyStreamError},
    content_type::RequestContentType,
    error::{HandlerError, RequestParamsError},
    executor::Executor,
    handler::{Config, Handler, DEFAULT_MAX_REQUEST_BODY_SIZE},
    request_params::{resolve_request_parameters, RequestParameters, Variables},
};

pub use async_trait::async_trait;
pub use ntex;

/// ntex endpoint serving GraphQL through the [`Handler`] stored in the app state.
///
/// A body that cannot be read (broken stream, too large) is treated as missing.
pub async fn graphql_endpoint_handler<E: Executor>(
    request: HttpRequest,
    body_stream: web::types::Payload,
    handler: web::types::State<Arc<Handler<E>>>,
) -> web::HttpResponse {
    let body = match read_body_stream(&request, body_stream, handler.max_request_body_size()).await
    {
        Ok(body) => Some(body),
        Err(err) => {
            warn!(code = err.error_code(), "{}", err);
            None
        }
    };

    handler.serve_http(&request, body.as_deref()).await
}

/// Registers the GraphQL endpoint on `graphql_endpoint` for every HTTP method.
///
/// The app must hold an `Arc<Handler<E>>` state.
pub fn configure_ntex_app<E: Executor>(
    service_config: &mut web::ServiceConfig,
    graphql_endpoint: &str,
) {
    service_config.route(graphql_endpoint, web::to(graphql_endpoint_handler::<E>));
}
