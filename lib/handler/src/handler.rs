use std::sync::Arc;

use ntex::web::{self, HttpRequest};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, warn};

use crate::error::HandlerError;
use crate::executor::Executor;
use crate::request_params::resolve_request_parameters;

/// Indentation used for pretty responses.
const PRETTY_INDENT: &[u8] = b"   ";

/// Default limit for request bodies read by the ntex endpoint, 2 MiB.
pub const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 2 * 1024 * 1024;

pub struct Config<E: Executor> {
    /// Engine executing the resolved requests. Required, see [`Handler::new`].
    pub executor: Option<Arc<E>>,
    /// Passed to the executor on every request served through [`Handler::serve_http`].
    pub context: E::Context,
    /// Indent the JSON responses.
    pub pretty: bool,
    /// Respond with `500` and the executor's error instead of the result whenever the
    /// executor reports one.
    pub strict_errors: bool,
    /// Largest request body the ntex endpoint reads, in bytes.
    pub max_request_body_size: usize,
}

impl<E> Default for Config<E>
where
    E: Executor,
    E::Context: Default,
{
    fn default() -> Self {
        Self {
            executor: None,
            context: E::Context::default(),
            pretty: true,
            strict_errors: false,
            max_request_body_size: DEFAULT_MAX_REQUEST_BODY_SIZE,
        }
    }
}

/// Serves GraphQL over HTTP on top of an [`Executor`].
///
/// Immutable once built, share it between workers with an `Arc`.
pub struct Handler<E: Executor> {
    executor: Arc<E>,
    context: E::Context,
    pretty: bool,
    strict_errors: bool,
    max_request_body_size: usize,
}

impl<E> Handler<E>
where
    E: Executor,
    E::Context: Default,
{
    /// Builds a handler, using [`Config::default`] when no config is given.
    ///
    /// # Panics
    ///
    /// Panics when the config has no executor. A handler without one could never
    /// serve a request, so this is treated as a programming error.
    pub fn new(config: Option<Config<E>>) -> Self {
        match Self::try_new(config.unwrap_or_default()) {
            Ok(handler) => handler,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<E: Executor> Handler<E> {
    pub fn try_new(config: Config<E>) -> Result<Self, HandlerError> {
        let executor = config.executor.ok_or(HandlerError::MissingExecutor)?;

        Ok(Self {
            executor,
            context: config.context,
            pretty: config.pretty,
            strict_errors: config.strict_errors,
            max_request_body_size: config.max_request_body_size,
        })
    }

    pub fn max_request_body_size(&self) -> usize {
        self.max_request_body_size
    }

    /// Executes the request with the context stored in the handler's config.
    pub async fn serve_http(&self, req: &HttpRequest, body: Option<&[u8]>) -> web::HttpResponse {
        self.context_handler(&self.context, req, body).await
    }

    /// Executes the request with a caller-provided context.
    ///
    /// Always responds with `200 OK` and the executor's result, even when the executor
    /// also returned an error, unless strict errors are enabled.
    pub async fn context_handler(
        &self,
        context: &E::Context,
        req: &HttpRequest,
        body: Option<&[u8]>,
    ) -> web::HttpResponse {
        let params = resolve_request_parameters(req, body);

        let (result, error) = self
            .executor
            .execute(
                context,
                &params.query,
                params.variables.as_ref(),
                params.operation_name.as_deref(),
            )
            .await;

        if let Some(error) = error {
            if self.strict_errors {
                warn!("executor failed: {}", error);
                let payload = serde_json::json!({
                    "errors": [{ "message": error.to_string() }]
                });
                return web::HttpResponse::InternalServerError()
                    .body(self.response_body(&payload));
            }

            debug!("ignoring error returned next to the execution result: {}", error);
        }

        web::HttpResponse::Ok().body(self.response_body(&result))
    }

    /// Serializes a response, falling back to an empty body when that fails.
    fn response_body<T: Serialize + ?Sized>(&self, value: &T) -> Vec<u8> {
        to_json_bytes(value, self.pretty).unwrap_or_else(|err| {
            warn!("failed to serialize the GraphQL response: {}", err);
            Vec::new()
        })
    }
}

pub fn to_json_bytes<T: Serialize + ?Sized>(
    value: &T,
    pretty: bool,
) -> Result<Vec<u8>, serde_json::Error> {
    if !pretty {
        return serde_json::to_vec(value);
    }

    let mut buffer = Vec::with_capacity(128);
    let formatter = PrettyFormatter::with_indent(PRETTY_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(buffer)
}
