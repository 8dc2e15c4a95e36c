use async_trait::async_trait;
use serde::Serialize;

use crate::request_params::Variables;

/// The GraphQL execution engine the handler forwards resolved requests to.
///
/// Execution errors are returned next to the result instead of replacing it, since a
/// GraphQL response is expected to carry its own `errors`. The handler serves the
/// result either way, unless strict errors are enabled.
#[async_trait]
pub trait Executor: Send + Sync + 'static {
    /// Value passed through, untouched, to every execution.
    type Context: Send + Sync + 'static;
    /// Result of an execution, usually a `{"data", "errors"}` object.
    type Response: Serialize + Send;
    type Error: std::error::Error + Send;

    async fn execute(
        &self,
        context: &Self::Context,
        query: &str,
        variables: Option<&Variables>,
        operation_name: Option<&str>,
    ) -> (Self::Response, Option<Self::Error>);
}
