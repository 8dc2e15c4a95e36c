use graphql_handler::{async_trait, Executor, Variables};
use serde::Serialize;

/// Executor answering every operation with the parameters it was called with.
///
/// Handy to check how a client encodes its requests.
pub struct EchoExecutor;

#[derive(Debug, thiserror::Error)]
pub enum EchoError {
    #[error("Must provide an operation.")]
    MissingQuery,
}

#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub data: Option<EchoData>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EchoResponseError>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoData {
    pub query: String,
    pub variables: Option<Variables>,
    pub operation_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EchoResponseError {
    pub message: String,
}

#[async_trait]
impl Executor for EchoExecutor {
    type Context = ();
    type Response = EchoResponse;
    type Error = EchoError;

    async fn execute(
        &self,
        _context: &(),
        query: &str,
        variables: Option<&Variables>,
        operation_name: Option<&str>,
    ) -> (EchoResponse, Option<EchoError>) {
        if query.is_empty() {
            let error = EchoError::MissingQuery;
            let response = EchoResponse {
                data: None,
                errors: vec![EchoResponseError {
                    message: error.to_string(),
                }],
            };
            return (response, Some(error));
        }

        let response = EchoResponse {
            data: Some(EchoData {
                query: query.to_string(),
                variables: variables.cloned(),
                operation_name: operation_name.map(str::to_string),
            }),
            errors: Vec::new(),
        };

        (response, None)
    }
}

#[cfg(test)]
mod tests {
    use graphql_handler::Executor;

    use super::{EchoError, EchoExecutor};

    #[ntex::test]
    async fn echoes_parameters() {
        let (response, error) = EchoExecutor.execute(&(), "{ x }", None, Some("Op")).await;

        assert!(error.is_none());
        let data = response.data.unwrap();
        assert_eq!(data.query, "{ x }");
        assert_eq!(data.operation_name.as_deref(), Some("Op"));
        assert!(response.errors.is_empty());
    }

    #[ntex::test]
    async fn empty_query_is_an_error_in_both_places() {
        let (response, error) = EchoExecutor.execute(&(), "", None, None).await;

        assert!(matches!(error, Some(EchoError::MissingQuery)));
        assert!(response.data.is_none());
        assert_eq!(response.errors[0].message, "Must provide an operation.");
    }
}
