#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Undefined GraphQL Executor")]
    MissingExecutor,
}

/// Reasons a request could not be turned into GraphQL parameters.
///
/// These never reach the client: the resolver logs them and continues with empty parameters.
#[derive(Debug, thiserror::Error)]
pub enum RequestParamsError {
    #[error("Request body is not valid UTF-8: {0}")]
    InvalidUtf8Body(#[from] std::str::Utf8Error),
    #[error("Failed to parse form body: {0}")]
    InvalidFormBody(#[from] serde_urlencoded::de::Error),
    #[error("Form body has no 'query' field")]
    MissingFormQuery,
    #[error("Failed to parse JSON body: {0}")]
    InvalidJsonBody(#[from] sonic_rs::Error),
    #[error("JSON body is not an object")]
    JsonBodyNotAnObject,
}
