use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct HttpServerConfig {
    /// The host address to bind the HTTP server to.
    ///
    /// Can also be set via the `HOST` environment variable.
    #[serde(default = "http_server_host_default")]
    host: String,

    /// The port to bind the HTTP server to.
    ///
    /// Can also be set via the `PORT` environment variable.
    #[serde(default = "http_server_port_default")]
    port: u16,

    /// The path GraphQL requests are served on, for every HTTP method.
    #[serde(default = "graphql_endpoint_default")]
    pub graphql_endpoint: String,

    /// The largest request body, in bytes, read before giving up on it. A body over
    /// the limit is handled as if the request had none.
    #[serde(default = "max_request_body_size_default")]
    pub max_request_body_size: usize,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: http_server_host_default(),
            port: http_server_port_default(),
            graphql_endpoint: graphql_endpoint_default(),
            max_request_body_size: max_request_body_size_default(),
        }
    }
}

fn http_server_host_default() -> String {
    "0.0.0.0".to_string()
}

fn http_server_port_default() -> u16 {
    4000
}

fn graphql_endpoint_default() -> String {
    "/graphql".to_string()
}

fn max_request_body_size_default() -> usize {
    2 * 1024 * 1024
}

impl HttpServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
