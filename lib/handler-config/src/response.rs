use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How execution results are written back to the client.
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ResponseConfig {
    /// Indent JSON responses (3 spaces) instead of writing them compactly.
    ///
    /// Can also be set via the `PRETTY` environment variable.
    #[serde(default = "pretty_default")]
    pub pretty: bool,

    /// When the executor reports an error, respond with `500` and that error instead of
    /// `200` with the execution result.
    ///
    /// Can also be set via the `STRICT_ERRORS` environment variable.
    #[serde(default)]
    pub strict_errors: bool,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            pretty: pretty_default(),
            strict_errors: false,
        }
    }
}

fn pretty_default() -> bool {
    true
}
