use std::collections::HashMap;

use http::{header::CONTENT_TYPE, Method};
use ntex::web::HttpRequest;
use serde::de::Error as _;
use sonic_rs::{JsonContainerTrait, JsonValueTrait, Value};
use tracing::{debug, trace};

use crate::content_type::RequestContentType;
use crate::error::RequestParamsError;

pub type Variables = HashMap<String, sonic_rs::Value>;

/// GraphQL options of a single request, for example from
/// `/graphql?query=query getUser($id: ID) { user(id: $id) { lastName } }&variables={"id":"4"}`.
#[derive(Debug, Default, Clone)]
pub struct RequestParameters {
    pub query: String,
    pub variables: Option<Variables>,
    pub operation_name: Option<String>,
}

impl RequestParameters {
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.variables.is_none() && self.operation_name.is_none()
    }
}

/// Decoded `key=value` pairs of a query string or form body, in their original order.
struct UrlValues(Vec<(String, String)>);

impl UrlValues {
    /// Decodes `input`, rejecting `%` escapes that are not followed by two hex digits.
    fn from_bytes(input: &[u8]) -> Result<Self, serde_urlencoded::de::Error> {
        if let Some(position) = invalid_percent_escape(input) {
            return Err(serde_urlencoded::de::Error::custom(format!(
                "invalid percent-encoding at byte {}",
                position
            )));
        }

        serde_urlencoded::from_bytes(input).map(UrlValues)
    }

    /// First value of `key`, if any.
    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    fn into_request_parameters(self) -> Option<RequestParameters> {
        let query = self.get("query").filter(|query| !query.is_empty())?;

        Some(RequestParameters {
            query: query.to_string(),
            variables: self.get("variables").and_then(parse_variables),
            operation_name: non_empty(self.get("operationName").map(str::to_string)),
        })
    }
}

fn invalid_percent_escape(input: &[u8]) -> Option<usize> {
    input
        .iter()
        .enumerate()
        .filter(|(_, byte)| **byte == b'%')
        .map(|(position, _)| position)
        .find(|&position| {
            !matches!(
                input.get(position + 1..position + 3),
                Some([high, low]) if high.is_ascii_hexdigit() && low.is_ascii_hexdigit()
            )
        })
}

fn parse_variables(raw: &str) -> Option<Variables> {
    if raw.is_empty() {
        return None;
    }

    match sonic_rs::from_str::<Variables>(raw) {
        Ok(variables) => Some(variables),
        Err(err) => {
            debug!("ignoring variables that are not a JSON object: {}", err);
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// Resolves the GraphQL parameters of an HTTP request.
///
/// The URL query string wins over the body for any method. POST bodies are decoded
/// according to their `Content-Type`, see [`RequestContentType`].
///
/// Never fails: anything that cannot be parsed results in empty parameters, and
/// the executor is left to reject them.
pub fn resolve_request_parameters(req: &HttpRequest, body: Option<&[u8]>) -> RequestParameters {
    if let Some(params) = req.uri().query().and_then(from_query_string) {
        trace!("resolved GraphQL parameters from the query string");
        return params;
    }

    if req.method() != Method::POST {
        trace!(
            "no 'query' in the query string of a {} request",
            req.method()
        );
        return RequestParameters::default();
    }

    let Some(body) = body else {
        debug!("POST request body is not readable");
        return RequestParameters::default();
    };

    let content_type = RequestContentType::from_header(
        req.headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
    );
    trace!("processing POST body as {}", content_type.as_str());

    let resolved = match content_type {
        RequestContentType::GraphQL => from_graphql_body(body),
        RequestContentType::FormUrlEncoded => from_form_body(body),
        RequestContentType::Json => from_json_body(body),
    };

    resolved.unwrap_or_else(|err| {
        debug!("continuing with empty GraphQL parameters: {}", err);
        RequestParameters::default()
    })
}

fn from_query_string(query_string: &str) -> Option<RequestParameters> {
    match UrlValues::from_bytes(query_string.as_bytes()) {
        Ok(values) => values.into_request_parameters(),
        Err(err) => {
            debug!("failed to decode query string: {}", err);
            None
        }
    }
}

fn from_graphql_body(body: &[u8]) -> Result<RequestParameters, RequestParamsError> {
    let query = std::str::from_utf8(body)?;

    Ok(RequestParameters {
        query: query.to_string(),
        ..Default::default()
    })
}

fn from_form_body(body: &[u8]) -> Result<RequestParameters, RequestParamsError> {
    UrlValues::from_bytes(body)?
        .into_request_parameters()
        .ok_or(RequestParamsError::MissingFormQuery)
}

/// Reads `query`, `variables` and `operationName` from a JSON object, each on its own.
///
/// A field with an unexpected type is left unset without affecting the others.
/// `variables` may also be a string holding the JSON-encoded object.
fn from_json_body(body: &[u8]) -> Result<RequestParameters, RequestParamsError> {
    let body: Value = sonic_rs::from_slice(body)?;
    let Some(fields) = body.as_object() else {
        return Err(RequestParamsError::JsonBodyNotAnObject);
    };

    Ok(RequestParameters {
        query: json_string(fields.get(&"query"), "query")
            .unwrap_or_default()
            .to_string(),
        variables: fields.get(&"variables").and_then(json_variables),
        operation_name: json_string(fields.get(&"operationName"), "operationName")
            .filter(|name| !name.is_empty())
            .map(str::to_string),
    })
}

fn json_string<'a>(value: Option<&'a Value>, field: &str) -> Option<&'a str> {
    let value = value.filter(|value| !value.is_null())?;
    if value.as_str().is_none() {
        debug!("ignoring '{}' of type {:?}, expected a string", field, value.get_type());
    }
    value.as_str()
}

fn json_variables(value: &Value) -> Option<Variables> {
    if let Some(raw) = value.as_str() {
        trace!("variables sent as a JSON-encoded string");
        return parse_variables(raw);
    }

    match value.as_object() {
        Some(object) => Some(
            object
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        ),
        None => {
            if !value.is_null() {
                debug!("ignoring variables of type {:?}, expected an object", value.get_type());
            }
            None
        }
    }
}
