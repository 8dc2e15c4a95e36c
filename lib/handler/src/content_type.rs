/// `Content-Type` of a raw GraphQL document sent as the request body.
pub const CONTENT_TYPE_GRAPHQL: &str = "application/graphql";
/// `Content-Type` of a form-encoded body carrying `query`, `variables` and `operationName` fields.
pub const CONTENT_TYPE_FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";
/// `Content-Type` of a JSON body shaped like `{"query", "variables", "operationName"}`.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// How the body of a POST request encodes the GraphQL parameters.
#[derive(PartialEq, Eq, Default, Debug, Clone, Copy)]
pub enum RequestContentType {
    /// `application/graphql`, the body is the query document itself.
    GraphQL,
    /// `application/x-www-form-urlencoded`
    FormUrlEncoded,
    /// `application/json`
    ///
    /// Also used for a missing header and for every media type we do not know about.
    #[default]
    Json,
}

impl RequestContentType {
    /// Picks the body encoding from the raw `Content-Type` header value.
    ///
    /// Only the media type before the first `;` is significant, and it is matched
    /// exactly (case-sensitive, no trimming).
    pub fn from_header(header_value: Option<&str>) -> RequestContentType {
        let media_type = header_value
            .and_then(|value| value.split(';').next())
            .unwrap_or_default();

        match media_type {
            CONTENT_TYPE_GRAPHQL => RequestContentType::GraphQL,
            CONTENT_TYPE_FORM_URL_ENCODED => RequestContentType::FormUrlEncoded,
            _ => RequestContentType::Json,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            RequestContentType::GraphQL => CONTENT_TYPE_GRAPHQL,
            RequestContentType::FormUrlEncoded => CONTENT_TYPE_FORM_URL_ENCODED,
            RequestContentType::Json => CONTENT_TYPE_JSON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_request_content_type() {
        let cases = vec![
            (None, RequestContentType::Json),
            (Some(""), RequestContentType::Json),
            (Some("application/json"), RequestContentType::Json),
            (
                Some("application/json; charset=utf-8"),
                RequestContentType::Json,
            ),
            (Some("application/graphql"), RequestContentType::GraphQL),
            (
                Some("application/graphql;charset=utf-8"),
                RequestContentType::GraphQL,
            ),
            (
                Some("application/x-www-form-urlencoded"),
                RequestContentType::FormUrlEncoded,
            ),
            (
                Some("application/x-www-form-urlencoded; charset=UTF-8"),
                RequestContentType::FormUrlEncoded,
            ),
            // matching is exact, anything else is treated as JSON
            (Some("Application/GraphQL"), RequestContentType::Json),
            (Some(" application/graphql"), RequestContentType::Json),
            (Some("application/graphql ; charset=utf-8"), RequestContentType::Json),
            (Some("text/plain"), RequestContentType::Json),
        ];

        for (header_value, expected) in cases {
            assert_eq!(
                RequestContentType::from_header(header_value),
                expected,
                "wrong content type for {:?}",
                header_value
            );
        }
    }

    #[test]
    fn content_type_as_str_matches_header_value() {
        for content_type in [
            RequestContentType::GraphQL,
            RequestContentType::FormUrlEncoded,
            RequestContentType::Json,
        ] {
            assert_eq!(
                RequestContentType::from_header(Some(content_type.as_str())),
                content_type
            );
        }
    }
}
