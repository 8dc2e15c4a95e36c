use futures::TryStreamExt;
use http::header::CONTENT_LENGTH;
use ntex::{
    http::error::PayloadError,
    util::{Bytes, BytesMut},
    web::{self, HttpRequest},
};
use strum::IntoStaticStr;

#[derive(Debug, thiserror::Error, IntoStaticStr)]
pub enum ReadBodyStreamError {
    #[error("Failed to read request body: {0}")]
    #[strum(serialize = "PAYLOAD_READ_ERROR")]
    PayloadReadError(#[from] PayloadError),

    #[error("Content-Length header has invalid value")]
    #[strum(serialize = "INVALID_CONTENT_LENGTH")]
    InvalidContentLengthHeader,

    #[error("Request body exceeds the maximum allowed size of {0} bytes")]
    #[strum(serialize = "PAYLOAD_TOO_LARGE")]
    PayloadTooLarge(usize),
}

impl ReadBodyStreamError {
    pub fn error_code(&self) -> &'static str {
        self.into()
    }
}

/// Reads the whole request body into memory, refusing bodies larger than `max_size`.
pub async fn read_body_stream(
    req: &HttpRequest,
    mut body_stream: web::types::Payload,
    max_size: usize,
) -> Result<Bytes, ReadBodyStreamError> {
    let content_length = match req.headers().get(CONTENT_LENGTH) {
        Some(header) => {
            let content_length: usize = header
                .to_str()
                .ok()
                .and_then(|value| value.parse().ok())
                .ok_or(ReadBodyStreamError::InvalidContentLengthHeader)?;
            if content_length > max_size {
                return Err(ReadBodyStreamError::PayloadTooLarge(max_size));
            }
            content_length
        }
        None => 0,
    };

    let mut body = BytesMut::with_capacity(content_length);

    while let Some(chunk) = body_stream.try_next().await? {
        if chunk.len() > max_size.saturating_sub(body.len()) {
            return Err(ReadBodyStreamError::PayloadTooLarge(max_size));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body.freeze())
}
