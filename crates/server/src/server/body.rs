//! Size-capped request body reading.
//!
//! The body is pulled frame by frame and the cap is checked after every
//! frame, so an oversized upload is rejected as soon as it crosses the limit
//! instead of after it has been fully buffered.

use bytes::{Bytes, BytesMut};
use http_body::Body as HttpBody;
use http_body_util::BodyExt;
use thiserror::Error;

/// Largest accepted `POST /todos` body, in bytes.
pub const MAX_BODY_BYTES: usize = 10_000;

/// Errors from [`read_bounded`].
#[derive(Debug, Error)]
pub enum BodyError {
    /// The accumulated body grew past `limit` bytes.
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    /// The underlying transport failed mid-body.
    #[error("failed to read request body: {0}")]
    Read(String),
}

/// Collect `body` into memory, failing the moment more than `limit` bytes
/// have arrived. No further frames are polled after the limit is crossed.
///
/// Trailer frames are ignored.
pub async fn read_bounded<B>(body: B, limit: usize) -> Result<Bytes, BodyError>
where
    B: HttpBody<Data = Bytes>,
    B::Error: std::fmt::Display,
{
    let mut body = std::pin::pin!(body);
    let mut buf = BytesMut::new();

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(|e| BodyError::Read(e.to_string()))?;
        if let Ok(data) = frame.into_data() {
            if buf.len() + data.len() > limit {
                return Err(BodyError::TooLarge { limit });
            }
            buf.extend_from_slice(&data);
        }
    }

    Ok(buf.freeze())
}
