//! Lenient JSON body extractor.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::ServerError;

/// JSON body that treats an empty payload as the type's default.
///
/// Clients may send no body at all to a write endpoint; that is the same as
/// sending `{}`. Malformed JSON is a client error rendered in the usual error
/// envelope.
#[derive(Debug, Clone, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ServerError::InvalidRequest(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ServerError::InvalidRequest(format!("Malformed JSON body: {e}")))
    }
}
