use async_trait::async_trait;
use axum_core::extract::FromRequestParts;
use http::request::Parts;

use crate::{Error, Token, ViewData};

/// Available on requests that passed the guard, rejected with a `500`
/// otherwise.
#[async_trait]
impl<S> FromRequestParts<S> for Token
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Token>() {
            Some(token) => Ok(token.clone()),
            None => {
                tracing::debug!("`Token` requested outside of `CsrfGuard`");
                Err(Error::ExtensionNotFound("Token".into()))
            }
        }
    }
}

/// Yields an empty `ViewData` when nothing was published for the request.
#[async_trait]
impl<S> FromRequestParts<S> for ViewData
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<ViewData>().cloned().unwrap_or_default())
    }
}
