use axum_core::{
    body::Body,
    response::{IntoResponse, Response},
};
use http::{header, HeaderValue, StatusCode};

/// Body of the response sent when a checked request carries no valid token.
pub(crate) const REJECTION_MESSAGE: &str = "Invalid or missing CSRF token.";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The token key is empty or contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid token key \"{0}\"")]
    InvalidTokenKey(String),
    /// Excluded routes were given as an empty name or an empty list.
    #[error("excluded routes must be a route name or a non-empty list of route names")]
    InvalidRoutes,
    /// The route resolver didn't know the route name.
    #[error("couldn't resolve route `{0}`")]
    UnknownRoute(String),
    /// No session was attached to the request.
    #[error("sessions are required to use `CsrfGuard`. is a session layer running before it?")]
    SessionRequired,
    /// The session store failed to read or write the token.
    #[error("session store failed: {0}")]
    SessionStore(String),
    /// An expected extension was missing.
    #[error("couldn't extract `{0}`. is `CsrfGuard` enabled?")]
    ExtensionNotFound(String),
}

impl Error {
    /// Logs the error and turns it into the response ending the request.
    pub(crate) fn into_layer_response<E>(self) -> Result<Response, E> {
        tracing::error!(err = %self, "csrf guard failed");

        Ok(self.into_response())
    }

    pub(crate) fn make_layer_bad_request<E>() -> Result<Response, E> {
        let mut response = Response::new(Body::from(REJECTION_MESSAGE));
        *response.status_mut() = StatusCode::BAD_REQUEST;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );

        Ok(response)
    }
}

/// Every variant is a server-side failure. Store errors keep their details
/// out of the response body.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = match self {
            Error::SessionStore(_) => "session store failed".to_owned(),
            err => err.to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
