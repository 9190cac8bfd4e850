//! ## Overview
//!
//! This crate mitigates CSRF with the [Synchronizer Token Pattern][owasp-synchronizer-token].
//!
//! ### How it works
//!
//! - **Session**: A session layer of your choice runs before [`CsrfGuard`] and attaches a
//!   [`Session`] to every request, backed by any [`SessionStore`]. With the `tower-sessions`
//!   feature, [`tower-sessions`][crate-tower-sessions]'s `SessionManagerLayer` works as is.
//!   Requests without a session, or whose store fails, are answered with a `500`, since
//!   skipping the check silently would leave you unprotected.
//! - **Token creation**: The first request of a session stores a token in it under the
//!   **token key** (`csrf_token` by default). The token is 32 bytes from a cryptographically
//!   secure generator (the [`rand`][crate-rand] crate), base64 encoded.
//! - **Token publication**: Every request that passes gets the token as a [`Token`] extension
//!   and merged into its [`ViewData`] as `csrf_key` and `csrf_token`, ready to be rendered as a
//!   hidden form field.
//! - **Token validation**:
//!   - `POST`, `PUT` and `DELETE` requests are checked, other methods never are.
//!   - The token is read from the body field named after the token key, in url-encoded or
//!     multipart forms, and compared in constant time with the one in the session. When the
//!     field repeats, the last value counts.
//!   - A missing or different token ends the request with `400 Bad Request` and the body
//!     `Invalid or missing CSRF token.`
//!
//! ### Excluded paths
//!
//! Paths can be excluded by name through a [`RouteResolver`], or directly. By default the
//! guard only validates once at least one path is excluded: with an empty exclusion list,
//! nothing is validated. Call [`CsrfGuard::strict`] to validate every path that isn't
//! excluded instead.
//!
//! ### Rotation
//!
//! Tokens live as long as the session. [`CsrfGuard::rotate`] replaces the token after every
//! successful validation.
//!
//! ## Usage
//!
//! ### With [`axum`][crate-axum]
//!
//! ```rust, no_run
//! use std::{collections::HashMap, net::SocketAddr};
//!
//! use axum::{routing::{get, post}, Router};
//! use csrf_guard::{CsrfGuard, Token};
//! use tower_sessions::{MemoryStore, SessionManagerLayer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let routes = HashMap::from([("webhook".to_owned(), "/webhook".to_owned())]);
//!
//!     let mut guard = CsrfGuard::new("csrf_token")?.strict(true);
//!     guard.add_excluded_routes(&routes, "webhook")?;
//!
//!     let app = Router::new()
//!         .route("/", get(form).post(|| async { "Saved!" }))
//!         .route("/webhook", post(|| async {}))
//!         .layer(guard)
//!         .layer(SessionManagerLayer::new(MemoryStore::default()));
//!
//!     let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
//!     let listener = tokio::net::TcpListener::bind(&addr).await?;
//!
//!     axum::serve(listener, app.into_make_service()).await?;
//!
//!     Ok(())
//! }
//!
//! async fn form(token: Token) -> axum::response::Html<String> {
//!     axum::response::Html(format!(
//!         r#"<form method="post">{}<button>Save</button></form>"#,
//!         token.hidden_input()
//!     ))
//! }
//! ```
//!
//! [crate-axum]: https://github.com/tokio-rs/axum
//! [crate-rand]: https://github.com/rust-random/rand
//! [crate-tower-sessions]: https://github.com/maxcountryman/tower-sessions
//! [owasp-synchronizer-token]: https://cheatsheetseries.owasp.org/cheatsheets/Cross-Site_Request_Forgery_Prevention_Cheat_Sheet.html#synchronizer-token-pattern

pub use error::Error;
pub use guard::{CsrfGuard, GuardConfig};
pub use intercept::{intercept, Verdict};
pub use routes::{resolver_fn, ResolverFn, RouteResolver, Routes};
pub use service::CsrfGuardService;
pub use session::{MemorySession, Session, SessionStore};
pub use token::Token;
pub use view::ViewData;

mod error;
mod form;
mod guard;
mod intercept;
mod routes;
mod service;
mod session;
mod token;
mod view;

#[cfg(feature = "axum")]
mod extract;
