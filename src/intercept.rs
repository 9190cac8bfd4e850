use http::Method;

use crate::{Error, GuardConfig, Session, Token, ViewData};

/// Outcome of running a request through the guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The request may reach its handler.
    Passed(Token),
    /// The request was checked and didn't carry the session's token.
    Rejected,
}

/// Decides whether a request may proceed.
///
/// Makes sure `session` holds a token, validates `user_token` against it when
/// the method and path call for it, and publishes the token to `view` as
/// `csrf_key` and `csrf_token` unless the request is rejected.
///
/// Fails with [`Error::SessionRequired`] when there is no session, before any
/// token is generated, and with [`Error::SessionStore`] when the session can't
/// be read or written.
pub async fn intercept(
    config: &GuardConfig,
    session: Option<&Session>,
    method: &Method,
    path: &str,
    user_token: Option<&str>,
    view: &mut ViewData,
) -> Result<Verdict, Error> {
    let session = session.ok_or(Error::SessionRequired)?;
    let key = config.token_key();

    let mut token = session
        .get_or_insert_with(key, || {
            tracing::debug!(key, "issuing csrf token");
            Token::generate()
        })
        .await?;

    if config.should_check(method, path) {
        if !Token::matches(&token, user_token) {
            tracing::warn!(%method, path, "rejecting request with invalid or missing csrf token");
            return Ok(Verdict::Rejected);
        }

        if config.rotates() {
            tracing::debug!(key, "rotating csrf token");
            token = Token::generate();
            session.set(key, token.clone()).await?;
        }
    } else {
        tracing::trace!(%method, path, "csrf check skipped");
    }

    view.merge([("csrf_key", key), ("csrf_token", token.as_str())]);

    Ok(Verdict::Passed(Token {
        key: key.to_owned(),
        value: token,
    }))
}
