use std::sync::Arc;

use http::Method;
use tower_layer::Layer;

use crate::{routes::Routes, service::CsrfGuardService, Error, RouteResolver};

/// Largest form body buffered while looking for the token field.
const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Settings shared by every request a [`CsrfGuard`] handles.
#[derive(Clone, Debug)]
pub struct GuardConfig {
    pub(crate) token_key: String,
    pub(crate) excluded_paths: Vec<String>,
    pub(crate) strict: bool,
    pub(crate) rotate: bool,
    pub(crate) body_limit: usize,
}

impl GuardConfig {
    /// Session key and form field name of the token.
    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    pub fn excluded_paths(&self) -> &[String] {
        &self.excluded_paths
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn rotates(&self) -> bool {
        self.rotate
    }

    /// Whether requests to `path` are subject to validation.
    ///
    /// Outside of strict mode an empty exclusion list disables validation for
    /// every path.
    pub fn should_check_path(&self, path: &str) -> bool {
        let excluded = self.excluded_paths.iter().any(|p| p == path);

        if self.strict {
            !excluded
        } else {
            !self.excluded_paths.is_empty() && !excluded
        }
    }

    pub fn should_check_method(method: &Method) -> bool {
        [Method::POST, Method::PUT, Method::DELETE].contains(method)
    }

    pub fn should_check(&self, method: &Method, path: &str) -> bool {
        Self::should_check_method(method) && self.should_check_path(path)
    }
}

fn validate_token_key(key: &str) -> Result<(), Error> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidTokenKey(key.to_owned()))
    }
}

/// Layer that issues a per-session CSRF token and rejects `POST`, `PUT` and
/// `DELETE` requests whose form body doesn't echo it back.
#[derive(Clone, Debug)]
pub struct CsrfGuard {
    pub(crate) config: GuardConfig,
}

impl CsrfGuard {
    /// Creates a guard storing its token under `token_key`, both in the session
    /// and in submitted forms.
    ///
    /// Fails unless the key is non-empty and made of ASCII letters, digits,
    /// `-` and `_`.
    pub fn new(token_key: impl Into<String>) -> Result<Self, Error> {
        let token_key = token_key.into();
        validate_token_key(&token_key)?;

        Ok(Self::with_key(token_key))
    }

    fn with_key(token_key: String) -> Self {
        Self {
            config: GuardConfig {
                token_key,
                excluded_paths: Vec::new(),
                strict: false,
                rotate: false,
                body_limit: DEFAULT_BODY_LIMIT,
            },
        }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn token_key(&self) -> &str {
        self.config.token_key()
    }

    pub fn excluded_paths(&self) -> &[String] {
        self.config.excluded_paths()
    }

    /// Validates every path that isn't excluded, including when no path is
    /// excluded at all.
    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;

        self
    }

    /// Replaces the session token after each successful validation.
    pub fn rotate(mut self, rotate: bool) -> Self {
        self.config.rotate = rotate;

        self
    }

    pub fn body_limit(mut self, body_limit: usize) -> Self {
        self.config.body_limit = body_limit;

        self
    }

    /// Excludes an already resolved path.
    pub fn exclude_path(mut self, path: impl Into<String>) -> Self {
        self.config.excluded_paths.push(path.into());

        self
    }

    /// Resolves one or more route names with `resolver` and excludes the
    /// resulting paths, in order.
    ///
    /// Nothing is excluded when any of the names is empty or unknown.
    pub fn add_excluded_routes(
        &mut self,
        resolver: &impl RouteResolver,
        routes: impl Into<Routes>,
    ) -> Result<(), Error> {
        let paths = routes.into().resolve(resolver)?;
        self.config.excluded_paths.extend(paths);

        Ok(())
    }
}

impl Default for CsrfGuard {
    fn default() -> Self {
        Self::with_key("csrf_token".into())
    }
}

impl<S> Layer<S> for CsrfGuard {
    type Service = CsrfGuardService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CsrfGuardService::new(Arc::new(self.config.clone()), inner)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn resolver() -> HashMap<String, String> {
        HashMap::from([
            ("foo".to_owned(), "/foo".to_owned()),
            ("bar".to_owned(), "/bar".to_owned()),
        ])
    }

    #[test]
    fn accepts_valid_keys() {
        for key in ["csrf_token", "X-CSRF", "a", "_", "-", "Token123"] {
            assert!(CsrfGuard::new(key).is_ok(), "{key}");
        }
    }

    #[test]
    fn rejects_invalid_keys() {
        for key in ["", "csrf token", "csrf.token", "tökén", "a/b", "key="] {
            assert_eq!(
                CsrfGuard::new(key).map(|_| ()),
                Err(Error::InvalidTokenKey(key.into())),
                "{key}"
            );
        }
    }

    #[test]
    fn defaults_to_csrf_token() {
        let guard = CsrfGuard::default();

        assert_eq!(guard.token_key(), "csrf_token");
        assert!(guard.excluded_paths().is_empty());
    }

    #[test]
    fn appends_resolved_routes() -> Result<(), Error> {
        let mut guard = CsrfGuard::default();

        guard.add_excluded_routes(&resolver(), "foo")?;
        guard.add_excluded_routes(&resolver(), ["bar", "foo"])?;

        assert_eq!(guard.excluded_paths(), ["/foo", "/bar", "/foo"]);

        Ok(())
    }

    #[test]
    fn failed_exclusion_leaves_paths_untouched() {
        let mut guard = CsrfGuard::default().exclude_path("/kept");

        assert_eq!(
            guard.add_excluded_routes(&resolver(), ["foo", "nope"]),
            Err(Error::UnknownRoute("nope".into()))
        );
        assert_eq!(
            guard.add_excluded_routes(&resolver(), Vec::<&str>::new()),
            Err(Error::InvalidRoutes)
        );
        assert_eq!(guard.excluded_paths(), ["/kept"]);
    }

    #[test]
    fn no_exclusions_checks_nothing() {
        let config = CsrfGuard::default().config;

        assert!(!config.should_check(&Method::POST, "/"));
        assert!(!config.should_check(&Method::DELETE, "/anything"));
    }

    #[test]
    fn strict_checks_everything_not_excluded() {
        let config = CsrfGuard::default().strict(true).config;
        assert!(config.should_check(&Method::POST, "/"));

        let config = CsrfGuard::default().strict(true).exclude_path("/foo").config;
        assert!(!config.should_check(&Method::POST, "/foo"));
        assert!(config.should_check(&Method::POST, "/bar"));
    }

    #[test]
    fn checks_only_mutating_methods() {
        let config = CsrfGuard::default().exclude_path("/foo").config;

        for method in [Method::POST, Method::PUT, Method::DELETE] {
            assert!(config.should_check(&method, "/bar"), "{method}");
        }
        for method in [Method::GET, Method::HEAD, Method::OPTIONS, Method::PATCH] {
            assert!(!config.should_check(&method, "/bar"), "{method}");
        }
        assert!(!config.should_check(&Method::POST, "/foo"));
    }
}
