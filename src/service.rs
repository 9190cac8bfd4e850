use std::{
    sync::Arc,
    task::{Context, Poll},
};

use axum_core::body::Body;
use futures_util::future::BoxFuture;
use http::{Request, Response};
use tower_service::Service;

use crate::{
    form,
    intercept::{intercept, Verdict},
    Error, GuardConfig, Session, ViewData,
};

/// Service produced by [`CsrfGuard`](crate::CsrfGuard).
#[derive(Clone)]
pub struct CsrfGuardService<S> {
    config: Arc<GuardConfig>,
    inner: S,
}

impl<S> CsrfGuardService<S> {
    pub(crate) fn new(config: Arc<GuardConfig>, inner: S) -> Self {
        Self { config, inner }
    }
}

impl<S> Service<Request<Body>> for CsrfGuardService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let config = self.config.clone();
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let (mut parts, body) = request.into_parts();

            let Some(session) = Session::from_extensions(&parts.extensions) else {
                return Error::SessionRequired.into_layer_response();
            };

            let path = parts.uri.path().to_owned();

            let (user_token, body) = if config.should_check(&parts.method, &path) {
                form::read_field(&parts.headers, body, config.token_key(), config.body_limit)
                    .await
            } else {
                (None, body)
            };

            let mut view = parts.extensions.remove::<ViewData>().unwrap_or_default();

            let token = match intercept(
                &config,
                Some(&session),
                &parts.method,
                &path,
                user_token.as_deref(),
                &mut view,
            )
            .await
            {
                Ok(Verdict::Passed(token)) => token,
                Ok(Verdict::Rejected) => return Error::make_layer_bad_request(),
                Err(err) => return err.into_layer_response(),
            };

            parts.extensions.insert(view);
            parts.extensions.insert(token);

            inner.call(Request::from_parts(parts, body)).await
        })
    }
}
