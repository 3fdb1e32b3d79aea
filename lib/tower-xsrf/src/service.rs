use crate::{TokenCache, XsrfToken};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Response};
use pin_project_lite::pin_project;
use std::{
    future::Future,
    pin::Pin,
    task::{self, Poll},
};
use tower_service::Service;

const SAFE_METHODS: &[&str] = &["GET", "HEAD", "OPTIONS"];

#[inline]
fn is_safe(method: &Method) -> bool {
    SAFE_METHODS
        .iter()
        .any(|safe| method.as_str().eq_ignore_ascii_case(safe))
}

/// Refreshes the cache from the response of a safe request
#[derive(Clone)]
struct Observer {
    cache: TokenCache,
    response_header_name: HeaderName,
}

impl Observer {
    fn observe(&self, headers: &HeaderMap) {
        let from_header = headers
            .get(&self.response_header_name)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty());

        if let Some(token) = from_header {
            debug!("refreshed xsrf token from response header");
            self.cache.set(XsrfToken::new(token.to_owned()));
        } else if self.cache.refresh_from_cookies().is_some() {
            debug!("refreshed xsrf token from cookie");
        }
    }
}

pin_project! {
    pub struct ResponseFuture<F> {
        #[pin]
        inner: F,
        observer: Option<Observer>,
    }
}

impl<F, ResBody, E> Future for ResponseFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        this.inner.poll(cx).map_ok(|response| {
            if let Some(observer) = this.observer.take() {
                observer.observe(response.headers());
            }

            response
        })
    }
}

/// Attaches the anti-forgery token to unsafe requests and picks up fresh tokens from safe ones
///
/// Never fails a request on its own. Without a token the request is forwarded as-is and the server gets to
/// reject it.
#[derive(Clone)]
pub struct XsrfService<S> {
    inner: S,
    cache: TokenCache,
    header_name: HeaderName,
    response_header_name: HeaderName,
}

impl<S> XsrfService<S> {
    pub fn new(
        inner: S,
        cache: TokenCache,
        header_name: HeaderName,
        response_header_name: HeaderName,
    ) -> Self {
        Self {
            inner,
            cache,
            header_name,
            response_header_name,
        }
    }

    /// Handle to the token cache this service reads from and writes to
    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    fn attach_token<B>(&self, req: &mut Request<B>) {
        let Some(token) = self.cache.get() else {
            debug!(method = %req.method(), uri = %req.uri(), "no xsrf token available");
            return;
        };

        match HeaderValue::from_str(token.as_str()) {
            Ok(value) => {
                req.headers_mut().insert(self.header_name.clone(), value);
            }
            Err(error) => {
                debug!(?error, "xsrf token isn't a valid header value");
            }
        }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for XsrfService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = ResponseFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        if is_safe(req.method()) {
            return ResponseFuture {
                inner: self.inner.call(req),
                observer: Some(Observer {
                    cache: self.cache.clone(),
                    response_header_name: self.response_header_name.clone(),
                }),
            };
        }

        self.attach_token(&mut req);

        ResponseFuture {
            inner: self.inner.call(req),
            observer: None,
        }
    }
}
