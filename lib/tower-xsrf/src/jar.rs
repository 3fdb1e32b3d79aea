use arc_swap::ArcSwap;
use cookie::Cookie;
use http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue, Request, Response,
};
use itertools::Itertools;
use pin_project_lite::pin_project;
use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{self, Poll},
};
use time::{Duration, OffsetDateTime};
use tower_layer::Layer;
use tower_service::Service;

/// Source of the raw cookie string (`name=value; name=value`)
pub trait CookieStore: Send + Sync {
    /// The cookie string, or `None` if there are no cookies
    fn cookie_string(&self) -> Option<String>;
}

impl<F> CookieStore for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn cookie_string(&self) -> Option<String> {
        self()
    }
}

#[derive(Clone)]
struct StoredCookie {
    name: String,
    value: String,
    /// Host that set the cookie, `None` matches every host
    host: Option<String>,
}

impl StoredCookie {
    fn is_same_slot(&self, other: &Self) -> bool {
        self.name == other.name && self.host == other.host
    }

    fn matches_host(&self, host: Option<&str>) -> bool {
        match (self.host.as_deref(), host) {
            (None, _) => true,
            (Some(stored), Some(host)) => stored.eq_ignore_ascii_case(host),
            (Some(_), None) => false,
        }
    }
}

fn is_expired(cookie: &Cookie<'_>) -> bool {
    if let Some(max_age) = cookie.max_age() {
        return max_age <= Duration::ZERO;
    }

    cookie
        .expires_datetime()
        .is_some_and(|expires| expires <= OffsetDateTime::now_utc())
}

/// In-memory cookie jar for a single backend
///
/// Values are kept exactly as the server sent them, meaning still percent-encoded.
///
/// Cookies are host-only: a cookie is sent back exclusively to the host that set it.
/// `Domain`, `Path` and security attributes aren't evaluated.
#[derive(Clone)]
pub struct CookieJar {
    cookies: Arc<ArcSwap<Vec<StoredCookie>>>,
}

impl CookieJar {
    /// Insert a cookie that is sent to every host, replacing an existing one with the same name in place
    pub fn insert<N, V>(&self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        let cookie = StoredCookie {
            name: name.into(),
            value: value.into(),
            host: None,
        };

        self.cookies.rcu(|current| {
            let mut next = Vec::clone(current);
            upsert(&mut next, cookie.clone());
            next
        });
    }

    /// Raw value of the cookie `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.cookies
            .load()
            .iter()
            .find(|cookie| cookie.name == name)
            .map(|cookie| cookie.value.clone())
    }

    /// Remove the cookie `name`
    pub fn remove(&self, name: &str) {
        self.cookies.rcu(|current| {
            current
                .iter()
                .filter(|cookie| cookie.name != name)
                .cloned()
                .collect::<Vec<_>>()
        });
    }

    /// Apply every `Set-Cookie` header of a response from `host`
    ///
    /// Headers that fail to parse are skipped.
    pub fn store(&self, host: Option<&str>, headers: &HeaderMap) {
        let updates = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| match Cookie::parse(value.to_owned()) {
                Ok(cookie) => Some(cookie),
                Err(error) => {
                    debug!(?error, "failed to parse set-cookie header");
                    None
                }
            })
            .collect::<Vec<_>>();

        if updates.is_empty() {
            return;
        }

        self.cookies.rcu(|current| {
            let mut next = Vec::clone(current);
            for cookie in &updates {
                let stored = StoredCookie {
                    name: cookie.name().to_owned(),
                    value: cookie.value().to_owned(),
                    host: host.map(str::to_ascii_lowercase),
                };

                if is_expired(cookie) {
                    next.retain(|existing| !existing.is_same_slot(&stored));
                } else {
                    upsert(&mut next, stored);
                }
            }
            next
        });
    }

    /// `Cookie` header for a request to `host`
    fn header_value(&self, host: Option<&str>) -> Option<HeaderValue> {
        let cookies = self.cookies.load();
        let mut matching = cookies
            .iter()
            .filter(|cookie| cookie.matches_host(host))
            .peekable();
        matching.peek()?;

        let raw = matching
            .map(|cookie| format!("{}={}", cookie.name, cookie.value))
            .join("; ");
        match HeaderValue::try_from(raw) {
            Ok(value) => Some(value),
            Err(error) => {
                debug!(?error, "cookie jar contents aren't a valid header value");
                None
            }
        }
    }
}

fn upsert(cookies: &mut Vec<StoredCookie>, cookie: StoredCookie) {
    if let Some(stored) = cookies.iter_mut().find(|stored| stored.is_same_slot(&cookie)) {
        stored.value = cookie.value;
    } else {
        cookies.push(cookie);
    }
}

impl CookieStore for CookieJar {
    fn cookie_string(&self) -> Option<String> {
        let cookies = self.cookies.load();
        if cookies.is_empty() {
            return None;
        }

        Some(
            cookies
                .iter()
                .map(|cookie| format!("{}={}", cookie.name, cookie.value))
                .join("; "),
        )
    }
}

impl Default for CookieJar {
    fn default() -> Self {
        Self {
            cookies: Arc::new(ArcSwap::from_pointee(Vec::new())),
        }
    }
}

impl fmt::Debug for CookieJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values are credentials, only print the names
        let cookies = self.cookies.load();
        f.debug_struct(std::any::type_name::<Self>())
            .field(
                "names",
                &cookies.iter().map(|cookie| cookie.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

pin_project! {
    pub struct CookieJarResponseFuture<F> {
        #[pin]
        future: F,
        host: Option<String>,
        jar: CookieJar,
    }
}

impl<F, B, E> Future for CookieJarResponseFuture<F>
where
    F: Future<Output = Result<Response<B>, E>>,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        this.future.poll(cx).map_ok(|response| {
            this.jar.store(this.host.as_deref(), response.headers());
            response
        })
    }
}

/// Sends the jar's cookies for the request's host and records the cookies every response sets
#[derive(Clone)]
pub struct CookieJarService<S> {
    inner: S,
    jar: CookieJar,
}

impl<S> CookieJarService<S> {
    pub fn new(inner: S, jar: CookieJar) -> Self {
        Self { inner, jar }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CookieJarService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = CookieJarResponseFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let host = req.uri().host().map(ToOwned::to_owned);
        if let Some(cookies) = self.jar.header_value(host.as_deref()) {
            req.headers_mut().append(COOKIE, cookies);
        }

        CookieJarResponseFuture {
            future: self.inner.call(req),
            host,
            jar: self.jar.clone(),
        }
    }
}

#[derive(Clone, Default)]
pub struct CookieJarLayer {
    jar: CookieJar,
}

impl CookieJarLayer {
    #[must_use]
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }
}

impl<S> Layer<S> for CookieJarLayer {
    type Service = CookieJarService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CookieJarService::new(inner, self.jar.clone())
    }
}
