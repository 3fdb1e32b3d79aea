use crate::{TokenCache, XsrfService, DEFAULT_HEADER_NAME, DEFAULT_RESPONSE_HEADER_NAME};
use http::HeaderName;
use tower_layer::Layer;

#[derive(Clone)]
pub struct XsrfLayer {
    cache: TokenCache,
    header_name: HeaderName,
    response_header_name: HeaderName,
}

impl XsrfLayer {
    #[must_use]
    pub fn new(cache: TokenCache) -> Self {
        Self {
            cache,
            header_name: DEFAULT_HEADER_NAME.clone(),
            response_header_name: DEFAULT_RESPONSE_HEADER_NAME.clone(),
        }
    }

    /// Header the token is attached as on unsafe requests
    ///
    /// Defaults to `X-XSRF-TOKEN`
    #[must_use]
    pub fn header_name(self, header_name: HeaderName) -> Self {
        Self {
            header_name,
            ..self
        }
    }

    /// Response header a fresh token is read from
    ///
    /// Defaults to `XSRF-TOKEN`
    #[must_use]
    pub fn response_header_name(self, response_header_name: HeaderName) -> Self {
        Self {
            response_header_name,
            ..self
        }
    }

    #[must_use]
    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }
}

impl<S> Layer<S> for XsrfLayer {
    type Service = XsrfService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        XsrfService::new(
            inner,
            self.cache.clone(),
            self.header_name.clone(),
            self.response_header_name.clone(),
        )
    }
}
