use http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderName, Method, Request, StatusCode,
};
use http_body::Body as HttpBody;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use smol_str::SmolStr;
use std::{error::Error as StdError, time::Duration};
use tasktracker_config::Configuration;
use tasktracker_error::{tasktracker_error, Error, ErrorType, Result, ResultExt};
use tasktracker_http_client::{Body, Client, ClientBuilder, Response};
use tower::Service;
use tower_xsrf::{CookieJar, TokenCache, XsrfLayer};
use url::Url;

const APPLICATION_JSON: &str = "application/json";

/// Pull a human readable message out of an error response body
///
/// The backend answers either with a JSON object carrying a `message` or with plain text.
fn error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    if let Ok(ErrorBody { message }) = sonic_rs::from_slice(body) {
        return Some(message);
    }

    let text = simdutf8::basic::from_utf8(body).ok()?.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

async fn status_error(response: Response) -> Error {
    let status = response.status();
    let message = response
        .bytes()
        .await
        .ok()
        .and_then(|body| error_message(&body));

    debug!(%status, ?message, "request failed");
    tasktracker_error!(
        type = ErrorType::from_status(status, message),
        format!("request failed with status {status}")
    )
}

/// Client for the task tracker REST API
///
/// Owns the session: the cookie jar and the anti-forgery token cache live as long as the client (and its clones).
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
    cookie_jar: CookieJar,
    priming_path: SmolStr,
    token_cache: TokenCache,
}

impl ApiClient {
    /// Build a client talking to the configured backend over the network
    pub fn new(config: &Configuration) -> Result<Self> {
        Self::build(config, ClientBuilder::build)
    }

    /// Build a client on top of a custom transport
    pub fn with_transport<S, B>(config: &Configuration, transport: S) -> Result<Self>
    where
        S: Service<Request<Body>, Response = http::Response<B>> + Clone + Send + Sync + 'static,
        S::Error: StdError + Send + Sync + 'static,
        S::Future: Send,
        B: HttpBody + Default + Send + Sync + 'static,
        B::Data: Send + Sync,
        B::Error: StdError + Send + Sync + 'static,
    {
        Self::build(config, |builder| builder.service(transport))
    }

    fn build<F>(config: &Configuration, finish: F) -> Result<Self>
    where
        F: FnOnce(ClientBuilder) -> Client,
    {
        let base_url = Url::parse(&config.server.base_url).with_error_type(ErrorType::BadRequest(
            Some(format!("invalid base URL \"{}\"", config.server.base_url)),
        ))?;
        let cookie_jar = CookieJar::default();
        let token_cache =
            TokenCache::new(cookie_jar.clone()).cookie_name(config.xsrf.cookie_name.as_str());

        let xsrf = XsrfLayer::new(token_cache.clone())
            .header_name(HeaderName::from_bytes(config.xsrf.header_name.as_bytes())?)
            .response_header_name(HeaderName::from_bytes(
                config.xsrf.response_header_name.as_bytes(),
            )?);

        let mut builder = Client::builder()
            .content_length_limit(Some(config.server.content_length_limit))
            .cookie_jar(cookie_jar.clone())
            .default_header(ACCEPT, APPLICATION_JSON)?
            .timeout(Some(Duration::from_secs(config.server.request_timeout_secs)))
            .xsrf(xsrf);

        if let Some(ref user_agent) = config.server.user_agent {
            builder = builder.user_agent(user_agent.as_str())?;
        }

        Ok(Self {
            base_url,
            client: finish(builder),
            cookie_jar,
            priming_path: config.xsrf.priming_path.clone(),
            token_cache,
        })
    }

    #[must_use]
    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    #[must_use]
    pub fn token_cache(&self) -> &TokenCache {
        &self.token_cache
    }

    /// Make the backend issue an anti-forgery token
    ///
    /// The body of the answer is irrelevant, the token arrives as a cookie.
    #[instrument(skip(self))]
    pub async fn prime(&self) -> Result<()> {
        let url = self.url(&self.priming_path)?;
        let response = self
            .send(Method::GET, url, None)
            .await
            .inspect_err(|error| warn!(%error, "failed to prime the xsrf token"))?;

        if !response.status().is_success() {
            let error = status_error(response).await;
            warn!(%error, "failed to prime the xsrf token");
            return Err(error);
        }

        debug!(primed = self.token_cache.get().is_some(), "primed xsrf token");
        Ok(())
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(Error::from)
    }

    async fn send(&self, method: Method, url: Url, payload: Option<Body>) -> Result<Response> {
        debug!(%method, %url, "sending request");

        let mut request = Request::builder().method(method).uri(url.as_str());
        if payload.is_some() {
            request = request.header(CONTENT_TYPE, APPLICATION_JSON);
        }
        let request = request.body(payload.unwrap_or_default())?;

        Ok(self.client.execute(request).await?)
    }

    async fn fetch<T>(&self, method: Method, url: Url, payload: Option<Body>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, url, payload).await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        Ok(response.json().await?)
    }

    pub(crate) async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        self.fetch(Method::GET, url, None).await
    }

    /// `GET` with the search term in the `q` query parameter
    pub(crate) async fn search<T>(&self, path: &str, query: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut url = self.url(path)?;
        url.query_pairs_mut().append_pair("q", query);
        self.fetch(Method::GET, url, None).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        self.fetch(Method::POST, url, Some(Body::json(body)?)).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        self.fetch(Method::PUT, url, Some(Body::json(body)?)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        let response = self.send(Method::DELETE, url, None).await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        Ok(())
    }

    /// `POST` that also decodes the body of the listed error statuses
    ///
    /// Used by endpoints that explain their failures in the regular response type.
    pub(crate) async fn post_accepting<B, T>(
        &self,
        path: &str,
        body: &B,
        accepted: &[StatusCode],
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        let response = self
            .send(Method::POST, url, Some(Body::json(body)?))
            .await?;

        let status = response.status();
        if !status.is_success() && !accepted.contains(&status) {
            return Err(status_error(response).await);
        }

        let body = response.bytes().await?;
        sonic_rs::from_slice(&body).map_err(|error| {
            if status.is_success() {
                Error::from(error)
            } else {
                Error::new(ErrorType::from_status(status, error_message(&body)), error)
            }
        })
    }
}
