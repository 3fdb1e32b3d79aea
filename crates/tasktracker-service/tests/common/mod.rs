#![allow(dead_code)]

use bytes::Bytes;
use http::{header::SET_COOKIE, HeaderMap, Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use std::{
    convert::Infallible,
    sync::{Arc, Mutex},
};
use tasktracker_config::Configuration;
use tasktracker_http_client::Body;
use tasktracker_service::ApiClient;
use tower::service_fn;

pub const BASE_URL: &str = "http://backend.test";

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn token(&self) -> Option<&str> {
        self.headers
            .get("x-xsrf-token")
            .and_then(|value| value.to_str().ok())
    }

    pub fn body(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap()
    }
}

pub type Log = Arc<Mutex<Vec<Recorded>>>;

pub fn json(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::copy_from_slice(body.as_bytes())))
        .unwrap()
}

pub fn empty(status: StatusCode) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::default())
        .unwrap()
}

/// Client against a fake backend
///
/// `/api/csrf` always hands out the token `tok123`. Every other request is recorded and answered by `handler`.
pub fn client<F>(log: Log, handler: F) -> ApiClient
where
    F: Fn(&Recorded) -> Response<Full<Bytes>> + Clone + Send + Sync + 'static,
{
    client_with(Configuration::default(), log, handler)
}

pub fn client_with<F>(mut config: Configuration, log: Log, handler: F) -> ApiClient
where
    F: Fn(&Recorded) -> Response<Full<Bytes>> + Clone + Send + Sync + 'static,
{
    let transport = service_fn(move |req: Request<Body>| {
        let log = log.clone();
        let handler = handler.clone();

        async move {
            let (parts, body) = req.into_parts();
            if parts.uri.path() == "/api/csrf" {
                let response = Response::builder()
                    .header(SET_COOKIE, "XSRF-TOKEN=tok123; Path=/")
                    .body(Full::default())
                    .unwrap();

                return Ok::<_, Infallible>(response);
            }

            let recorded = Recorded {
                method: parts.method,
                path: parts.uri.path().to_owned(),
                query: parts.uri.query().map(ToOwned::to_owned),
                headers: parts.headers,
                body: body.collect().await.unwrap().to_bytes(),
            };

            let response = handler(&recorded);
            log.lock().unwrap().push(recorded);

            Ok(response)
        }
    });

    config.server.base_url = BASE_URL.into();

    ApiClient::with_transport(&config, transport).unwrap()
}

/// Primed client, the way every session starts
pub async fn primed<F>(log: Log, handler: F) -> ApiClient
where
    F: Fn(&Recorded) -> Response<Full<Bytes>> + Clone + Send + Sync + 'static,
{
    let client = client(log, handler);
    client.prime().await.unwrap();
    client
}
