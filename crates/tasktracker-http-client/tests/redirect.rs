use bytes::Bytes;
use core::convert::Infallible;
use http::{
    header::{COOKIE, LOCATION, SET_COOKIE},
    HeaderName, Method, StatusCode,
};
use http_body_util::Full;
use hyper::{Request, Response};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use tasktracker_http_client::{Body, Client};
use tower::service_fn;
use tower_xsrf::{CookieJar, TokenCache, XsrfLayer, DEFAULT_HEADER_NAME};

/// Host, `Cookie` header and token header of a request the backend received
type Seen = (String, Option<String>, Option<String>);

fn redirect(response: &mut Response<Full<Bytes>>, status: StatusCode, location: &'static str) {
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(LOCATION, location.parse().unwrap());
}

fn client(seen: Arc<Mutex<Vec<Seen>>>) -> Client {
    let backend = service_fn(move |req: Request<Body>| {
        let seen = Arc::clone(&seen);
        async move {
            let header = |name: &HeaderName| {
                req.headers()
                    .get(name)
                    .map(|value| value.to_str().unwrap().to_owned())
            };
            seen.lock().unwrap().push((
                req.uri().host().unwrap_or_default().to_owned(),
                header(&COOKIE),
                header(&DEFAULT_HEADER_NAME),
            ));

            let mut response = Response::new(Full::<Bytes>::default());
            match req.uri().path() {
                "/api/csrf" => {
                    response.headers_mut().append(
                        SET_COOKIE,
                        "JSESSIONID=secret; Path=/; HttpOnly".parse().unwrap(),
                    );
                    response
                        .headers_mut()
                        .append(SET_COOKIE, "XSRF-TOKEN=tok123; Path=/".parse().unwrap());
                }
                "/api/tasks" => {
                    redirect(&mut response, StatusCode::FOUND, "http://evil.example/steal");
                }
                "/api/export" => redirect(
                    &mut response,
                    StatusCode::TEMPORARY_REDIRECT,
                    "http://evil.example/steal",
                ),
                "/api/old" => redirect(&mut response, StatusCode::FOUND, "/api/new"),
                _ => {}
            }

            Ok::<_, Infallible>(response)
        }
    });

    let jar = CookieJar::default();
    Client::builder()
        .cookie_jar(jar.clone())
        .xsrf(XsrfLayer::new(TokenCache::new(jar)))
        .service(backend)
}

#[tokio::test]
async fn cross_origin_redirect_is_not_followed() {
    let seen = Arc::default();
    let client = client(Arc::clone(&seen));

    client.get("http://backend.test/api/csrf").await.unwrap();
    let response = client.get("http://backend.test/api/tasks").await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        [
            ("backend.test".into(), None, None),
            (
                "backend.test".into(),
                Some("JSESSIONID=secret; XSRF-TOKEN=tok123".into()),
                None,
            ),
        ]
    );
}

#[tokio::test]
async fn token_does_not_follow_cross_origin_redirect() {
    let seen = Arc::default();
    let client = client(Arc::clone(&seen));

    client.get("http://backend.test/api/csrf").await.unwrap();
    let req = Request::builder()
        .method(Method::POST)
        .uri("http://backend.test/api/export")
        .body(Body::empty())
        .unwrap();
    let response = client.execute(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1].2.as_deref(), Some("tok123"));
    assert!(seen.iter().all(|(host, ..)| host == "backend.test"));
}

#[tokio::test]
async fn same_origin_redirect_keeps_cookies() {
    let seen = Arc::default();
    let client = client(Arc::clone(&seen));

    client.get("http://backend.test/api/csrf").await.unwrap();
    let response = client.get("http://backend.test/api/old").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert_eq!(
        seen[2],
        (
            "backend.test".into(),
            Some("JSESSIONID=secret; XSRF-TOKEN=tok123".into()),
            None,
        )
    );
}
