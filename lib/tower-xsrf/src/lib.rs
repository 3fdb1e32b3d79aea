//! Client-side half of the double-submit cookie pattern
//!
//! The server hands out an anti-forgery token through a script-readable cookie (and sometimes mirrors it
//! into a response header). This crate keeps the last token it saw in a [`TokenCache`] and, through the
//! [`XsrfLayer`], attaches it to every state-changing request.
//!
//! Since there is no browser around, [`CookieJar`] plays the role of the cookie store. Wrap the transport
//! with a [`CookieJarLayer`] so `Set-Cookie` headers end up in the jar, then put the [`XsrfLayer`] on top.

#[macro_use]
extern crate tracing;

use http::HeaderName;

mod cache;
mod cookie;
mod jar;
mod layer;
mod service;

pub use self::{
    cache::TokenCache,
    cookie::find_cookie,
    jar::{CookieJar, CookieJarLayer, CookieJarResponseFuture, CookieJarService, CookieStore},
    layer::XsrfLayer,
    service::{ResponseFuture, XsrfService},
};

/// Name of the cookie the server stores the token in
pub const DEFAULT_COOKIE_NAME: &str = "XSRF-TOKEN";

/// Header the token is sent back in on unsafe requests
pub static DEFAULT_HEADER_NAME: HeaderName = HeaderName::from_static("x-xsrf-token");

/// Header the server may use to hand out a fresh token
pub static DEFAULT_RESPONSE_HEADER_NAME: HeaderName = HeaderName::from_static("xsrf-token");

/// Opaque anti-forgery token, transmitted verbatim
#[aliri_braid::braid]
pub struct XsrfToken;
