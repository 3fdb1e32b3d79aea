use crate::{find_cookie, CookieStore, XsrfToken, DEFAULT_COOKIE_NAME};
use arc_swap::ArcSwapOption;
use std::{fmt, sync::Arc};

/// Holder of the most recently observed anti-forgery token
///
/// Clones share the same slot. Create one per client session.
///
/// The slot starts out unset and, once a token was observed, is only ever overwritten.
#[derive(Clone)]
pub struct TokenCache {
    slot: Arc<ArcSwapOption<XsrfToken>>,
    cookies: Arc<dyn CookieStore>,
    cookie_name: Arc<str>,
}

impl TokenCache {
    /// Create an empty cache that falls back to reading the token from `cookies`
    pub fn new<C>(cookies: C) -> Self
    where
        C: CookieStore + 'static,
    {
        Self {
            slot: Arc::new(ArcSwapOption::empty()),
            cookies: Arc::new(cookies),
            cookie_name: Arc::from(DEFAULT_COOKIE_NAME),
        }
    }

    /// Set the name of the cookie the token is read from
    ///
    /// Defaults to `XSRF-TOKEN`
    #[must_use]
    pub fn cookie_name<N>(self, cookie_name: N) -> Self
    where
        N: Into<Arc<str>>,
    {
        Self {
            cookie_name: cookie_name.into(),
            ..self
        }
    }

    /// Current token
    ///
    /// Returns the cached value if there is one. Otherwise the cookie store is consulted and a token found
    /// there is cached before it is returned.
    #[must_use]
    pub fn get(&self) -> Option<XsrfToken> {
        self.cached().or_else(|| self.refresh_from_cookies())
    }

    /// Unconditionally overwrite the cached value
    pub fn set(&self, token: XsrfToken) {
        self.slot.store(Some(Arc::new(token)));
    }

    /// Cached value, without looking at the cookie store
    #[must_use]
    pub fn cached(&self) -> Option<XsrfToken> {
        self.slot.load().as_deref().cloned()
    }

    /// Read the token from the cookie store and cache it if one was found
    ///
    /// Empty cookie values don't count as a token and leave the cache untouched.
    pub fn refresh_from_cookies(&self) -> Option<XsrfToken> {
        let raw = self.cookies.cookie_string()?;
        let token = find_cookie(&raw, &self.cookie_name).filter(|value| !value.is_empty())?;
        let token = XsrfToken::new(token);

        self.set(token.clone());
        Some(token)
    }
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(std::any::type_name::<Self>())
            .field("cookie_name", &self.cookie_name)
            .field("is_set", &self.slot.load().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::TokenCache;
    use crate::{CookieJar, XsrfToken, XsrfTokenRef};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn starts_unset() {
        let cache = TokenCache::new(CookieJar::default());
        assert_eq!(cache.get(), None);
        assert_eq!(cache.cached(), None);
    }

    #[test]
    fn set_is_idempotent() {
        let cache = TokenCache::new(CookieJar::default());
        for _ in 0..5 {
            cache.set(XsrfToken::new("tok".into()));
            assert_eq!(cache.get().as_deref().map(XsrfTokenRef::as_str), Some("tok"));
        }
    }

    #[test]
    fn set_overwrites() {
        let cache = TokenCache::new(CookieJar::default());
        cache.set(XsrfToken::new("first".into()));
        cache.set(XsrfToken::new("second".into()));

        assert_eq!(cache.get().as_deref().map(XsrfTokenRef::as_str), Some("second"));
    }

    #[test]
    fn falls_back_to_cookie() {
        let jar = CookieJar::default();
        jar.insert("XSRF-TOKEN", "abc%20def");

        let cache = TokenCache::new(jar);
        assert_eq!(cache.cached(), None);
        assert_eq!(cache.get().as_deref().map(XsrfTokenRef::as_str), Some("abc def"));
        assert_eq!(cache.cached().as_deref().map(XsrfTokenRef::as_str), Some("abc def"));
    }

    #[test]
    fn cached_value_wins_over_cookie() {
        let jar = CookieJar::default();
        jar.insert("XSRF-TOKEN", "from-cookie");

        let cache = TokenCache::new(jar);
        cache.set(XsrfToken::new("from-header".into()));
        assert_eq!(cache.get().as_deref().map(XsrfTokenRef::as_str), Some("from-header"));
    }

    #[test]
    fn cookie_store_not_consulted_when_cached() {
        let reads = Arc::new(AtomicUsize::new(0));
        let cache = TokenCache::new({
            let reads = Arc::clone(&reads);
            move || {
                reads.fetch_add(1, Ordering::SeqCst);
                Some("XSRF-TOKEN=tok".to_owned())
            }
        });

        assert!(cache.get().is_some());
        assert!(cache.get().is_some());
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_cookie_is_absent() {
        let cache = TokenCache::new(|| Some("XSRF-TOKEN=".to_owned()));
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn custom_cookie_name() {
        let cache =
            TokenCache::new(|| Some("CSRF=tok; XSRF-TOKEN=other".to_owned())).cookie_name("CSRF");
        assert_eq!(cache.get().as_deref().map(XsrfTokenRef::as_str), Some("tok"));
    }

    #[test]
    fn clones_share_state() {
        let cache = TokenCache::new(CookieJar::default());
        let clone = cache.clone();
        clone.set(XsrfToken::new("shared".into()));

        assert_eq!(cache.cached().as_deref().map(XsrfTokenRef::as_str), Some("shared"));
    }
}
