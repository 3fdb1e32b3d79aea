use bytes::Bytes;
use http_body::{Frame, SizeHint};
use serde::Serialize;
use std::{
    convert::Infallible,
    fmt::{self, Debug},
    pin::Pin,
    task::{self, Poll},
};

/// Request body
///
/// Either empty or a single chunk of bytes. The backend only ever receives small JSON documents.
#[derive(Clone, Default)]
pub struct Body {
    data: Option<Bytes>,
}

impl Body {
    /// Empty body
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self { data: None }
    }

    /// Single byte chunk body
    #[inline]
    pub fn data<D>(data: D) -> Self
    where
        D: Into<Bytes>,
    {
        Self {
            data: Some(data.into()),
        }
    }

    /// Serialise a value as JSON into a body
    ///
    /// # Errors
    ///
    /// - Serialising the value failed
    pub fn json<T>(value: &T) -> Result<Self, sonic_rs::Error>
    where
        T: Serialize + ?Sized,
    {
        sonic_rs::to_vec(value).map(Self::data)
    }
}

impl Debug for Body {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(std::any::type_name::<Self>())
            .field("len", &self.data.as_ref().map_or(0, Bytes::len))
            .finish()
    }
}

impl From<String> for Body {
    #[inline]
    fn from(value: String) -> Self {
        Self::data(value)
    }
}

impl From<&'static str> for Body {
    #[inline]
    fn from(value: &'static str) -> Self {
        Self::data(value)
    }
}

impl http_body::Body for Body {
    type Data = Bytes;
    type Error = Infallible;

    #[inline]
    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut task::Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(self.get_mut().data.take().map(|data| Ok(Frame::data(data))))
    }

    #[inline]
    fn is_end_stream(&self) -> bool {
        self.data.is_none()
    }

    #[inline]
    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.data.as_ref().map_or(0, |data| data.len() as u64))
    }
}
