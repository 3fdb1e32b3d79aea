use http::StatusCode;
use std::fmt::{self, Debug, Display};

pub use self::ext::ResultExt;

mod ext;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[macro_export]
macro_rules! bail {
    ($(type = $type:expr,)? $msg:expr) => {
        return Err($crate::tasktracker_error!($(type = $type,)? $msg));
    };
}

#[macro_export]
macro_rules! tasktracker_error {
    (type = $type:expr, $msg:expr) => {
        $crate::Error::msg($msg).with_error_type($type)
    };
    ($msg:expr) => {
        $crate::tasktracker_error!(type = $crate::ErrorType::Other(None), $msg)
    };
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorType {
    BadRequest(Option<String>),
    Conflict,
    Forbidden,
    NotFound,
    Unauthorized,
    Other(Option<String>),
}

impl ErrorType {
    /// Classify a non-successful response of the backend
    ///
    /// `message` is whatever the backend put into the body, if anything
    #[must_use]
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest(message),
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::Conflict,
            _ => Self::Other(message),
        }
    }
}

#[derive(Debug)]
pub struct Error {
    ty: ErrorType,
    inner: eyre::Report,
}

impl Error {
    #[inline]
    pub fn new<E>(ty: ErrorType, err: E) -> Self
    where
        E: Into<eyre::Report>,
    {
        Self {
            ty,
            inner: err.into(),
        }
    }

    #[inline]
    pub fn msg<M>(msg: M) -> Self
    where
        M: Debug + Display + Send + Sync + 'static,
    {
        eyre::Report::msg(msg).into()
    }

    #[must_use]
    pub fn error_type(&self) -> &ErrorType {
        &self.ty
    }

    #[must_use]
    pub fn error(&self) -> &eyre::Report {
        &self.inner
    }

    #[must_use]
    pub fn into_error(self) -> eyre::Report {
        self.inner
    }

    #[must_use]
    pub fn with_error_type(self, ty: ErrorType) -> Self {
        Self { ty, ..self }
    }
}

impl<T> From<T> for Error
where
    T: Into<eyre::Report>,
{
    fn from(value: T) -> Self {
        Self {
            ty: ErrorType::Other(None),
            inner: value.into(),
        }
    }
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <eyre::Report as fmt::Display>::fmt(&self.inner, f)
    }
}
