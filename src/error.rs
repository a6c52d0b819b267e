use failure::{Context, Fail};
use std::fmt::Display;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    inner: Context<ErrorKind>,
}
#[derive(Debug, Fail)]
pub enum ErrorKind {
    #[fail(display = "{}", _0)]
    IO(#[cause] io::Error),

    #[fail(display = "pool is closed")]
    PoolClosed,

    #[fail(display = "{}", _0)]
    Config(String),

    #[fail(display = "task panicked: {}", _0)]
    TaskPanicked(String),

    #[fail(display = "{}", _0)]
    NotFound(String),

    #[fail(display = "{}", _0)]
    Http(String),

    #[fail(display = "{}", _0)]
    Other(String),
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.inner.get_context()
    }

    pub fn is_pool_closed(&self) -> bool {
        match self.kind() {
            ErrorKind::PoolClosed => true,
            _ => false,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error {
            inner: Context::new(ErrorKind::IO(err)),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(err: ErrorKind) -> Self {
        Error {
            inner: Context::new(err),
        }
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::from(ErrorKind::Other(msg))
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::from(ErrorKind::Other(msg.to_string()))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::from(ErrorKind::Http(err.to_string()))
    }
}
