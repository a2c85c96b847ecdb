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

    #[fail(display = "unable to spawn worker: {}", _0)]
    Spawn(#[cause] io::Error),

    #[fail(display = "worker {} failed: {}", index, reason)]
    WorkerFailure { index: usize, reason: String },

    #[fail(display = "workers have already been joined")]
    AlreadyJoined,

    #[fail(display = "{}", _0)]
    InvalidConfig(String),

    #[fail(display = "{}", _0)]
    Serde(String),
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.inner.get_context()
    }

    pub fn spawn(err: io::Error) -> Self {
        Error::from(ErrorKind::Spawn(err))
    }

    pub fn worker_failure(index: usize, reason: String) -> Self {
        Error::from(ErrorKind::WorkerFailure { index, reason })
    }

    pub fn invalid_config(msg: String) -> Self {
        Error::from(ErrorKind::InvalidConfig(msg))
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

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            inner: Context::new(ErrorKind::Serde(err.to_string())),
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
