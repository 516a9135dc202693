/// Errors that may occur while reading the configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("environment variable `{var}` is not valid unicode")]
    NotUnicode { var: &'static str },
    #[error("environment variable `{var}` contains invalid pid `{value}`: {source}")]
    InvalidPid {
        var: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
