use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("fqdn is too long: {0}")]
    FqdnTooLong(usize),

    #[error("hostname is too long: {0}")]
    HostnameTooLong(usize),

    #[error("hostname is empty in fqdn {0:?}")]
    EmptyHostname(String),
}
