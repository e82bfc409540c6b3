use thiserror::Error;

/// Errors that may occur in this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying file or stream IO problem.
    #[error("IO problem: {0}")]
    Io(#[from] std::io::Error),

    /// The serial port could not be opened or configured.
    #[error("Serial port problem on `{path}`: {problem}")]
    Port {
        /// The port path in question.
        path: String,

        /// What went wrong.
        problem: String,
    },

    /// A settings file was missing required entries or otherwise unusable.
    #[error("Bad settings: {0}")]
    BadSettings(String),

    /// An email was not fit to send.
    #[error("Bad email: {0}")]
    BadEmail(String),

    /// An email address could not be parsed.
    #[error("Bad email address")]
    Address(#[from] lettre::address::AddressError),

    /// The email itself could not be assembled.
    #[error("Could not assemble email")]
    Email(#[from] lettre::error::Error),

    /// The SMTP conversation failed.
    #[error("Could not send email")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The input did not contain a query to parse.
    #[error("Not a query: {0}")]
    NotAQuery(String),
}
