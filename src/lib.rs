#![deny(missing_docs)]

//! Host-side support for the SmartParallel serial-to-parallel printer
//! interface.
//!
//! The device talks over a serial link with two distinct terminator
//! conventions: messages *sent to* the device end with a null byte,
//! messages *received from* it end with a newline. The core of this crate
//! is a bounded line-framing reader for the receive side, together with
//! the command-byte protocol and port plumbing for the send side.
//!
//! The rest is the small toolbox a daemon built around the device tends
//! to need: key=value settings files, PID and log files, email alerts,
//! and query string parsing for a minimal status page.

/// The SmartParallel wire protocol: command bytes, terminators and
/// printer init sequences.
pub mod protocol;

/// Serial messages, the frame reader, the async codec and the blocking
/// port wrapper.
pub mod serial;

/// Key=value settings files.
pub mod config;

/// PID files and plain append-only log files.
pub mod files;

/// Composing and sending email alerts.
pub mod email;

/// Query string parsing.
pub mod query;

/// Possible errors in this library.
pub mod error;

/// Logging/tracing setup.
pub mod logging;

/// The command line interface.
pub mod cli;
