use itertools::Itertools;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::Error;

/// The settings keys an email config file must or may carry.
pub const SETTINGS_KEYS: [&str; 5] = ["host", "port", "user", "pass", "use_tls"];

/// SMTP connection settings, usually read from a `key=value` file
/// (conventionally `/etc/email/email_default.cfg`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSettings {
    /// The SMTP host.
    pub host: String,

    /// The SMTP port.
    pub port: u16,

    /// The account user, typically also the sending address.
    pub user: String,

    /// The account password.
    pub pass: String,

    /// Whether to use a TLS-wrapped connection (SMTPS). When false,
    /// STARTTLS on a plain connection is used instead.
    pub use_tls: bool,
}

impl EmailSettings {
    /// Pull SMTP settings out of parsed [`Settings`].
    ///
    /// `host`, `user` and `pass` are required; all missing ones are
    /// reported together. `use_tls` defaults to no. A missing `port`
    /// picks 465 when `use_tls` is yes, 587 otherwise.
    pub fn from_settings(settings: &Settings) -> Result<Self, Error> {
        let mut problems = vec![];

        for key in SETTINGS_KEYS {
            // port and use_tls have defaults; the rest must be present.
            if !settings.has(key) && !matches!(key, "port" | "use_tls") {
                problems.push(format!("missing value: {key}"));
            }
        }
        if !problems.is_empty() {
            return Err(Error::BadSettings(problems.join("; ")));
        }

        let use_tls = settings.get("use_tls") == Some("yes");

        let port = match settings.get("port").filter(|p| !p.is_empty()) {
            Some(port) => port
                .parse()
                .map_err(|_| Error::BadSettings(format!("bad port: {port}")))?,
            None if use_tls => 465,
            None => 587,
        };

        Ok(Self {
            host: settings.get("host").unwrap_or_default().to_string(),
            port,
            user: settings.get("user").unwrap_or_default().to_string(),
            pass: settings.get("pass").unwrap_or_default().to_string(),
            use_tls,
        })
    }

    /// Read and validate settings straight from a config file.
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Error> {
        Self::from_settings(&Settings::read_from_path(path)?)
    }
}

/// An email under construction.
///
/// Alerts from the print daemon are plain text; the body is built a line
/// at a time with CRLF endings.
#[derive(Debug, Clone, Default)]
pub struct EmailMessage {
    name: Option<String>,
    from: Option<String>,
    to: Vec<String>,
    subject: Option<String>,
    body: String,
}

impl EmailMessage {
    /// A new, empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sender's email address.
    pub fn set_sender(&mut self, address: &str) {
        self.from = Some(address.to_string());
    }

    /// Set the sender's display name.
    pub fn set_sender_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    /// Add a recipient address. May be called more than once.
    pub fn add_recipient(&mut self, address: &str) {
        self.to.push(address.to_string());
    }

    /// Set the subject line.
    pub fn set_subject(&mut self, subject: &str) {
        self.subject = Some(subject.to_string());
    }

    /// Replace the body with the given text.
    pub fn set_body(&mut self, text: &str) {
        self.body = format!("{text}\r\n");
    }

    /// Append a line to the body.
    pub fn append_body_line(&mut self, text: &str) {
        self.body += text;
        self.body += "\r\n";
    }

    /// Add a signature at the end of the body.
    pub fn add_signature(&mut self, signature: &str) {
        self.body += &format!("\r\n--\r\n{signature}\r\n");
    }

    /// The body as built so far.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Check that the essential headers have values.
    /// All problems are reported together.
    pub fn check_headers(&self) -> Result<(), Error> {
        let mut problems = vec![];

        if self.from.as_deref().unwrap_or_default().is_empty() {
            problems.push("from field empty");
        }
        if self.to.is_empty() {
            problems.push("no recipients");
        }
        if self.subject.as_deref().unwrap_or_default().is_empty() {
            problems.push("subject empty");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::BadEmail(problems.iter().join("; ")))
        }
    }

    /// The `From:` value: `Name <addr>` when a name is set, else the
    /// bare address.
    fn from_value(&self) -> String {
        let address = self.from.as_deref().unwrap_or_default();
        match self.name.as_deref() {
            None | Some("") => address.to_string(),
            Some(name) => format!("{name} <{address}>"),
        }
    }

    /// The header block as it would appear on the wire, ending with the
    /// blank line separating headers from body.
    pub fn header_block(&self) -> Result<String, Error> {
        self.check_headers()?;

        let mut block = format!("From: {}\r\n", self.from_value());
        block += &format!("To: {}\r\n", self.to.iter().join(","));
        block += &format!("Subject: {}\r\n\r\n", self.subject.as_deref().unwrap_or_default());

        Ok(block)
    }

    /// Send the message with the given SMTP settings.
    pub fn send(&self, settings: &EmailSettings) -> Result<(), Error> {
        self.check_headers()?;

        let mut builder = Message::builder().from(self.from_value().parse::<Mailbox>()?);
        for recipient in &self.to {
            builder = builder.to(recipient.parse::<Mailbox>()?);
        }
        let message = builder
            .subject(self.subject.as_deref().unwrap_or_default())
            .body(self.body.clone())?;

        // use_tls selects a TLS-wrapped session (traditionally port 465);
        // otherwise the session starts plain and upgrades via STARTTLS.
        let transport = if settings.use_tls {
            SmtpTransport::relay(&settings.host)?
        } else {
            SmtpTransport::starttls_relay(&settings.host)?
        }
        .port(settings.port)
        .credentials(Credentials::new(
            settings.user.clone(),
            settings.pass.clone(),
        ))
        .build();

        debug!(host = %settings.host, port = %settings.port, "Sending email");
        transport.send(&message)?;
        info!(recipients = self.to.len(), "Email sent");

        Ok(())
    }
}
