//! The collaborator contract exposed to a user-facing shell.
//!
//! A front end (GUI or otherwise) hands over operator-typed text and displays whatever comes
//! back; all protocol decisions live here. The status strings returned by
//! [`CommandShell::send_or_query`] are a compatibility contract: callers match on the literal
//! values [`STATUS_ERROR`] and [`STATUS_TIMEOUT`], so these must never change.

use crate::{ConnectionParams, Session, Transport};

/// Literal status returned when a send or receive fails for any reason other than a timeout.
pub const STATUS_ERROR: &str = "Error";

/// Literal status returned when no terminated response arrived within the receive timeout.
pub const STATUS_TIMEOUT: &str = "Timeout";

/// A front-end facade holding at most one live session.
///
/// The session is owned here rather than living in per-form mutable fields: connecting twice is
/// refused, and disconnecting hands the transport back for release. The generic parameter exists
/// so tests can attach a session over a scripted transport; front ends use the default boxed
/// form together with [`CommandShell::connect`].
pub struct CommandShell<T: Transport = Box<dyn Transport + Send>> {
    session: Option<Session<T>>,
}

impl<T: Transport> CommandShell<T> {
    /// Create a shell with no live session.
    pub fn new() -> Self {
        CommandShell { session: None }
    }

    /// Whether a session is currently live.
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Attach an already opened session.
    ///
    /// Refused with an error message when a session is already live; a session owns its transport
    /// exclusively and the shell owns at most one session.
    ///
    /// # Arguments
    /// * `session` - The session to take ownership of.
    pub fn attach(&mut self, session: Session<T>) -> Result<(), String> {
        if self.session.is_some() {
            return Err("Already connected.".to_string());
        }
        self.session = Some(session);
        Ok(())
    }

    /// Close the live session and release its transport.
    ///
    /// Returns the error message as text if the release fails or no session is live; the shell is
    /// disconnected afterwards either way.
    pub fn disconnect(&mut self) -> Result<(), String> {
        match self.session.take() {
            Some(session) => session.close().map_err(|err| err.to_string()),
            None => Err("Not connected.".to_string()),
        }
    }

    /// Send operator-typed text, querying for a response when it contains a `?`.
    ///
    /// Commands without a query marker are sent without any receive attempt and yield an empty
    /// string on success. Query responses are returned as decoded text. Failures map to the
    /// literal status strings: [`STATUS_TIMEOUT`] when the instrument stayed silent past the
    /// receive timeout, [`STATUS_ERROR`] for everything else (including calling this while
    /// disconnected).
    ///
    /// # Arguments
    /// * `text` - The command as typed, without terminator.
    pub fn send_or_query(&mut self, text: &str) -> String {
        let Some(session) = self.session.as_mut() else {
            return STATUS_ERROR.to_string();
        };

        if !text.contains('?') {
            return match session.send(text) {
                Ok(()) => String::new(),
                Err(_) => STATUS_ERROR.to_string(),
            };
        }

        match session.query(text) {
            Ok(response) => response,
            Err(err) if err.is_timeout() => STATUS_TIMEOUT.to_string(),
            Err(_) => STATUS_ERROR.to_string(),
        }
    }
}

impl<T: Transport> Default for CommandShell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandShell {
    /// Open the transport described by the parameters and attach the session.
    ///
    /// Any connect failure (including parameter coercion upstream) is reported as the error
    /// message text, ready for display.
    ///
    /// # Arguments
    /// * `params` - Typed connection parameters, see [`ConnectionParams`].
    pub fn connect(&mut self, params: &ConnectionParams) -> Result<(), String> {
        if self.session.is_some() {
            return Err("Already connected.".to_string());
        }
        let session = params.open().map_err(|err| err.to_string())?;
        self.session = Some(session);
        Ok(())
    }
}
