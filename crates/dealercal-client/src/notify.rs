//! Selection notifiers used by `dealercal select`.
//!
//! [`SelectionNotifier::notify`] cannot fail, so both notifiers hold on to
//! the first delivery error and hand it back from `finish`.

use std::io::Write;
use std::time::Duration;

use dealercal_core::{SelectionNotice, SelectionNotifier};
use notify_rust::Notification;
use tracing::{debug, error, info};

use crate::error::{ClientError, ClientResult};

/// Writes each notice as a line of text or JSON.
pub struct WriterNotifier<W> {
    writer: W,
    json: bool,
    error: Option<ClientError>,
}

impl<W: Write> WriterNotifier<W> {
    pub fn new(writer: W, json: bool) -> Self {
        Self {
            writer,
            json,
            error: None,
        }
    }

    fn write_notice(&mut self, notice: &SelectionNotice) -> ClientResult<()> {
        if self.json {
            serde_json::to_writer(&mut self.writer, notice)
                .map_err(|e| ClientError::Notify(format!("failed to encode notice: {}", e)))?;
            writeln!(self.writer)?;
        } else {
            writeln!(self.writer, "{}", notice)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Returns the writer, or the first write error.
    pub fn finish(self) -> ClientResult<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.writer),
        }
    }
}

impl<W: Write> SelectionNotifier for WriterNotifier<W> {
    fn notify(&mut self, notice: SelectionNotice) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.write_notice(&notice) {
            self.error = Some(err);
        }
    }
}

/// Shows each notice as a desktop notification.
pub struct DesktopNotifier {
    app_name: String,
    timeout: Duration,
    error: Option<ClientError>,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self {
            app_name: "dealercal".to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            error: None,
        }
    }
}

impl DesktopNotifier {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 8;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the first delivery error, if any.
    pub fn finish(self) -> ClientResult<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl SelectionNotifier for DesktopNotifier {
    fn notify(&mut self, notice: SelectionNotice) {
        let body = format!("{} #{}", notice.kind, notice.id);
        debug!(title = %notice.title, body = %body, "Sending notification");

        let mut notification = Notification::new();
        notification
            .appname(&self.app_name)
            .summary(&notice.title)
            .body(&body)
            .timeout(self.timeout);

        match notification.show() {
            Ok(_) => info!(key = %notice.key(), "Notification sent"),
            Err(e) => {
                error!(error = %e, key = %notice.key(), "Failed to send notification");
                if self.error.is_none() {
                    self.error = Some(ClientError::Notify(e.to_string()));
                }
            }
        }
    }
}
