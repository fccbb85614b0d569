//! Responder notification seam.
//!
//! The pipeline pages humans for gravitational-wave events. Delivery is
//! behind the [`Notifier`] trait so the transport (Twilio voice/SMS in
//! production) stays out of the ingestion path and tests can observe exactly
//! what would have been sent.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::models::Event;

/// Outbound voice/SMS notification.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Place a voice call to every on-duty responder.
    async fn call_everyone(&self, event: &Event) -> anyhow::Result<()>;

    /// Send a text message to every on-duty responder.
    async fn text_everyone(&self, event: &Event, message: &str) -> anyhow::Result<()>;
}

/// Production default: emits structured log lines for the external pager
/// relay. The relay owns the Twilio credentials and the actual REST delivery.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn call_everyone(&self, event: &Event) -> anyhow::Result<()> {
        log::warn!("PAGE voice: event {}", event);
        Ok(())
    }

    async fn text_everyone(&self, event: &Event, message: &str) -> anyhow::Result<()> {
        log::warn!("PAGE text: event {}: {}", event, message);
        Ok(())
    }
}

/// Test double recording every notification request.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<String>>,
    texts: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn text_count(&self) -> usize {
        self.texts.lock().len()
    }

    /// Dateobs strings of the events that triggered calls.
    pub fn called_events(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn call_everyone(&self, event: &Event) -> anyhow::Result<()> {
        self.calls
            .lock()
            .push(event.dateobs.format("%Y-%m-%dT%H:%M:%S").to_string());
        Ok(())
    }

    async fn text_everyone(&self, event: &Event, message: &str) -> anyhow::Result<()> {
        self.texts.lock().push((
            event.dateobs.format("%Y-%m-%dT%H:%M:%S").to_string(),
            message.to_string(),
        ));
        Ok(())
    }
}
