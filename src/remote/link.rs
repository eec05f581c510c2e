//! Gesture command channel state
//!
//! The transport itself lives outside the crate. `RemoteLink` only tracks the
//! connection lifecycle, decodes incoming frames into the shared
//! `IntentSlot`, and tells its driver when to dial again.

use serde_json::Value;

use super::intent::{Intent, IntentSlot};

/// Default gesture host port
pub const DEFAULT_PORT: u16 = 8765;
/// Delay before redialing after the socket closes (seconds)
pub const RECONNECT_DELAY: f32 = 3.0;

/// Errors decoding a frame from the gesture host
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Message is not a JSON object")]
    NotAnObject,
}

/// Decode one text frame.
///
/// Frames look like `{"gesture": {...}}`. A frame without a `gesture` field
/// decodes to `None`.
pub fn decode_frame(text: &str) -> Result<Option<Intent>, WireError> {
    let value: Value = serde_json::from_str(text)?;
    let Some(obj) = value.as_object() else {
        return Err(WireError::NotAnObject);
    };
    Ok(obj.get("gesture").map(Intent::from_json))
}

/// Connection lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Disconnected,
    Connecting,
    Connected,
}

/// What the transport driver should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Open a socket to this URL
    Dial(String),
}

/// Reconnecting client for the gesture command stream
#[derive(Debug)]
pub struct RemoteLink {
    url: String,
    retry_delay: f32,
    status: LinkStatus,
    /// Set after an error until the next successful open
    errored: bool,
    /// Seconds until the next dial, while a retry is pending
    retry_in: Option<f32>,
    slot: IntentSlot,
}

impl RemoteLink {
    pub fn new(url: impl Into<String>, retry_delay: f32, slot: IntentSlot) -> Self {
        Self {
            url: url.into(),
            retry_delay: retry_delay.max(0.0),
            status: LinkStatus::Disconnected,
            errored: false,
            retry_in: None,
            slot,
        }
    }

    /// `ws://{host}:8765` with the default retry delay
    pub fn for_host(host: &str, slot: IntentSlot) -> Self {
        Self::new(format!("ws://{}:{}", host, DEFAULT_PORT), RECONNECT_DELAY, slot)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    pub fn slot(&self) -> &IntentSlot {
        &self.slot
    }

    /// Human readable status for the HUD
    pub fn status_text(&self) -> &'static str {
        match self.status {
            LinkStatus::Connected => "Connected!",
            LinkStatus::Connecting => "Connecting...",
            LinkStatus::Disconnected if self.errored => "Connection Error!",
            LinkStatus::Disconnected if self.retry_in.is_some() => "Disconnected. Retrying...",
            LinkStatus::Disconnected => "Disconnected",
        }
    }

    /// Start dialing. Ignored unless disconnected.
    pub fn connect(&mut self) -> Option<LinkAction> {
        if self.status != LinkStatus::Disconnected {
            return None;
        }
        log::info!("Attempting to connect to {}...", self.url);
        self.status = LinkStatus::Connecting;
        self.retry_in = None;
        Some(LinkAction::Dial(self.url.clone()))
    }

    pub fn on_open(&mut self) {
        log::info!("Gesture link established");
        self.status = LinkStatus::Connected;
        self.errored = false;
    }

    /// Decode a frame and publish the intent it carries.
    ///
    /// Bad frames are logged and dropped; the last good intent stays in place.
    pub fn on_message(&mut self, text: &str) -> Option<Intent> {
        match decode_frame(text) {
            Ok(Some(intent)) => {
                self.slot.publish(intent);
                Some(intent)
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("Dropping gesture frame: {}", e);
                None
            }
        }
    }

    /// Transport reported an error. A close normally follows.
    pub fn on_error(&mut self, reason: &str) {
        log::warn!("Gesture link error: {}", reason);
        self.errored = true;
    }

    /// Socket closed; schedule a redial and stop the player.
    pub fn on_close(&mut self) {
        log::info!(
            "Gesture link closed. Retrying in {} seconds...",
            self.retry_delay
        );
        self.status = LinkStatus::Disconnected;
        self.retry_in = Some(self.retry_delay);
        self.slot.reset();
    }

    /// Advance the retry timer. Returns a dial request once the delay elapses.
    pub fn poll(&mut self, dt: f32) -> Option<LinkAction> {
        let dt = crate::sanitize_dt(dt).unwrap_or(0.0);
        let remaining = self.retry_in.as_mut()?;
        *remaining -= dt;
        if *remaining > 0.0 {
            return None;
        }
        self.errored = false;
        self.connect()
    }
}
