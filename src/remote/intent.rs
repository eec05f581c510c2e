//! Movement intents and the latest-intent handoff
//!
//! Intents arrive from the gesture channel as loosely-typed JSON. They are
//! validated once here, so the simulation only ever sees a well-formed
//! `Intent`.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discrete movement directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaseAction {
    Forward,
    Backward,
    #[default]
    Stop,
}

impl BaseAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseAction::Forward => "FORWARD",
            BaseAction::Backward => "BACKWARD",
            BaseAction::Stop => "STOP",
        }
    }

    /// Unknown names map to `None`; callers decide the fallback
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "FORWARD" => Some(BaseAction::Forward),
            "BACKWARD" => Some(BaseAction::Backward),
            "STOP" => Some(BaseAction::Stop),
            _ => None,
        }
    }
}

/// One tick's movement directive
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Intent {
    pub base_action: BaseAction,
    /// Turn rate multiplier in [-1, 1]
    pub turn_intensity: f32,
}

impl Intent {
    pub const STOP: Intent = Intent {
        base_action: BaseAction::Stop,
        turn_intensity: 0.0,
    };

    pub fn new(base_action: BaseAction, turn_intensity: f32) -> Self {
        Self {
            base_action,
            turn_intensity: clamp_turn(turn_intensity),
        }
    }

    pub fn forward(turn_intensity: f32) -> Self {
        Self::new(BaseAction::Forward, turn_intensity)
    }

    pub fn backward() -> Self {
        Self::new(BaseAction::Backward, 0.0)
    }

    /// Build an intent from an arbitrary JSON value.
    ///
    /// Missing or malformed fields fall back to `STOP` / `0`; this never fails.
    pub fn from_json(value: &Value) -> Self {
        let base_action = value
            .get("base_action")
            .and_then(Value::as_str)
            .and_then(BaseAction::parse)
            .unwrap_or_default();
        let turn_intensity = value
            .get("turn_intensity")
            .and_then(Value::as_f64)
            .map(|t| t as f32)
            .unwrap_or(0.0);
        Self::new(base_action, turn_intensity)
    }
}

fn clamp_turn(turn: f32) -> f32 {
    if turn.is_finite() {
        turn.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Single-writer / single-reader slot holding the most recent intent.
///
/// The channel side calls `publish`; the simulation calls `snapshot` once per
/// tick. `Intent` is `Copy`, so each side holds the lock only for a copy.
#[derive(Debug, Clone, Default)]
pub struct IntentSlot {
    inner: Arc<Mutex<Intent>>,
}

impl IntentSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, intent: Intent) {
        *self.inner.lock() = intent;
    }

    pub fn snapshot(&self) -> Intent {
        *self.inner.lock()
    }

    pub fn reset(&self) {
        self.publish(Intent::STOP);
    }
}
