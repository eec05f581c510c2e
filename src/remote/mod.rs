//! Remote command source
//!
//! Bridges the asynchronous gesture channel and the frame-driven simulation:
//! - `intent`: validated movement intents and the latest-intent slot
//! - `link`: connection lifecycle with fixed-delay reconnects

pub mod intent;
pub mod link;

pub use intent::{BaseAction, Intent, IntentSlot};
pub use link::{LinkAction, LinkStatus, RemoteLink, WireError, decode_frame};
