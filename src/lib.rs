//! demo-shell: a single-page dashboard demo with a canned-answer chat.
//!
//! SYSTEM CONTEXT
//! ==============
//! The HTTP server (`routes`) serves the static page and answers chat
//! messages from a fixed preset table (`presets`, `answer`). The page's
//! interaction logic lives here as plain state machines: tab and overlay
//! navigation (`navigator`) and the chat transcript with its delayed,
//! cancellable replies (`transcript`, `chat`). `snapshot` renders the
//! offline fund NAV chart PNG.

pub mod answer;
pub mod chat;
pub mod config;
pub mod navigator;
pub mod presets;
pub mod random;
pub mod routes;
pub mod snapshot;
pub mod state;
pub mod telemetry;
pub mod transcript;
