//! WebSocket transport to the device
//!
//! Separates the pieces of the session:
//! - **HandlerRegistry**: which callback receives which tagged frame
//! - **Reconnector**: when to retry a lost connection
//! - **Session**: the tokio task that owns the socket
//! - **Stats**: traffic counters shared with every handle
//!
//! # Example
//!
//! ```ignore
//! let mut registry = HandlerRegistry::new();
//! registry.on(|status: WiFiStatus| println!("wifi: {:?}", status));
//!
//! let session = Session::spawn("ws://192.168.4.1/ws", registry, ReconnectPolicy::default());
//! session.wait_until_open(Duration::from_secs(10)).await?;
//! session.request_heap();
//! ```

pub mod reconnect;
pub mod registry;
pub mod session;
pub mod stats;

pub use reconnect::{ReconnectDecision, ReconnectPolicy, Reconnector};
pub use registry::{DispatchOutcome, Handler, HandlerRegistry};
pub use session::{Session, SessionHandle, SessionState};
pub use stats::{Stats, StatsSnapshot};
