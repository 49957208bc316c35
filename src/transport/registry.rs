//! Per-tag handler table
//!
//! Built by the caller, then moved into the session that dispatches
//! inbound frames through it. One handler per `MessageType`; a later
//! registration replaces the earlier one.

use crate::error::ProtocolError;
use crate::protocol::{DeviceMessage, InboundMessage, MessageType};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Raw frame handler: receives the full frame, tag included
pub type Handler = Box<dyn FnMut(&[u8]) -> Result<(), ProtocolError> + Send + 'static>;

/// Result of dispatching one inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler ran and returned `Ok`
    Handled,
    /// Zero-length frame
    Empty,
    /// Tag byte outside the message catalogue
    UnknownType(u8),
    /// Known tag with no registered handler
    Unhandled(MessageType),
    /// Handler returned an error or panicked
    Failed(MessageType),
}

impl DispatchOutcome {
    /// Anything other than `Handled` counts as a dropped frame
    pub fn is_dropped(self) -> bool {
        self != Self::Handled
    }
}

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<MessageType, Handler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw handler for `message_type`
    ///
    /// Returns `true` if it replaced an existing handler.
    pub fn register<F>(&mut self, message_type: MessageType, handler: F) -> bool
    where
        F: FnMut(&[u8]) -> Result<(), ProtocolError> + Send + 'static,
    {
        let replaced = self
            .handlers
            .insert(message_type, Box::new(handler))
            .is_some();
        if replaced {
            debug!("Replaced handler for {}", message_type);
        }
        replaced
    }

    /// Register a typed handler that decodes the frame into `M` first
    pub fn on<M, F>(&mut self, mut handler: F) -> bool
    where
        M: InboundMessage,
        F: FnMut(M) + Send + 'static,
    {
        self.register(M::MESSAGE_TYPE, move |frame| {
            handler(M::decode_frame(frame)?);
            Ok(())
        })
    }

    /// Registry decoding every tag into a `DeviceMessage` sent on `tx`
    ///
    /// A full or closed channel drops the message with a warning; the
    /// frame still counts as handled.
    pub fn forwarding(tx: mpsc::Sender<DeviceMessage>) -> Self {
        let mut registry = Self::new();
        for &message_type in MessageType::ALL {
            let tx = tx.clone();
            registry.register(message_type, move |frame| {
                if let Err(e) = tx.try_send(DeviceMessage::decode(frame)?) {
                    warn!("Dropping decoded {} message: {}", message_type, e);
                }
                Ok(())
            });
        }
        registry
    }

    /// Builder form of `on`
    pub fn with<M, F>(mut self, handler: F) -> Self
    where
        M: InboundMessage,
        F: FnMut(M) + Send + 'static,
    {
        self.on::<M, F>(handler);
        self
    }

    pub fn remove(&mut self, message_type: MessageType) -> bool {
        self.handlers.remove(&message_type).is_some()
    }

    pub fn contains(&self, message_type: MessageType) -> bool {
        self.handlers.contains_key(&message_type)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Route one inbound frame to its handler
    ///
    /// Never fails: decode errors and panics inside a handler are
    /// logged and reported as `Failed` so the next frame still gets
    /// dispatched.
    pub fn dispatch(&mut self, frame: &[u8]) -> DispatchOutcome {
        let Some(&tag) = frame.first() else {
            warn!("Dropping empty frame");
            return DispatchOutcome::Empty;
        };

        let message_type = match MessageType::try_from(tag) {
            Ok(message_type) => message_type,
            Err(_) => {
                warn!("Dropping frame with unknown type {} ({} bytes)", tag, frame.len());
                return DispatchOutcome::UnknownType(tag);
            }
        };

        let Some(handler) = self.handlers.get_mut(&message_type) else {
            warn!("No handler for {} ({} bytes)", message_type, frame.len());
            return DispatchOutcome::Unhandled(message_type);
        };

        match panic::catch_unwind(AssertUnwindSafe(|| handler(frame))) {
            Ok(Ok(())) => DispatchOutcome::Handled,
            Ok(Err(e)) => {
                warn!("Handler for {} rejected frame: {}", message_type, e);
                DispatchOutcome::Failed(message_type)
            }
            Err(_) => {
                warn!("Handler for {} panicked", message_type);
                DispatchOutcome::Failed(message_type)
            }
        }
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.handlers.keys().copied().collect();
        types.sort_by_key(|t| t.code());
        f.debug_struct("HandlerRegistry")
            .field("handlers", &types)
            .finish()
    }
}
