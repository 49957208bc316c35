//! rgbw-link - binary protocol and WebSocket link for RGBW lighting controllers
//!
//! Layers, bottom-up:
//! - `codec`: fixed-width little-endian fields and zero-padded strings
//! - `model`: the device's packed records (`codec::Record` impls)
//! - `protocol`: one-byte tag framing for the WebSocket channel
//! - `transport`: the reconnecting session and its handler registry
//!
//! `ble` and `rest` describe the device's other two surfaces.

#[macro_use]
mod macros;

pub mod ble;
pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod model;
pub mod protocol;
pub mod rest;
pub mod transport;

pub use error::{LinkError, ProtocolError, Result};
