//! RelayBot Types - Core types for the RelayBot gateway
//!
//! This module defines the data that flows through one message round trip:
//! the inbound message, the intent derived from it, the weather reading a
//! provider returns and the reply that goes back out.

pub mod error;
pub mod intent;
pub mod message;
pub mod weather;

pub use error::{ConfigError, DeliveryError, WeatherError};
pub use intent::Intent;
pub use message::{ChatId, IncomingMessage, OutgoingReply};
pub use weather::{ConditionCode, WeatherReading};
