//! Durable message history.
//!
//! Messages received from the chat transport are kept in a single
//! append-only log file, keyed by a strictly increasing sequence number.
//! Records are written once and never mutated or deleted; everything the
//! model layer knows is rebuilt from full scans of this log.

/// The append-only log itself (`MessageStore`) and its scan iterator.
pub mod log;

/// The stored record types (message, sender, chat, entities).
pub mod message;

pub use log::MessageStore;
pub use message::StoredMessage;
