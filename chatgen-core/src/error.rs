use std::io;

use thiserror::Error;

/// Errors raised by the message store.
#[derive(Debug, Error)]
pub enum StoreError {
	/// The backing log cannot be opened, or its framing is damaged.
	/// Raised at startup; a store in this state must not be served.
	#[error("message log unavailable: {0}")]
	Unavailable(String),

	/// A single append failed. The store itself stays usable and the
	/// caller decides whether to keep serving.
	#[error("message log write failed")]
	WriteFailed(#[from] io::Error),

	/// A stored payload no longer decodes. Surfaced by scans; consumers
	/// abort rather than work from a partial history.
	#[error("malformed record at sequence {seq}: {reason}")]
	MalformedRecord { seq: u64, reason: String },
}

/// Errors raised by chain construction and sentence generation.
#[derive(Debug, Error)]
pub enum ModelError {
	/// Generation was requested before any chain-eligible message exists.
	#[error("the chain has no prefixes to start from")]
	EmptyModel,

	#[error(transparent)]
	Store(#[from] StoreError),
}
