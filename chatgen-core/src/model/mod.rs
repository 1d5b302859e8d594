//! Word chain model built from the message history.
//!
//! This module turns the durable history into synthetic text:
//! - Word tokenization with a pluggable alphabet filter (`Tokenizer`)
//! - The order-2 word chain and its builder (`Chain`, `ChainBuilder`)
//! - Atomic snapshot publication for rebuilds (`ChainCell`)
//! - Bounded random-walk sentence generation (`SentenceGenerator`)
//! - Word-frequency statistics over the full history (`WordFrequencyAggregator`)

/// Order-2 word chain, its builder and the published-snapshot cell.
///
/// The chain is built wholesale from one scan of the store and is
/// immutable afterward; rebuilds publish a fresh snapshot.
pub mod chain;

/// Random-walk sentence generation over a built chain.
///
/// Walks are bounded; a walk that hits the bound terminates normally
/// with a truncated sentence rather than looping forever.
pub mod generator;

/// Word-frequency aggregation for diagnostics.
pub mod stats;

/// Whitespace/punctuation tokenizer with an injected alphabet filter.
pub mod tokenizer;
