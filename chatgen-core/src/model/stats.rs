use std::collections::HashMap;

use crate::error::StoreError;
use crate::model::tokenizer::Tokenizer;
use crate::store::MessageStore;

/// Counts word occurrences across the whole message history.
///
/// Recomputed from a fresh scan on every call, so the result always
/// reflects the current store contents. Words are lowercased before
/// counting; every count is at least 1. No ordering is implied.
#[derive(Clone, Debug)]
pub struct WordFrequencyAggregator {
	tokenizer: Tokenizer,
}

impl WordFrequencyAggregator {
	pub fn new(tokenizer: Tokenizer) -> Self {
		Self { tokenizer }
	}

	/// Scans `store` and returns the lowercased word counts.
	///
	/// # Errors
	/// A record that fails to decode aborts the computation, the same
	/// way a chain build does.
	pub fn compute(&self, store: &MessageStore) -> Result<HashMap<String, u64>, StoreError> {
		let mut counts: HashMap<String, u64> = HashMap::new();
		for record in store.scan()? {
			let (_, message) = record?;
			for word in self.tokenizer.tokenize(&message.text) {
				*counts.entry(word.to_lowercase()).or_insert(0) += 1;
			}
		}
		Ok(counts)
	}
}
