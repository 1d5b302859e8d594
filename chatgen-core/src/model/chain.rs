use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;

use rand::Rng;
use rand::prelude::IteratorRandom;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StoreError;
use crate::model::tokenizer::Tokenizer;
use crate::store::MessageStore;

/// Order-2 word chain.
///
/// Maps a space-joined two-word prefix to the list of words observed to
/// follow it. Duplicates are kept on purpose: the list is a weighted
/// multiset, and sampling from it reproduces the empirical frequency.
///
/// # Invariants
/// - Every key contains exactly one space (two words)
/// - Every continuation list holds at least one entry
/// - Built once from a store snapshot, immutable afterward
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Chain {
	links: HashMap<String, Vec<String>>,
}

impl Chain {
	/// Number of distinct prefixes.
	pub fn len(&self) -> usize {
		self.links.len()
	}

	pub fn is_empty(&self) -> bool {
		self.links.is_empty()
	}

	pub fn contains(&self, prefix: &str) -> bool {
		self.links.contains_key(prefix)
	}

	/// The words observed to follow `prefix`, duplicates included.
	pub fn continuations(&self, prefix: &str) -> Option<&[String]> {
		self.links.get(prefix).map(Vec::as_slice)
	}

	/// A uniformly random prefix, or `None` on an empty chain.
	pub fn random_prefix<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		self.links.keys().choose(rng).map(String::as_str)
	}

	fn push(&mut self, prefix: String, word: String) {
		self.links.entry(prefix).or_default().push(word);
	}

	/// Merges another chain into this one by concatenating continuation
	/// lists, so occurrence weights add up.
	pub fn merge(&mut self, other: Self) {
		for (prefix, mut words) in other.links {
			self.links.entry(prefix).or_default().append(&mut words);
		}
	}
}

/// Builds a [`Chain`] from a full scan of the message store.
///
/// # Responsibilities
/// - Scan the store once, in sequence order
/// - Tokenize each message and record its word transitions
/// - Parallelize the per-message work across chunks and merge the parts
///
/// The builder does not own the store and holds no state between builds;
/// each call produces an independent snapshot of the history.
#[derive(Clone, Debug)]
pub struct ChainBuilder {
	tokenizer: Tokenizer,
}

impl ChainBuilder {
	pub fn new(tokenizer: Tokenizer) -> Self {
		Self { tokenizer }
	}

	/// Scans `store` and builds the chain.
	///
	/// The result reflects exactly the records committed when the scan
	/// started; messages appended afterward are invisible until the next
	/// build.
	///
	/// # Errors
	/// A record that fails to decode aborts the build; there is no
	/// partial chain.
	pub fn build(&self, store: &MessageStore) -> Result<Chain, StoreError> {
		let mut texts = Vec::new();
		for record in store.scan()? {
			let (_, message) = record?;
			texts.push(message.text);
		}

		let messages = texts.len();
		let chain = self.build_from_texts(texts);
		info!(messages, prefixes = chain.len(), "chain built");
		Ok(chain)
	}

	/// Splits the texts into chunks, builds a partial chain per chunk on
	/// its own thread and merges them all.
	fn build_from_texts(&self, texts: Vec<String>) -> Chain {
		if texts.is_empty() {
			return Chain::default();
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = (texts.len() + chunks - 1) / chunks;

		let (tx, rx) = mpsc::channel();
		for chunk in texts.chunks(chunk_size) {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();
			let tokenizer = self.tokenizer;

			thread::spawn(move || {
				let mut partial = Chain::default();
				for text in &chunk {
					Self::add_message(&tokenizer, &mut partial, text);
				}
				tx.send(partial).expect("Failed to send from thread");
			});
		}
		drop(tx);

		let mut chain = Chain::default();
		for partial in rx.iter() {
			chain.merge(partial);
		}
		chain
	}

	/// Records the transitions of a single message.
	///
	/// Messages with fewer than 4 kept words contribute nothing. The
	/// continuation recorded for every prefix of a message is that
	/// message's word at index 3, whatever the prefix position.
	fn add_message(tokenizer: &Tokenizer, chain: &mut Chain, text: &str) {
		let words = tokenizer.tokenize(text);
		if words.len() < 4 {
			return;
		}

		let fourth = words[3].clone();
		for i in 0..words.len() - 3 {
			let prefix = format!("{} {}", words[i], words[i + 1]);
			chain.push(prefix, fourth.clone());
		}
	}
}

/// Published chain snapshot shared by generation requests.
///
/// Readers grab an [`Arc`] to the current snapshot and keep using it for
/// the whole request; a rebuild swaps the reference in one step, so no
/// reader ever observes a half-built chain.
pub struct ChainCell {
	current: RwLock<Arc<Chain>>,
}

impl ChainCell {
	pub fn new(chain: Chain) -> Self {
		Self {
			current: RwLock::new(Arc::new(chain)),
		}
	}

	/// The currently published snapshot.
	pub fn snapshot(&self) -> Arc<Chain> {
		self.current
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	/// Atomically replaces the published snapshot.
	pub fn publish(&self, chain: Chain) {
		*self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(chain);
	}
}
