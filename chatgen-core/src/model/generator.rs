use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::ModelError;
use crate::model::chain::Chain;

/// Outcome of one generation walk.
///
/// `Completed` means the walk reached a prefix with no continuations;
/// `Truncated` means it hit the step bound first. Both carry a usable
/// sentence; truncation is a normal termination, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Sentence {
	Completed(String),
	Truncated(String),
}

impl Sentence {
	pub fn as_str(&self) -> &str {
		match self {
			Sentence::Completed(text) | Sentence::Truncated(text) => text,
		}
	}

	pub fn into_text(self) -> String {
		match self {
			Sentence::Completed(text) | Sentence::Truncated(text) => text,
		}
	}

	pub fn is_truncated(&self) -> bool {
		matches!(self, Sentence::Truncated(_))
	}
}

/// Produces one synthetic sentence per request by walking a [`Chain`].
///
/// # Responsibilities
/// - Seed the walk with a random (or caller-supplied) two-word prefix
/// - Sample continuations weighted by their observed frequency
/// - Bound the walk so cyclic prefixes cannot loop forever
///
/// The generator only reads the chain it is given; it keeps no state
/// between calls.
#[derive(Clone, Copy, Debug)]
pub struct SentenceGenerator {
	max_tokens: usize,
}

impl SentenceGenerator {
	/// Default cap on words appended past the seed.
	pub const DEFAULT_MAX_TOKENS: usize = 200;

	pub fn new(max_tokens: usize) -> Self {
		Self { max_tokens }
	}

	/// Generates a sentence starting from a uniformly random prefix.
	///
	/// # Errors
	/// [`ModelError::EmptyModel`] when the chain has no prefixes at all.
	pub fn generate(&self, chain: &Chain) -> Result<Sentence, ModelError> {
		let mut rng = rand::rng();
		let seed = chain
			.random_prefix(&mut rng)
			.ok_or(ModelError::EmptyModel)?
			.to_owned();
		Ok(self.walk(chain, seed, &mut rng))
	}

	/// Generates a sentence starting from the given two words, e.g. the
	/// tail of a message being replied to.
	///
	/// When the pair is not a known prefix the walk ends immediately and
	/// the sentence is just the seed.
	///
	/// # Errors
	/// [`ModelError::EmptyModel`] when the chain has no prefixes at all.
	pub fn generate_from(
		&self,
		chain: &Chain,
		first: &str,
		second: &str,
	) -> Result<Sentence, ModelError> {
		if chain.is_empty() {
			return Err(ModelError::EmptyModel);
		}
		let mut rng = rand::rng();
		Ok(self.walk(chain, format!("{first} {second}"), &mut rng))
	}

	/// The random walk itself.
	///
	/// Repeatedly samples a continuation of the current prefix and
	/// advances to (second word, sampled word). Stops when the prefix is
	/// unknown (complete) or when `max_tokens` words have been appended
	/// (truncated).
	fn walk<R: Rng>(&self, chain: &Chain, seed: String, rng: &mut R) -> Sentence {
		let mut sentence = seed.clone();
		let mut prefix = seed;
		let mut appended = 0;

		loop {
			let Some(continuations) = chain.continuations(&prefix) else {
				return Sentence::Completed(sentence);
			};
			if appended >= self.max_tokens {
				return Sentence::Truncated(sentence);
			}

			// Duplicates in the list weight the draw by frequency.
			let Some(word) = continuations.choose(rng).cloned() else {
				return Sentence::Completed(sentence);
			};

			let second = prefix.rsplit(' ').next().unwrap_or_default().to_owned();
			sentence.push(' ');
			sentence.push_str(&word);
			prefix = format!("{second} {word}");
			appended += 1;
		}
	}
}

impl Default for SentenceGenerator {
	fn default() -> Self {
		Self::new(Self::DEFAULT_MAX_TOKENS)
	}
}
