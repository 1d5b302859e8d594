/// Membership test for the target script.
pub type AlphabetFn = fn(char) -> bool;

/// Characters that split words, besides whitespace.
const DELIMITERS: &str = ".,!?;:()-";

/// Splits raw text into words and keeps those that belong to the target
/// script.
///
/// Splitting happens on runs of whitespace and of the delimiter set
/// `. , ! ? ; : ( ) -`; consecutive delimiters collapse, so no empty
/// token is ever produced. A token is kept when it contains at least one
/// character accepted by the alphabet predicate. Order is preserved and
/// the result is deterministic.
///
/// The alphabet is injected rather than fixed, so the same tokenizer
/// serves any script; [`Tokenizer::cyrillic`] covers the design target.
#[derive(Clone, Copy, Debug)]
pub struct Tokenizer {
	alphabet: AlphabetFn,
}

impl Tokenizer {
	pub fn new(alphabet: AlphabetFn) -> Self {
		Self { alphabet }
	}

	/// Tokenizer keeping words with at least one Cyrillic character.
	pub fn cyrillic() -> Self {
		Self::new(is_cyrillic)
	}

	pub fn tokenize(&self, text: &str) -> Vec<String> {
		text.split(|c: char| c.is_whitespace() || DELIMITERS.contains(c))
			.filter(|word| !word.is_empty())
			.filter(|word| word.chars().any(self.alphabet))
			.map(str::to_owned)
			.collect()
	}
}

/// Basic Cyrillic plus the supplement block.
pub fn is_cyrillic(c: char) -> bool {
	matches!(c, '\u{0400}'..='\u{04FF}' | '\u{0500}'..='\u{052F}')
}
