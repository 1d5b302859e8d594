#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use chatgen_core::error::ModelError;
	use chatgen_core::model::chain::{Chain, ChainBuilder};
	use chatgen_core::model::generator::{Sentence, SentenceGenerator};
	use chatgen_core::model::tokenizer::Tokenizer;
	use chatgen_core::store::{MessageStore, StoredMessage};

	fn msg(text: &str) -> StoredMessage {
		StoredMessage {
			text: text.to_owned(),
			..StoredMessage::default()
		}
	}

	fn build(texts: &[&str]) -> Chain {
		let dir = tempfile::tempdir().unwrap();
		let store = MessageStore::open(dir.path().join("history.log")).unwrap();
		for text in texts {
			store.append(&msg(text)).unwrap();
		}
		ChainBuilder::new(Tokenizer::cyrillic()).build(&store).unwrap()
	}

	#[test]
	fn test_empty_chain_is_an_explicit_error() {
		let generator = SentenceGenerator::default();
		let chain = Chain::default();

		assert!(matches!(
			generator.generate(&chain),
			Err(ModelError::EmptyModel)
		));
		assert!(matches!(
			generator.generate_from(&chain, "раз", "два"),
			Err(ModelError::EmptyModel)
		));
	}

	#[test]
	fn test_linear_chain_completes() {
		// Single prefix, single continuation: the walk is deterministic
		let chain = build(&["раз два три четыре"]);
		let sentence = SentenceGenerator::default().generate(&chain).unwrap();
		assert_eq!(sentence, Sentence::Completed("раз два четыре".to_owned()));
	}

	#[test]
	fn test_cyclic_chain_is_truncated_at_the_bound() {
		// "хо хо" continues with "хо", which maps straight back to "хо хо"
		let chain = build(&["хо хо хо хо"]);
		let generator = SentenceGenerator::new(10);

		let sentence = generator.generate(&chain).unwrap();
		assert!(sentence.is_truncated());
		// 2 seed words plus exactly the bounded number of appended words
		assert_eq!(sentence.as_str().split(' ').count(), 12);
	}

	#[test]
	fn test_bound_holds_across_many_walks() {
		let chain = build(&["хо хо хо хо", "ха ха ха ха", "раз два три четыре"]);
		let generator = SentenceGenerator::new(25);

		for _ in 0..50 {
			let sentence = generator.generate(&chain).unwrap();
			assert!(sentence.as_str().split(' ').count() <= 27);
		}
	}

	#[test]
	fn test_seeded_walk_starts_from_the_given_words() {
		let chain = build(&["раз два три четыре"]);
		let generator = SentenceGenerator::default();

		// 1. Known pair: the walk continues from it
		let sentence = generator.generate_from(&chain, "раз", "два").unwrap();
		assert_eq!(sentence.into_text(), "раз два четыре");

		// 2. Unknown pair: the walk ends at once with just the seed
		let sentence = generator.generate_from(&chain, "пять", "шесть").unwrap();
		assert_eq!(sentence.into_text(), "пять шесть");
	}

	#[test]
	fn test_sampling_reaches_every_continuation() {
		// Two messages give (раз два) two different continuations
		let chain = build(&["раз два три четыре", "раз два всё готово"]);
		let generator = SentenceGenerator::default();

		let mut seen = HashSet::new();
		for _ in 0..100 {
			seen.insert(
				generator
					.generate_from(&chain, "раз", "два")
					.unwrap()
					.into_text(),
			);
		}
		assert!(seen.contains("раз два четыре"));
		assert!(seen.contains("раз два готово"));
	}
}
