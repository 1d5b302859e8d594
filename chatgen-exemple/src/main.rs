use chatgen_core::model::chain::ChainBuilder;
use chatgen_core::model::generator::SentenceGenerator;
use chatgen_core::model::stats::WordFrequencyAggregator;
use chatgen_core::model::tokenizer::Tokenizer;
use chatgen_core::store::{MessageStore, StoredMessage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Open (or create) a message log under "data"
    let store = MessageStore::open("./data/history.log")?;

    // Feed it some history; every append is durable before it returns
    for text in [
        "привет как твои дела сегодня",
        "дела идут просто отлично спасибо",
        "сегодня отличная погода для прогулки",
        "как насчет прогулки по парку",
    ] {
        let message = StoredMessage {
            text: text.to_owned(),
            ..StoredMessage::default()
        };
        store.append(&message)?;
    }

    // The tokenizer keeps Cyrillic words; any other alphabet works too,
    // the membership test is just a parameter
    let tokenizer = Tokenizer::cyrillic();

    // Build the chain from everything stored so far. The chain is a
    // snapshot: messages appended later stay invisible until a rebuild
    let builder = ChainBuilder::new(tokenizer);
    let chain = builder.build(&store)?;
    println!("Chain knows {} prefixes", chain.len());

    // Generate a few sentences from random starting points. A walk that
    // hits the configured bound comes back truncated instead of looping
    let generator = SentenceGenerator::new(50);
    for i in 0..5 {
        let sentence = generator.generate(&chain)?;
        println!("Sentence {}: {}", i + 1, sentence.as_str());
    }

    // Seeded generation: start the walk from two words of the history,
    // the way a reply to an incoming message does
    let sentence = generator.generate_from(&chain, "как", "твои")?;
    println!("Seeded: {}", sentence.as_str());

    // Word frequencies over the whole history, recomputed on demand
    let aggregator = WordFrequencyAggregator::new(tokenizer);
    let counts = aggregator.compute(&store)?;
    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    for (word, count) in sorted.into_iter().take(5) {
        println!("{}: {}", word, count);
    }

    Ok(())
}
