use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::{error, info};

use chatgen_core::model::chain::{ChainBuilder, ChainCell};
use chatgen_core::model::generator::SentenceGenerator;
use chatgen_core::model::stats::WordFrequencyAggregator;
use chatgen_core::model::tokenizer::Tokenizer;
use chatgen_core::store::MessageStore;

mod config;
mod handlers;
mod telegram;
mod worker;

use crate::config::AppConfig;
use crate::telegram::TelegramClient;

/// Shared state behind every handler and ingest worker.
pub struct AppState {
	pub store: Arc<MessageStore>,
	pub chain: ChainCell,
	pub builder: ChainBuilder,
	pub generator: SentenceGenerator,
	pub stats: WordFrequencyAggregator,
	pub tokenizer: Tokenizer,
	pub webhook_token: String,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
	tracing_subscriber::fmt::init();

	let config = match AppConfig::load("chatgen") {
		Ok(c) => c,
		Err(e) => {
			error!("Failed to load configuration: {}", e);
			std::process::exit(1);
		}
	};

	let store = match MessageStore::open(&config.storage.path) {
		Ok(store) => Arc::new(store),
		Err(e) => {
			error!("Cannot open the message log: {}", e);
			std::process::exit(1);
		}
	};

	let tokenizer = Tokenizer::cyrillic();
	let builder = ChainBuilder::new(tokenizer);
	let initial = match builder.build(&store) {
		Ok(chain) => chain,
		Err(e) => {
			error!("Cannot build the chain: {}", e);
			std::process::exit(1);
		}
	};
	info!(prefixes = initial.len(), "initial chain published");

	let state = web::Data::new(AppState {
		store: store.clone(),
		chain: ChainCell::new(initial),
		builder,
		generator: SentenceGenerator::new(config.generation.max_tokens),
		stats: WordFrequencyAggregator::new(tokenizer),
		tokenizer,
		webhook_token: config.telegram.token.clone(),
	});

	let telegram = web::Data::new(TelegramClient::new(config.telegram.token.clone()));

	let queue = web::Data::new(worker::spawn(
		config.ingest.workers,
		config.ingest.queue_capacity,
		config.telegram.reply_chance,
		state.clone(),
		telegram.clone(),
	));

	if config.telegram.token.is_empty() {
		info!("No bot token configured, skipping webhook registration");
	} else {
		let hook_url = format!("{}/hook/{}", config.telegram.hook_base, config.telegram.token);
		telegram.set_webhook(&hook_url).await;
	}

	let host = config.server.host.clone();
	let port = config.server.port;
	info!("Listening on {}:{}", host, port);

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(state.clone())
			.app_data(telegram.clone())
			.app_data(queue.clone())
			.service(handlers::health)
			.service(handlers::receive_update)
			.service(handlers::get_generated)
			.service(handlers::rebuild_chain)
			.service(handlers::get_stats)
			.service(handlers::get_chain)
	})
	.bind((host, port))?
	.run()
	.await
}
