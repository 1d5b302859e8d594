use std::sync::Arc;

use actix_web::web;
use rand::Rng;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use chatgen_core::store::StoredMessage;

use crate::AppState;
use crate::telegram::TelegramClient;

/// Starts the ingest worker pool and returns the submission side of its
/// bounded queue.
///
/// Workers persist inbound messages and occasionally answer them. The
/// queue gives the webhook handler backpressure: when it is full the
/// message is dropped instead of piling up unbounded work.
pub fn spawn(
	workers: usize,
	capacity: usize,
	reply_chance: u32,
	state: web::Data<AppState>,
	telegram: web::Data<TelegramClient>,
) -> mpsc::Sender<StoredMessage> {
	let (tx, rx) = mpsc::channel(capacity);
	let rx = Arc::new(tokio::sync::Mutex::new(rx));

	for id in 0..workers.max(1) {
		let rx = rx.clone();
		let state = state.clone();
		let telegram = telegram.clone();

		actix_web::rt::spawn(async move {
			loop {
				let message = { rx.lock().await.recv().await };
				let Some(message) = message else { break };
				process(&state, &telegram, reply_chance, message).await;
			}
			info!(worker = id, "ingest worker stopped");
		});
	}

	tx
}

/// Handles one inbound message: persist it, then maybe reply with a
/// sentence seeded by the message's last two words.
async fn process(
	state: &AppState,
	telegram: &TelegramClient,
	reply_chance: u32,
	message: StoredMessage,
) {
	info!(
		chat = message.chat.id,
		"Got message from {} {}: {}",
		message.from.first_name, message.from.last_name, message.text
	);

	match state.store.append(&message) {
		Ok(seq) => debug!(seq, "message persisted"),
		// A failed write loses this message only; keep serving.
		Err(e) => error!("Cannot save message to history: {}", e),
	}

	let words = state.tokenizer.tokenize(&message.text);
	if words.len() < 2 {
		return;
	}
	let (first, second) = (&words[words.len() - 2], &words[words.len() - 1]);

	let chain = state.chain.snapshot();
	if !chain.contains(&format!("{first} {second}")) {
		return;
	}
	if rand::rng().random_range(0..100) >= reply_chance {
		return;
	}

	match state.generator.generate_from(&chain, first, second) {
		Ok(sentence) => telegram.send_message(message.chat.id, sentence.as_str()).await,
		Err(e) => error!("Cannot generate a reply: {}", e),
	}
}
