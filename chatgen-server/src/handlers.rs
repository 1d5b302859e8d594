use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{info, warn};

use chatgen_core::error::ModelError;
use chatgen_core::store::StoredMessage;

use crate::AppState;
use crate::telegram::Update;

#[get("/health")]
pub async fn health() -> impl Responder {
	HttpResponse::Ok().json(json!({"status": "healthy"}))
}

/// Webhook endpoint the bot API pushes updates to.
///
/// Always answers 200 once the token matches: an unparseable payload is
/// logged and dropped, and a full ingest queue drops the message rather
/// than stalling the transport.
#[post("/hook/{token}")]
pub async fn receive_update(
	state: web::Data<AppState>,
	queue: web::Data<mpsc::Sender<StoredMessage>>,
	token: web::Path<String>,
	body: web::Bytes,
) -> impl Responder {
	if token.as_str() != state.webhook_token {
		return HttpResponse::NotFound().finish();
	}

	let update: Update = match serde_json::from_slice(&body) {
		Ok(update) => update,
		Err(e) => {
			warn!("Unparseable update payload: {}", e);
			return HttpResponse::Ok().finish();
		}
	};

	if let Some(message) = update.into_message() {
		if let Err(e) = queue.try_send(message) {
			warn!("Ingest queue rejected a message: {}", e);
		}
	}

	HttpResponse::Ok().finish()
}

/// HTTP GET endpoint `/v1/generate`
///
/// Produces one sentence from the currently published chain snapshot.
#[get("/v1/generate")]
pub async fn get_generated(state: web::Data<AppState>) -> impl Responder {
	let chain = state.chain.snapshot();
	match state.generator.generate(&chain) {
		Ok(sentence) => HttpResponse::Ok().body(sentence.into_text()),
		Err(ModelError::EmptyModel) => {
			HttpResponse::ServiceUnavailable().body("No messages to learn from yet")
		}
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP POST endpoint `/v1/rebuild`
///
/// Rebuilds the chain from the full history and publishes the new
/// snapshot; in-flight generations keep the one they started with.
#[post("/v1/rebuild")]
pub async fn rebuild_chain(state: web::Data<AppState>) -> impl Responder {
	let store = state.store.clone();
	let builder = state.builder.clone();

	match web::block(move || builder.build(&store)).await {
		Ok(Ok(chain)) => {
			let prefixes = chain.len();
			state.chain.publish(chain);
			info!(prefixes, "chain rebuilt");
			HttpResponse::Ok().json(json!({ "result": { "prefixes": prefixes } }))
		}
		Ok(Err(e)) => HttpResponse::InternalServerError().body(e.to_string()),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/stats`
///
/// Word frequencies over the whole history, recomputed per request.
#[get("/v1/stats")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
	let store = state.store.clone();
	let stats = state.stats.clone();

	match web::block(move || stats.compute(&store)).await {
		Ok(Ok(counts)) => HttpResponse::Ok().json(json!({ "result": counts })),
		Ok(Err(e)) => HttpResponse::InternalServerError().body(e.to_string()),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/chain`
///
/// Dumps the currently published chain.
#[get("/v1/chain")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
	let chain = state.chain.snapshot();
	HttpResponse::Ok().json(json!({ "result": &*chain }))
}
