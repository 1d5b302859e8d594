use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use chatgen_core::store::StoredMessage;

/// One incoming webhook payload.
///
/// Only message-bearing updates matter here; everything else
/// deserializes and is ignored.
#[derive(Debug, Deserialize)]
pub struct Update {
	#[serde(default)]
	pub update_id: i64,
	#[serde(default)]
	pub message: Option<StoredMessage>,
	#[serde(default)]
	pub edited_message: Option<StoredMessage>,
	#[serde(default)]
	pub channel_post: Option<StoredMessage>,
}

impl Update {
	/// The message carried by this update, if any.
	pub fn into_message(self) -> Option<StoredMessage> {
		self.message.or(self.edited_message).or(self.channel_post)
	}
}

/// Thin client for the bot API.
///
/// Failures are logged and swallowed; outbound delivery is best-effort
/// and never affects ingestion or generation.
pub struct TelegramClient {
	http: Client,
	token: String,
}

impl TelegramClient {
	pub fn new(token: String) -> Self {
		Self {
			http: Client::new(),
			token,
		}
	}

	/// Posts a JSON body to a bot API method and logs the response.
	pub async fn api_post(&self, method: &str, body: &serde_json::Value) {
		let url = format!("https://api.telegram.org/bot{}/{}", self.token, method);
		match self.http.post(&url).json(body).send().await {
			Ok(response) => {
				let status = response.status();
				let text = response.text().await.unwrap_or_default();
				info!(%status, method, "API response: {}", text);
			}
			Err(e) => error!(method, "API call failed: {}", e),
		}
	}

	pub async fn send_message(&self, chat_id: i64, text: &str) {
		self.api_post("sendMessage", &json!({ "chat_id": chat_id, "text": text }))
			.await;
	}

	pub async fn set_webhook(&self, url: &str) {
		self.api_post(
			"setWebhook",
			&json!({ "url": url, "allowed_updates": ["message"] }),
		)
		.await;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn update_parses_a_real_webhook_payload() {
		let payload = r#"{
			"update_id": 10000,
			"message": {
				"message_id": 1365,
				"from": {"id": 1111, "first_name": "Игнат", "username": "ignat"},
				"date": 1441645532,
				"chat": {"id": -200500, "type": "group", "title": "Болтовня",
					"all_members_are_administrators": true},
				"text": "привет мир",
				"entities": [{"type": "bold", "offset": 0, "length": 6}]
			}
		}"#;

		let update: Update = serde_json::from_str(payload).unwrap();
		assert_eq!(update.update_id, 10000);

		let message = update.into_message().unwrap();
		assert_eq!(message.message_id, 1365);
		assert_eq!(message.from.first_name, "Игнат");
		assert_eq!(message.chat.id, -200500);
		assert_eq!(message.chat.kind, "group");
		assert!(message.chat.all_admins);
		assert_eq!(message.text, "привет мир");
		assert_eq!(message.entities.len(), 1);
		assert_eq!(message.entities[0].kind, "bold");
	}

	#[test]
	fn update_without_a_message_yields_none() {
		let update: Update = serde_json::from_str(r#"{"update_id": 1}"#).unwrap();
		assert!(update.into_message().is_none());
	}
}
