use serde::{Deserialize, Serialize};

/// The sender of a message.
///
/// All fields default so that sparse webhook payloads deserialize; the
/// transport routinely omits anything the sender has not filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
	pub id: i64,
	pub first_name: String,
	pub last_name: String,
	pub username: String,
	pub language_code: String,
}

/// The conversation a message belongs to.
///
/// Group chats carry negative ids; `kind` is the transport's `type`
/// discriminator (`private`, `group`, `supergroup`, `channel`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chat {
	pub id: i64,
	#[serde(rename = "type")]
	pub kind: String,
	pub title: String,
	pub username: String,
	pub first_name: String,
	pub last_name: String,
	#[serde(rename = "all_members_are_administrators")]
	pub all_admins: bool,
}

/// A formatting or link annotation attached to a span of the text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageEntity {
	#[serde(rename = "type")]
	pub kind: String,
	pub offset: i64,
	pub length: i64,
	pub url: String,
	pub user: Option<User>,
}

/// A single received chat message, exactly as persisted.
///
/// This is the value half of a log record; the sequence number lives in
/// the record frame, not here. Created once on append, never mutated.
/// Round-trips field-for-field through both the webhook JSON and the
/// durable binary encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredMessage {
	pub message_id: i64,
	pub from: User,
	pub date: i64,
	pub chat: Chat,
	pub text: String,
	pub entities: Vec<MessageEntity>,
}
