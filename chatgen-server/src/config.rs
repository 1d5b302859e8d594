use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
	#[serde(default = "default_host")]
	pub host: String,
	#[serde(default = "default_port")]
	pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
	/// Path of the append-only message log.
	#[serde(default = "default_log_path")]
	pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
	/// Bot token; empty disables webhook registration and replies.
	#[serde(default)]
	pub token: String,
	/// Public base URL the webhook is registered under.
	#[serde(default)]
	pub hook_base: String,
	/// Percent chance (0-100) of replying to an eligible message.
	#[serde(default = "default_reply_chance")]
	pub reply_chance: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
	/// Cap on words appended past the seed during one walk.
	#[serde(default = "default_max_tokens")]
	pub max_tokens: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
	#[serde(default = "default_queue_capacity")]
	pub queue_capacity: usize,
	#[serde(default = "default_workers")]
	pub workers: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
	#[serde(default)]
	pub server: ServerConfig,
	#[serde(default)]
	pub storage: StorageConfig,
	#[serde(default)]
	pub telegram: TelegramConfig,
	#[serde(default)]
	pub generation: GenerationConfig,
	#[serde(default)]
	pub ingest: IngestConfig,
}

impl AppConfig {
	pub fn load(path: &str) -> Result<Self, config::ConfigError> {
		dotenv::dotenv().ok();

		let settings = config::Config::builder()
			.add_source(config::File::with_name(path).required(false))
			.add_source(config::Environment::with_prefix("CHATGEN").separator("__"))
			.build()?;

		let mut app_config: AppConfig = settings.try_deserialize()?;

		// Expand environment variables if present like ${BOT_TOKEN}
		app_config.telegram.token = expand_env(&app_config.telegram.token);
		app_config.storage.path = expand_env(&app_config.storage.path);

		Ok(app_config)
	}
}

fn expand_env(val: &str) -> String {
	if val.starts_with("${") && val.ends_with('}') {
		let var_name = &val[2..val.len() - 1];
		std::env::var(var_name).unwrap_or_else(|_| "".to_string())
	} else {
		val.to_string()
	}
}

fn default_host() -> String {
	"127.0.0.1".to_owned()
}

fn default_port() -> u16 {
	8080
}

fn default_log_path() -> String {
	"./data/history.log".to_owned()
}

fn default_reply_chance() -> u32 {
	30
}

fn default_max_tokens() -> usize {
	200
}

fn default_queue_capacity() -> usize {
	256
}

fn default_workers() -> usize {
	2
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self { host: default_host(), port: default_port() }
	}
}

impl Default for StorageConfig {
	fn default() -> Self {
		Self { path: default_log_path() }
	}
}

impl Default for TelegramConfig {
	fn default() -> Self {
		Self {
			token: String::new(),
			hook_base: String::new(),
			reply_chance: default_reply_chance(),
		}
	}
}

impl Default for GenerationConfig {
	fn default() -> Self {
		Self { max_tokens: default_max_tokens() }
	}
}

impl Default for IngestConfig {
	fn default() -> Self {
		Self {
			queue_capacity: default_queue_capacity(),
			workers: default_workers(),
		}
	}
}
