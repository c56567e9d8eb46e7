use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
    pub speech: SpeechSettings,
    pub llm: LlmSettings,
    pub worker: WorkerSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub bucket: String,
    pub upload_url_ttl_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    Gcs,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechSettings {
    pub provider: SpeechProviderSetting,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub language: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProviderSetting {
    Google,
    Stub,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub provider: LlmProviderSetting,
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: Option<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderSetting {
    Gemini,
    Stub,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub notify_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Assemble settings from environment variables, with the defaults the
    /// deployment has always used.
    pub fn from_env() -> Result<Self, SettingsError> {
        Ok(Self {
            server: ServerSettings {
                host: var_or("SERVER_HOST", "0.0.0.0"),
                port: parse_var("SERVER_PORT", 3001)?,
            },
            database: DatabaseSettings {
                url: require_var("DATABASE_URL")?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            storage: StorageSettings {
                provider: match var_or("STORAGE_PROVIDER", "gcs").to_lowercase().as_str() {
                    "gcs" => StorageProviderSetting::Gcs,
                    "memory" => StorageProviderSetting::Memory,
                    other => {
                        return Err(SettingsError::InvalidVar {
                            name: "STORAGE_PROVIDER".to_string(),
                            value: other.to_string(),
                        })
                    }
                },
                bucket: var_or("GCS_BUCKET_NAME", "qualidade_audio_envio"),
                upload_url_ttl_secs: parse_var("UPLOAD_URL_TTL_SECS", 15 * 60)?,
            },
            speech: SpeechSettings {
                provider: match var_or("SPEECH_PROVIDER", "google").to_lowercase().as_str() {
                    "google" => SpeechProviderSetting::Google,
                    "stub" => SpeechProviderSetting::Stub,
                    other => {
                        return Err(SettingsError::InvalidVar {
                            name: "SPEECH_PROVIDER".to_string(),
                            value: other.to_string(),
                        })
                    }
                },
                api_key: std::env::var("SPEECH_API_KEY").ok(),
                endpoint: std::env::var("SPEECH_ENDPOINT").ok(),
                language: var_or("SPEECH_LANGUAGE", "pt-BR"),
                request_timeout_secs: parse_var("SPEECH_TIMEOUT_SECS", 120)?,
            },
            llm: LlmSettings {
                provider: match var_or("LLM_PROVIDER", "gemini").to_lowercase().as_str() {
                    "gemini" => LlmProviderSetting::Gemini,
                    "stub" => LlmProviderSetting::Stub,
                    other => {
                        return Err(SettingsError::InvalidVar {
                            name: "LLM_PROVIDER".to_string(),
                            value: other.to_string(),
                        })
                    }
                },
                api_key: std::env::var("GEMINI_API_KEY").ok(),
                model: var_or("GEMINI_MODEL", "gemini-pro"),
                endpoint: std::env::var("GEMINI_ENDPOINT").ok(),
                request_timeout_secs: parse_var("LLM_TIMEOUT_SECS", 120)?,
            },
            worker: WorkerSettings {
                max_retries: parse_var("MAX_RETRIES", 3)?,
                base_delay_ms: parse_var("RETRY_BASE_DELAY_MS", 1000)?,
                notify_base_url: var_or("BACKEND_API_URL", "http://localhost:3001"),
            },
            logging: LoggingSettings {
                level: var_or("LOG_LEVEL", "info"),
                enable_json: var_or("LOG_FORMAT", "plain").to_lowercase() == "json",
            },
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn require_var(name: &str) -> Result<String, SettingsError> {
    std::env::var(name).map_err(|_| SettingsError::MissingVar(name.to_string()))
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, SettingsError> {
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|_| SettingsError::InvalidVar {
            name: name.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing environment variable: {0}")]
    MissingVar(String),
    #[error("invalid value for {name}: {value}")]
    InvalidVar { name: String, value: String },
}
