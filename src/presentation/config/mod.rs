mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseSettings, LlmProviderSetting, LlmSettings, LoggingSettings, ServerSettings, Settings,
    SettingsError, SpeechProviderSetting, SpeechSettings, StorageProviderSetting, StorageSettings,
    WorkerSettings,
};
