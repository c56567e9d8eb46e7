mod engine_factory;
mod google_speech_engine;
mod stub_engine;

pub use engine_factory::TranscriberFactory;
pub use google_speech_engine::GoogleSpeechEngine;
pub use stub_engine::StubTranscriber;
