use chrono::{TimeZone, Utc};
use velohub_audio::domain::ObjectKey;

#[test]
fn given_file_name_when_namespacing_then_prefixes_folder_and_epoch_millis() {
    let at = Utc.with_ymd_and_hms(2025, 1, 30, 12, 0, 0).unwrap();
    let key = ObjectKey::namespaced("audio", "call.mp3", at);
    assert_eq!(
        key.as_str(),
        format!("audio/{}-call.mp3", at.timestamp_millis())
    );
}

#[test]
fn given_key_when_building_uri_then_uses_bucket_scheme() {
    let key = ObjectKey::from_raw("audio/1-call.mp3");
    assert_eq!(
        key.uri("qualidade_audio_envio"),
        "gs://qualidade_audio_envio/audio/1-call.mp3"
    );
}
