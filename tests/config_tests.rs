use tempfile::TempDir;
use voicebridge::Config;

#[test]
fn test_config_loads_from_toml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("voicebridge.toml");
    std::fs::write(
        &path,
        r#"
[service]
name = "voicebridge-test"

[service.http]
bind = "127.0.0.1"
port = 9090

[speech]
endpoint = "wss://example.com/asr"
app_id = "app"
access_token = "token"
resource_id = "resource"
user_id = "user"

[audio]
sample_rate = 16000
channels = 1
chunk_interval_ms = 100
"#,
    )
    .unwrap();

    let base = temp_dir.path().join("voicebridge");
    let cfg = Config::load(base.to_str().unwrap()).unwrap();

    assert_eq!(cfg.service.name, "voicebridge-test");
    assert_eq!(cfg.service.http.port, 9090);
    assert_eq!(cfg.speech.endpoint, "wss://example.com/asr");
    assert_eq!(cfg.speech.resource_id, "resource");
    assert_eq!(cfg.audio.sample_rate, 16000);
    assert_eq!(cfg.audio.chunk_interval_ms, 100);
}

#[test]
fn test_config_missing_file_fails() {
    assert!(Config::load("/nonexistent/voicebridge").is_err());
}
