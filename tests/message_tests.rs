use voicebridge::asr::messages::{
    EndOfUtterance, HandshakeMessage, RecognitionResult, ServerMessage,
};

#[test]
fn test_handshake_serialization() {
    let msg = HandshakeMessage::new("test-app", "tester");
    let json = serde_json::to_string(&msg).unwrap();

    assert!(json.contains("\"app_id\":\"test-app\""));
    assert!(json.contains("\"user_id\":\"tester\""));
    assert!(json.contains("\"audio_format\":\"wav\""));
    assert!(json.contains("\"sample_rate\":16000"));
    assert!(json.contains("\"enable_punctuation\":true"));
    assert!(json.contains("\"enable_timestamp\":true"));
    assert!(json.contains("\"enable_word_timestamp\":true"));
}

#[test]
fn test_end_of_utterance_serialization() {
    let json = serde_json::to_string(&EndOfUtterance { is_end: true }).unwrap();
    assert_eq!(json, r#"{"is_end":true}"#);
}

#[test]
fn test_server_message_parsing() {
    let json = r#"{
        "audio_info": { "duration": 1000 },
        "result": {
            "text": "hello world",
            "utterances": [
                { "definite": true, "start_time": 0, "end_time": 1000, "text": "hello world" }
            ]
        }
    }"#;

    let msg: ServerMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.audio_info.unwrap().duration, 1000.0);

    let result = RecognitionResult::from(msg.result.unwrap());
    assert_eq!(result.text, "hello world");
    assert!(result.is_final);
    assert_eq!(result.utterances.len(), 1);
    assert_eq!(result.utterances[0].end_time, 1000);
}

#[test]
fn test_is_final_requires_all_definite() {
    let json = r#"{
        "result": {
            "text": "hello wor",
            "utterances": [
                { "definite": true, "start_time": 0, "end_time": 500, "text": "hello" },
                { "definite": false, "start_time": 500, "end_time": 900, "text": "wor" }
            ]
        }
    }"#;

    let msg: ServerMessage = serde_json::from_str(json).unwrap();
    let result = RecognitionResult::from(msg.result.unwrap());

    assert!(!result.is_final, "any non-definite utterance keeps the result partial");
}

#[test]
fn test_is_final_with_no_utterances() {
    let json = r#"{ "result": { "text": "hi" } }"#;

    let msg: ServerMessage = serde_json::from_str(json).unwrap();
    let result = RecognitionResult::from(msg.result.unwrap());

    assert!(result.is_final);
    assert!(result.utterances.is_empty());
    assert_eq!(result.confidence, None);
}

#[test]
fn test_message_without_result() {
    let json = r#"{ "audio_info": { "duration": 250.5 } }"#;

    let msg: ServerMessage = serde_json::from_str(json).unwrap();
    assert!(msg.result.is_none());
    assert_eq!(msg.audio_info.unwrap().duration, 250.5);
}
