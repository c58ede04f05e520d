use enactml::inference_utils::{
    ChatCompletionConfig, ChatMessage, TextToImageConfig, ZeroShotConfig, ZeroShotResult,
};

#[test]
fn chat_messages_serialize_in_the_wire_shape() {
    let message = ChatMessage::user("hello");
    let json = serde_json::to_value(&message).unwrap();

    assert_eq!(json["role"], "user");
    assert_eq!(json["content"], "hello");

    assert_eq!(ChatMessage::system("s").role, "system");
    assert_eq!(ChatMessage::assistant("a").role, "assistant");
}

#[test]
fn zero_shot_responses_deserialize_and_rank_labels() {
    let body = r#"{
        "sequence": "I love Streamlit!",
        "labels": ["positive", "neutral", "negative"],
        "scores": [0.8, 0.15, 0.05]
    }"#;

    let result: ZeroShotResult = serde_json::from_str(body).unwrap();
    assert_eq!(result.sequence, "I love Streamlit!");
    assert_eq!(result.top_label().unwrap(), "positive");
    assert_eq!(result.scores.len(), 3);
}

#[test]
fn empty_label_lists_are_a_provider_error() {
    let body = r#"{"sequence": "x", "labels": [], "scores": []}"#;
    let result: ZeroShotResult = serde_json::from_str(body).unwrap();
    assert!(result.top_label().is_err());
}

#[test]
fn default_configs_match_the_page_defaults() {
    let chat = ChatCompletionConfig::default();
    assert_eq!(chat.model, "Qwen/QwQ-32B-Preview");
    assert_eq!(chat.max_tokens, 2800);
    assert_eq!(chat.temperature, 0.7);

    let zero_shot = ZeroShotConfig::default();
    assert_eq!(zero_shot.model, "facebook/bart-large-mnli");
    assert_eq!(
        zero_shot.candidate_labels,
        vec!["positive", "negative", "neutral"]
    );
    assert!(!zero_shot.multi_label);

    let image = TextToImageConfig::default();
    assert_eq!(image.model, "black-forest-labs/FLUX.1-dev");
}
