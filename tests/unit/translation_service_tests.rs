/*!
 * Tests for translation service plumbing
 */

use std::time::Duration;

use poglot::app_config::{Config, RetryConfig};
use poglot::translation::{normalize_response, RetryPolicy, TranslationService};

/// Test creation of the translation service from a config
#[test]
fn test_translation_service_creation_withValidConfig_shouldCreateService() {
    let config = Config::default();
    let _service = TranslationService::new(&config, "sk-test-key".to_string());
}

/// Retry settings flow from the config into the policy
#[test]
fn test_retry_policy_fromConfig_shouldCarryConfiguredDurations() {
    let config = RetryConfig {
        max_attempts: 3,
        base_delay_ms: 100,
        min_delay_ms: 150,
        max_delay_ms: 400,
    };

    let policy = RetryPolicy::from(&config);

    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.delay_for(1), Duration::ZERO);
    // base 100ms, floor 150ms
    assert_eq!(policy.delay_for(2), Duration::from_millis(150));
    assert_eq!(policy.delay_for(3), Duration::from_millis(200));
    assert_eq!(policy.delay_for(4), Duration::from_millis(400));
    // capped
    assert_eq!(policy.delay_for(10), Duration::from_millis(400));
}

/// An inverted floor/cap pair from a config file must not bring down the
/// run mid-batch; the cap wins
#[test]
fn test_retry_policy_withFloorAboveCap_shouldCapWithoutPanicking() {
    let config = RetryConfig {
        max_attempts: 5,
        base_delay_ms: 1000,
        min_delay_ms: 30_000,
        max_delay_ms: 20_000,
    };

    let policy = RetryPolicy::from(&config);

    assert_eq!(policy.delay_for(1), Duration::ZERO);
    assert_eq!(policy.delay_for(2), Duration::from_millis(20_000));
    assert_eq!(policy.delay_for(10), Duration::from_millis(20_000));
}

/// A realistic well-behaved model reply
#[test]
fn test_normalize_response_withFullBatchReply_shouldDecodeAllItems() {
    let raw = r#"[
        {"id": "1", "translation": "Godta alle"},
        {"id": "2", "translation": "Innstillinger for informasjonskapsler"},
        {"id": "3", "translation": "Hei %s, velkommen tilbake"}
    ]"#;

    let map = normalize_response(raw).unwrap();

    assert_eq!(map.len(), 3);
    assert_eq!(
        map[&3].as_deref(),
        Some("Hei %s, velkommen tilbake")
    );
}

/// A reply wrapped in prose and a code fence still decodes
#[test]
fn test_normalize_response_withChattyReply_shouldSalvageJson() {
    let raw = concat!(
        "Sure! Here are the translations you asked for:\n\n",
        "```json\n",
        "[\n  {\"id\": \"1\", \"translation\": \"Godta alle\"}\n]\n",
        "```\n\n",
        "Let me know if you need anything else."
    );

    let map = normalize_response(raw).unwrap();

    assert_eq!(map.len(), 1);
    assert_eq!(map[&1].as_deref(), Some("Godta alle"));
}

/// Replies the decoder cannot use must error rather than return garbage
#[test]
fn test_normalize_response_withUnusableReplies_shouldError() {
    assert!(normalize_response("").is_err());
    assert!(normalize_response("I can't translate that.").is_err());
    assert!(normalize_response(r#"{"status": "ok"}"#).is_err());
    assert!(normalize_response("true").is_err());
}
