use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

use message_filter::{
    default_filter_list, FilterApp, FilterConfig, FilterEngine, MessageText, SettingsStore,
    FILTER_LIST_SETTING_ID,
};

struct InMemorySettings {
    values: HashMap<String, String>,
}

impl InMemorySettings {
    fn with_filter_list(value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(FILTER_LIST_SETTING_ID.to_string(), value.to_string());
        Self { values }
    }
}

#[async_trait]
impl SettingsStore for InMemorySettings {
    async fn value_of(&self, id: &str) -> Option<String> {
        self.values.get(id).cloned()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct OutboundMessage {
    text: Option<String>,
    sender: String,
    room: String,
    attachment_urls: Vec<String>,
}

impl OutboundMessage {
    fn text(body: &str) -> Self {
        Self {
            text: Some(body.to_string()),
            sender: "alice".to_string(),
            room: "general".to_string(),
            attachment_urls: vec!["https://example.com/a.png".to_string()],
        }
    }
}

impl MessageText for OutboundMessage {
    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
    fn set_text(&mut self, text: String) {
        self.text = Some(text);
    }
}

#[test_log::test]
fn end_to_end_parse_then_apply() -> Result<()> {
    let engine = FilterEngine::new();
    engine.load(r#"[{"regex":"foo","flags":"gi","replacement":"bar"}]"#)?;
    assert_eq!(engine.apply("Foo and foo"), "bar and bar");
    Ok(())
}

#[test]
fn parse_keeps_every_rule_at_its_index() -> Result<()> {
    let text = r#"[
        {"regex":"first","replacement":"1"},
        {"regex":"second","replacement":"2"},
        {"regex":"third"},
        {"flags":"i"}
    ]"#;
    let config = FilterConfig::parse(text)?;
    assert_eq!(config.rules.len(), 4);
    assert_eq!(config.rules[0].regex.as_deref(), Some("first"));
    assert_eq!(config.rules[1].regex.as_deref(), Some("second"));
    assert_eq!(config.rules[2].replacement, None);
    assert_eq!(config.rules[3].flags.as_deref(), Some("i"));
    Ok(())
}

#[tokio::test]
async fn full_lifecycle_enable_update_send() -> Result<()> {
    let app = FilterApp::new();

    // Enable with the packaged default.
    let settings = InMemorySettings::with_filter_list(default_filter_list());
    assert!(app.on_enable(&settings).await);

    let message = OutboundMessage::text("rocketchat is what RocketChat was");
    assert!(app.check_pre_message_sent(&message));
    let sent = app.execute_pre_message_sent(message);
    assert_eq!(
        sent.text.as_deref(),
        Some("Rocket.Chat is what Rocket.Chat was")
    );

    // Operator replaces the list; the swap is wholesale.
    app.on_setting_updated(
        FILTER_LIST_SETTING_ID,
        r#"[{"regex":"(\\d{3})-(\\d{4})","flags":"g","replacement":"${1}-XXXX"}]"#,
    )
    .await;
    let sent = app.execute_pre_message_sent(OutboundMessage::text("call 555-1234 or rocketchat"));
    assert_eq!(sent.text.as_deref(), Some("call 555-XXXX or rocketchat"));

    // A broken update changes nothing.
    app.on_setting_updated(FILTER_LIST_SETTING_ID, "not a filter list").await;
    let sent = app.execute_pre_message_sent(OutboundMessage::text("call 555-1234"));
    assert_eq!(sent.text.as_deref(), Some("call 555-XXXX"));
    Ok(())
}

#[tokio::test]
async fn non_textual_message_passes_through() {
    let app = FilterApp::new();
    app.on_setting_updated(FILTER_LIST_SETTING_ID, default_filter_list())
        .await;

    let attachment_only = OutboundMessage {
        text: None,
        sender: "bob".to_string(),
        room: "general".to_string(),
        attachment_urls: vec!["https://example.com/rocketchat.png".to_string()],
    };
    assert!(!app.check_pre_message_sent(&attachment_only));
}

#[tokio::test]
async fn transform_leaves_non_body_fields_alone() {
    let app = FilterApp::new();
    app.on_setting_updated(FILTER_LIST_SETTING_ID, r#"[{"regex":"alice"}]"#)
        .await;

    let message = OutboundMessage::text("ping alice");
    let original = message.clone();
    let sent = app.execute_pre_message_sent(message);

    assert_eq!(sent.text.as_deref(), Some("ping "));
    assert_eq!(sent.sender, original.sender);
    assert_eq!(sent.room, original.room);
    assert_eq!(sent.attachment_urls, original.attachment_urls);
}

#[test_log::test]
fn bad_rules_degrade_never_fail() -> Result<()> {
    let engine = FilterEngine::new();
    // Two broken patterns around one good rule.
    let active = engine.load(
        r#"[{"regex":"(unclosed"},{"regex":"swear","replacement":"****"},{"regex":"[also-unclosed"}]"#,
    )?;
    assert_eq!(active, 1);
    assert_eq!(engine.apply("no swear words"), "no **** words");
    Ok(())
}
