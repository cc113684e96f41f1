//! hooks.rs - The boundary between the filter and its hosting platform.
//!
//! The host owns settings storage, message construction, and delivery; this
//! module only defines the seams it calls through. [`FilterApp`] bundles the
//! engine with the four lifecycle hooks the platform invokes: enable-time
//! configuration load, setting updates, the pre-send gate, and the pre-send
//! transform. No failure in any hook may escape to the host's send pipeline.
//!
//! License: MIT OR APACHE 2.0

use async_trait::async_trait;
use log::debug;
use tokio::sync::mpsc;

use crate::config::{default_filter_list, FILTER_LIST_SETTING_ID};
use crate::engine::{FilterEngine, FilterEvent};

/// Read access to the host's settings store.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns the stored value for a setting id, if any.
    async fn value_of(&self, id: &str) -> Option<String>;
}

/// The slice of the host's message object the filter is allowed to touch.
///
/// The transform replaces the body and nothing else; sender, channel,
/// attachments and timestamps pass through whatever type the host uses.
pub trait MessageText {
    /// The message body, or `None` when the message carries no text.
    fn text(&self) -> Option<&str>;
    /// Replaces the message body.
    fn set_text(&mut self, text: String);
}

/// How a setting value is typed and presented on the host's admin surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingType {
    String,
}

/// Declaration of one operator-facing setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingDescriptor {
    pub id: &'static str,
    pub setting_type: SettingType,
    /// Value shipped with the package, used until the operator edits it.
    pub package_value: &'static str,
    pub required: bool,
    pub public: bool,
    pub multiline: bool,
}

/// The `filterList` setting exposed to the operator: an optional,
/// non-public, multi-line JSON array of substitution rules.
pub fn filter_list_setting() -> SettingDescriptor {
    SettingDescriptor {
        id: FILTER_LIST_SETTING_ID,
        setting_type: SettingType::String,
        package_value: default_filter_list(),
        required: false,
        public: false,
        multiline: true,
    }
}

/// The filter as the host sees it: one engine plus the lifecycle hooks.
#[derive(Debug, Default)]
pub struct FilterApp {
    engine: FilterEngine,
}

impl FilterApp {
    pub fn new() -> Self {
        Self {
            engine: FilterEngine::new(),
        }
    }

    /// Like [`new`](Self::new), but reporting dropped configurations and
    /// rules on the given channel.
    pub fn with_events(events: mpsc::Sender<FilterEvent>) -> Self {
        Self {
            engine: FilterEngine::with_events(events),
        }
    }

    /// Direct access to the engine, for hosts that drive it themselves.
    pub fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    /// Enable-time hook: loads the stored `filterList` value.
    ///
    /// Returns whether a configuration was applied. A missing or rejected
    /// value leaves the engine on its current (initially empty) rule list;
    /// the app stays enabled either way.
    pub async fn on_enable(&self, settings: &dyn SettingsStore) -> bool {
        match settings.value_of(FILTER_LIST_SETTING_ID).await {
            Some(value) => self.engine.load(&value).is_ok(),
            None => false,
        }
    }

    /// Settings-update hook: reloads when `filterList` changes.
    ///
    /// Updates to other settings are ignored, as is a value that fails to
    /// parse; the operator gets no error surface beyond the update having
    /// no effect.
    pub async fn on_setting_updated(&self, id: &str, value: &str) {
        if id != FILTER_LIST_SETTING_ID {
            return;
        }
        if self.engine.load(value).is_err() {
            debug!("Ignoring invalid filterList update.");
        }
    }

    /// Pre-send gate: the filter intercepts a message iff its body is
    /// textual. Everything else passes through untouched.
    pub fn check_pre_message_sent<M: MessageText>(&self, message: &M) -> bool {
        message.text().is_some()
    }

    /// Pre-send transform: replaces the body with its filtered form,
    /// leaving every other message field unchanged.
    pub fn execute_pre_message_sent<M: MessageText>(&self, mut message: M) -> M {
        let body = message.text().unwrap_or_default();
        let filtered = self.engine.apply(body);
        message.set_text(filtered);
        message
    }
}
