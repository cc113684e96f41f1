//! # Message Filter Library
//!
//! `message-filter` provides the platform-independent logic for a pre-send
//! chat message filter: it parses an operator-supplied list of substitution
//! rules and rewrites outbound message bodies against that list. The hosting
//! messaging platform owns settings storage, message construction, and
//! delivery; this crate is the thin transform stage in between.
//!
//! The library is designed to be pure and stateless apart from a single
//! atomically-swapped rule snapshot: configuration updates replace the rule
//! list wholesale, and the body transform is a deterministic fold over that
//! snapshot. Every internal failure degrades to a no-op for the failing rule
//! or update rather than disturbing message delivery.
//!
//! ## Modules
//!
//! * `config`: Defines `SubstitutionRule`s and decodes the `filterList` setting value.
//! * `compiler`: Compiles rules into ready-to-apply matchers, skipping rules that fail.
//! * `engine`: Holds the live rule snapshot and applies it to message bodies.
//! * `hooks`: The lifecycle seams the hosting platform calls through.
//! * `errors`: The library's structured error type.
//!
//! ## Usage Example
//!
//! ```rust
//! use message_filter::FilterEngine;
//!
//! let engine = FilterEngine::new();
//! engine.load(r#"[{"regex":"rocketchat","flags":"gi","replacement":"Rocket.Chat"}]"#)?;
//! assert_eq!(engine.apply("I use RocketChat"), "I use Rocket.Chat");
//! # Ok::<(), message_filter::FilterError>(())
//! ```
//!
//! License: MIT OR APACHE 2.0

pub mod compiler;
pub mod config;
pub mod engine;
pub mod errors;
pub mod hooks;

/// Re-exports the library's structured error type.
pub use errors::FilterError;

/// Re-exports configuration types and the packaged setting default.
pub use config::{default_filter_list, FilterConfig, SubstitutionRule, FILTER_LIST_SETTING_ID};

/// Re-exports the engine and its diagnostic event type.
pub use engine::{FilterEngine, FilterEvent};

/// Re-exports the host-facing lifecycle surface.
pub use hooks::{
    filter_list_setting, FilterApp, MessageText, SettingDescriptor, SettingType, SettingsStore,
};

// Re-export key types from the compiler module for advanced usage.
pub use compiler::{compile_rules, CompiledRule, CompiledRules, RuleFlags, MAX_PATTERN_LENGTH};
