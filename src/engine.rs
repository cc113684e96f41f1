//! engine.rs - Applies the active rule list to outbound message bodies.
//!
//! The [`FilterEngine`] owns the live filter configuration as an immutable
//! [`CompiledRules`] snapshot behind a lock. Configuration updates build a
//! whole new snapshot and swap it in; a transform already in flight keeps
//! the snapshot it started with. The transform itself is a pure fold of the
//! body through the rules and can never fail: every internal error degrades
//! to skipping the failing rule or update, because message delivery outranks
//! filter correctness.
//!
//! License: MIT OR APACHE 2.0

use std::sync::{Arc, RwLock};

use log::{debug, warn};
use tokio::sync::mpsc;

use crate::compiler::{compile_rules, CompiledRules};
use crate::config::FilterConfig;
use crate::errors::FilterError;

/// A diagnostic event emitted when the engine silently drops something.
///
/// The filter deliberately gives the operator no error surface: a rejected
/// configuration or a skipped rule just has no effect. Hosts that want
/// visibility can attach a channel via [`FilterEngine::with_events`];
/// delivery is best-effort and never blocks the message pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    /// A configuration update was rejected; the previous rule list stays
    /// active.
    ConfigRejected { reason: String },
    /// One rule failed to compile and was dropped from the new snapshot.
    RuleSkipped { index: usize, reason: String },
}

/// Holds the live rule list and transforms message bodies against it.
#[derive(Debug)]
pub struct FilterEngine {
    rules: RwLock<Arc<CompiledRules>>,
    events: Option<mpsc::Sender<FilterEvent>>,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterEngine {
    /// Creates an engine with an empty rule list; [`apply`](Self::apply) is
    /// the identity until a configuration is loaded.
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(Arc::new(CompiledRules::default())),
            events: None,
        }
    }

    /// Creates an engine that reports dropped configurations and rules on
    /// the given channel.
    pub fn with_events(events: mpsc::Sender<FilterEvent>) -> Self {
        Self {
            rules: RwLock::new(Arc::new(CompiledRules::default())),
            events: Some(events),
        }
    }

    /// Parses and installs a new rule list from a raw setting value.
    ///
    /// On success the new snapshot replaces the old one wholesale and the
    /// number of active (compiled) rules is returned. On failure the active
    /// snapshot is left untouched. Rules that fail to compile are dropped
    /// from the snapshot without failing the install.
    pub fn load(&self, text: &str) -> Result<usize, FilterError> {
        let config = match FilterConfig::parse(text) {
            Ok(config) => config,
            Err(e) => {
                warn!("Rejecting filter list update: {}", e);
                self.emit(FilterEvent::ConfigRejected {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        let (compiled, skipped) = compile_rules(&config);
        for e in &skipped {
            let index = match e {
                FilterError::PatternLengthExceeded(index, _, _)
                | FilterError::RuleCompilation(index, _) => *index,
                _ => continue,
            };
            self.emit(FilterEvent::RuleSkipped {
                index,
                reason: e.to_string(),
            });
        }

        let count = compiled.rules.len();
        *self.rules.write().unwrap() = Arc::new(compiled);
        debug!("Installed filter list with {} active rule(s).", count);
        Ok(count)
    }

    /// Transforms a message body through the active rules, in order.
    ///
    /// Each rule's output feeds the next rule. Global rules replace every
    /// occurrence, non-global rules only the first, and `$n` in replacement
    /// text expands to the rule's capture groups. Total: always returns a
    /// body, even when the rule list is empty or the body is.
    pub fn apply(&self, body: &str) -> String {
        let snapshot = Arc::clone(&self.rules.read().unwrap());

        let mut body = body.to_string();
        for rule in &snapshot.rules {
            body = if rule.global {
                rule.regex.replace_all(&body, rule.replacement.as_str())
            } else {
                rule.regex.replace(&body, rule.replacement.as_str())
            }
            .into_owned();
        }
        body
    }

    /// Number of rules in the active snapshot.
    pub fn active_rules(&self) -> usize {
        self.rules.read().unwrap().rules.len()
    }

    fn emit(&self, event: FilterEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.try_send(event);
        }
    }
}
