//! compiler.rs - Compiles substitution rules into ready-to-apply matchers.
//!
//! This module converts a [`FilterConfig`] into [`CompiledRules`], resolving
//! absent rule fields to their defaults and translating JavaScript-style
//! flag letters into regex builder options. Compilation is fail-open per
//! rule: a rule that cannot be compiled is skipped and reported back to the
//! caller, so one bad rule never blocks the rules after it.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use regex::{Regex, RegexBuilder};

use crate::config::{FilterConfig, SubstitutionRule, DEFAULT_FLAGS};
use crate::errors::FilterError;

/// Maximum allowed length for a rule's pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Matching options decoded from a rule's flag letters.
///
/// Unknown letters are ignored rather than rejected: flags a JavaScript
/// engine would accept (`u`, `y`) have no equivalent here, and a typo in
/// the flags field should not disable the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleFlags {
    /// Replace every occurrence; without it only the first match is
    /// replaced, as in JavaScript's `String.replace`.
    pub global: bool,
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
}

impl RuleFlags {
    pub fn parse(flags: &str) -> Self {
        let mut parsed = Self {
            global: false,
            case_insensitive: false,
            multi_line: false,
            dot_matches_new_line: false,
        };
        for letter in flags.chars() {
            match letter {
                'g' => parsed.global = true,
                'i' => parsed.case_insensitive = true,
                'm' => parsed.multi_line = true,
                's' => parsed.dot_matches_new_line = true,
                other => debug!("Ignoring unsupported flag letter '{}'.", other),
            }
        }
        parsed
    }
}

/// Represents a single compiled substitution rule.
///
/// This struct holds a compiled regular expression along with its
/// replacement text, ready for efficient application to message bodies.
#[derive(Debug)]
pub struct CompiledRule {
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// The text to replace matches with; `$n` expands to capture groups.
    pub replacement: String,
    /// Whether to replace all occurrences or only the first.
    pub global: bool,
}

/// An immutable snapshot of all compiled rules from one configuration.
///
/// Snapshots are swapped wholesale when the configuration changes, never
/// mutated in place, so a message transform in flight always sees either
/// the fully-old or fully-new rule list.
#[derive(Debug, Default)]
pub struct CompiledRules {
    /// Compiled rules in configuration order.
    pub rules: Vec<CompiledRule>,
}

/// Compiles a [`FilterConfig`] into [`CompiledRules`].
///
/// Rules that fail to compile are skipped; the returned error list carries
/// one entry per skipped rule, indexed by the rule's position in the source
/// configuration. The snapshot itself is always produced.
pub fn compile_rules(config: &FilterConfig) -> (CompiledRules, Vec<FilterError>) {
    debug!("Starting compilation of {} rule(s).", config.rules.len());

    let mut compiled = Vec::with_capacity(config.rules.len());
    let mut skipped = Vec::new();

    for (index, rule) in config.rules.iter().enumerate() {
        match compile_rule(index, rule) {
            Ok(compiled_rule) => compiled.push(compiled_rule),
            Err(e) => {
                warn!("Skipping rule {}: {}", index, e);
                skipped.push(e);
            }
        }
    }

    debug!(
        "Finished compiling rules. Active: {}, skipped: {}.",
        compiled.len(),
        skipped.len()
    );
    (CompiledRules { rules: compiled }, skipped)
}

fn compile_rule(index: usize, rule: &SubstitutionRule) -> Result<CompiledRule, FilterError> {
    // An absent pattern compiles to the empty regex, which matches at every
    // position and, with an empty replacement, leaves the body unchanged.
    let pattern = rule.regex.as_deref().unwrap_or("");
    let flags = RuleFlags::parse(rule.flags.as_deref().unwrap_or(DEFAULT_FLAGS));
    let replacement = rule.replacement.clone().unwrap_or_default();

    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(FilterError::PatternLengthExceeded(
            index,
            pattern.len(),
            MAX_PATTERN_LENGTH,
        ));
    }

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(flags.case_insensitive)
        .multi_line(flags.multi_line)
        .dot_matches_new_line(flags.dot_matches_new_line)
        .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
        .build()
        .map_err(|e| FilterError::RuleCompilation(index, e))?;

    Ok(CompiledRule {
        regex,
        replacement,
        global: flags.global,
    })
}
