// Copyright (C) Brian G. Milnes 2025

//! Inspection options
//!
//! A flat set of toggles read by the rules at invocation time. Loaded from a
//! JSON file; missing keys take their defaults.

pub mod options {
    use std::collections::HashSet;
    use std::fs;
    use std::path::{Path, PathBuf};
    use serde::{Deserialize, Serialize};
    use thiserror::Error;
    use crate::cost::cost::default_cheap_functions;

    #[derive(Debug, Error)]
    pub enum OptionsError {
        #[error("cannot read options file {path}: {source}")]
        Io {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },
        #[error("invalid options: {0}")]
        Json(#[from] serde_json::Error),
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct Options {
        /// Report `and`/`or` used in `if` conditions.
        pub report_literal_operators: bool,
        /// Report duplicate calls and conditions across branches.
        pub report_duplicate_conditions: bool,
        /// Report mixed `&&`/`||` terms without parentheses.
        pub report_missing_parentheses: bool,
        /// Report null comparisons already covered by `isset(...)`.
        pub report_isset_null_comparison: bool,
        /// Render arrays built by fixes as `[...]` instead of `array(...)`.
        pub use_short_array_syntax: bool,
        /// Extra functions to treat as cheap in condition ordering.
        pub cheap_functions: Vec<String>,
        /// Rule ids to skip entirely.
        pub disabled_rules: Vec<String>,
    }

    impl Default for Options {
        fn default() -> Self {
            Options {
                report_literal_operators: true,
                report_duplicate_conditions: true,
                report_missing_parentheses: true,
                report_isset_null_comparison: true,
                use_short_array_syntax: false,
                cheap_functions: Vec::new(),
                disabled_rules: Vec::new(),
            }
        }
    }

    impl Options {
        pub fn from_json_str(json: &str) -> Result<Self, OptionsError> {
            Ok(serde_json::from_str(json)?)
        }

        pub fn load(path: &Path) -> Result<Self, OptionsError> {
            let json = fs::read_to_string(path).map_err(|source| OptionsError::Io { path: path.to_path_buf(), source })?;
            Self::from_json_str(&json)
        }

        pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
            !self.disabled_rules.iter().any(|r| r == rule_id)
        }

        /// Built-in cheap functions plus the configured ones, lowercase.
        pub fn cheap_function_set(&self) -> HashSet<String> {
            let mut set = default_cheap_functions();
            set.extend(self.cheap_functions.iter().map(|f| f.trim_start_matches('\\').to_ascii_lowercase()));
            set
        }
    }
}
