// Copyright (C) Brian G. Milnes 2025

//! Diagnostics produced by the rules

pub mod diagnostics {
    use std::collections::{BTreeMap, VecDeque};
    use std::fmt;
    use serde::{Deserialize, Serialize, Serializer};
    use crate::fixer::fixer::Fix;
    use crate::tree::tree::{Handle, NodeId, Tree};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Severity {
        Error,
        Warning,
        WeakWarning,
        Unused,
    }

    impl fmt::Display for Severity {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let text = match self {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::WeakWarning => "weak warning",
                Severity::Unused => "unused",
            };
            f.write_str(text)
        }
    }

    /// 1-based position of the anchor's first character.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
    pub struct Location {
        pub line: usize,
        pub column: usize,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Match {
        pub rule: &'static str,
        #[serde(skip)]
        pub anchor: Handle,
        pub message: String,
        pub severity: Severity,
        pub location: Location,
        #[serde(serialize_with = "serialize_fix_name")]
        pub fix: Option<Fix>,
    }

    fn serialize_fix_name<S: Serializer>(fix: &Option<Fix>, serializer: S) -> Result<S::Ok, S::Error> {
        match fix {
            Some(fix) => serializer.serialize_some(fix.name()),
            None => serializer.serialize_none(),
        }
    }

    impl Match {
        pub fn new(tree: &Tree, rule: &'static str, anchor: NodeId, message: impl Into<String>, severity: Severity) -> Self {
            let (line, column) = tree.line_col(anchor);
            Match {
                rule,
                anchor: tree.handle(anchor),
                message: message.into(),
                severity,
                location: Location { line, column },
                fix: None,
            }
        }

        pub fn with_fix(mut self, fix: Fix) -> Self {
            self.fix = Some(fix);
            self
        }
    }

    impl fmt::Display for Match {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "{}:{}: {}: {} [{}]",
                self.location.line, self.location.column, self.severity, self.message, self.rule
            )
        }
    }

    /// Matches of one file, as written by `--format json`.
    #[derive(Debug, Clone, Serialize)]
    pub struct FileReport {
        pub file: String,
        pub matches: Vec<Match>,
        /// `line N: message` for text the parser had to skip.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub syntax_errors: Vec<String>,
    }

    impl FileReport {
        /// One `file: syntax error at line N: message` warning per error.
        pub fn warning_lines(&self) -> Vec<String> {
            self.syntax_errors.iter().map(|e| format!("{}: syntax error at {e}", self.file)).collect()
        }

        /// One `file:line:col: severity: message [rule]` line per match.
        pub fn text_lines(&self) -> Vec<String> {
            self.matches.iter().map(|m| format!("{}:{m}", self.file)).collect()
        }
    }

    /// Sink for matches produced during a walk.
    pub trait Reporter {
        fn report(&mut self, found: Match);
    }

    impl Reporter for Vec<Match> {
        fn report(&mut self, found: Match) {
            self.push(found);
        }
    }

    impl Reporter for VecDeque<Match> {
        fn report(&mut self, found: Match) {
            self.push_back(found);
        }
    }

    /// Collects matches and keeps per-rule counts for summaries.
    #[derive(Debug, Default)]
    pub struct Collector {
        pub matches: Vec<Match>,
        per_rule: BTreeMap<&'static str, usize>,
    }

    impl Collector {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn count(&self, rule: &str) -> usize {
            self.per_rule.get(rule).copied().unwrap_or(0)
        }

        pub fn summary(&self) -> String {
            if self.per_rule.is_empty() {
                return "no findings".to_string();
            }
            self.per_rule
                .iter()
                .map(|(rule, n)| format!("{rule}: {n}"))
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    impl Reporter for Collector {
        fn report(&mut self, found: Match) {
            *self.per_rule.entry(found.rule).or_insert(0) += 1;
            self.matches.push(found);
        }
    }
}
