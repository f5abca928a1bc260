// Copyright (C) Brian G. Milnes 2025

//! Command line arguments shared by the phpinspect binaries
//!
//! Sources are given as files (`-f`), directories (`-d`) or the current
//! directory as a whole codebase (`-c`). Options come from an optional JSON
//! file and are then overridden by flags.

pub mod args {
    use std::path::{Path, PathBuf};
    use anyhow::{bail, Context, Result};
    use clap::{Args, Parser, ValueEnum};
    use walkdir::WalkDir;
    use crate::options::options::Options;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
    pub enum OutputFormat {
        /// `file:line:col: severity: message [rule]`
        #[default]
        Text,
        Json,
    }

    #[derive(Debug, Clone, Default, Args)]
    pub struct StandardArgs {
        /// PHP file to inspect (repeatable)
        #[arg(short = 'f', long = "file")]
        pub files: Vec<PathBuf>,

        /// Directory to search for .php files (repeatable)
        #[arg(short = 'd', long = "dir")]
        pub dirs: Vec<PathBuf>,

        /// Inspect the current directory as a whole codebase
        #[arg(short = 'c', long)]
        pub codebase: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        pub format: OutputFormat,

        /// JSON options file
        #[arg(long = "options")]
        pub options_file: Option<PathBuf>,

        /// Build arrays in fixes with `[...]` instead of `array(...)`
        #[arg(long)]
        pub short_arrays: bool,

        /// Rule id to skip (repeatable)
        #[arg(long = "disable")]
        pub disabled: Vec<String>,

        /// Also write a run log under logs/<tool>/<date>/
        #[arg(long)]
        pub log: bool,
    }

    #[derive(Debug, Parser)]
    #[command(about = "Inspect PHP sources", long_about = None)]
    struct StandaloneArgs {
        #[command(flatten)]
        common: StandardArgs,
    }

    impl StandardArgs {
        /// Parse and validate the process arguments.
        pub fn parse() -> Result<Self> {
            let args = StandaloneArgs::try_parse()?.common;
            args.validate()?;
            Ok(args)
        }

        pub fn parse_from<I, T>(iter: I) -> Result<Self>
        where
            I: IntoIterator<Item = T>,
            T: Into<std::ffi::OsString> + Clone,
        {
            let args = StandaloneArgs::try_parse_from(iter)?.common;
            args.validate()?;
            Ok(args)
        }

        /// Fail fast on missing sources or paths that do not exist.
        pub fn validate(&self) -> Result<()> {
            if self.files.is_empty() && self.dirs.is_empty() && !self.codebase {
                bail!("Must specify -f/--file, -d/--dir or -c/--codebase\nRun with --help for usage");
            }
            for path in self.files.iter().chain(&self.dirs) {
                if !path.exists() {
                    bail!("Path does not exist: {}", path.display());
                }
            }
            if let Some(options) = &self.options_file {
                if !options.is_file() {
                    bail!("Options file does not exist: {}", options.display());
                }
            }
            Ok(())
        }

        /// Directory reported as "Entering directory" and used to shorten
        /// paths in the output.
        pub fn base_dir(&self) -> PathBuf {
            if let Some(dir) = self.dirs.first() {
                return dir.clone();
            }
            if let Some(parent) = self.files.first().and_then(|f| f.parent()) {
                if !parent.as_os_str().is_empty() {
                    return parent.to_path_buf();
                }
            }
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        }

        pub fn get_search_dirs(&self) -> Vec<PathBuf> {
            get_search_dirs(&self.files, &self.dirs, self.codebase)
        }

        /// Options file (if any) with the command line overrides applied.
        pub fn load_options(&self) -> Result<Options> {
            let mut options = match &self.options_file {
                Some(path) => Options::load(path).with_context(|| format!("Failed to load {}", path.display()))?,
                None => Options::default(),
            };
            if self.short_arrays {
                options.use_short_array_syntax = true;
            }
            options.disabled_rules.extend(self.disabled.iter().cloned());
            Ok(options)
        }
    }

    pub fn get_search_dirs(files: &[PathBuf], dirs: &[PathBuf], codebase: bool) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = files.iter().chain(dirs).cloned().collect();
        if codebase {
            paths.push(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        }
        paths
    }

    fn is_php(path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "php")
    }

    /// All `.php` files under the given paths, sorted; `vendor/` is skipped.
    pub fn find_php_files(paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = Vec::new();
        for path in paths {
            if path.is_file() {
                if is_php(path) {
                    files.push(path.clone());
                }
                continue;
            }
            files.extend(
                WalkDir::new(path)
                    .into_iter()
                    .filter_entry(|e| e.file_name() != "vendor")
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file() && is_php(e.path()))
                    .map(|e| e.path().to_path_buf()),
            );
        }
        files.sort();
        files.dedup();
        files
    }

    /// 1234567 -> "1,234,567"
    pub fn format_number(n: usize) -> String {
        let digits = n.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        out
    }
}
