// Copyright (C) Brian G. Milnes 2025

//! Shared run wrapper for the phpinspect binaries
//!
//! Prints the directory context for compile-mode style consumers, times the
//! run, and owns the optional run log.

pub mod tool_runner {
    use std::path::PathBuf;
    use std::time::Instant;
    use anyhow::Result;
    use crate::logging::logging::ToolLogger;

    pub struct ToolConfig {
        /// Tool name, also the log directory name
        pub tool_name: String,
        /// Directory printed as "Entering directory"
        pub base_dir: PathBuf,
        pub enable_logging: bool,
        /// Root of the log tree
        pub log_root: PathBuf,
    }

    impl ToolConfig {
        pub fn new(tool_name: &str, base_dir: PathBuf) -> Self {
            ToolConfig {
                tool_name: tool_name.to_string(),
                base_dir,
                enable_logging: false,
                log_root: PathBuf::from("logs"),
            }
        }

        pub fn with_logging(mut self, enable: bool) -> Self {
            self.enable_logging = enable;
            self
        }
    }

    /// Run a tool body with context, timing and the run log.
    ///
    /// The body returns the one-line summary printed at the end.
    pub fn run_tool<F>(config: ToolConfig, tool_fn: F) -> Result<()>
    where
        F: FnOnce(&mut ToolLogger) -> Result<String>,
    {
        let start = Instant::now();
        println!("Entering directory '{}'", config.base_dir.display());
        println!();

        let mut logger = if config.enable_logging {
            ToolLogger::in_dir(&config.log_root, &config.tool_name)
        } else {
            ToolLogger::disabled(&config.tool_name)
        };

        let summary = tool_fn(&mut logger)?;

        logger.log("");
        logger.log(&summary);
        logger.log(&format!("Completed in {}ms", start.elapsed().as_millis()));
        if config.enable_logging {
            logger.finalize(&summary);
        }
        Ok(())
    }

    /// Context and timing only, for tools without a run log.
    pub fn run_simple<F>(base_dir: PathBuf, tool_fn: F) -> Result<()>
    where
        F: FnOnce() -> Result<String>,
    {
        let start = Instant::now();
        println!("Entering directory '{}'", base_dir.display());
        println!();

        let summary = tool_fn()?;

        println!();
        println!("{summary}");
        println!("Completed in {}ms", start.elapsed().as_millis());
        Ok(())
    }
}
