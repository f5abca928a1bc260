// Copyright (C) Brian G. Milnes 2025

//! Run logs for the phpinspect binaries
//!
//! Each run of a tool may keep a copy of its output in
//! `logs/<tool>/<YYYY-MM-DD>/run-<HH-MM-SS>.log`. Failing to create the log
//! never fails the run; the tool just continues without one.

pub mod logging {
    use std::fs;
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};
    use anyhow::{Context, Result};
    use chrono::{DateTime, Local};

    pub struct ToolLogger {
        file: Option<BufWriter<fs::File>>,
        path: Option<PathBuf>,
        tool: String,
        start_time: DateTime<Local>,
        lines: usize,
    }

    impl ToolLogger {
        /// A logger that only prints to stdout.
        pub fn disabled(tool: &str) -> Self {
            ToolLogger { file: None, path: None, tool: tool.to_string(), start_time: Local::now(), lines: 0 }
        }

        /// Log under `./logs`.
        pub fn new(tool: &str) -> Self {
            Self::in_dir(Path::new("logs"), tool)
        }

        /// Log under `root/<tool>/<date>/`.
        pub fn in_dir(root: &Path, tool: &str) -> Self {
            let start_time = Local::now();
            let (file, path) = match Self::create_log_file(root, tool, &start_time) {
                Ok((file, path)) => (Some(BufWriter::new(file)), Some(path)),
                Err(e) => {
                    eprintln!("Warning: {e:#}; continuing without a log file");
                    (None, None)
                }
            };
            ToolLogger { file, path, tool: tool.to_string(), start_time, lines: 0 }
        }

        fn create_log_file(root: &Path, tool: &str, start_time: &DateTime<Local>) -> Result<(fs::File, PathBuf)> {
            let dir = root.join(tool).join(start_time.format("%Y-%m-%d").to_string());
            fs::create_dir_all(&dir).with_context(|| format!("cannot create log directory {}", dir.display()))?;
            let path = dir.join(format!("run-{}.log", start_time.format("%H-%M-%S")));
            let file = fs::File::create(&path).with_context(|| format!("cannot create log file {}", path.display()))?;
            Ok((file, path))
        }

        pub fn tool(&self) -> &str {
            &self.tool
        }

        pub fn is_enabled(&self) -> bool {
            self.file.is_some()
        }

        /// Print to stdout and append to the log file.
        pub fn log(&mut self, message: &str) {
            println!("{message}");
            self.log_silent(message);
        }

        /// Append to the log file only.
        pub fn log_silent(&mut self, message: &str) {
            if let Some(file) = self.file.as_mut() {
                let _ = writeln!(file, "{message}");
                self.lines += 1;
            }
        }

        pub fn log_path(&self) -> Option<&Path> {
            self.path.as_deref()
        }

        /// Append the run summary and timing.
        pub fn finalize(&mut self, summary: &str) {
            let end_time = Local::now();
            let duration = end_time.signed_duration_since(self.start_time);
            self.log_silent("");
            self.log_silent(&format!("=== {} ===", self.tool));
            self.log_silent(summary);
            self.log_silent(&format!("Started: {}", self.start_time.format("%Y-%m-%d %H:%M:%S")));
            self.log_silent(&format!("Ended: {}", end_time.format("%Y-%m-%d %H:%M:%S")));
            self.log_silent(&format!("Duration: {}ms", duration.num_milliseconds()));
            if let Some(path) = self.path.clone() {
                self.log(&format!("Log saved to: {} ({} lines)", path.display(), self.lines));
            }
        }
    }

    impl Drop for ToolLogger {
        fn drop(&mut self) {
            if let Some(file) = self.file.as_mut() {
                let _ = file.flush();
            }
        }
    }
}
