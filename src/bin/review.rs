// Copyright (C) Brian G. Milnes 2025

//! Review PHP sources with the phpinspect rules
//!
//! Usage:
//!   phpinspect-review -d src                # every .php file under src
//!   phpinspect-review -f a.php --format json
//!   phpinspect-review -c --disable unused-mock --log
//!
//! Binary: phpinspect-review
//!
//! Exit code 1 when anything was reported.

use anyhow::Result;
use phpinspect::tool_runner::tool_runner::{run_tool, ToolConfig};
use phpinspect::{check_file, find_php_files, format_number, Analyzer, FileReport, OutputFormat, StandardArgs};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

fn relative_to(file: &Path, base_dir: &Path) -> String {
    file.strip_prefix(base_dir).unwrap_or(file).display().to_string()
}

/// Reports for every readable file, plus the files that could not be read.
fn check_all(files: &[PathBuf], base_dir: &Path, analyzer: &Analyzer) -> (Vec<FileReport>, Vec<String>) {
    let results: Vec<(PathBuf, Result<FileReport>)> =
        files.par_iter().map(|file| (file.clone(), check_file(file, analyzer))).collect();

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for (file, result) in results {
        match result {
            Ok(mut report) => {
                report.file = relative_to(&file, base_dir);
                reports.push(report);
            }
            Err(e) => failures.push(format!("{}: {e:#}", relative_to(&file, base_dir))),
        }
    }
    (reports, failures)
}

fn main() -> Result<()> {
    let args = StandardArgs::parse()?;
    let options = args.load_options()?;
    let analyzer = Analyzer::new(options);
    let base_dir = args.base_dir();
    let files = find_php_files(&args.get_search_dirs());

    let mut total = 0;
    if args.format == OutputFormat::Json {
        let (reports, failures) = check_all(&files, &base_dir, &analyzer);
        for failure in &failures {
            eprintln!("Warning: {failure}");
        }
        for warning in reports.iter().flat_map(FileReport::warning_lines) {
            eprintln!("Warning: {warning}");
        }
        total = reports.iter().map(|r| r.matches.len()).sum();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        let config = ToolConfig::new("phpinspect-review", base_dir.clone()).with_logging(args.log);
        run_tool(config, |logger| {
            logger.log_silent(&format!("Rules: {}", analyzer.rule_ids().join(", ")));
            let (reports, failures) = check_all(&files, &base_dir, &analyzer);
            for failure in &failures {
                eprintln!("Warning: {failure}");
                logger.log_silent(&format!("Warning: {failure}"));
            }
            for report in &reports {
                for warning in report.warning_lines() {
                    eprintln!("Warning: {warning}");
                    logger.log_silent(&format!("Warning: {warning}"));
                }
                for line in report.text_lines() {
                    logger.log(&line);
                }
            }
            total = reports.iter().map(|r| r.matches.len()).sum();
            let with_findings = reports.iter().filter(|r| !r.matches.is_empty()).count();
            if total == 0 {
                logger.log("✓ No findings");
            }
            Ok(format!(
                "Summary: {} files checked, {} files with findings, {} total findings",
                format_number(files.len()),
                format_number(with_findings),
                format_number(total)
            ))
        })?;
    }

    if total > 0 {
        std::process::exit(1);
    }
    Ok(())
}
