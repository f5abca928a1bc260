// Copyright (C) Brian G. Milnes 2025

//! Apply phpinspect fixes to PHP sources
//!
//! Usage:
//!   phpinspect-fix -f a.php                 # print the fixed file
//!   phpinspect-fix -d src --in-place        # rewrite files
//!   phpinspect-fix -d src --dry-run         # only list the fixes
//!
//! Binary: phpinspect-fix

use anyhow::{Context, Result};
use clap::Parser;
use phpinspect::tool_runner::tool_runner::{run_tool, ToolConfig};
use phpinspect::{find_php_files, fix_source, format_number, AppliedFix, Options, StandardArgs};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "phpinspect-fix")]
#[command(about = "Apply phpinspect fixes to PHP sources", long_about = None)]
struct Args {
    #[command(flatten)]
    common: StandardArgs,

    /// Write fixed files back
    #[arg(short, long)]
    in_place: bool,

    /// Show which fixes would apply without changing or printing files
    #[arg(short = 'n', long)]
    dry_run: bool,
}

struct Outcome {
    file: PathBuf,
    original: String,
    fixed: String,
    applied: Vec<AppliedFix>,
}

fn fix_one(file: &Path, options: &Options) -> Result<Outcome> {
    let original = fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let (fixed, applied) = fix_source(&original, options).with_context(|| format!("Failed to fix {}", file.display()))?;
    Ok(Outcome { file: file.to_path_buf(), original, fixed, applied })
}

fn main() -> Result<()> {
    let args = Args::parse();
    args.common.validate()?;
    let options = args.common.load_options()?;
    let base_dir = args.common.base_dir();
    let files = find_php_files(&args.common.get_search_dirs());

    let config = ToolConfig::new("phpinspect-fix", base_dir.clone()).with_logging(args.common.log);
    run_tool(config, |logger| {
        let outcomes: Vec<Result<Outcome>> = files.par_iter().map(|f| fix_one(f, &options)).collect();

        let mut changed = 0;
        let mut fixes = 0;
        for outcome in outcomes {
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(e) => {
                    eprintln!("Warning: {e:#}");
                    continue;
                }
            };
            if outcome.fixed == outcome.original {
                continue;
            }
            changed += 1;
            fixes += outcome.applied.len();
            let shown = outcome.file.strip_prefix(&base_dir).unwrap_or(&outcome.file).display().to_string();
            for applied in &outcome.applied {
                logger.log(&format!("{shown}: {} ({} edits)", applied.name, applied.edits));
            }
            if args.dry_run {
                continue;
            }
            if args.in_place {
                fs::write(&outcome.file, &outcome.fixed)
                    .with_context(|| format!("Failed to write {}", outcome.file.display()))?;
            } else {
                logger.log(&format!("==> {shown} <=="));
                logger.log(outcome.fixed.trim_end());
            }
        }

        let verb = if args.in_place && !args.dry_run { "fixed" } else { "fixable" };
        Ok(format!(
            "Summary: {} files checked, {} files {verb}, {} fixes",
            format_number(files.len()),
            format_number(changed),
            format_number(fixes)
        ))
    })
}
