//! excise CLI - structural removal of a widget construct from Rust sources.
//!
//! Features:
//! - Declarative construct specs via flags or excise.toml
//! - Suffix-based target discovery with directory pruning
//! - Rayon-powered parallel rewriting with per-file fault isolation
//! - Dry-run mode for previewing changes
//! - Plain and JSON reporting

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use excise_core::{
    init_structured_logging, load_config, print_json, print_plain, ConstructSpec, Excise,
    FileOutcome, DEFAULT_SUFFIX,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Remove a widget construct from Rust source files")]
pub struct Cli {
    /// Explicit files to rewrite (skips scanning when given)
    files: Vec<PathBuf>,

    /// Root directory scanned for target files
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Identifier of the construct to remove (e.g. "preview")
    #[arg(long)]
    name: Option<String>,

    /// Type the construct is declared with (e.g. "DrawingArea")
    #[arg(long = "type", value_name = "TYPE")]
    type_name: Option<String>,

    /// Method whose closure registration forms the multi-line block
    #[arg(long)]
    callback: Option<String>,

    /// Setup-only bindings removed alongside the block
    #[arg(long, num_args = 1..)]
    binding: Vec<String>,

    /// Symbols whose imports are dropped once nothing else uses them
    #[arg(long, num_args = 1..)]
    watch: Vec<String>,

    /// Filename suffix that selects rewrite targets
    #[arg(long)]
    suffix: Option<String>,

    /// Show what would change without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Construct spec from flags, falling back to excise.toml.
    fn resolve_spec(&self, config_spec: Option<ConstructSpec>) -> Result<ConstructSpec> {
        let mut spec = match (&self.name, &self.type_name) {
            (Some(name), Some(type_name)) => ConstructSpec::new(name, type_name),
            (None, None) => match config_spec {
                Some(spec) => spec,
                None => bail!(
                    "No construct specified: pass --name and --type, \
                     or add a [construct] table to excise.toml"
                ),
            },
            _ => bail!("--name and --type must be given together"),
        };

        if let Some(callback) = &self.callback {
            spec.callback_method = callback.clone();
        }
        spec.lookback_bindings.extend(self.binding.iter().cloned());
        spec.watch_symbols.extend(self.watch.iter().cloned());
        Ok(spec)
    }
}

fn main() -> Result<()> {
    // Global panic guard so a malformed input can never take down the
    // process without a diagnostic.
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] excise internal error: {}", info);
        eprintln!("[PANIC] The process will exit safely with code 2.");
    }));

    // Structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let cli = Cli::parse();

    // Config is advisory: flags always win, a broken file only warns when
    // the flags alone are enough to proceed.
    let config = match load_config(&cli.root) {
        Ok(cfg) => cfg,
        Err(e) if e.is_recoverable() => {
            eprintln!("[WARN] config load failed: {}", e);
            None
        }
        Err(e) => return Err(e).context("Failed to load excise.toml"),
    };
    let (config_spec, config_suffix, config_engine) = match config {
        Some(cfg) => (cfg.construct, cfg.suffix, cfg.engine),
        None => (None, None, None),
    };

    let spec = cli.resolve_spec(config_spec)?;
    let suffix = cli
        .suffix
        .clone()
        .or(config_suffix)
        .unwrap_or_else(|| DEFAULT_SUFFIX.to_string());

    let mut batch = Excise::new(&cli.root, spec)
        .suffix(suffix)
        .dry_run(cli.dry_run);
    if !cli.files.is_empty() {
        batch = batch.files(cli.files.iter().cloned());
    }
    if let Some(engine) = config_engine {
        if let Some(window) = engine.lookback_window {
            batch = batch.lookback_window(window);
        }
        if let Some(max_run) = engine.max_blank_run {
            batch = batch.max_blank_run(max_run);
        }
    }

    let result = batch.run().context("Batch rewrite failed")?;

    if cli.json {
        print_json(&result.outcomes);
    } else {
        print_plain(&result.outcomes);
    }

    let failed = result
        .outcomes
        .iter()
        .any(|o| matches!(o, FileOutcome::Failed { .. }));
    std::process::exit(if failed { 1 } else { 0 });
}
