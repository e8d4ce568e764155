/*
 * fill.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Fill command implementation
 */

//! Fill command implementation.
//!
//! `quarto-ice fill` reads an HTML template and a data document, binds the
//! data to the template's markers, and writes the finalized HTML.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use quarto_ice::{EngineOptions, LogSink, TemplateEngine, TracingSink, bind, load_data_file};

/// Arguments for the fill command
#[derive(Debug)]
pub struct FillArgs {
    /// Template file
    pub template: PathBuf,
    /// Data document
    pub data: PathBuf,
    /// Engine options file
    pub options: Option<PathBuf>,
    /// Force `auto-drop` on, whatever the options file says
    pub auto_drop: bool,
    /// Output file; stdout when absent
    pub output: Option<PathBuf>,
    /// Enable marker-not-found diagnostics
    pub debug: bool,
}

/// Execute the fill command
pub fn execute(args: FillArgs) -> Result<()> {
    let html = fill(&args)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &html)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            info!(path = %path.display(), "wrote filled template");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(html.as_bytes())
                .context("Failed to write output to stdout")?;
        }
    }
    Ok(())
}

/// Bind the data document to the template and return the finalized HTML.
pub fn fill(args: &FillArgs) -> Result<String> {
    let mut options = match &args.options {
        Some(path) => EngineOptions::from_file(path)
            .with_context(|| format!("Failed to load options: {}", path.display()))?,
        None => EngineOptions::default(),
    };
    if args.auto_drop {
        options.auto_drop = true;
    }

    let markup = fs::read_to_string(&args.template)
        .with_context(|| format!("Failed to read template: {}", args.template.display()))?;
    let data = load_data_file(&args.data)
        .with_context(|| format!("Failed to load data: {}", args.data.display()))?;

    if args.debug {
        quarto_ice::set_debug(true);
    }

    let sink: Rc<dyn LogSink> = Rc::new(TracingSink);
    let mut engine = TemplateEngine::new(markup, options)
        .with_context(|| format!("Invalid template: {}", args.template.display()))?
        .with_log_sink(Rc::downgrade(&sink));

    debug!(template = %args.template.display(), data = %args.data.display(), "filling");
    bind(&mut engine, &data).context("Failed to apply data document")?;

    Ok(engine.finalize()?)
}
