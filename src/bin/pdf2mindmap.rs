//! CLI binary for pdf2mindmap.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `PipelineConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2mindmap::{
    generate, list_paragraphs, PipelineConfig, PipelineProgressCallback, PipelineStage,
    ProgressCallback,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: one spinner that names the stage currently running
/// and prints a tick line as each stage completes.
struct SpinnerProgress {
    bar: ProgressBar,
}

impl SpinnerProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn stage_label(stage: PipelineStage) -> &'static str {
        match stage {
            PipelineStage::Extract => "Extracting paragraph",
            PipelineStage::Clean => "Cleaning transcript",
            PipelineStage::Mindmap => "Generating mind map",
            PipelineStage::Render => "Rendering diagram",
        }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl PipelineProgressCallback for SpinnerProgress {
    fn on_stage_start(&self, stage: PipelineStage) {
        self.bar
            .set_message(format!("{}…", Self::stage_label(stage)));
    }

    fn on_stage_complete(&self, stage: PipelineStage, duration_ms: u64) {
        self.bar.println(format!(
            "  {} {:<22} {}",
            green("✓"),
            Self::stage_label(stage),
            dim(&format!("{:.1}s", duration_ms as f64 / 1000.0)),
        ));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # First paragraph of page 1, default output names
  pdf2mindmap document.pdf 1 0

  # Third paragraph of page 4, custom output base
  pdf2mindmap document.pdf 4 2 -o out/chapter4

  # See which paragraphs a page has before picking an index
  pdf2mindmap document.pdf 4 0 --list-paragraphs

  # Use a remote OpenAI-compatible endpoint
  pdf2mindmap document.pdf 1 0 \
      --base-url https://api.openai.com/v1 \
      --api-key $OPENAI_API_KEY --model gpt-4.1-mini

OUTPUT ARTIFACTS (derived from --output):
  <base>.txt    cleaned transcript of the selected paragraph
  <base>.json   topic hierarchy ({"root": ..., "children": [...]})
  <base>.html   Mermaid mind map, rendered client-side in the browser

ENVIRONMENT VARIABLES:
  LLM_BASE_URL   Chat-completion endpoint (default: http://localhost:11434/v1)
  LLM_API_KEY    Access credential        (default: ollama)
  LLM_MODEL      Model identifier         (default: llama3.1:8b)

SETUP (local, free):
  1. Install Ollama and pull a model:   ollama pull llama3.1:8b
  2. Generate:                          pdf2mindmap document.pdf 1 0
"#;

/// Generate a Mermaid mind map from one PDF paragraph.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2mindmap",
    version,
    about = "Generate a Mermaid mind map from a single PDF paragraph using an LLM",
    long_about = "Extract one paragraph from a PDF page, clean it up with a language model, \
derive a topic hierarchy from the cleaned text, and render the hierarchy as a Mermaid mind map \
embedded in an HTML file. Works against any OpenAI-compatible chat endpoint (Ollama, vLLM, \
LiteLLM, OpenAI, ...).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the PDF file.
    pdf_path: String,

    /// Page number (1-based).
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,

    /// Paragraph index within the page (0-based).
    paragraph: usize,

    /// Output base name; `.txt`, `.json`, and `.html` artifacts are derived from it.
    #[arg(short, long, env = "MINDMAP_OUTPUT", default_value = "final_mindmap.html")]
    output: String,

    /// Chat-completion endpoint base URL.
    #[arg(long, env = "LLM_BASE_URL", default_value = "http://localhost:11434/v1")]
    base_url: String,

    /// Access credential for the endpoint.
    #[arg(long, env = "LLM_API_KEY", default_value = "ollama")]
    api_key: String,

    /// Model identifier.
    #[arg(long, env = "LLM_MODEL", default_value = "llama3.1:8b")]
    model: String,

    /// Sampling temperature for both model calls (0.0–2.0).
    #[arg(long, env = "LLM_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Max tokens the model may generate per call.
    #[arg(long, env = "LLM_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Per-call HTTP timeout in seconds.
    #[arg(long, env = "LLM_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// List the page's paragraph candidates and exit (no model calls).
    #[arg(long)]
    list_paragraphs: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "MINDMAP_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MINDMAP_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MINDMAP_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the spinner is active; the
    // spinner provides the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.list_paragraphs;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Paragraph-listing mode ───────────────────────────────────────────
    if cli.list_paragraphs {
        let paragraphs = list_paragraphs(&cli.pdf_path, cli.page)
            .await
            .context("Failed to list paragraphs")?;

        if paragraphs.is_empty() {
            println!("No paragraphs found on page {}.", cli.page);
        } else {
            println!(
                "{} paragraph(s) on page {}:",
                paragraphs.len(),
                cli.page
            );
            for (i, p) in paragraphs.iter().enumerate() {
                let preview: String = p.chars().take(70).collect();
                let ellipsis = if p.chars().count() > 70 { "…" } else { "" };
                println!("  [{i}] {preview}{ellipsis}");
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let spinner = if show_progress {
        Some(SpinnerProgress::new())
    } else {
        None
    };

    let mut builder = PipelineConfig::builder()
        .base_url(&cli.base_url)
        .api_key(&cli.api_key)
        .model(&cli.model)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref cb) = spinner {
        builder = builder.progress_callback(Arc::clone(cb) as ProgressCallback);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run pipeline ─────────────────────────────────────────────────────
    let result = generate(&cli.pdf_path, cli.page, cli.paragraph, &cli.output, &config).await;

    if let Some(ref cb) = spinner {
        cb.finish();
    }

    let output = result.context("Pipeline failed")?;

    if !cli.quiet {
        println!();
        println!("{}", "=".repeat(40));
        println!("{}", green(&bold("SUCCESS!")));
        println!("1. Transcript: {}", bold(&output.transcript_path.display().to_string()));
        println!("2. JSON Data:  {}", bold(&output.json_path.display().to_string()));
        println!("3. Visual Map: {}", bold(&output.html_path.display().to_string()));
        println!("{}", "=".repeat(40));
        println!();
        eprintln!(
            "   {} chars extracted → {} chars cleaned  —  {}ms total",
            dim(&output.stats.raw_chars.to_string()),
            dim(&output.stats.cleaned_chars.to_string()),
            output.stats.total_duration_ms,
        );
    }

    Ok(())
}
