use anyhow::Context;
use clap::Parser;
use statement_view::adapters::{CsvFeed, JsonFeed, JsonRenderer, TextRenderer};
use statement_view::config::{InputFormat, OutputFormat};
use statement_view::core::{DataFeed, Renderer};
use statement_view::utils::error::ErrorCategory;
use statement_view::utils::{logger, validation::Validate};
use statement_view::{
    CliConfig, FieldBinding, RunSummary, StatementConfig, StatementEngine, StatementError,
    StatementPipeline,
};

fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    logger::init_logger(logger::LogStyle::from_flag(args.log_json), args.verbose);

    tracing::info!("Starting statement-view");
    tracing::debug!("CLI config: {:?}", args);

    if let Err(e) = args.validate() {
        exit_with(&e);
    }

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            StatementConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?
        }
        None => StatementConfig::default(),
    };

    if !args.dimensions.is_empty() {
        config.feed.dimensions = args.dimensions.clone();
    }
    if !args.metrics.is_empty() {
        config.feed.metrics = args.metrics.clone();
    }

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let pipeline = StatementPipeline::new(config.display.clone())?;
    let binding = config.field_binding()?;

    let stdout = std::io::stdout().lock();
    let summary = match args.input_format() {
        InputFormat::Json => {
            let feed = JsonFeed::from_path(&args.input).unwrap_or_else(|e| exit_with(&e));
            run(feed, args.output, stdout, pipeline, binding)
        }
        InputFormat::Csv => {
            let feed =
                CsvFeed::from_path(&args.input, &config.feed.dimensions, &config.feed.metrics)
                    .unwrap_or_else(|e| exit_with(&e));
            run(feed, args.output, stdout, pipeline, binding)
        }
    };

    match summary {
        Ok(summary) => {
            tracing::info!(
                "Rendered {} update(s): {} group(s), {} unbound, {} empty",
                summary.updates,
                summary.groups,
                summary.unbound,
                summary.empty
            );
            Ok(())
        }
        Err(e) => exit_with(&e),
    }
}

fn run<F: DataFeed>(
    feed: F,
    output: OutputFormat,
    out: impl std::io::Write,
    pipeline: StatementPipeline,
    binding: Option<FieldBinding>,
) -> statement_view::Result<RunSummary> {
    match output {
        OutputFormat::Text => engine(feed, TextRenderer::new(out), pipeline, binding).run(),
        OutputFormat::Json => engine(feed, JsonRenderer::new(out), pipeline, binding).run(),
    }
}

fn engine<F: DataFeed, R: Renderer>(
    feed: F,
    renderer: R,
    pipeline: StatementPipeline,
    binding: Option<FieldBinding>,
) -> StatementEngine<F, R> {
    let engine = StatementEngine::with_pipeline(feed, renderer, pipeline);
    match binding {
        Some(binding) => engine.with_binding(binding),
        None => engine,
    }
}

fn exit_with(e: &StatementError) -> ! {
    tracing::error!(
        "{} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.category() {
        ErrorCategory::Configuration | ErrorCategory::Binding => 1,
        ErrorCategory::Input | ErrorCategory::Output => 2,
    };
    std::process::exit(exit_code);
}
