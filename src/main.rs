use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;

use scribe_cli::{
    EXIT_FATAL, InputSet, ReportFormat, display_banner, exit_code_for, init_logging, print_fatal,
    print_progress, print_saved, print_summary, read_stdin, render_report, write_report,
};
use scribe_core::{BatchItem, SummaryLength, TaskKind, TaskParameters, Tone};
use scribe_openai::{OpenAiClient, OpenAiConfig};
use scribe_pipeline::{BatchRunner, CancellationFlag, GenerationSettings};

#[derive(Parser)]
#[command(name = "scribe")]
#[command(about = "AI-powered batch analysis: code review, sentiment, topics, summaries and email", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Model identifier (defaults to SCRIBE_MODEL or gpt-4o-mini)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Sampling temperature; each task has its own default
    #[arg(long, global = true)]
    temperature: Option<f32>,

    /// Maximum output tokens per item
    #[arg(long, global = true)]
    max_tokens: Option<u32>,

    /// Per-request timeout in seconds (defaults to SCRIBE_TIMEOUT_SECS or 60)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Markdown, global = true)]
    format: ReportFormat,

    /// Leave the "Generated on" line out of the report
    #[arg(long, global = true)]
    no_timestamp: bool,

    /// Suppress banner and progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Review source files or a code snippet
    Review {
        #[command(flatten)]
        inputs: InputArgs,

        /// Language of the code; detected from the file extension when omitted
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Analyze the sentiment of texts
    Sentiment {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Extract the main topics of texts
    Topics {
        #[command(flatten)]
        inputs: InputArgs,

        /// Number of topics to extract
        #[arg(short = 'n', long, default_value_t = TaskParameters::DEFAULT_TOPIC_COUNT)]
        count: u8,
    },
    /// Summarize texts
    Summarize {
        #[command(flatten)]
        inputs: InputArgs,

        #[arg(long, value_enum, default_value_t = LengthArg::Medium)]
        length: LengthArg,
    },
    /// Write or improve emails
    Email {
        #[command(subcommand)]
        action: EmailAction,
    },
}

#[derive(Subcommand)]
enum EmailAction {
    /// Draft a new email; inputs hold the key points
    Write {
        #[command(flatten)]
        inputs: InputArgs,

        /// What the email is for, e.g. "meeting request"
        #[arg(long)]
        purpose: String,

        /// Who the email is addressed to
        #[arg(long)]
        recipient: String,

        #[arg(long, value_enum, default_value_t = ToneArg::Professional)]
        tone: ToneArg,
    },
    /// Improve existing email drafts
    Improve {
        #[command(flatten)]
        inputs: InputArgs,

        #[arg(long, value_enum, default_value_t = ToneArg::Professional)]
        tone: ToneArg,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Input files
    files: Vec<PathBuf>,

    /// Comma-separated list of input files
    #[arg(long = "files", value_name = "LIST")]
    file_lists: Vec<String>,

    /// Literal text to analyze (repeatable)
    #[arg(short, long = "text", value_name = "TEXT")]
    texts: Vec<String>,

    /// Read one more input from standard input
    #[arg(long)]
    stdin: bool,
}

impl InputArgs {
    fn into_input_set(self) -> Result<InputSet> {
        let stdin = if self.stdin { Some(read_stdin()?) } else { None };
        Ok(InputSet {
            files: self.files,
            file_lists: self.file_lists,
            texts: self.texts,
            stdin,
        })
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ToneArg {
    Professional,
    Friendly,
    Formal,
    Casual,
}

impl From<ToneArg> for Tone {
    fn from(tone: ToneArg) -> Self {
        match tone {
            ToneArg::Professional => Tone::Professional,
            ToneArg::Friendly => Tone::Friendly,
            ToneArg::Formal => Tone::Formal,
            ToneArg::Casual => Tone::Casual,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LengthArg {
    Short,
    Medium,
    Detailed,
}

impl From<LengthArg> for SummaryLength {
    fn from(length: LengthArg) -> Self {
        match length {
            LengthArg::Short => SummaryLength::Short,
            LengthArg::Medium => SummaryLength::Medium,
            LengthArg::Detailed => SummaryLength::Detailed,
        }
    }
}

impl Commands {
    /// Resolve the subcommand into a task and its batch items
    fn into_batch(self) -> Result<(TaskKind, Vec<BatchItem>)> {
        let (task, inputs, parameters) = match self {
            Commands::Review { inputs, language } => {
                let mut parameters = TaskParameters::default();
                parameters.language = language;
                (TaskKind::CodeReview, inputs, parameters)
            }
            Commands::Sentiment { inputs } => (TaskKind::Sentiment, inputs, TaskParameters::default()),
            Commands::Topics { inputs, count } => (
                TaskKind::TopicExtraction,
                inputs,
                TaskParameters::default().with_topic_count(count),
            ),
            Commands::Summarize { inputs, length } => (
                TaskKind::Summarize,
                inputs,
                TaskParameters::default().with_summary_length(length.into()),
            ),
            Commands::Email { action: EmailAction::Write { inputs, purpose, recipient, tone } } => (
                TaskKind::EmailDraft,
                inputs,
                TaskParameters::default()
                    .with_email_context(purpose, recipient)
                    .with_tone(tone.into()),
            ),
            Commands::Email { action: EmailAction::Improve { inputs, tone } } => (
                TaskKind::EmailImprovement,
                inputs,
                TaskParameters::default().with_tone(tone.into()),
            ),
        };

        let items = inputs.into_input_set()?.into_items(task, &parameters)?;
        Ok((task, items))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            print_fatal(&format!("{e:#}"));
            ExitCode::from(EXIT_FATAL)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    // Local argument problems and configuration are both checked before
    // anything is sent.
    let (task, items) = cli.command.into_batch()?;

    let mut config = OpenAiConfig::from_env()?;
    if let Some(secs) = cli.timeout {
        anyhow::ensure!(secs > 0, "--timeout must be at least 1 second");
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let settings = GenerationSettings::new(
        cli.model.unwrap_or_else(|| config.default_model.clone()),
        config.timeout,
    )
    .with_temperature(cli.temperature)
    .with_max_tokens(cli.max_tokens);
    debug!(?settings, "generation settings");

    if !cli.quiet {
        display_banner(task, &settings.model_identifier, items.len());
    }

    let client = OpenAiClient::new(config)?;

    let cancellation = CancellationFlag::new();
    let signal_flag = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_flag.cancel();
        }
    });

    let mut runner = BatchRunner::new(client, settings).with_cancellation(cancellation);
    if !cli.quiet {
        runner = runner.with_progress(|event| print_progress(event));
    }

    let report = runner.run(items).await;
    let rendered = render_report(&report, cli.format, !cli.no_timestamp)?;

    match &cli.output {
        Some(path) => {
            write_report(path, &rendered)
                .await
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            if !cli.quiet {
                print_saved(path);
            }
        }
        None => print!("{rendered}"),
    }

    if !cli.quiet {
        print_summary(&report);
    }

    Ok(exit_code_for(&report))
}
