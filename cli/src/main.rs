//! `deep` - run, replay and decode DEEP preference elicitations in a terminal.
//!
//! Prompts and the final record go to stdout, with the record always on the
//! last line. Logs go to stderr.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use deep_cli::{Console, SurveyPage};
use deep_config::{ConfigError, DeepConfig, SessionOptions};
use deep_core::{ElicitationEngine, record};
use deep_types::{Choice, ProcedureId};
use deep_utils::{WriteOptions, atomic_write, write_unique};

#[derive(Parser)]
#[command(name = "deep", version)]
#[command(about = "Dynamically Optimized Sequential Experimentation for time and risk preferences")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive session
    Run {
        /// Identifier such as DEEPTIME12 or DEEPRISK8 (may be embedded in text)
        identifier: String,
        /// Also write the record atomically to this file
        #[arg(long)]
        out: Option<PathBuf>,
        /// Skip the warm-up quiz
        #[arg(long)]
        skip_tutorial: bool,
        /// Print the bracket after each step and enable debug logging
        #[arg(long)]
        debug: bool,
    },
    /// Replay a fixed choice sequence and print every step
    Replay {
        identifier: String,
        /// Comma-separated choices, 0 for option A and 1 for option B
        choices: String,
    },
    /// Validate a record and print its contents ("-" reads stdin)
    Decode { record: String },
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_error) = match DeepConfig::load() {
        Ok(config) => (config, None),
        Err(err) => (None, Some(err)),
    };
    let mut options = SessionOptions::from_config_and_env(config.as_ref());
    if let Commands::Run {
        skip_tutorial,
        debug,
        ..
    } = &cli.command
    {
        options.skip_tutorial |= *skip_tutorial;
        options.debug |= *debug;
    }

    init_tracing(options.debug);
    if let Some(err) = config_error {
        report_config_error(&err);
    }

    match cli.command {
        Commands::Run {
            identifier, out, ..
        } => run(&identifier, out.as_deref(), config.as_ref(), options),
        Commands::Replay {
            identifier,
            choices,
        } => replay(&identifier, &choices),
        Commands::Decode { record } => decode(&record),
    }
}

fn report_config_error(err: &ConfigError) {
    tracing::warn!(
        path = %err.path().display(),
        "using default settings: {err}"
    );
}

fn run(
    identifier: &str,
    out: Option<&Path>,
    config: Option<&DeepConfig>,
    options: SessionOptions,
) -> Result<()> {
    let mut page = SurveyPage::new();
    let mut session = page
        .load(identifier, options)
        .context("failed to start session")?;

    let mut console = Console::new(io::stdin().lock(), io::stdout().lock());
    let record = session.run(&mut console)?;
    drop(console);
    page.finish(&session)?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{record}")?;

    let bytes = format!("{record}\n");
    if let Some(path) = out {
        atomic_write(path, bytes.as_bytes(), WriteOptions::default())
            .with_context(|| format!("failed to write record to {}", path.display()))?;
        tracing::info!(path = %path.display(), "record written");
    } else if let Some(dir) = config.and_then(DeepConfig::record_dir) {
        let stem = session.procedure().to_string();
        let path = write_unique(&dir, &stem, "json", bytes.as_bytes(), WriteOptions::default())
            .with_context(|| format!("failed to store record in {}", dir.display()))?;
        tracing::info!(path = %path.display(), "record stored");
    }
    Ok(())
}

fn parse_choices(raw: &str) -> Result<Vec<Choice>> {
    raw.split(',')
        .map(str::trim)
        .enumerate()
        .map(|(i, s)| {
            if s.is_empty() {
                bail!("empty choice at position {}", i + 1);
            }
            let value: u8 = s
                .parse()
                .with_context(|| format!("choice {s:?} is not a number"))?;
            Ok(Choice::try_from(value)?)
        })
        .collect()
}

fn replay(identifier: &str, raw_choices: &str) -> Result<()> {
    let procedure = ProcedureId::parse(identifier)?.procedure();
    let choices = parse_choices(raw_choices)?;
    let expected = procedure.step_count().as_usize();
    if choices.len() != expected {
        bail!(
            "{procedure} needs {expected} choices, got {}",
            choices.len()
        );
    }

    let engine = ElicitationEngine::replay(procedure, &choices)?;
    let session = engine.completed()?;

    let mut stdout = io::stdout().lock();
    for (step, response) in session.steps().iter().zip(session.responses()) {
        let pair = step.pair();
        writeln!(
            stdout,
            "{}. A: {} | B: {} -> {} ({})",
            step.index().ordinal(),
            pair.option_a,
            pair.option_b,
            response.choice,
            pair.get(response.choice)
        )?;
    }
    writeln!(stdout, "{}", session.estimate())?;
    writeln!(stdout, "{}", engine.serialize()?)?;
    Ok(())
}

fn read_record_arg(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut text = String::new();
    io::stdin()
        .lock()
        .read_to_string(&mut text)
        .context("failed to read record from stdin")?;
    Ok(text)
}

fn decode(arg: &str) -> Result<()> {
    let text = read_record_arg(arg)?;
    let session = record::decode(&text).context("invalid DEEP record")?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "procedure: {}", session.procedure())?;
    let choices: Vec<String> = session
        .choices()
        .iter()
        .map(|choice| choice.index().to_string())
        .collect();
    writeln!(stdout, "responses: {}", choices.join(","))?;
    writeln!(stdout, "{}", session.estimate())?;
    Ok(())
}
