mod cli;
mod effects;
mod history;
mod output;
mod render;
mod session;
mod settings;

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use engine_logging::{engine_error, engine_info};
use visualizer_core::GenerationOptions;
use visualizer_engine::ReqwestTaskClient;

use cli::{Cli, Command, VisualizeArgs};
use session::{Outcome, Session};
use settings::Settings;

const EXIT_FAILED: u8 = 1;
const EXIT_CANCELLED: u8 = 2;
const EXIT_NOT_READY: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();
    engine_logging::initialize(cli.log_destination(), cli.log_level());

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            engine_error!("{:#}", err);
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_FAILED)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut settings = settings::load_settings(&cli.config);
    if let Some(base_url) = &cli.base_url {
        settings.base_url = base_url.clone();
    }

    match cli.command {
        Command::Visualize(args) => visualize(settings, args),
        Command::Check => check(&settings),
        Command::List => list(&settings),
        Command::History => {
            print_history(&settings);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn visualize(mut settings: Settings, args: VisualizeArgs) -> anyhow::Result<ExitCode> {
    if let Some(dir) = &args.output_dir {
        settings.output_dir = dir.clone();
    }
    let options = resolve_options(&settings, &args)?;
    let selection = read_selection(&args)?;

    let client_settings = settings.client_settings()?;
    let client = ReqwestTaskClient::new(client_settings.clone())?;
    let endpoints = client.endpoints().clone();
    let mut session = Session::new(endpoints, Arc::new(client), io::stdout())
        .context("failed to start the engine")?;

    let timeout = args.timeout.map(Duration::from_secs);
    let Some(outcome) = session.visualize(&selection, options, timeout) else {
        eprintln!("Nothing to visualize: the selection is empty.");
        return Ok(ExitCode::from(EXIT_FAILED));
    };
    engine_info!("Session finished: {:?}", outcome);

    match outcome {
        Outcome::Completed => {
            let state = session.state();
            if state.notice().is_some() {
                return Ok(ExitCode::from(EXIT_FAILED));
            }
            let view = state.view();
            let (Some(snapshot), Some(target)) = (state.completed_task_snapshot(), view.presentation)
            else {
                eprintln!("The task finished but no result was shown.");
                return Ok(ExitCode::from(EXIT_FAILED));
            };
            history::record_completion(
                &settings.output_dir,
                &snapshot,
                chrono::Utc::now().to_rfc3339(),
            );
            if args.save {
                let saved = output::save_result(
                    &settings.output_dir,
                    client_settings,
                    &snapshot.result_path,
                    &target,
                )?;
                println!("Saved to {}", saved.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Failed => Ok(ExitCode::from(EXIT_FAILED)),
        Outcome::Cancelled => Ok(ExitCode::from(EXIT_CANCELLED)),
    }
}

fn resolve_options(settings: &Settings, args: &VisualizeArgs) -> anyhow::Result<GenerationOptions> {
    let defaults = settings.generation_options()?;
    let options = GenerationOptions::new(
        args.difficulty.unwrap_or(defaults.difficulty()),
        args.quality.unwrap_or(defaults.quality()),
        args.duration.unwrap_or(defaults.duration_secs()),
    )?;
    Ok(options)
}

fn read_selection(args: &VisualizeArgs) -> anyhow::Result<String> {
    if !args.text.is_empty() {
        return Ok(args.text.join(" "));
    }
    match &args.file {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read selection from {}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read selection from stdin")?;
            Ok(text)
        }
    }
}

fn check(settings: &Settings) -> anyhow::Result<ExitCode> {
    let client_settings = settings.client_settings()?;
    let timeout = client_settings.request_timeout + client_settings.connect_timeout;
    let client = ReqwestTaskClient::new(client_settings)?;
    let endpoints = client.endpoints().clone();
    let mut session = Session::new(endpoints, Arc::new(client), io::stdout())
        .context("failed to start the engine")?;

    let readiness = session.check_readiness(timeout);
    let mut out = io::stdout();
    render::render_readiness(&mut out, &readiness)?;
    if readiness.is_ready() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_NOT_READY))
    }
}

fn list(settings: &Settings) -> anyhow::Result<ExitCode> {
    let client = ReqwestTaskClient::new(settings.client_settings()?)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    let videos = runtime
        .block_on(client.list_videos())
        .context("failed to list videos")?;

    if videos.is_empty() {
        println!("No videos generated yet.");
    }
    for video in videos {
        println!(
            "{:<40} {:>10} bytes  {}",
            video.name,
            video.size,
            client.endpoints().download(&video.path)
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn print_history(settings: &Settings) {
    let entries = history::load_history(&settings.output_dir);
    if entries.is_empty() {
        println!("No completed results recorded.");
    }
    for entry in entries {
        println!(
            "{}  {:<11} {}  ({})",
            entry.completed_utc, entry.kind, entry.query, entry.result_path
        );
    }
}
