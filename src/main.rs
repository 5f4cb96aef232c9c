// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::{error::ErrorKind, Parser};
use overpass_ai::{cli::Cli, Dispatcher, LazyEncoder, Outcome};
use std::io;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        // Even a bad invocation answers with one JSON document
        Err(e) => {
            let rendered = e.to_string();
            let message = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ")
                .to_string();
            return emit(&Outcome::FatalFailure(message));
        }
    };

    let dispatcher = Dispatcher::new(LazyEncoder::new(cli.encoder_config()));

    match dispatcher.run(io::stdin().lock(), io::stdout().lock()) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            error!("Failed to write response: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries the protocol
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("overpass_ai=info,ort=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn emit(outcome: &Outcome) -> ExitCode {
    match outcome.write_to(io::stdout().lock()) {
        Ok(()) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            error!("Failed to write response: {}", e);
            ExitCode::FAILURE
        }
    }
}
