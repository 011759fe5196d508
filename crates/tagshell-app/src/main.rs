// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// tagshell: hosts the remote web app and bridges tag discoveries into it
//
// Desktop entry point. Initialises logging, loads the config, wires the
// runtime to a headless console surface and drives it from stdin.

mod commands;
mod services;
mod surface;

use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use tagshell_bridge::HostSurface;
use tagshell_core::error::Result;
use tagshell_core::human_errors::humanize_error;
use tagshell_core::types::{SurfaceEvent, TagEvent};
use tagshell_runtime::{LifecycleCoordinator, UiCommand};

use commands::HarnessCommand;
use surface::ConsoleSurface;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("tagshell starting");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "tagshell failed");
            eprintln!("{}", humanize_error(&e).message);
            ExitCode::FAILURE
        }
    }
}

/// Either a line from stdin or a command from the foreground queue.
enum Input {
    Line(Option<String>),
    Queued(Option<UiCommand>),
}

/// Whether the loop keeps going after a command.
enum Flow {
    Continue,
    Exit,
}

async fn run() -> Result<()> {
    let mut config = services::config_store::load_config(&services::data_dir::data_dir());
    if std::env::args().skip(1).any(|arg| arg == "--simulate-tags") {
        config.simulate_tags = true;
    }

    let platform = tagshell_bridge::platform_bridge(&config);
    let surface = Arc::new(ConsoleSurface::new());
    let mut coordinator = LifecycleCoordinator::new(config, platform, surface.clone())?;

    coordinator.start()?;
    coordinator.on_foreground();
    if let (Some(name), Some(bridge)) = (surface.bridge_name(), surface.bridge()) {
        info!(
            bridge = %name,
            tag_capability = bridge.has_tag_capability(),
            "page bridge exposed"
        );
    }
    println!("{}", commands::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let input = tokio::select! {
            line = lines.next_line() => Input::Line(line?),
            queued = coordinator.next_command() => Input::Queued(queued),
        };

        match input {
            Input::Queued(Some(command)) => coordinator.apply(command),
            Input::Queued(None) => break,
            Input::Line(None) => break,
            Input::Line(Some(line)) => match commands::parse(&line) {
                Ok(Some(command)) => {
                    if let Flow::Exit = execute(&mut coordinator, &surface, command).await {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => println!("{e}"),
            },
        }
    }

    coordinator.on_background();
    coordinator.pump();
    info!("tagshell stopped");
    Ok(())
}

async fn execute(
    coordinator: &mut LifecycleCoordinator,
    surface: &ConsoleSurface,
    command: HarnessCommand,
) -> Flow {
    match command {
        HarnessCommand::Foreground => coordinator.on_foreground(),
        HarnessCommand::Background => coordinator.on_background(),
        HarnessCommand::Tag(id) => {
            // Discoveries arrive off the foreground context on real hardware.
            let dispatcher = coordinator.dispatcher();
            match tokio::task::spawn_blocking(move || dispatcher.on_tag_discovered(TagEvent::new(id)))
                .await
            {
                Ok(outcome) => println!("{outcome:?}"),
                Err(e) => warn!(error = %e, "tag delivery worker failed"),
            }
        }
        HarnessCommand::Back => {
            if !coordinator.on_back_pressed() {
                println!("no page history; leaving");
                return Flow::Exit;
            }
        }
        HarnessCommand::Refresh => {
            if let Err(e) = coordinator.on_refresh() {
                warn!(error = %e, "refresh failed");
            }
        }
        HarnessCommand::Open(url) => {
            if let Err(e) = surface.load_url(&url) {
                warn!(error = %e, "navigation failed");
            }
        }
        HarnessCommand::Finish(url) => surface.emit(SurfaceEvent::LoadFinished { url }),
        HarnessCommand::Error { code, description } => {
            let url = surface.current_url().unwrap_or_default();
            surface.emit(SurfaceEvent::LoadError {
                code,
                description,
                url,
            });
        }
        HarnessCommand::Progress(percent) => {
            surface.emit(SurfaceEvent::Progress(percent));
            coordinator.pump();
            println!("{:?}", coordinator.loading());
        }
        HarnessCommand::Call(message) => {
            let value = coordinator.call_surface().invoke_json(&message);
            println!("{}", value.to_json());
        }
        HarnessCommand::Help => println!("{}", commands::HELP),
        HarnessCommand::Quit => return Flow::Exit,
    }
    Flow::Continue
}
