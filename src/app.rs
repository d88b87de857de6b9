use crate::cli::Command;
use crate::config::Config;
use crate::sedna::{Level, Selection};
use crate::state::AppState;
use crate::utils::fmt_duration;
use crate::web::create_router;
use anyhow::Context;
use serde::Serialize;
use std::net::SocketAddr;
use std::process::ExitCode;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Main application struct containing all necessary components
pub struct App {
    config: Config,
    app_state: AppState,
}

impl App {
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        let app_state = AppState::from_config(&config).context("Failed to create Sedna client")?;

        info!(
            base_url = %config.sedna_base_url,
            request_interval = fmt_duration(config.request_interval),
            request_timeout = fmt_duration(config.request_timeout),
            "Sedna client configured"
        );

        Ok(App { config, app_state })
    }

    /// Run the selected command to completion.
    pub async fn run(self, command: Command) -> ExitCode {
        let result = match command {
            Command::Serve => self.serve().await,
            Command::Browse {
                department,
                school,
                semester,
                class,
            } => {
                let mut selection = Selection::new();
                for (level, id) in [
                    (Level::Department, department),
                    (Level::School, school),
                    (Level::Semester, semester),
                    (Level::Class, class),
                ] {
                    if let Some(id) = id {
                        selection.set(level, id);
                    }
                }
                self.browse(&selection).await
            }
            Command::Schedule { subclass, days } => {
                let days = days.unwrap_or(self.config.default_day_window);
                self.schedule(&subclass, days).await
            }
        };

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = ?e, "Command failed");
                ExitCode::FAILURE
            }
        }
    }

    /// Serve the HTTP API until a shutdown signal arrives.
    async fn serve(self) -> anyhow::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        info!(address = %addr, "Web server listening");

        let shutdown = CancellationToken::new();
        tokio::spawn(wait_for_signal(shutdown.clone()));

        let router = create_router(self.app_state);
        let server = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.clone().cancelled_owned());
        let mut server = std::pin::pin!(server.into_future());

        tokio::select! {
            result = &mut server => return result.context("Web server failed"),
            _ = shutdown.cancelled() => {}
        }

        let timeout = self.config.shutdown_timeout;
        info!(timeout = fmt_duration(timeout), "Draining in-flight requests");
        match tokio::time::timeout(timeout, server).await {
            Ok(result) => {
                result.context("Web server failed")?;
                info!("Web server stopped");
            }
            Err(_) => warn!(
                timeout = fmt_duration(timeout),
                "Graceful shutdown timed out, dropping open connections"
            ),
        }
        Ok(())
    }

    /// Print the level below the deepest selected id as JSON.
    async fn browse(&self, selection: &Selection) -> anyhow::Result<()> {
        let sedna = &self.app_state.sedna;
        match selection.deepest() {
            None => print_json(&sedna.departments().await?),
            Some((Level::Department, id)) => print_json(&sedna.schools(id).await?),
            Some((Level::School, id)) => print_json(&sedna.semesters(id).await?),
            Some((Level::Semester, id)) => print_json(&sedna.classes(id).await?),
            Some((Level::Class, id)) => print_json(&sedna.subclasses(id).await?),
            Some((Level::Subclass, id)) => {
                anyhow::bail!("subclass {id} has no children; use `schedule --subclass {id}`")
            }
        }
    }

    async fn schedule(&self, subclass_id: &str, days: u32) -> anyhow::Result<()> {
        let events = self.app_state.sedna.schedule(subclass_id, days).await?;
        info!(subclass_id, days, count = events.len(), "Fetched schedule");
        print_json(&events)
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Cancel `token` on Ctrl-C or SIGTERM.
async fn wait_for_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = ?e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = ?e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
    token.cancel();
}
