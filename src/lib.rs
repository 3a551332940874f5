#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod telemetry;

use crate::adapters::mail::MailTransport;
use crate::api::{MgmtState, ServiceContainer};
use crate::config::Config;
use crate::services::contact_service::ContactService;
use crate::services::delivery_service::DeliveryService;
use crate::services::health_service::HealthService;
use std::sync::Arc;
use tokio::sync::watch;

/// Routers ready to be served.
#[derive(Debug)]
pub struct App {
    pub router: axum::Router,
    pub mgmt_router: axum::Router,
}

#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    primary_transport: Option<Arc<dyn MailTransport>>,
    fallback_transport: Option<Arc<dyn MailTransport>>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, primary_transport: None, fallback_transport: None }
    }

    /// Replaces the HTTP email API adapter. It is still only used when an API key is configured.
    #[must_use]
    pub fn with_primary_transport(mut self, transport: Arc<dyn MailTransport>) -> Self {
        self.primary_transport = Some(transport);
        self
    }

    /// Replaces the SMTP relay adapter. It is still only used when relay credentials are configured.
    #[must_use]
    pub fn with_fallback_transport(mut self, transport: Arc<dyn MailTransport>) -> Self {
        self.fallback_transport = Some(transport);
        self
    }

    /// Wires services and routers.
    ///
    /// # Errors
    /// Returns an error if a configured transport cannot be constructed.
    pub fn build(self) -> anyhow::Result<App> {
        let delivery = DeliveryService::from_config(&self.config, self.primary_transport, self.fallback_transport)?;

        let contact_service = ContactService::new(delivery.clone(), &self.config.mail, &self.config.form);
        let health_service = HealthService::new(delivery);

        let router = api::app_router(&self.config, ServiceContainer { contact_service });
        let mgmt_router = api::mgmt_router(MgmtState { health_service });

        Ok(App { router, mgmt_router })
    }
}

/// Routes panic messages through `tracing` so they reach the configured log sinks.
pub fn setup_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("unknown panic payload");
        let location = info.location().map(ToString::to_string).unwrap_or_default();

        tracing::error!(panic = %payload, location = %location, "Panic occurred");
        default_hook(info);
    }));
}

/// Flips `shutdown_tx` to `true` on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                    tracing::error!(error = %e, "Failed to listen for SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
            () = terminate => tracing::info!("Received SIGTERM, shutting down"),
        }

        let _ = shutdown_tx.send(true);
    });
}
