#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc, clippy::must_use_candidate, unreachable_pub)]

use async_trait::async_trait;
use contact_relay::AppBuilder;
use contact_relay::adapters::mail::{MailTransport, TransportError};
use contact_relay::config::{
    Config, DeliveryConfig, FormConfig, LogFormat, MailConfig, RateLimitConfig, ResendConfig, ServerConfig,
    SmtpConfig, TelemetryConfig,
};
use contact_relay::domain::notification::NotificationMessage;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::sync::watch;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("contact_relay=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

pub fn get_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            mgmt_port: 0,
            shutdown_timeout_secs: 1,
            trusted_proxies: vec!["127.0.0.1/32".parse().unwrap()],
        },
        rate_limit: RateLimitConfig { per_minute: 60_000, burst: 10_000 },
        form: FormConfig { max_message_chars: 500 },
        mail: MailConfig {
            recipient: "owner@example.com".to_string(),
            sender: "AI House Dev <noreply@aihousedev.com>".to_string(),
            brand: "AI House Dev".to_string(),
        },
        delivery: DeliveryConfig { attempt_timeout_ms: 500 },
        resend: ResendConfig {
            resend_api_key: Some("re_test_key".to_string()),
            resend_api_url: "http://127.0.0.1:9/emails".to_string(),
            resend_timeout_ms: 500,
        },
        smtp: SmtpConfig {
            smtp_username: Some("owner@gmail.com".to_string()),
            smtp_app_password: Some("abcd efgh ijkl mnop".to_string()),
            smtp_host: None,
            smtp_port: 465,
            smtp_security: None,
            smtp_timeout_ms: 500,
        },
        telemetry: TelemetryConfig { otlp_endpoint: None, log_format: LogFormat::Text },
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Succeed,
    Fail,
    Hang,
}

/// In-memory transport that counts calls and keeps the last message.
#[derive(Debug)]
pub struct RecordingTransport {
    behavior: Behavior,
    calls: AtomicUsize,
    last: Mutex<Option<NotificationMessage>>,
}

impl RecordingTransport {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self { behavior, calls: AtomicUsize::new(0), last: Mutex::new(None) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_message(&self) -> Option<NotificationMessage> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: &NotificationMessage) -> Result<(), TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(message.clone());

        match self.behavior {
            Behavior::Succeed => Ok(()),
            Behavior::Fail => Err(TransportError::Rejected {
                status: 403,
                body: "SECRET-PROVIDER-DETAIL: domain not verified".to_string(),
            }),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }
        }
    }
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub config: Config,
    shutdown_tx: watch::Sender<bool>,
}

impl TestApp {
    pub async fn spawn_with(
        config: Config,
        primary: Option<Arc<RecordingTransport>>,
        fallback: Option<Arc<RecordingTransport>>,
    ) -> Self {
        setup_tracing();

        let mut builder = AppBuilder::new(config.clone());
        if let Some(primary) = primary {
            builder = builder.with_primary_transport(primary);
        }
        if let Some(fallback) = fallback {
            builder = builder.with_fallback_transport(fallback);
        }
        let app = builder.build().unwrap();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let api_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server_url = format!("http://{}", api_listener.local_addr().unwrap());
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());

        let mut api_rx = shutdown_rx.clone();
        tokio::spawn(async move {
            axum::serve(api_listener, app.router.into_make_service_with_connect_info::<SocketAddr>())
                .with_graceful_shutdown(async move {
                    let _ = api_rx.wait_for(|&s| s).await;
                })
                .await
                .unwrap();
        });

        let mut mgmt_rx = shutdown_rx;
        tokio::spawn(async move {
            axum::serve(mgmt_listener, app.mgmt_router.into_make_service_with_connect_info::<SocketAddr>())
                .with_graceful_shutdown(async move {
                    let _ = mgmt_rx.wait_for(|&s| s).await;
                })
                .await
                .unwrap();
        });

        Self { server_url, mgmt_url, client: reqwest::Client::new(), config, shutdown_tx }
    }

    pub async fn spawn(
        primary: Option<Arc<RecordingTransport>>,
        fallback: Option<Arc<RecordingTransport>>,
    ) -> Self {
        Self::spawn_with(get_test_config(), primary, fallback).await
    }

    pub async fn post_contact(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client.post(format!("{}/api/contact", self.server_url)).json(body).send().await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

pub fn valid_submission() -> serde_json::Value {
    serde_json::json!({
        "company": "Acme Co",
        "name": "Taro",
        "email": "taro@acme.co",
        "message": "need a quote"
    })
}
