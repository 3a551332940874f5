use crate::services::delivery_service::DeliveryService;
use opentelemetry::{KeyValue, global, metrics::Gauge};

#[derive(Clone, Debug)]
pub struct Metrics {
    pub status: Gauge<i64>,
}

impl Metrics {
    #[must_use]
    pub(crate) fn new() -> Self {
        let meter = global::meter("contact-relay");
        Self {
            status: meter
                .i64_gauge("contact_relay_transport_configured")
                .with_description("Whether a delivery transport is configured (1 for yes, 0 for no)")
                .build(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration state of each transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransportReadiness {
    pub primary: bool,
    pub fallback: bool,
}

impl TransportReadiness {
    /// A submission can only be delivered if at least one transport is usable.
    #[must_use]
    pub const fn is_ready(self) -> bool {
        self.primary || self.fallback
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    delivery: DeliveryService,
    metrics: Metrics,
}

impl HealthService {
    #[must_use]
    pub fn new(delivery: DeliveryService) -> Self {
        Self { delivery, metrics: Metrics::new() }
    }

    /// Reports which transports are configured. Nothing is sent to check them.
    #[must_use]
    pub fn check_transports(&self) -> TransportReadiness {
        let readiness =
            TransportReadiness { primary: self.delivery.has_primary(), fallback: self.delivery.has_fallback() };

        self.metrics.status.record(i64::from(readiness.primary), &[KeyValue::new("transport", "primary")]);
        self.metrics.status.record(i64::from(readiness.fallback), &[KeyValue::new("transport", "fallback")]);

        readiness
    }
}
