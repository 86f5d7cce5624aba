//! Prometheus metrics and the `/metrics` endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder as _, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TEXT_FORMAT, TextEncoder, core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{StatusCode, header::CONTENT_TYPE},
};
use tracing::error;

const NAMESPACE: &str = "leadbook_json";

const DURATION_BUCKETS: [f64; 13] = [
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug)]
struct Metrics {
    registry: Registry,
    http_requests: IntCounterVec,
    http_duration: HistogramVec,
    http_in_flight: IntGauge,
    lead_rejections: IntCounterVec,
    logins: IntCounterVec,
}

static METRICS: OnceLock<Option<Metrics>> = OnceLock::new();

/// Why a lead operation was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LeadRejection {
    Forbidden,
    NotFound,
    Invalid,
}

impl LeadRejection {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Invalid => "invalid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoginOutcome {
    Success,
    InvalidCredentials,
    Failed,
}

impl LoginOutcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Failed => "failed",
        }
    }
}

/// Counts a request as in flight until dropped.
#[derive(Debug)]
pub(super) struct InFlightRequestGuard(Option<&'static IntGauge>);

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let gauge = metrics().map(|metrics| &metrics.http_in_flight);

        if let Some(gauge) = gauge {
            gauge.inc();
        }

        Self(gauge)
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if let Some(gauge) = self.0 {
            gauge.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_code_label = status_code.to_string();

    metrics
        .http_requests
        .with_label_values(&[method, route, status_class(status_code), status_code_label.as_str()])
        .inc();

    metrics
        .http_duration
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

pub(crate) fn record_lead_rejection(reason: LeadRejection) {
    if let Some(metrics) = metrics() {
        metrics
            .lead_rejections
            .with_label_values(&[reason.as_str()])
            .inc();
    }
}

pub(crate) fn record_login(outcome: LoginOutcome) {
    if let Some(metrics) = metrics() {
        metrics.logins.with_label_values(&[outcome.as_str()]).inc();
    }
}

#[cfg(test)]
pub(crate) fn lead_rejections(reason: LeadRejection) -> u64 {
    metrics().map_or(0, |metrics| {
        metrics
            .lead_rejections
            .with_label_values(&[reason.as_str()])
            .get()
    })
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::SERVICE_UNAVAILABLE);
        return;
    };

    let mut encoded = Vec::new();

    if let Err(source) = TextEncoder::new().encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    if let Err(source) = res.add_header(CONTENT_TYPE, TEXT_FORMAT, true) {
        error!("failed to set metrics content type: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    if let Err(source) = res.write_body(encoded) {
        error!("failed to write metrics body: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
    }
}

fn metrics() -> Option<&'static Metrics> {
    METRICS
        .get_or_init(|| {
            build_metrics()
                .inspect_err(|source| error!("metrics disabled: {source}"))
                .ok()
        })
        .as_ref()
}

fn register<C>(registry: &Registry, collector: C) -> Result<C, prometheus::Error>
where
    C: Collector + Clone + 'static,
{
    registry.register(Box::new(collector.clone()))?;

    Ok(collector)
}

fn build_metrics() -> Result<Metrics, prometheus::Error> {
    let registry = Registry::new_custom(Some(NAMESPACE.to_owned()), None)?;

    let http_requests = register(
        &registry,
        IntCounterVec::new(
            Opts::new("http_requests_total", "HTTP requests by method, route and status."),
            &["method", "route", "status_class", "status_code"],
        )?,
    )?;

    let http_duration = register(
        &registry,
        HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds by method and route.",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "route"],
        )?,
    )?;

    let http_in_flight = register(
        &registry,
        IntGauge::new("http_requests_in_flight", "HTTP requests being served.")?,
    )?;

    let lead_rejections = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "lead_rejections_total",
                "Lead operations refused, by reason (forbidden, not_found, invalid).",
            ),
            &["reason"],
        )?,
    )?;

    let logins = register(
        &registry,
        IntCounterVec::new(
            Opts::new("logins_total", "Login attempts by outcome."),
            &["outcome"],
        )?,
    )?;

    Ok(Metrics {
        registry,
        http_requests,
        http_duration,
        http_in_flight,
        lead_rejections,
        logins,
    })
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}
