//! Prometheus metrics for warden.
//!
//! - `warden_command_total{command}` - commands dispatched to a handler
//! - `warden_command_duration_seconds{command}` - handler latency
//! - `warden_command_errors_total{command, error}` - handler failures by error code
//! - `warden_denials_total{command, reason}` - invocations refused by the gate
//! - `warden_allowlist_size` - principals on the allow-list
//! - `warden_gateway_reconnects_total` - gateway sessions re-established
//!
//! Recording before [`init`] is a no-op.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Gate refusals by command and denial reason.
pub static DENIALS: OnceLock<IntCounterVec> = OnceLock::new();

pub static ALLOWLIST_SIZE: OnceLock<IntGauge> = OnceLock::new();

pub static GATEWAY_RECONNECTS: OnceLock<IntCounter> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Call once at startup. A metric that fails to build or register is
/// logged and left unset, which disables its recording.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                Ok(m) => {
                    if let Err(e) = r.register(Box::new(m.clone())) {
                        tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                    }
                    let _ = $metric.set(m);
                }
                Err(e) => {
                    tracing::warn!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                }
            }
        };
    }

    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("warden_command_total", "Commands dispatched by name"), &["command"]));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("warden_command_duration_seconds", "Command latency by name")
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
        &["command"]));
    register!(COMMAND_ERRORS, IntCounterVec::new(Opts::new("warden_command_errors_total", "Command errors by name and error code"), &["command", "error"]));
    register!(DENIALS, IntCounterVec::new(Opts::new("warden_denials_total", "Invocations refused by the authorization gate"), &["command", "reason"]));
    register!(ALLOWLIST_SIZE, IntGauge::new("warden_allowlist_size", "Principals on the allow-list"));
    register!(GATEWAY_RECONNECTS, IntCounter::new("warden_gateway_reconnects_total", "Gateway sessions re-established"));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
        String::new()
    })
}

/// Record a command execution with latency.
#[inline]
pub fn record_command(command: &str, duration_secs: f64) {
    if let Some(c) = COMMAND_COUNTER.get() {
        c.with_label_values(&[command]).inc();
    }
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

#[inline]
pub fn record_command_error(command: &str, error: &str) {
    if let Some(c) = COMMAND_ERRORS.get() {
        c.with_label_values(&[command, error]).inc();
    }
}

#[inline]
pub fn record_denial(command: &str, reason: &str) {
    if let Some(c) = DENIALS.get() {
        c.with_label_values(&[command, reason]).inc();
    }
}

#[inline]
pub fn set_allowlist_size(size: usize) {
    if let Some(g) = ALLOWLIST_SIZE.get() {
        g.set(i64::try_from(size).unwrap_or(i64::MAX));
    }
}

#[inline]
pub fn record_gateway_reconnect() {
    if let Some(c) = GATEWAY_RECONNECTS.get() {
        c.inc();
    }
}
