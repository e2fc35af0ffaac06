//! A `tracing` layer that forwards events into the [`LogRouter`].
//!
//! Events may name their category with a `category` field holding a short
//! name (`category = "NETPLAY"`); anything else lands in `MASTER`. Since
//! `tracing` has no notice level, INFO events carrying `notice = true` are
//! published as [`Severity::Notice`].
use super::router::INTERNAL_TARGET;
use super::{LogCategory, LogRouter, Severity};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    EnvFilter, Layer,
};

pub struct RouterLayer {
    router: Arc<LogRouter>,
}

impl RouterLayer {
    pub fn new(router: Arc<LogRouter>) -> Self {
        Self { router }
    }

    /// Installs the global subscriber: an `EnvFilter` (from `RUST_LOG`, or
    /// `default_filter`) in front of a `RouterLayer`.
    pub fn init_subscriber(
        router: Arc<LogRouter>,
        default_filter: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(RouterLayer::new(router));

        tracing::subscriber::set_global_default(subscriber)?;
        Ok(())
    }
}

impl<S> Layer<S> for RouterLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target() == INTERNAL_TARGET {
            return;
        }

        let mut fields = EventFields::default();
        event.record(&mut fields);

        let category = fields.category.unwrap_or(LogCategory::Master);
        let severity = match Severity::from(*metadata.level()) {
            Severity::Info if fields.notice => Severity::Notice,
            other => other,
        };

        if !self.router.is_active(category, severity) {
            return;
        }

        let text = if fields.extra.is_empty() {
            fields.message
        } else {
            format!("{} {}", fields.message, fields.extra)
        };
        self.router.publish(category, severity, &text);
    }
}

/// Splits an event's fields into the routing fields and the display text.
#[derive(Default)]
struct EventFields {
    message: String,
    category: Option<LogCategory>,
    notice: bool,
    extra: String,
}

impl EventFields {
    fn push_extra(&mut self, name: &str, value: &dyn std::fmt::Display) {
        if !self.extra.is_empty() {
            self.extra.push(' ');
        }
        let _ = write!(self.extra, "{}={}", name, value);
    }
}

impl tracing::field::Visit for EventFields {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{:?}", value),
            "category" => {
                let raw = format!("{:?}", value);
                self.category = raw.trim_matches('"').parse().ok();
            }
            name => {
                let rendered = format!("{:?}", value);
                self.push_extra(name, &rendered);
            }
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "category" => self.category = value.parse().ok(),
            name => self.push_extra(name, &value),
        }
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        match field.name() {
            "notice" => self.notice = value,
            name => self.push_extra(name, &value),
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.push_extra(field.name(), &value);
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.push_extra(field.name(), &value);
    }
}
