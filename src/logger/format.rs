//! Single-line log format
//!
//! ```text
//! 2024-05-01 12:00:00.123[myapp][tid-3]INFO[my_crate::api][-]api.rs:42 user logged in user=alice trace_id=abc
//! ```
//!
//! Event fields follow the message, then the fields of every enclosing span
//! from the root down. String values are written without quotes.

use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::field::RecordFields;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: Cell<u64> = const { Cell::new(0) };
}

/// Small, stable per-thread number for the `[tid-N]` column
fn thread_id() -> u64 {
    THREAD_ID.with(|id| {
        if id.get() == 0 {
            id.set(NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed));
        }
        id.get()
    })
}

/// Collects the message and `key=value` pairs of one record
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl LineVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name(), value));
        }
    }

    fn write_fields(&self, writer: &mut Writer<'_>, leading_space: bool) -> fmt::Result {
        for (i, (key, value)) in self.fields.iter().enumerate() {
            if leading_space || i > 0 {
                writer.write_char(' ')?;
            }
            write!(writer, "{key}={value}")?;
        }
        Ok(())
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}

/// Field formatter writing `k=v k=v` with unquoted strings.
///
/// Installed with `.fmt_fields(LineFields)` so span fields stored by the
/// fmt layer use the same style as event fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFields;

impl<'writer> FormatFields<'writer> for LineFields {
    fn format_fields<R: RecordFields>(&self, mut writer: Writer<'writer>, fields: R) -> fmt::Result {
        let mut visitor = LineVisitor::default();
        fields.record(&mut visitor);
        if !visitor.message.is_empty() {
            visitor.fields.insert(0, ("message", visitor.message.clone()));
        }
        visitor.write_fields(&mut writer, false)
    }
}

/// Event formatter producing the single-line layout above
#[derive(Debug, Clone)]
pub struct LineFormatter {
    app_name: String,
}

impl LineFormatter {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for LineFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let file = meta
            .file()
            .map(|f| f.rsplit(['/', '\\']).next().unwrap_or(f))
            .unwrap_or("???");

        write!(
            writer,
            "{}[{}][tid-{}]{}[{}][-]{}:{}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            self.app_name,
            thread_id(),
            meta.level(),
            meta.target(),
            file,
            meta.line().unwrap_or(0),
        )?;

        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        write!(writer, " {}", visitor.message)?;
        visitor.write_fields(&mut writer, true)?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, " {fields}")?;
                    }
                }
            }
        }

        writeln!(writer)
    }
}
