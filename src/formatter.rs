//! Custom tracing formatter with tick stamps.
//!
//! Every tick runs inside a span named [`TICK_SPAN`]. [`TickLayer`] records that span's tick
//! number when it is created, and [`TickFormatter`] prints it on each event emitted inside it.

use std::fmt;

use time::macros::format_description;
use time::{format_description::FormatItem, OffsetDateTime};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::simulation::TICK_SPAN;

/// Maximum value for tick display (16-bit hex)
const TICK_DISPLAY_MASK: u64 = 0xFFFF;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:5]");

/// Tick number attached to a tick span's extensions.
#[derive(Debug, Clone, Copy)]
struct TickStamp(u64);

#[derive(Default)]
struct TickVisitor(Option<u64>);

impl Visit for TickVisitor {
    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == "n" {
            self.0 = Some(value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == "n" {
            self.0 = u64::try_from(value).ok();
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
}

/// Stores the tick number of every tick span so the formatter can find it.
pub struct TickLayer;

impl<S> Layer<S> for TickLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        if attrs.metadata().name() != TICK_SPAN {
            return;
        }
        let mut visitor = TickVisitor::default();
        attrs.record(&mut visitor);
        if let (Some(tick), Some(span)) = (visitor.0, ctx.span(id)) {
            span.extensions_mut().insert(TickStamp(tick));
        }
    }
}

/// Re-implementation of the Full formatter with a timestamp and the current tick in hexadecimal.
///
/// Events outside any tick print `------` in place of the tick.
pub struct TickFormatter;

impl<S, N> FormatEvent<S, N> for TickFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();

        let now = OffsetDateTime::now_utc();
        let formatted_time = now.format(&TIMESTAMP_FORMAT).map_err(|e| {
            eprintln!("Failed to format timestamp: {}", e);
            fmt::Error
        })?;
        write_dimmed(&mut writer, formatted_time)?;
        writer.write_char(' ')?;

        let tick = ctx.event_scope().and_then(|scope| {
            scope
                .from_root()
                .find_map(|span| span.extensions().get::<TickStamp>().map(|stamp| stamp.0))
        });
        match tick {
            Some(tick) => write_dimmed(&mut writer, format_args!("0x{:04X}", tick & TICK_DISPLAY_MASK))?,
            None => write_dimmed(&mut writer, "------")?,
        }
        writer.write_char(' ')?;

        write_colored_level(&mut writer, meta.level())?;
        writer.write_char(' ')?;

        // Span chain, minus the tick span already shown above
        if let Some(scope) = ctx.event_scope() {
            let mut saw_any = false;
            for span in scope.from_root().filter(|span| span.metadata().name() != TICK_SPAN) {
                write_bold(&mut writer, span.metadata().name())?;
                saw_any = true;
                let ext = span.extensions();
                if let Some(fields) = &ext.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write_bold(&mut writer, "{")?;
                        write!(writer, "{}", fields)?;
                        write_bold(&mut writer, "}")?;
                    }
                }
                write_dimmed(&mut writer, ':')?;
            }
            if saw_any {
                writer.write_char(' ')?;
            }
        }

        write_dimmed(&mut writer, meta.target())?;
        write_dimmed(&mut writer, ':')?;
        writer.write_char(' ')?;

        ctx.format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Write the verbosity level with the same coloring/alignment as the Full formatter.
fn write_colored_level(writer: &mut Writer<'_>, level: &Level) -> fmt::Result {
    if writer.has_ansi_escapes() {
        let (color, text) = match *level {
            Level::TRACE => ("\x1b[35m", "TRACE"), // purple
            Level::DEBUG => ("\x1b[34m", "DEBUG"), // blue
            Level::INFO => ("\x1b[32m", " INFO"),  // green
            Level::WARN => ("\x1b[33m", " WARN"),  // yellow
            Level::ERROR => ("\x1b[31m", "ERROR"), // red
        };
        write!(writer, "{}{}\x1b[0m", color, text)
    } else {
        write!(writer, "{:>5}", level.as_str())
    }
}

fn write_dimmed(writer: &mut Writer<'_>, s: impl fmt::Display) -> fmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "\x1b[2m{}\x1b[0m", s)
    } else {
        write!(writer, "{}", s)
    }
}

fn write_bold(writer: &mut Writer<'_>, s: impl fmt::Display) -> fmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "\x1b[1m{}\x1b[0m", s)
    } else {
        write!(writer, "{}", s)
    }
}
