use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use rogueweb::formatter::{TickFormatter, TickLayer};
use speculoos::prelude::*;
use tracing::{info, info_span};
use tracing_subscriber::{fmt, layer::SubscriberExt, registry};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap().lines().map(str::to_owned).collect()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture(body: impl FnOnce()) -> Vec<String> {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = registry().with(TickLayer).with(
        fmt::layer()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .event_format(TickFormatter),
    );

    tracing::subscriber::with_default(subscriber, body);
    captured.lines()
}

#[test]
fn test_event_inside_tick_shows_hex_tick() {
    let lines = capture(|| {
        info_span!("tick", n = 42u64).in_scope(|| info!("strike landed"));
    });

    assert_that(&lines).has_length(1);
    let line = &lines[0];
    assert_that(&line.contains(" 0x002A ")).is_true();
    assert_that(&line.contains(" INFO ")).is_true();
    assert_that(&line.ends_with("strike landed")).is_true();
    // The tick span is folded into the stamp rather than listed as a scope.
    assert_that(&line.contains("tick{")).is_false();
}

#[test]
fn test_event_outside_tick_has_placeholder() {
    let lines = capture(|| info!(seed = 7, "Starting simulation initialization"));

    assert_that(&lines).has_length(1);
    assert_that(&lines[0].contains(" ------ ")).is_true();
    assert_that(&lines[0].contains("seed=7")).is_true();
}

#[test]
fn test_nested_spans_are_listed() {
    let lines = capture(|| {
        info_span!("tick", n = 0x1_0001u64).in_scope(|| {
            info_span!("spawn", side = "right").in_scope(|| info!("band planned"));
        });
    });

    let line = &lines[0];
    // Wide ticks wrap to four hex digits.
    assert_that(&line.contains(" 0x0001 ")).is_true();
    assert_that(&line.contains("spawn{side=\"right\"}:")).is_true();
}
