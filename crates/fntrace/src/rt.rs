//! Runtime trace sink.
//!
//! Generated code funnels every trace line through [`emit`]. The sink is
//! a line-oriented text channel: stdout by default, an in-memory buffer
//! under [`capture`]. Writes hold the sink lock for the whole line, so
//! concurrent callers may interleave lines but never tear one.

use std::any::Any;
use std::fmt;
use std::io::{self, Write};
use std::mem;
use std::panic::{self, AssertUnwindSafe};

use parking_lot::Mutex;

enum Sink {
    Stdout,
    Capture(Vec<String>),
}

static SINK: Mutex<Sink> = Mutex::new(Sink::Stdout);

/// Serializes capturing callers so concurrent tests cannot mix lines.
static CAPTURE: Mutex<()> = Mutex::new(());

/// Emit one trace line.
pub fn emit(args: fmt::Arguments<'_>) {
    let mut sink = SINK.lock();
    match &mut *sink {
        Sink::Stdout => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let _ = writeln!(out, "{args}");
        }
        Sink::Capture(lines) => lines.push(args.to_string()),
    }
}

/// Render an unwind payload the way the exceptional-exit line expects:
/// `&str` and `String` payloads verbatim, anything else by the
/// conventional opaque name.
pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "Box<dyn Any>"
    }
}

/// Run `f` with trace lines collected in memory instead of stdout.
///
/// Captures are serialized process-wide. The stdout sink is restored even
/// when `f` unwinds, and the unwind is then propagated to the caller.
pub fn capture<F: FnOnce()>(f: F) -> Vec<String> {
    let _serial = CAPTURE.lock();
    *SINK.lock() = Sink::Capture(Vec::new());
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    let lines = match mem::replace(&mut *SINK.lock(), Sink::Stdout) {
        Sink::Capture(lines) => lines,
        Sink::Stdout => Vec::new(),
    };
    if let Err(payload) = outcome {
        panic::resume_unwind(payload);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_collects_lines() {
        let lines = capture(|| {
            emit(format_args!("first"));
            emit(format_args!("second {}", 2));
        });
        assert_eq!(lines, vec!["first".to_string(), "second 2".to_string()]);
    }

    #[test]
    fn test_capture_restores_stdout_sink() {
        let _ = capture(|| {});
        assert!(matches!(*SINK.lock(), Sink::Stdout));
    }

    #[test]
    fn test_panic_message_str_payload() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*payload), "boom");
    }

    #[test]
    fn test_panic_message_string_payload() {
        let payload: Box<dyn Any + Send> = Box::new("boom: 2".to_string());
        assert_eq!(panic_message(&*payload), "boom: 2");
    }

    #[test]
    fn test_panic_message_opaque_payload() {
        let payload: Box<dyn Any + Send> = Box::new(17_u32);
        assert_eq!(panic_message(&*payload), "Box<dyn Any>");
    }
}
