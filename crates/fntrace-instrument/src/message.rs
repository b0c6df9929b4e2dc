//! Trace message format construction.
//!
//! Builds the format strings spliced into the generated `format_args!`
//! calls. The line shapes are a byte-for-byte contract:
//!
//! - entry:            `⇢ name(p1=v1, p2=v2)` or `⇢ name()`
//! - exit with value:  `⇠ name [elapsed] = value`
//! - exit, void:       `⇠ name [elapsed]`
//!
//! The exceptional exit reuses the with-value shape, the panic message
//! standing in for the value.

use fntrace_ir::FnSig;

/// Entry-line glyph.
pub const ENTER_ARROW: char = '⇢';
/// Exit-line glyph.
pub const EXIT_ARROW: char = '⇠';

/// Build the entry format string, one hole per parameter in declaration
/// order. Vararg parameters use the debug hole so sequences render in
/// their natural bracketed form.
pub fn entry_format(sig: &FnSig) -> String {
    let mut out = format!("{ENTER_ARROW} {}(", sig.name);
    for (index, param) in sig.params.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        out.push_str(&param.name.to_string());
        out.push('=');
        out.push_str(if param.vararg { "{:?}" } else { "{}" });
    }
    out.push(')');
    out
}

/// Build the exit format string: elapsed bracket always, value hole only
/// when the exit carries one.
pub fn exit_format(sig: &FnSig, with_value: bool) -> String {
    let mut out = format!("{EXIT_ARROW} {} [{{:?}}]", sig.name);
    if with_value {
        out.push_str(" = {}");
    }
    out
}
