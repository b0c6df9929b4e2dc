//! Lift errors.

use proc_macro2::Span;
use thiserror::Error;

/// Errors raised while lowering a function to the statement IR.
///
/// Each variant carries the span of the offending syntax so the macro
/// adapter can point the compile error at it. Anything that could leave
/// the function without passing a trace point is a hard error; partially
/// instrumented output is never produced.
#[derive(Error, Debug)]
pub enum LiftError {
    #[error("`return` inside an untraceable construct; restructure into `if`/`else` or a plain return")]
    StrayReturn(Span),
    #[error("the `?` operator bypasses exit tracing; return the error explicitly")]
    TryOperator(Span),
    #[error("async functions cannot be traced")]
    AsyncFn(Span),
    #[error("const functions cannot be traced")]
    ConstFn(Span),
    #[error("functions returning `!` have no traceable exits")]
    NeverReturn(Span),
    #[error("parameter pattern has no name to trace; bind it to an identifier")]
    UnnamedParam(Span),
    #[error("`else` branch has an unexpected shape")]
    MalformedElse(Span),
}

impl LiftError {
    /// Span pointing at the offending syntax.
    pub const fn span(&self) -> Span {
        match self {
            Self::StrayReturn(span)
            | Self::TryOperator(span)
            | Self::AsyncFn(span)
            | Self::ConstFn(span)
            | Self::NeverReturn(span)
            | Self::UnnamedParam(span)
            | Self::MalformedElse(span) => *span,
        }
    }
}
