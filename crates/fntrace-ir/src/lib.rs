//! Statement IR for the fntrace function instrumenter.
//!
//! This crate provides pure body/signature types plus the lift pass from
//! `syn` function items. The rewrite itself lives in `fntrace-instrument`
//! and token emission in `fntrace-emit`.

mod body;
mod error;
mod lift;
mod scan;
mod sig;
mod stmt;

pub use body::*;
pub use error::*;
pub use lift::*;
pub use sig::*;
pub use stmt::*;
