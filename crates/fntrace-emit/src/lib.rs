//! Token emission for fntrace instrumented bodies.

mod emitter;

pub use emitter::*;
