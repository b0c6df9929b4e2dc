//! Entry/exit tracing for marked functions.
//!
//! Mark a function with [`macro@trace`] and build with
//! `FNTRACE_ENABLED=true`; every call then prints an entry line with the
//! argument values and an exit line with the elapsed time and, for
//! value-returning functions, the result:
//!
//! ```text
//! ⇢ greet(greeting=Hello, name=World)
//! ⇠ greet [15.2ms] = Hello, World!
//! ```
//!
//! Panics are printed the same way and rethrown unchanged. Without the
//! build-time flag the attribute leaves the function untouched, so call
//! sites never pay for disabled tracing.
//!
//! ```
//! use fntrace::trace;
//!
//! #[trace]
//! fn greet(greeting: &str, name: &str) -> String {
//!     format!("{greeting}, {name}!")
//! }
//!
//! fn main() {
//!     assert_eq!(greet("Hello", "World"), "Hello, World!");
//! }
//! ```

pub use fntrace_macros::trace;

pub mod rt;
