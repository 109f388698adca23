//! Structured logging for stepvc
//!
//! Binaries call [`init`] once with a [`Profile`]. Library code never
//! installs a subscriber; it only emits through the `log_op_*` macros and
//! plain `tracing` calls. Tests use [`test_capture`] to assert on what was
//! emitted.
//!
//! ```rust
//! use stepvc_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{active_profile, init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
