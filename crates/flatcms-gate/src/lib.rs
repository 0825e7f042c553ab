//! Access gate for flatcms.
//!
//! Every mutating entry point (and every view that prepares a mutation)
//! asks the gate first and stops on [`Authorization::Denied`] before
//! touching the store. Reads never consult the gate.
//!
//! # Quick Start
//!
//! ```rust
//! use flatcms_gate::{AccessGate, Authorization, Operation, DENIED_MESSAGE};
//! use flatcms_types::SessionIdentity;
//!
//! let gate = AccessGate::new();
//! assert!(gate.check(&SessionIdentity::signed_in("admin"), Operation::Create).is_allowed());
//! assert_eq!(
//!     gate.check(&SessionIdentity::anonymous(), Operation::Delete),
//!     Authorization::Denied { message: DENIED_MESSAGE.to_string() },
//! );
//! ```

pub mod gate;
pub mod operation;

// Re-exports for convenience.
pub use gate::{AccessGate, Authorization, DENIED_MESSAGE};
pub use operation::Operation;
