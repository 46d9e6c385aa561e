//! Command Module
//!
//! Builds protocol-ready commands from a name and typed arguments.
//!
//! ## Flow
//! ```text
//!  typed args ──► CommandArg::write_args ──► Vec<String>
//!                                               │
//!  (name, argc) ──► shared CommandTemplate ─────┴──► Command
//!                    "NAME %s %s ..."                 (text + argv)
//! ```

mod arg;
mod modifier;
mod template;

pub use arg::{to_args, CommandArg};
pub use modifier::{Count, Ex, ExAt, Get, KeepTtl, Match, Modifier, Nx, Px, PxAt, WithScores, Xx};
pub use template::{format, template, Command, CommandBuilder, CommandTemplate, PLACEHOLDER};
