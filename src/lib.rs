//! Static arc-standard oracle and the transition-driven training loop built
//! on it.
//!
//! Given a sentence and its gold dependency map, the oracle recovers the
//! shift / left-arc / right-arc sequence that rebuilds that map on a
//! stack-and-buffer automaton. The trainer replays those transitions for
//! every sentence of a corpus and reports the predicted and gold maps to a
//! `Model`.

#[macro_use]
extern crate chan;
#[macro_use]
extern crate slog;

pub mod app;
pub mod dataset;
pub mod io;
pub mod logging;
pub mod syntax;
pub mod training;

pub use crate::dataset::Example;
pub use crate::syntax::transition::{decide, Dependencies, Index, Transition};
pub use crate::training::{train, Model};
