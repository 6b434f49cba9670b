pub use super::{Oracle, TransitionMutableState, TransitionState, TransitionSystem};
