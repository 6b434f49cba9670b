use std::error;
use std::fmt;

pub use self::arc_standard::*;
pub use self::dependencies::*;
pub use self::oracle::*;
pub use self::state::*;

mod arc_standard;
mod dependencies;
mod oracle;
pub mod prelude;
mod state;

pub type Index = u32;

/// The outcome of consulting an oracle for one parser step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// (s, i|b, A) => (s|i, b, A)
    Shift,
    /// (s|i|j, b, A) => (s|i, b, A + (j -> i))
    LeftArc,
    /// (s|i|j, b, A) => (s|j, b, A + (i -> j))
    RightArc,
    /// No transition can make progress towards the gold tree.
    NoneApplicable,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Transition::Shift => "Shift",
            Transition::LeftArc => "LeftArc",
            Transition::RightArc => "RightArc",
            Transition::NoneApplicable => "None",
        }
    }

    pub fn is_applicable(&self) -> bool {
        *self != Transition::NoneApplicable
    }

    pub fn is_arc(&self) -> bool {
        match *self {
            Transition::LeftArc | Transition::RightArc => true,
            _ => false,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of a parser configuration.
///
/// Stack positions count from the top (`stack(0)` is the top), buffer
/// positions count from the front.
pub trait TransitionState {
    fn step(&self) -> usize {
        self.actions().len()
    }

    fn stack_top(&self) -> Option<Index> {
        self.stack(0)
    }

    fn stack(&self, position: Index) -> Option<Index>;

    fn stack_size(&self) -> usize;

    fn is_stack_empty(&self) -> bool {
        self.stack_size() == 0
    }

    fn buffer_head(&self) -> Option<Index> {
        self.buffer(0)
    }

    fn buffer(&self, position: Index) -> Option<Index>;

    fn buffer_size(&self) -> usize;

    fn is_buffer_empty(&self) -> bool {
        self.buffer_size() == 0
    }

    fn head(&self, index: Index) -> Option<Index> {
        self.heads().head(index)
    }

    fn heads(&self) -> &Dependencies;

    fn actions(&self) -> &[Transition];
}

pub trait TransitionMutableState: TransitionState {
    fn advance(&mut self) -> Result<Index, Error>;

    fn push(&mut self, index: Index) -> Result<(), Error>;

    fn pop(&mut self) -> Result<Index, Error>;

    fn add_arc(&mut self, index: Index, head: Index) -> Result<(), Error>;

    fn record(&mut self, action: Transition) -> Result<(), Error>;
}

pub trait TransitionSystem {
    fn estimate_num_actions(num_tokens: usize) -> usize;

    fn apply<S: TransitionMutableState>(action: Transition, state: &mut S) -> Result<(), Error>;

    fn is_allowed<S: TransitionState>(action: Transition, state: &S) -> bool;

    fn is_terminal<S: TransitionState>(state: &S) -> bool;
}

/// Reasons a gold dependency map is rejected by `Dependencies::validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoldDefect {
    SelfLoop,
    DependentOutOfRange,
    HeadOutOfRange(Index),
    Cycle,
}

impl fmt::Display for GoldDefect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GoldDefect::SelfLoop => f.write_str("token depends on itself"),
            GoldDefect::DependentOutOfRange => f.write_str("dependent is outside the sentence"),
            GoldDefect::HeadOutOfRange(head) => {
                write!(f, "head {} is outside the sentence", head)
            }
            GoldDefect::Cycle => f.write_str("head chain forms a cycle"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    InvalidOperation,
    InvalidArgument,
    DuplicateHead { dependent: Index },
    InvalidGoldStructure { dependent: Index, defect: GoldDefect },
}

impl Error {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Error::InvalidOperation => "invalid operation",
            Error::InvalidArgument => "invalid argument",
            Error::DuplicateHead { .. } => "duplicate head",
            Error::InvalidGoldStructure { .. } => "invalid gold structure",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::DuplicateHead { dependent } => {
                write!(f, "{}: token {} already has a head", self.as_str(), dependent)
            }
            Error::InvalidGoldStructure { dependent, defect } => {
                write!(f, "{}: token {}: {}", self.as_str(), dependent, defect)
            }
            _ => write!(f, "{}", self.as_str()),
        }
    }
}

impl error::Error for Error {}
