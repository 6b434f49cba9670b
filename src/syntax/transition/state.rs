use std::u32::MAX as U32_MAX;

use super::{
    Dependencies, Error, Index, Oracle, Transition, TransitionMutableState, TransitionState,
    TransitionSystem,
};

#[inline]
fn default_capacity(num_tokens: usize) -> usize {
    2 * num_tokens
}

/// Parser configuration owned by one in-flight sentence.
///
/// Tokens leave the buffer strictly left to right, so the buffer is kept as a
/// cursor on the next token to shift.
#[derive(Debug, Clone)]
pub struct State {
    num_tokens: Index,
    stack: Vec<Index>,
    buffer: Option<Index>,
    heads: Dependencies,
    actions: Vec<Transition>,
}

impl State {
    pub fn new(num_tokens: u32) -> Self {
        State::with_capacity(num_tokens, default_capacity(num_tokens as usize))
    }

    pub fn with_capacity(num_tokens: u32, capacity: usize) -> Self {
        State {
            num_tokens: num_tokens,
            stack: Vec::with_capacity(num_tokens as usize),
            buffer: if num_tokens > 0 { Some(0) } else { None },
            heads: Dependencies::new(),
            actions: Vec::with_capacity(capacity),
        }
    }

    pub fn num_tokens(&self) -> usize {
        self.num_tokens as usize
    }

    /// The stack from bottom to top.
    pub fn stack_slice(&self) -> &[Index] {
        &self.stack
    }

    pub fn into_heads(self) -> Dependencies {
        self.heads
    }
}

impl TransitionState for State {
    fn step(&self) -> usize {
        self.actions.len()
    }

    fn stack_top(&self) -> Option<Index> {
        self.stack.last().cloned()
    }

    fn stack(&self, position: Index) -> Option<Index> {
        let position = position as usize;
        let stack_size = self.stack.len();
        if position < stack_size {
            self.stack.get(stack_size - 1 - position).cloned()
        } else {
            None
        }
    }

    fn stack_size(&self) -> usize {
        self.stack.len()
    }

    fn is_stack_empty(&self) -> bool {
        self.stack.is_empty()
    }

    fn buffer_head(&self) -> Option<Index> {
        self.buffer
    }

    fn buffer(&self, position: Index) -> Option<Index> {
        if let Some(buffer) = self.buffer {
            let index = buffer as u64 + position as u64;
            if index < self.num_tokens as u64 {
                return Some(index as Index);
            }
        }
        None
    }

    fn buffer_size(&self) -> usize {
        match self.buffer {
            Some(buffer) => (self.num_tokens - buffer) as usize,
            None => 0,
        }
    }

    fn is_buffer_empty(&self) -> bool {
        self.buffer.is_none()
    }

    fn heads(&self) -> &Dependencies {
        &self.heads
    }

    fn actions(&self) -> &[Transition] {
        &self.actions
    }
}

impl TransitionMutableState for State {
    fn advance(&mut self) -> Result<Index, Error> {
        match self.buffer {
            Some(buffer) => {
                if buffer == self.num_tokens - 1 {
                    self.buffer = None;
                } else {
                    self.buffer = Some(buffer + 1);
                }
                Ok(buffer)
            }
            None => Err(Error::InvalidOperation),
        }
    }

    fn push(&mut self, index: Index) -> Result<(), Error> {
        if index >= self.num_tokens {
            return Err(Error::InvalidArgument);
        }
        self.stack.push(index);
        Ok(())
    }

    fn pop(&mut self) -> Result<Index, Error> {
        self.stack.pop().ok_or(Error::InvalidOperation)
    }

    fn add_arc(&mut self, index: Index, head: Index) -> Result<(), Error> {
        if index >= self.num_tokens || head >= self.num_tokens || index == head {
            Err(Error::InvalidOperation)
        } else {
            self.heads.add_arc(index, head)
        }
    }

    fn record(&mut self, action: Transition) -> Result<(), Error> {
        self.actions.push(action);
        Ok(())
    }
}

/// Borrowed view over a configuration held as plain slices.
///
/// `stack` is ordered bottom to top, `buffer` front to back.
#[derive(Debug, Clone, Copy)]
pub struct StateView<'a> {
    stack: &'a [Index],
    buffer: &'a [Index],
    heads: &'a Dependencies,
}

impl<'a> StateView<'a> {
    pub fn new(stack: &'a [Index], buffer: &'a [Index], heads: &'a Dependencies) -> Self {
        StateView {
            stack: stack,
            buffer: buffer,
            heads: heads,
        }
    }
}

impl<'a> TransitionState for StateView<'a> {
    fn step(&self) -> usize {
        0
    }

    fn stack(&self, position: Index) -> Option<Index> {
        let position = position as usize;
        if position < self.stack.len() {
            Some(self.stack[self.stack.len() - 1 - position])
        } else {
            None
        }
    }

    fn stack_size(&self) -> usize {
        self.stack.len()
    }

    fn buffer(&self, position: Index) -> Option<Index> {
        self.buffer.get(position as usize).cloned()
    }

    fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    fn heads(&self) -> &Dependencies {
        self.heads
    }

    fn actions(&self) -> &[Transition] {
        &[]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The buffer is exhausted and at most one token remains on the stack.
    Complete,
    /// The oracle found no applicable transition.
    Stalled,
}

impl Status {
    pub fn is_complete(&self) -> bool {
        *self == Status::Complete
    }
}

/// The result of replaying oracle decisions over one sentence.
#[derive(Debug, Clone)]
pub struct Derivation {
    state: State,
    status: Status,
}

impl Derivation {
    pub fn derive<T, O>(oracle: &O, num_tokens: usize, gold: &Dependencies) -> Result<Self, Error>
    where
        T: TransitionSystem,
        O: Oracle + ?Sized,
    {
        Derivation::derive_with::<T, O, _>(oracle, num_tokens, gold, |_, _| {})
    }

    /// Like `derive`, calling `observe` with the configuration and the chosen
    /// transition before each transition is applied.
    pub fn derive_with<T, O, F>(
        oracle: &O,
        num_tokens: usize,
        gold: &Dependencies,
        mut observe: F,
    ) -> Result<Self, Error>
    where
        T: TransitionSystem,
        O: Oracle + ?Sized,
        F: FnMut(&State, Transition),
    {
        if num_tokens > (U32_MAX as usize) {
            return Err(Error::InvalidArgument);
        }
        let capacity = T::estimate_num_actions(num_tokens);
        let mut state = State::with_capacity(num_tokens as u32, capacity);
        while !T::is_terminal(&state) {
            let action = oracle.decide(&state, gold);
            if !action.is_applicable() {
                return Ok(Derivation {
                    state: state,
                    status: Status::Stalled,
                });
            }
            observe(&state, action);
            T::apply(action, &mut state)?;
        }
        Ok(Derivation {
            state: state,
            status: Status::Complete,
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn heads(&self) -> &Dependencies {
        self.state.heads()
    }

    pub fn actions(&self) -> &[Transition] {
        self.state.actions()
    }

    pub fn num_shifts(&self) -> usize {
        self.actions()
            .iter()
            .filter(|&&action| action == Transition::Shift)
            .count()
    }

    pub fn into_heads(self) -> Dependencies {
        self.state.into_heads()
    }
}
