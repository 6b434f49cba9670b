use super::{Error, Transition, TransitionMutableState, TransitionState, TransitionSystem};

/// Arc-standard transitions over the two topmost stack elements.
///
/// Arcs always reduce the dependent and leave its head on the stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcStandard;

impl ArcStandard {
    /// Shift: (s, i|b, A) => (s|i, b, A)
    pub fn apply_shift<S: TransitionMutableState>(state: &mut S) -> Result<(), Error> {
        let b0 = state.advance()?;
        state.push(b0)
    }

    /// Left Arc: (s|i|j, b, A) => (s|i, b, A +(j,i))
    pub fn apply_left_arc<S: TransitionMutableState>(state: &mut S) -> Result<(), Error> {
        if !ArcStandard::is_allowed_arc(state) {
            return Err(Error::InvalidOperation);
        }
        let s0 = state.pop()?;
        let s1 = state.stack_top().ok_or(Error::InvalidOperation)?;
        state.add_arc(s0, s1)
    }

    /// Right Arc: (s|i|j, b, A) => (s|j, b, A +(i,j))
    pub fn apply_right_arc<S: TransitionMutableState>(state: &mut S) -> Result<(), Error> {
        if !ArcStandard::is_allowed_arc(state) {
            return Err(Error::InvalidOperation);
        }
        let s0 = state.pop()?;
        let s1 = state.pop()?;
        state.add_arc(s1, s0)?;
        state.push(s0)
    }

    pub fn is_allowed_shift<S: TransitionState>(state: &S) -> bool {
        !state.is_buffer_empty()
    }

    pub fn is_allowed_arc<S: TransitionState>(state: &S) -> bool {
        state.stack_size() > 1
    }
}

impl TransitionSystem for ArcStandard {
    fn estimate_num_actions(num_tokens: usize) -> usize {
        // every token is shifted once and all but one are reduced
        if num_tokens == 0 {
            0
        } else {
            2 * num_tokens - 1
        }
    }

    fn apply<S: TransitionMutableState>(action: Transition, state: &mut S) -> Result<(), Error> {
        match action {
            Transition::Shift => ArcStandard::apply_shift(state)?,
            Transition::LeftArc => ArcStandard::apply_left_arc(state)?,
            Transition::RightArc => ArcStandard::apply_right_arc(state)?,
            Transition::NoneApplicable => return Err(Error::InvalidOperation),
        }
        state.record(action)
    }

    fn is_allowed<S: TransitionState>(action: Transition, state: &S) -> bool {
        match action {
            Transition::Shift => ArcStandard::is_allowed_shift(state),
            Transition::LeftArc | Transition::RightArc => ArcStandard::is_allowed_arc(state),
            Transition::NoneApplicable => false,
        }
    }

    fn is_terminal<S: TransitionState>(state: &S) -> bool {
        state.is_buffer_empty() && state.stack_size() < 2
    }
}

/// Arc-standard variant removing by stack position rather than by role.
///
/// `LeftArc` attaches the top to the second and drops the second; `RightArc`
/// attaches the second to the top and drops the top. The element left on the
/// stack is therefore the dependent, so a head is unavailable for its later
/// dependents and most sentences stall before completing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalArcStandard;

impl PositionalArcStandard {
    /// Left Arc: (s|i|j, b, A) => (s|j, b, A +(j,i))
    pub fn apply_left_arc<S: TransitionMutableState>(state: &mut S) -> Result<(), Error> {
        if !ArcStandard::is_allowed_arc(state) {
            return Err(Error::InvalidOperation);
        }
        let s0 = state.pop()?;
        let s1 = state.pop()?;
        state.add_arc(s0, s1)?;
        state.push(s0)
    }

    /// Right Arc: (s|i|j, b, A) => (s|i, b, A +(i,j))
    pub fn apply_right_arc<S: TransitionMutableState>(state: &mut S) -> Result<(), Error> {
        if !ArcStandard::is_allowed_arc(state) {
            return Err(Error::InvalidOperation);
        }
        let s0 = state.pop()?;
        let s1 = state.stack_top().ok_or(Error::InvalidOperation)?;
        state.add_arc(s1, s0)
    }
}

impl TransitionSystem for PositionalArcStandard {
    fn estimate_num_actions(num_tokens: usize) -> usize {
        ArcStandard::estimate_num_actions(num_tokens)
    }

    fn apply<S: TransitionMutableState>(action: Transition, state: &mut S) -> Result<(), Error> {
        match action {
            Transition::Shift => ArcStandard::apply_shift(state)?,
            Transition::LeftArc => PositionalArcStandard::apply_left_arc(state)?,
            Transition::RightArc => PositionalArcStandard::apply_right_arc(state)?,
            Transition::NoneApplicable => return Err(Error::InvalidOperation),
        }
        state.record(action)
    }

    fn is_allowed<S: TransitionState>(action: Transition, state: &S) -> bool {
        ArcStandard::is_allowed(action, state)
    }

    fn is_terminal<S: TransitionState>(state: &S) -> bool {
        ArcStandard::is_terminal(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::transition::State;

    fn shifted(num_tokens: u32) -> State {
        let mut state = State::new(num_tokens);
        for _ in 0..num_tokens {
            ArcStandard::apply(Transition::Shift, &mut state).unwrap();
        }
        state
    }

    #[test]
    fn test_left_arc_reduces_top() {
        let mut state = shifted(2);
        ArcStandard::apply(Transition::LeftArc, &mut state).unwrap();
        assert_eq!(state.stack_slice(), &[0]);
        assert_eq!(state.head(1), Some(0));
    }

    #[test]
    fn test_right_arc_reduces_second() {
        let mut state = shifted(3);
        ArcStandard::apply(Transition::RightArc, &mut state).unwrap();
        assert_eq!(state.stack_slice(), &[0, 2]);
        assert_eq!(state.head(1), Some(2));
        assert_eq!(
            state.actions(),
            &[
                Transition::Shift,
                Transition::Shift,
                Transition::Shift,
                Transition::RightArc,
            ]
        );
    }

    #[test]
    fn test_positional_arcs_drop_by_position() {
        let mut state = shifted(2);
        PositionalArcStandard::apply(Transition::LeftArc, &mut state).unwrap();
        assert_eq!(state.stack_slice(), &[1]);
        assert_eq!(state.head(1), Some(0));

        let mut state = shifted(3);
        PositionalArcStandard::apply(Transition::RightArc, &mut state).unwrap();
        assert_eq!(state.stack_slice(), &[0, 1]);
        assert_eq!(state.head(1), Some(2));
        assert_eq!(state.step(), 4);
    }

    #[test]
    fn test_disallowed_transitions() {
        let mut state = shifted(1);
        assert!(!ArcStandard::is_allowed(Transition::Shift, &state));
        assert!(!ArcStandard::is_allowed(Transition::LeftArc, &state));
        assert!(ArcStandard::apply(Transition::RightArc, &mut state).is_err());
        assert!(ArcStandard::apply(Transition::NoneApplicable, &mut state).is_err());
        assert!(ArcStandard::apply(Transition::Shift, &mut state).is_err());
        assert_eq!(state.stack_slice(), &[0]);
        assert_eq!(state.step(), 1);
        assert!(ArcStandard::is_terminal(&state));
    }
}
