use super::{Dependencies, Index, StateView, Transition, TransitionState};

/// Chooses the next transition from a configuration and the gold tree.
///
/// Implementations hold no per-sentence state; the same configuration always
/// yields the same decision.
pub trait Oracle {
    fn decide<S: TransitionState>(&self, state: &S, gold: &Dependencies) -> Transition;
}

/// Static arc-standard oracle inspecting only the two topmost stack elements.
///
/// In priority order: an arc from `top` to `second`, an arc from `second` to
/// `top`, a shift, and otherwise `NoneApplicable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticOracle;

impl Oracle for StaticOracle {
    fn decide<S: TransitionState>(&self, state: &S, gold: &Dependencies) -> Transition {
        if let (Some(s0), Some(s1)) = (state.stack(0), state.stack(1)) {
            if gold.head(s0) == Some(s1) {
                return Transition::LeftArc;
            }
            if gold.head(s1) == Some(s0) {
                return Transition::RightArc;
            }
        }
        if !state.is_buffer_empty() {
            Transition::Shift
        } else {
            Transition::NoneApplicable
        }
    }
}

/// Static oracle that postpones reducing `top` while the buffer still holds
/// one of its gold dependents.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookaheadOracle;

impl LookaheadOracle {
    pub fn done_children_right_of<S: TransitionState>(
        state: &S,
        gold: &Dependencies,
        head: Index,
    ) -> bool {
        let mut position = 0;
        while let Some(index) = state.buffer(position) {
            if gold.head(index) == Some(head) {
                return false;
            }
            position += 1;
        }
        true
    }
}

impl Oracle for LookaheadOracle {
    fn decide<S: TransitionState>(&self, state: &S, gold: &Dependencies) -> Transition {
        if let (Some(s0), Some(s1)) = (state.stack(0), state.stack(1)) {
            if gold.head(s0) == Some(s1)
                && LookaheadOracle::done_children_right_of(state, gold, s0)
            {
                return Transition::LeftArc;
            }
            if gold.head(s1) == Some(s0) {
                return Transition::RightArc;
            }
        }
        if !state.is_buffer_empty() {
            Transition::Shift
        } else {
            Transition::NoneApplicable
        }
    }
}

/// Consults `StaticOracle` on a configuration given as plain sequences.
///
/// `stack` is ordered bottom to top and `buffer` front to back. `predicted`
/// is the dependency map built so far.
pub fn decide(
    stack: &[Index],
    buffer: &[Index],
    predicted: &Dependencies,
    gold: &Dependencies,
) -> Transition {
    StaticOracle.decide(&StateView::new(stack, buffer, predicted), gold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(arcs: &[(Index, Index)]) -> Dependencies {
        arcs.iter().cloned().collect()
    }

    #[test]
    fn test_shift_below_two() {
        let gold = deps(&[(0, 1)]);
        let predicted = Dependencies::new();
        assert_eq!(decide(&[], &[0, 1], &predicted, &gold), Transition::Shift);
        assert_eq!(decide(&[0], &[1], &predicted, &gold), Transition::Shift);
        assert_eq!(decide(&[0], &[], &predicted, &gold), Transition::NoneApplicable);
        assert_eq!(decide(&[], &[], &predicted, &gold), Transition::NoneApplicable);
    }

    #[test]
    fn test_arc_priority() {
        let predicted = Dependencies::new();
        // both directions claimed; the top-to-second arc wins
        let gold = deps(&[(1, 0), (0, 1)]);
        assert_eq!(decide(&[0, 1], &[2], &predicted, &gold), Transition::LeftArc);
        let gold = deps(&[(0, 1)]);
        assert_eq!(decide(&[0, 1], &[2], &predicted, &gold), Transition::RightArc);
        let gold = deps(&[(2, 1)]);
        assert_eq!(decide(&[0, 1], &[2], &predicted, &gold), Transition::Shift);
        assert_eq!(decide(&[0, 1], &[], &predicted, &gold), Transition::NoneApplicable);
    }

    #[test]
    fn test_only_top_two_inspected() {
        let predicted = Dependencies::new();
        let gold = deps(&[(2, 0)]);
        assert_eq!(decide(&[0, 1, 2], &[], &predicted, &gold), Transition::NoneApplicable);
    }

    #[test]
    fn test_lookahead_waits_for_right_dependents() {
        let predicted = Dependencies::new();
        let gold = deps(&[(1, 0), (2, 1)]);
        let view = StateView::new(&[0, 1], &[2], &predicted);
        assert_eq!(StaticOracle.decide(&view, &gold), Transition::LeftArc);
        assert_eq!(LookaheadOracle.decide(&view, &gold), Transition::Shift);
        let view = StateView::new(&[0, 1], &[], &predicted);
        assert_eq!(LookaheadOracle.decide(&view, &gold), Transition::LeftArc);
    }
}
