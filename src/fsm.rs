/// Minimal finite-state-machine container.
///
/// `S` is the state type (usually a fieldless enum). The machine tracks the
/// current state, the previous one, and how many fixed ticks have passed since
/// the last transition. Transition rules live with whoever drives the machine.
///
/// # Usage
/// ```
/// use boxbrawl::fsm::StateMachine;
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Door { Open, Closed }
///
/// let mut fsm = StateMachine::new(Door::Closed);
/// assert!(fsm.go(Door::Open));
/// assert_eq!(fsm.previous, Door::Closed);
/// ```
#[derive(Debug, Clone)]
pub struct StateMachine<S: Clone> {
    pub state: S,
    pub previous: S,
    /// Fixed ticks spent in the current state. Reset to 0 on each transition.
    pub ticks_in_state: u32,
}

impl<S: Clone> StateMachine<S> {
    /// Create a new machine starting in `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            previous: initial.clone(),
            state: initial,
            ticks_in_state: 0,
        }
    }

    /// Transition to `next` if it is a different variant from the current
    /// state (compared by discriminant). Returns whether a transition happened.
    pub fn go(&mut self, next: S) -> bool {
        if std::mem::discriminant(&self.state) == std::mem::discriminant(&next) {
            return false;
        }
        self.previous = std::mem::replace(&mut self.state, next);
        self.ticks_in_state = 0;
        true
    }

    /// Count one fixed tick in the current state.
    pub fn tick(&mut self) {
        self.ticks_in_state = self.ticks_in_state.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Light {
        Red,
        Green,
    }

    #[test]
    fn same_variant_is_not_a_transition() {
        let mut fsm = StateMachine::new(Light::Red);
        fsm.tick();
        assert!(!fsm.go(Light::Red));
        assert_eq!(fsm.ticks_in_state, 1);
    }

    #[test]
    fn transition_resets_counter() {
        let mut fsm = StateMachine::new(Light::Red);
        fsm.tick();
        fsm.tick();
        assert!(fsm.go(Light::Green));
        assert_eq!(fsm.previous, Light::Red);
        assert_eq!(fsm.ticks_in_state, 0);
        fsm.tick();
        assert_eq!(fsm.ticks_in_state, 1);
    }
}
