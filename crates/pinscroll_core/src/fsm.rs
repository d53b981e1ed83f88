//! State Machine Runtime
//!
//! Typed flat state machines for section lifecycle states.
//! Supports:
//! - Transition tables expressed as `match (state, event)`
//! - Forced transitions (recovery paths that bypass the table)
//! - Bounded transition history (for diagnostics)

use std::fmt::Debug;
use std::hash::Hash;

use smallvec::SmallVec;

use crate::events::EventType;

/// Number of transitions kept in history before the oldest is dropped
///
/// Also the inline capacity, so history never leaves the stack.
const HISTORY_LIMIT: usize = 16;

/// Trait for state enums that define their own transition table
///
/// # Example
///
/// ```
/// use pinscroll_core::fsm::StateTransitions;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// enum Door {
///     #[default]
///     Closed,
///     Open,
/// }
///
/// const PUSH: u32 = 1;
///
/// impl StateTransitions for Door {
///     fn on_event(&self, event: u32) -> Option<Self> {
///         match (self, event) {
///             (Door::Closed, PUSH) => Some(Door::Open),
///             (Door::Open, PUSH) => Some(Door::Closed),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait StateTransitions: Clone + Copy + PartialEq + Eq + Hash + Debug + 'static {
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: EventType) -> Option<Self>;
}

/// A recorded transition `(from, event, to)`
pub type HistoryEntry<S> = (S, EventType, S);

/// A state machine instance over a typed state
#[derive(Debug, Clone)]
pub struct Fsm<S: StateTransitions> {
    current: S,
    history: SmallVec<[HistoryEntry<S>; HISTORY_LIMIT]>,
}

impl<S: StateTransitions + Default> Default for Fsm<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: StateTransitions> Fsm<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            history: SmallVec::new(),
        }
    }

    /// Get the current state
    pub fn current(&self) -> S {
        self.current
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current == state
    }

    /// Check if an event can trigger a transition from current state
    pub fn can_send(&self, event: EventType) -> bool {
        self.current.on_event(event).is_some()
    }

    /// Send an event, returning `(from, to)` if a transition happened
    pub fn send(&mut self, event: EventType) -> Option<(S, S)> {
        let from = self.current;
        let to = from.on_event(event)?;
        self.commit(from, event, to);
        Some((from, to))
    }

    /// Move to `state` regardless of the transition table
    ///
    /// Returns the previous state. Forcing into the current state is a no-op
    /// and is not recorded.
    pub fn force(&mut self, event: EventType, state: S) -> S {
        let from = self.current;
        if from != state {
            self.commit(from, event, state);
        }
        from
    }

    /// Get transition history, oldest first
    pub fn history(&self) -> &[HistoryEntry<S>] {
        &self.history
    }

    /// Clear transition history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn commit(&mut self, from: S, event: EventType, to: S) {
        self.current = to;
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push((from, event, to));
        tracing::trace!(?from, ?to, event, "fsm transition");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    enum Light {
        #[default]
        Off,
        Warming,
        On,
    }

    const SWITCH: EventType = 1;
    const READY: EventType = 2;
    const CUT: EventType = 3;

    impl StateTransitions for Light {
        fn on_event(&self, event: EventType) -> Option<Self> {
            match (self, event) {
                (Light::Off, SWITCH) => Some(Light::Warming),
                (Light::Warming, READY) => Some(Light::On),
                (Light::On, SWITCH) => Some(Light::Off),
                _ => None,
            }
        }
    }

    #[test]
    fn test_simple_transitions() {
        let mut fsm = Fsm::<Light>::default();
        assert_eq!(fsm.current(), Light::Off);

        assert_eq!(fsm.send(SWITCH), Some((Light::Off, Light::Warming)));
        assert_eq!(fsm.send(READY), Some((Light::Warming, Light::On)));
        assert!(fsm.is_in(Light::On));

        fsm.send(SWITCH);
        assert_eq!(fsm.current(), Light::Off);
    }

    #[test]
    fn test_invalid_event_no_transition() {
        let mut fsm = Fsm::new(Light::Off);

        // READY is not valid while Off
        assert_eq!(fsm.send(READY), None);
        assert_eq!(fsm.current(), Light::Off);
        assert!(fsm.history().is_empty());
    }

    #[test]
    fn test_can_send() {
        let fsm = Fsm::new(Light::Warming);
        assert!(fsm.can_send(READY));
        assert!(!fsm.can_send(SWITCH));
    }

    #[test]
    fn test_force_bypasses_table() {
        let mut fsm = Fsm::new(Light::Warming);

        assert_eq!(fsm.force(CUT, Light::Off), Light::Warming);
        assert_eq!(fsm.current(), Light::Off);
        assert_eq!(fsm.history(), &[(Light::Warming, CUT, Light::Off)]);

        // Forcing into the current state records nothing
        fsm.force(CUT, Light::Off);
        assert_eq!(fsm.history().len(), 1);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut fsm = Fsm::new(Light::Off);
        for _ in 0..HISTORY_LIMIT {
            fsm.send(SWITCH);
            fsm.send(READY);
            fsm.send(SWITCH);
        }

        let history = fsm.history();
        assert_eq!(history.len(), HISTORY_LIMIT);
        // The most recent transition is always last
        assert_eq!(history[HISTORY_LIMIT - 1], (Light::On, SWITCH, Light::Off));
        assert!(!fsm.history.spilled());

        fsm.clear_history();
        assert!(fsm.history().is_empty());
    }
}
