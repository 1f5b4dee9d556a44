//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use roster_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// Several actions may be queued with repeated `when_action` calls. They are
/// reduced in order against the same state; effect assertions see the effects
/// of the last one only.
///
/// # Example
///
/// ```ignore
/// use roster_testing::ReducerTest;
///
/// ReducerTest::new(RosterReducer::new())
///     .with_env(test_environment())
///     .given_state(RosterState::new(catalog))
///     .when_action(RosterAction::ResetSession)
///     .then_state(|state| {
///         assert_eq!(state.session.count(), 0);
///     })
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Queue an action to reduce (When)
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the resulting effects (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        let mut effects = Vec::new();
        for action in self.actions {
            effects = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }

        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertions;
    use roster_core::{SmallVec, smallvec};

    #[derive(Clone, Debug)]
    struct TallyState {
        total: u32,
    }

    #[derive(Clone, Debug)]
    enum TallyAction {
        Add(u32),
        Clear,
    }

    struct TallyReducer;

    struct TallyEnv;

    impl Reducer for TallyReducer {
        type State = TallyState;
        type Action = TallyAction;
        type Environment = TallyEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TallyAction::Add(n) => {
                    state.total += n;
                    smallvec![Effect::None]
                },
                TallyAction::Clear => {
                    state.total = 0;
                    smallvec![Effect::None, Effect::None]
                },
            }
        }
    }

    #[test]
    fn test_single_action() {
        ReducerTest::new(TallyReducer)
            .with_env(TallyEnv)
            .given_state(TallyState { total: 0 })
            .when_action(TallyAction::Add(3))
            .then_state(|state| {
                assert_eq!(state.total, 3);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_actions_reduce_in_order() {
        ReducerTest::new(TallyReducer)
            .with_env(TallyEnv)
            .given_state(TallyState { total: 10 })
            .when_action(TallyAction::Clear)
            .when_action(TallyAction::Add(2))
            .then_state(|state| {
                assert_eq!(state.total, 2);
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }
}
