//! Single-Field Synchronizer
//!
//! A synchronizer is a state-transition function `(state, previous) ->
//! state`. The single-field form built by [`Synchronizer::new`] guards one
//! update function behind a list of declared dependency fields:
//!
//! 1. On invocation, every declared dependency is compared between the
//!    current and the previous state.
//!
//! 2. If none differ, the state passes through untouched and the update
//!    function is not invoked.
//!
//! 3. If at least one differs, the update function runs once against the
//!    current state and its result is returned.
//!
//! The update function receives the current state only, never the previous
//! one, and must be pure: same state in, same state out, no side effects.
//! An empty dependency list makes the synchronizer a permanent pass-through.

use smallvec::SmallVec;

use super::state::SyncState;

/// A state-transition function guarding derived-field recomputation.
///
/// Built either for a single field via [`Synchronizer::new`] or as an
/// ordered chain of many single-field synchronizers via
/// [`Synchronizer::compose`](Synchronizer::compose).
///
/// # Example
///
/// ```rust,ignore
/// let legal_age = Synchronizer::new(vec!["age"], |state: User| User {
///     legal_age: state.age >= 21,
///     ..state
/// });
///
/// // Runs the update only when `age` changed since `previous`.
/// let next = legal_age.run(state, &previous);
/// ```
pub struct Synchronizer<S> {
    run: Box<dyn Fn(S, &S) -> S + Send + Sync>,
}

impl<S> std::fmt::Debug for Synchronizer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizer").finish_non_exhaustive()
    }
}

impl<S: SyncState> Synchronizer<S> {
    /// Build a synchronizer that runs `update` whenever at least one of
    /// `dependencies` differs between the current and the previous state.
    pub fn new<F>(dependencies: impl IntoIterator<Item = S::Key>, update: F) -> Self
    where
        F: Fn(S) -> S + Send + Sync + 'static,
    {
        let dependencies: SmallVec<[S::Key; 4]> = dependencies.into_iter().collect();

        Self {
            run: Box::new(move |state, previous| {
                let should_run = dependencies
                    .iter()
                    .any(|key| state.field_differs(previous, key));

                if should_run {
                    update(state)
                } else {
                    state
                }
            }),
        }
    }

    /// Wrap a raw transition function.
    pub(super) fn from_fn<F>(run: F) -> Self
    where
        F: Fn(S, &S) -> S + Send + Sync + 'static,
    {
        Self { run: Box::new(run) }
    }

    /// Run the transition: returns the next state, or the incoming state
    /// untouched when no declared dependency changed.
    pub fn run(&self, state: S, previous: &S) -> S {
        (self.run)(state, previous)
    }
}
