//! A deferred write completion.
//!
//! §5 requires that "writes return deferred completions" without the engine
//! ever blocking. Since nothing here is ever polled by an executor,
//! `Completion` is a minimal synchronous analogue to a real future: a write
//! hands back a `CompletionHandle`, the codec or flow controller resolves it
//! later (possibly before returning, for a reference implementation backed
//! by an in-memory buffer), and the gate or test harness observes the
//! result via callback or by polling `is_ready`.

use std::sync::{Arc, Mutex};

use crate::error::Error;

enum State {
    Pending(Vec<Box<dyn FnOnce(Result<(), Error>) + Send>>),
    Done(Result<(), Error>),
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Pending(callbacks) => f
                .debug_tuple("Pending")
                .field(&callbacks.len())
                .finish(),
            State::Done(result) => f.debug_tuple("Done").field(result).finish(),
        }
    }
}

/// The write side of a deferred completion: resolved exactly once.
#[derive(Clone)]
pub struct Completion {
    state: Arc<Mutex<State>>,
}

/// The read side: observed by whoever needs to react to a write's outcome.
#[derive(Clone)]
pub struct CompletionHandle {
    state: Arc<Mutex<State>>,
}

/// Creates a linked completion/handle pair. `complete` resolves the
/// completion; `on_done` on the handle either fires immediately (already
/// resolved) or is queued and fired exactly once, in registration order.
pub fn pair() -> (Completion, CompletionHandle) {
    let state = Arc::new(Mutex::new(State::Pending(Vec::new())));
    (
        Completion {
            state: state.clone(),
        },
        CompletionHandle { state },
    )
}

impl Completion {
    /// Resolves this completion. A second call is a no-op: a write
    /// completes exactly once.
    pub fn complete(self, result: Result<(), Error>) {
        let callbacks = {
            let mut guard = self.state.lock().unwrap();
            match std::mem::replace(&mut *guard, State::Done(result.clone())) {
                State::Pending(callbacks) => callbacks,
                State::Done(prev) => {
                    // Already resolved; restore and drop this call silently.
                    *guard = State::Done(prev);
                    return;
                }
            }
        };
        for cb in callbacks {
            cb(result.clone());
        }
    }

    pub fn succeed(self) {
        self.complete(Ok(()))
    }

    pub fn fail(self, err: Error) {
        self.complete(Err(err))
    }
}

impl CompletionHandle {
    /// Registers `f` to run once this completion resolves. Runs inline if
    /// already resolved.
    pub fn on_done<F>(&self, f: F)
    where
        F: FnOnce(Result<(), Error>) + Send + 'static,
    {
        let mut guard = self.state.lock().unwrap();
        match &mut *guard {
            State::Pending(callbacks) => callbacks.push(Box::new(f)),
            State::Done(result) => {
                let result = result.clone();
                drop(guard);
                f(result);
            }
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(&*self.state.lock().unwrap(), State::Done(_))
    }

    /// Returns the result if already resolved, without blocking.
    pub fn try_result(&self) -> Option<Result<(), Error>> {
        match &*self.state.lock().unwrap() {
            State::Done(result) => Some(result.clone()),
            State::Pending(_) => None,
        }
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion").finish()
    }
}

impl std::fmt::Debug for CompletionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionHandle")
            .field("done", &self.is_done())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolves_immediately_visible_to_late_subscriber() {
        let (tx, rx) = pair();
        tx.succeed();
        assert!(rx.is_done());
        assert_eq!(rx.try_result(), Some(Ok(())));
    }

    #[test]
    fn queued_callback_fires_once_on_completion() {
        let (tx, rx) = pair();
        let seen = Arc::new(Mutex::new(false));
        let seen2 = seen.clone();
        rx.on_done(move |res| {
            assert!(res.is_ok());
            *seen2.lock().unwrap() = true;
        });
        assert!(!*seen.lock().unwrap());
        tx.succeed();
        assert!(*seen.lock().unwrap());
    }

    #[test]
    fn second_complete_call_is_ignored() {
        let (tx, rx) = pair();
        let tx2 = tx.clone();
        tx.succeed();
        tx2.fail(Error::internal("late"));
        assert_eq!(rx.try_result(), Some(Ok(())));
    }
}
