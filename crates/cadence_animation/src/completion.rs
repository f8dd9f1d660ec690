//! One-shot completion signals
//!
//! A [`Resolver`] settles a value exactly once; every clone of the paired
//! [`Completion`] observes it, either by polling [`Completion::value`] from
//! a frame loop or by awaiting it as a future.

use smallvec::SmallVec;
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// How a tween's run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every pass of the step queue ran to the end
    Finished,
    /// `stop()` was called (or the run was superseded by a restart)
    Stopped,
}

struct Slot<T> {
    value: Option<T>,
    wakers: SmallVec<[Waker; 1]>,
}

/// Create a connected resolver/completion pair
pub fn completion<T>() -> (Resolver<T>, Completion<T>) {
    let slot = Rc::new(RefCell::new(Slot {
        value: None,
        wakers: SmallVec::new(),
    }));
    (
        Resolver {
            slot: Rc::clone(&slot),
        },
        Completion { slot },
    )
}

/// The settling side of a [`Completion`]
pub struct Resolver<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Resolver<T> {
    /// Settle with `value`.
    ///
    /// Returns `false` if the completion had already been settled; the first
    /// value wins.
    pub fn resolve(&self, value: T) -> bool {
        let wakers = {
            let mut slot = self.slot.borrow_mut();
            if slot.value.is_some() {
                return false;
            }
            slot.value = Some(value);
            std::mem::take(&mut slot.wakers)
        };
        for waker in wakers {
            waker.wake();
        }
        true
    }

    pub fn is_settled(&self) -> bool {
        self.slot.borrow().value.is_some()
    }
}

/// The observing side of a one-shot signal
pub struct Completion<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for Completion<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T> Completion<T> {
    /// A completion that is already settled
    pub fn ready(value: T) -> Self {
        let (resolver, completion) = completion();
        resolver.resolve(value);
        completion
    }

    pub fn is_settled(&self) -> bool {
        self.slot.borrow().value.is_some()
    }
}

impl<T: Clone> Completion<T> {
    pub fn value(&self) -> Option<T> {
        self.slot.borrow().value.clone()
    }
}

impl<T: Clone> Future for Completion<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut slot = self.slot.borrow_mut();
        if let Some(value) = &slot.value {
            return Poll::Ready(value.clone());
        }
        if !slot.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            slot.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

impl<T> std::fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("settled", &self.is_settled())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::future::Future;
    use std::pin::pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::task::{Context, Poll, Wake, Waker};

    /// Waker that only counts how often it was woken
    #[derive(Default)]
    pub struct CountingWaker {
        pub wakes: AtomicUsize,
    }

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.wakes.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Poll a future once with a counting waker
    pub fn poll_once<F: Future>(future: F) -> (Poll<F::Output>, Arc<CountingWaker>) {
        let counter = Arc::new(CountingWaker::default());
        let waker = Waker::from(Arc::clone(&counter));
        let mut cx = Context::from_waker(&waker);
        let future = pin!(future);
        (future.poll(&mut cx), counter)
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::CountingWaker;
    use super::*;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    #[test]
    fn test_first_resolve_wins() {
        let (resolver, done) = completion();
        assert!(!done.is_settled());
        assert!(resolver.resolve(Outcome::Finished));
        assert!(!resolver.resolve(Outcome::Stopped));
        assert_eq!(done.value(), Some(Outcome::Finished));
    }

    #[test]
    fn test_clones_observe_the_same_value() {
        let (resolver, done) = completion();
        let other = done.clone();
        resolver.resolve(7u32);
        assert_eq!(other.value(), Some(7));
    }

    #[test]
    fn test_future_wakes_on_resolve() {
        let (resolver, done) = completion::<()>();
        let mut done = done;

        let counter = Arc::new(CountingWaker::default());
        let waker = Waker::from(Arc::clone(&counter));
        let mut cx = Context::from_waker(&waker);

        assert!(Pin::new(&mut done).poll(&mut cx).is_pending());
        // Polling again with the same waker does not register it twice
        assert!(Pin::new(&mut done).poll(&mut cx).is_pending());

        resolver.resolve(());
        assert_eq!(counter.wakes.load(Ordering::SeqCst), 1);
        assert_eq!(Pin::new(&mut done).poll(&mut cx), Poll::Ready(()));
    }

    #[test]
    fn test_ready() {
        let done = Completion::ready(Outcome::Stopped);
        assert!(done.is_settled());
        assert_eq!(done.value(), Some(Outcome::Stopped));
    }
}
