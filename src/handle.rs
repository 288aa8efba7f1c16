use {
    crate::{
        error::Error,
        sync::{Lock, Ptr},
    },
    std::{
        fmt::{self, Debug},
        future::Future,
        hash::{Hash, Hasher},
        mem::take,
        pin::Pin,
        task::{Context, Poll, Waker},
    },
};

/// Handle for an injected reference that eventually
/// resolves to `Ok(())` once host reports it loaded, or an error.
///
/// `Handle` implements `Future`, but semantically it is just a pointer
/// to the place where outcome will be written.
/// Polling `Handle` isn't necessary for the reference to be loaded.
/// When outcome is finally known any task that polled `Handle` will be notified.
/// All clones observe the same single outcome.
#[derive(Clone)]
pub struct Handle {
    state: Ptr<Lock<State>>,
}

struct State {
    result: Option<Result<(), Error>>,
    wakers: Vec<Waker>,
}

/// Write side of a [`Handle`].
///
/// Consumed on resolution, so outcome is written at most once.
/// Dropping unresolved `Resolver` resolves handle with [`Error::Interrupted`].
pub struct Resolver {
    handle: Option<Handle>,
}

impl Handle {
    /// Returns pending handle and its resolver.
    pub fn pending() -> (Handle, Resolver) {
        let handle = Handle {
            state: Ptr::new(Lock::new(State {
                result: None,
                wakers: Vec::new(),
            })),
        };
        let resolver = Resolver {
            handle: Some(handle.clone()),
        };
        (handle, resolver)
    }

    /// Returns handle that is already resolved with `result`.
    pub fn ready(result: Result<(), Error>) -> Handle {
        let (handle, resolver) = Handle::pending();
        resolver.resolve(result);
        handle
    }

    fn set(&self, result: Result<(), Error>) {
        let mut lock = self.state.lock();
        debug_assert!(lock.result.is_none(), "Handle resolved twice");
        if lock.result.is_some() {
            return;
        }
        lock.result = Some(result);
        let wakers = take(&mut lock.wakers);
        drop(lock);
        wakers.into_iter().for_each(Waker::wake);
    }

    /// Queries for the outcome.
    /// Returns `Poll::Ready(Ok(()))` if reference was successfully loaded.
    /// Returns `Poll::Ready(Err(error))` if error occured.
    /// Otherwise returns `Poll::Pending`.
    pub fn query(&self) -> Poll<Result<(), Error>> {
        match &self.state.lock().result {
            Some(result) => Poll::Ready(result.clone()),
            None => Poll::Pending,
        }
    }

    /// Returns `true` if outcome is known.
    pub fn is_resolved(&self) -> bool {
        self.state.lock().result.is_some()
    }
}

impl Future for Handle {
    type Output = Result<(), Error>;

    fn poll(self: Pin<&mut Self>, ctx: &mut Context<'_>) -> Poll<Result<(), Error>> {
        let mut lock = self.state.lock();
        match &lock.result {
            Some(result) => Poll::Ready(result.clone()),
            None => {
                let waker = ctx.waker();
                if let Some(pos) = lock.wakers.iter().position(|w| w.will_wake(waker)) {
                    lock.wakers[pos] = waker.clone();
                } else {
                    lock.wakers.push(waker.clone());
                }
                Poll::Pending
            }
        }
    }
}

impl Debug for Handle {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Handle")
            .field("result", &self.query())
            .finish()
    }
}

impl Eq for Handle {}

impl PartialEq for Handle {
    fn eq(&self, rhs: &Self) -> bool {
        Ptr::ptr_eq(&self.state, &rhs.state)
    }
}

impl Hash for Handle {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        Ptr::as_ptr(&self.state).hash(state)
    }
}

impl Resolver {
    /// Writes outcome and wakes all tasks awaiting the handle.
    pub fn resolve(mut self, result: Result<(), Error>) {
        if let Some(handle) = self.handle.take() {
            handle.set(result);
        }
    }
}

impl Debug for Resolver {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str("Resolver")
    }
}

impl Drop for Resolver {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.set(Err(Error::Interrupted));
        }
    }
}

/// Resolver shared by several host signals, first one wins.
///
/// Keeps guard `G` alive until outcome is written, then drops it.
/// Used to hold event listeners that must be released
/// regardless of which event fired.
#[cfg_attr(not(all(feature = "web", target_arch = "wasm32")), allow(dead_code))]
pub(crate) struct Watch<G> {
    slot: Ptr<Lock<Option<(Resolver, Option<G>)>>>,
}

impl<G> Clone for Watch<G> {
    fn clone(&self) -> Self {
        Watch {
            slot: self.slot.clone(),
        }
    }
}

#[cfg_attr(not(all(feature = "web", target_arch = "wasm32")), allow(dead_code))]
impl<G> Watch<G> {
    pub(crate) fn new(resolver: Resolver) -> Self {
        Watch {
            slot: Ptr::new(Lock::new(Some((resolver, None)))),
        }
    }

    /// Stores guard until outcome is written.
    /// Drops it right away if outcome is already known.
    pub(crate) fn keep(&self, guard: G) {
        let mut lock = self.slot.lock();
        match &mut *lock {
            Some((_, slot)) => *slot = Some(guard),
            None => {
                drop(lock);
                drop(guard);
            }
        }
    }

    /// Writes outcome unless some signal already did.
    /// Returns `false` in the latter case.
    pub(crate) fn settle(&self, result: Result<(), Error>) -> bool {
        let taken = self.slot.lock().take();
        match taken {
            Some((resolver, guard)) => {
                resolver.resolve(result);
                drop(guard);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        futures_executor::block_on,
        futures_task::ArcWake,
        std::sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    struct CountWake(AtomicUsize);

    impl ArcWake for CountWake {
        fn wake_by_ref(arc_self: &Arc<Self>) {
            arc_self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn pending_until_resolved() {
        let (handle, resolver) = Handle::pending();
        assert!(handle.query().is_pending());
        assert!(!handle.is_resolved());

        let count = Arc::new(CountWake(AtomicUsize::new(0)));
        let waker = futures_task::waker(count.clone());
        let mut ctx = Context::from_waker(&waker);

        let mut fut = handle.clone();
        assert!(Pin::new(&mut fut).poll(&mut ctx).is_pending());
        // Same waker is registered once.
        assert!(Pin::new(&mut fut).poll(&mut ctx).is_pending());

        resolver.resolve(Ok(()));
        assert_eq!(count.0.load(Ordering::SeqCst), 1);
        assert!(matches!(handle.query(), Poll::Ready(Ok(()))));
        assert!(block_on(fut).is_ok());
    }

    #[test]
    fn dropped_resolver_interrupts() {
        let (handle, resolver) = Handle::pending();
        drop(resolver);
        assert!(matches!(block_on(handle), Err(Error::Interrupted)));
    }

    #[test]
    fn clones_share_outcome() {
        let (handle, resolver) = Handle::pending();
        let other = handle.clone();
        assert_eq!(handle, other);
        assert_ne!(handle, Handle::ready(Ok(())));

        resolver.resolve(Err(Error::load(&"a.js".into())));
        assert!(matches!(block_on(handle), Err(Error::Load { .. })));
        assert!(matches!(block_on(other), Err(Error::Load { .. })));
    }

    struct Guard(std::rc::Rc<std::cell::Cell<usize>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn watch_first_signal_wins_and_releases_guard() {
        let drops = std::rc::Rc::new(std::cell::Cell::new(0));
        let (handle, resolver) = Handle::pending();
        let watch = Watch::new(resolver);
        watch.keep(Guard(drops.clone()));

        let other = watch.clone();
        assert!(watch.settle(Ok(())));
        assert_eq!(drops.get(), 1);

        assert!(!other.settle(Err(Error::Interrupted)));
        assert!(matches!(block_on(handle), Ok(())));

        // Guard kept after outcome is released immediately.
        other.keep(Guard(drops.clone()));
        assert_eq!(drops.get(), 2);
    }
}
