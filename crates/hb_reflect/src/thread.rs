use core::fmt;
use core::marker::PhantomData;
use std::thread::{self, ThreadId};

/// Proof that the caller runs on the host's designated main thread.
///
/// Live host objects may only be inspected or mutated on that thread. The
/// host captures the token once, on the right thread, and hands a reference
/// to every serialize or populate call. The token is neither `Send` nor
/// `Sync`, so it cannot leave the thread that captured it.
///
/// # Examples
///
/// ```
/// use hb_reflect::MainThread;
///
/// let main = MainThread::current();
/// assert!(main.is_current());
///
/// let handle = main.thread_id();
/// std::thread::spawn(move || {
///     assert_ne!(std::thread::current().id(), handle);
/// }).join().unwrap();
/// ```
#[derive(Clone)]
pub struct MainThread {
    id: ThreadId,
    _not_send: PhantomData<*const ()>,
}

impl MainThread {
    /// Captures the calling thread as the main thread.
    pub fn current() -> Self {
        Self {
            id: thread::current().id(),
            _not_send: PhantomData,
        }
    }

    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.id
    }

    /// Returns `true` if the running thread is the captured one.
    #[inline]
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.id
    }

    /// Panics in debug builds when called off the main thread.
    #[inline]
    #[track_caller]
    pub fn assert_current(&self) {
        debug_assert!(
            self.is_current(),
            "live host objects touched off the main thread ({:?})",
            self.id
        );
    }
}

impl fmt::Debug for MainThread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MainThread").field(&self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::MainThread;

    #[test]
    fn other_thread_is_not_current() {
        let main = MainThread::current();
        let id = main.thread_id();
        let other = std::thread::spawn(move || std::thread::current().id() == id)
            .join()
            .unwrap();
        assert!(main.is_current());
        assert!(!other);
    }
}
