// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped ownership of host observers (resize and scroll listeners).

use alloc::boxed::Box;
use core::fmt;

/// A registered host observer, released exactly once.
///
/// Hosts hand the grid a `Subscription` whose release callback detaches the
/// observer (for example disconnecting a resize observer or removing a scroll
/// listener). The callback runs on [`Subscription::release`] or on drop,
/// whichever comes first, so tearing the grid down releases every observer no
/// matter how teardown happens.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wraps a release callback.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release.
    #[must_use]
    pub const fn empty() -> Self {
        Self { release: None }
    }

    /// Returns `true` while the release callback has not run.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Runs the release callback now. Later calls (and drop) do nothing.
    pub fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::Cell;

    use super::Subscription;

    #[test]
    fn releases_once_on_drop() {
        let released = Rc::new(Cell::new(0));
        {
            let released = released.clone();
            let _sub = Subscription::new(move || released.set(released.get() + 1));
        }
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn explicit_release_wins_over_drop() {
        let released = Rc::new(Cell::new(0));
        let mut sub = {
            let released = released.clone();
            Subscription::new(move || released.set(released.get() + 1))
        };
        assert!(sub.is_active());
        sub.release();
        sub.release();
        assert!(!sub.is_active());
        drop(sub);
        assert_eq!(released.get(), 1);
    }
}
