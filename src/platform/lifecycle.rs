//! Mount bookkeeping shared by hosts
//!
//! Tracks the outstanding animation-frame request and every attached
//! listener. `teardown` hands both back exactly once so the host can cancel
//! and detach them; afterwards new requests and listeners are refused.

/// What a host must undo when unmounting
#[derive(Debug, PartialEq)]
pub struct Teardown<L> {
    /// Frame request still outstanding, to be cancelled
    pub cancel_frame: Option<i32>,
    /// Listeners still attached, to be detached
    pub listeners: Vec<L>,
}

impl<L> Teardown<L> {
    pub fn is_empty(&self) -> bool {
        self.cancel_frame.is_none() && self.listeners.is_empty()
    }
}

/// Frame and listener state of one mount
#[derive(Debug)]
pub struct Lifecycle<L> {
    active: bool,
    pending_frame: Option<i32>,
    listeners: Vec<L>,
}

impl<L> Default for Lifecycle<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> Lifecycle<L> {
    pub fn new() -> Self {
        Self {
            active: true,
            pending_frame: None,
            listeners: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pending_frame(&self) -> Option<i32> {
        self.pending_frame
    }

    pub fn listeners(&self) -> &[L] {
        &self.listeners
    }

    /// Record an attached listener; after teardown it is handed back to be
    /// detached by the caller
    pub fn attach(&mut self, listener: L) -> Result<(), L> {
        if !self.active {
            return Err(listener);
        }
        self.listeners.push(listener);
        Ok(())
    }

    /// Record a frame request; false after teardown, in which case the
    /// caller cancels `id` itself
    pub fn frame_requested(&mut self, id: i32) -> bool {
        if !self.active {
            return false;
        }
        self.pending_frame = Some(id);
        true
    }

    /// A frame callback fired; returns whether it should render
    pub fn begin_frame(&mut self) -> bool {
        self.pending_frame = None;
        self.active
    }

    /// Stop the mount, returning everything still outstanding
    ///
    /// Repeat calls return an empty teardown.
    pub fn teardown(&mut self) -> Teardown<L> {
        if self.active {
            log::debug!(
                "Tearing down: frame {:?}, {} listeners",
                self.pending_frame,
                self.listeners.len()
            );
        }
        self.active = false;
        Teardown {
            cancel_frame: self.pending_frame.take(),
            listeners: std::mem::take(&mut self.listeners),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [&str; 5] = ["pointerdown", "pointermove", "pointerup", "pointerout", "resize"];

    fn mounted() -> Lifecycle<&'static str> {
        let mut lifecycle = Lifecycle::new();
        for kind in KINDS {
            lifecycle.attach(kind).unwrap();
        }
        lifecycle
    }

    #[test]
    fn test_frames_rerequest_while_active() {
        let mut lifecycle = mounted();
        assert!(lifecycle.frame_requested(1));
        assert_eq!(lifecycle.pending_frame(), Some(1));

        assert!(lifecycle.begin_frame());
        assert_eq!(lifecycle.pending_frame(), None);
        assert!(lifecycle.frame_requested(2));
        assert_eq!(lifecycle.pending_frame(), Some(2));
    }

    #[test]
    fn test_teardown_cancels_frame_and_detaches_everything() {
        let mut lifecycle = mounted();
        lifecycle.frame_requested(7);

        let teardown = lifecycle.teardown();
        assert_eq!(teardown.cancel_frame, Some(7));
        assert_eq!(teardown.listeners, KINDS.to_vec());

        assert!(!lifecycle.is_active());
        assert_eq!(lifecycle.pending_frame(), None);
        assert!(lifecycle.listeners().is_empty());
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut lifecycle = mounted();
        lifecycle.frame_requested(3);
        assert!(!lifecycle.teardown().is_empty());
        assert!(lifecycle.teardown().is_empty());
    }

    #[test]
    fn test_nothing_is_tracked_after_teardown() {
        let mut lifecycle = mounted();
        lifecycle.frame_requested(4);
        lifecycle.teardown();

        // A callback already queued by the browser fires late
        assert!(!lifecycle.begin_frame());
        assert!(!lifecycle.frame_requested(5));
        assert_eq!(lifecycle.pending_frame(), None);
        assert_eq!(lifecycle.attach("resize"), Err("resize"));
        assert!(lifecycle.listeners().is_empty());
    }

    #[test]
    fn test_teardown_without_pending_frame() {
        let mut lifecycle = mounted();
        lifecycle.frame_requested(9);
        lifecycle.begin_frame();

        let teardown = lifecycle.teardown();
        assert_eq!(teardown.cancel_frame, None);
        assert_eq!(teardown.listeners.len(), KINDS.len());
    }
}
