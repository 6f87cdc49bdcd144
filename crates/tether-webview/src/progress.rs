//! Gate that separates host-issued navigation from organic browsing.

use tracing::trace;

/// While suppressing, progress events are dropped outright. The host
/// already knows where its own `loadUrl` command is going.
#[derive(Debug, Default)]
pub struct ProgressGate {
    suppressing: bool,
    dropped: u64,
}

impl ProgressGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Armed right before a navigation command is issued, cleared once the
    /// engine acknowledges the load started.
    pub fn set_suppressing(&mut self, suppressing: bool) {
        self.suppressing = suppressing;
    }

    pub fn is_suppressing(&self) -> bool {
        self.suppressing
    }

    /// Returns whether a progress event may be forwarded, counting drops.
    pub fn admit(&mut self) -> bool {
        if self.suppressing {
            self.dropped += 1;
            trace!(dropped = self.dropped, "progress event suppressed");
            false
        } else {
            true
        }
    }

    /// Progress events swallowed over the gate's lifetime.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_by_default() {
        let mut gate = ProgressGate::new();
        assert!(!gate.is_suppressing());
        assert!(gate.admit());
    }

    #[test]
    fn suppressing_drops_every_event() {
        let mut gate = ProgressGate::new();
        gate.set_suppressing(true);
        let admitted = (0..100).filter(|_| gate.admit()).count();
        assert_eq!(admitted, 0);
        assert_eq!(gate.dropped(), 100);
    }

    #[test]
    fn clearing_forwards_every_event() {
        let mut gate = ProgressGate::new();
        gate.set_suppressing(true);
        gate.set_suppressing(false);
        let admitted = (0..100).filter(|_| gate.admit()).count();
        assert_eq!(admitted, 100);
        assert_eq!(gate.dropped(), 0);
    }
}
