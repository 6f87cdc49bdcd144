use super::HostPermissionId;

/// Permission ids waiting for the capture prompt to free up.
///
/// Append-only while a prompt is on screen; emptied in one piece once it
/// resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingPermissionQueue {
    ids: Vec<HostPermissionId>,
}

impl PendingPermissionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, ids: &[HostPermissionId]) {
        self.ids.extend_from_slice(ids);
    }

    /// Take everything, preserving arrival order.
    pub fn drain_all(&mut self) -> Vec<HostPermissionId> {
        std::mem::take(&mut self.ids)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn as_slice(&self) -> &[HostPermissionId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_in_arrival_order_and_empties() {
        let mut q = PendingPermissionQueue::new();
        q.extend(&[HostPermissionId::Camera]);
        q.extend(&[HostPermissionId::RecordAudio, HostPermissionId::Camera]);
        assert_eq!(q.len(), 3);

        let drained = q.drain_all();
        assert_eq!(
            drained,
            vec![
                HostPermissionId::Camera,
                HostPermissionId::RecordAudio,
                HostPermissionId::Camera
            ]
        );
        assert!(q.is_empty());
    }
}
