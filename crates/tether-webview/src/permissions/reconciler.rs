use std::collections::{BTreeSet, VecDeque};

use tether_config::schema::PermissionsConfig;
use tracing::{debug, info, warn};

use crate::host::PermissionHost;

use super::{
    CaptureResponder, ContentCapability, GeolocationCallback, HostPermissionId,
    PendingPermissionQueue,
};

/// Where a permission slot stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotPhase {
    #[default]
    Idle,
    AwaitingPrompt,
    /// The last prompt for this slot was answered.
    Resolved,
}

/// What happened to a newly received request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Answered synchronously without showing anything.
    Answered,
    /// An OS prompt was shown for these ids.
    Prompted(Vec<HostPermissionId>),
    /// A prompt for the same class is on screen; these ids wait their turn.
    Queued(Vec<HostPermissionId>),
    /// A location prompt is already on screen; this origin waits on its answer.
    Joined,
}

/// How one capability is obtained.
enum Mapping {
    GrantNow,
    Unmapped,
    Host(HostPermissionId),
}

struct CaptureRequest {
    requested: BTreeSet<ContentCapability>,
    required: Vec<HostPermissionId>,
    granted: BTreeSet<ContentCapability>,
    responder: CaptureResponder,
}

impl CaptureRequest {
    fn respond(self) {
        let granted: Vec<ContentCapability> = self.granted.into_iter().collect();
        (self.responder)(granted);
    }
}

#[derive(Default)]
struct CaptureSlot {
    phase: SlotPhase,
    in_flight: Vec<CaptureRequest>,
    deferred: VecDeque<CaptureRequest>,
    pending: PendingPermissionQueue,
}

struct GeolocationWaiter {
    origin: String,
    callback: GeolocationCallback,
}

#[derive(Default)]
struct GeolocationSlot {
    phase: SlotPhase,
    waiters: Vec<GeolocationWaiter>,
}

/// Serializes page permission requests onto the OS permission subsystem.
///
/// Capture-class requests (audio, video, protected media) and geolocation
/// each have their own slot. Within a slot only one prompt is on screen at a
/// time; later capture requests park their ids in the pending queue and are
/// replayed once the prompt resolves.
///
/// All methods take `&mut self` and must run on the surface's UI context.
pub struct PermissionReconciler {
    allows_protected_media: bool,
    geolocation_enabled: bool,
    capture: CaptureSlot,
    geolocation: GeolocationSlot,
    /// Ids the user refused on the current page. Never prompted again until
    /// the page reloads.
    denied: BTreeSet<HostPermissionId>,
}

impl PermissionReconciler {
    pub fn new(allows_protected_media: bool, geolocation_enabled: bool) -> Self {
        Self {
            allows_protected_media,
            geolocation_enabled,
            capture: CaptureSlot::default(),
            geolocation: GeolocationSlot::default(),
            denied: BTreeSet::new(),
        }
    }

    pub fn from_config(config: &PermissionsConfig) -> Self {
        Self::new(config.allows_protected_media, config.geolocation_enabled)
    }

    /// Does not revoke protected-media grants the current page already holds.
    pub fn set_allows_protected_media(&mut self, allowed: bool) {
        self.allows_protected_media = allowed;
    }

    pub fn set_geolocation_enabled(&mut self, enabled: bool) {
        self.geolocation_enabled = enabled;
    }

    pub fn capture_phase(&self) -> SlotPhase {
        self.capture.phase
    }

    pub fn geolocation_phase(&self) -> SlotPhase {
        self.geolocation.phase
    }

    pub fn pending_permissions(&self) -> &[HostPermissionId] {
        self.capture.pending.as_slice()
    }

    pub fn is_denied(&self, permission: HostPermissionId) -> bool {
        self.denied.contains(&permission)
    }

    /// A new page is loading; earlier refusals no longer apply.
    pub fn forget_denials(&mut self) {
        if !self.denied.is_empty() {
            debug!(denied = ?self.denied, "clearing page-scoped permission denials");
            self.denied.clear();
        }
    }

    /// A page asked for capture-class capabilities.
    pub fn on_permission_request(
        &mut self,
        host: &mut dyn PermissionHost,
        capabilities: impl IntoIterator<Item = ContentCapability>,
        responder: CaptureResponder,
    ) -> Admission {
        let mut request = CaptureRequest {
            requested: capabilities.into_iter().collect(),
            required: Vec::new(),
            granted: BTreeSet::new(),
            responder,
        };
        self.classify(&*host, &mut request);

        if request.required.is_empty() {
            debug!(granted = ?request.granted, "permission request answered without prompt");
            request.respond();
            return Admission::Answered;
        }

        let ids = request.required.clone();
        if self.capture.phase == SlotPhase::AwaitingPrompt {
            debug!(permissions = ?ids, "prompt on screen, queueing permissions");
            self.capture.pending.extend(&ids);
            self.capture.deferred.push_back(request);
            return Admission::Queued(ids);
        }

        self.capture.in_flight.push(request);
        self.show_capture_prompt(host, ids.clone());
        Admission::Prompted(ids)
    }

    /// A page asked for location access on behalf of `origin`.
    pub fn on_geolocation_prompt(
        &mut self,
        host: &mut dyn PermissionHost,
        origin: impl Into<String>,
        callback: GeolocationCallback,
    ) -> Admission {
        let origin = origin.into();
        let id = HostPermissionId::AccessFineLocation;

        if !self.geolocation_enabled || self.denied.contains(&id) {
            debug!(origin = %origin, "geolocation refused without prompt");
            callback(&origin, false, false);
            return Admission::Answered;
        }
        if host.is_granted(id) {
            callback(&origin, true, false);
            return Admission::Answered;
        }

        self.geolocation.waiters.push(GeolocationWaiter { origin, callback });
        if self.geolocation.phase == SlotPhase::AwaitingPrompt {
            return Admission::Joined;
        }

        self.geolocation.phase = SlotPhase::AwaitingPrompt;
        info!(permission = %id, "showing geolocation permission prompt");
        host.show_prompt(&[id]);
        Admission::Prompted(vec![id])
    }

    /// The OS answered a prompt.
    ///
    /// Returns the ids of a follow-up capture prompt if replaying the
    /// pending queue needed one.
    pub fn on_permission_result(
        &mut self,
        host: &mut dyn PermissionHost,
        results: &[(HostPermissionId, bool)],
    ) -> Option<Vec<HostPermissionId>> {
        let mut location_outcome = None;
        let mut capture_answered = false;

        for &(id, granted) in results {
            match id.capture_capability() {
                None => {
                    if self.geolocation.phase != SlotPhase::AwaitingPrompt {
                        warn!(permission = %id, "geolocation result with no prompt on screen; ignoring");
                        continue;
                    }
                    if !granted {
                        self.denied.insert(id);
                    }
                    location_outcome = Some(granted);
                }
                Some(capability) => {
                    if !self.is_prompting_for(id) {
                        warn!(permission = %id, "capture result for a permission not on screen; ignoring");
                        continue;
                    }
                    capture_answered = true;
                    if !granted {
                        self.denied.insert(id);
                        continue;
                    }
                    for request in &mut self.capture.in_flight {
                        if request.required.contains(&id) {
                            request.granted.insert(capability);
                        }
                    }
                }
            }
        }

        if let Some(granted) = location_outcome {
            self.resolve_geolocation(granted);
        }

        if !capture_answered {
            return None;
        }

        for request in self.capture.in_flight.drain(..) {
            request.respond();
        }
        self.capture.phase = SlotPhase::Resolved;
        self.flush_pending(host)
    }

    /// Surface torn down: drop every outstanding callback unanswered.
    pub fn teardown(&mut self) {
        let outstanding = self.capture.in_flight.len()
            + self.capture.deferred.len()
            + self.geolocation.waiters.len();
        if outstanding > 0 {
            debug!(outstanding, "dropping unanswered permission requests");
        }
        self.capture = CaptureSlot::default();
        self.geolocation = GeolocationSlot::default();
        self.denied.clear();
    }

    /// Whether the capture prompt on screen asked for `id`.
    fn is_prompting_for(&self, id: HostPermissionId) -> bool {
        self.capture.phase == SlotPhase::AwaitingPrompt
            && self
                .capture
                .in_flight
                .iter()
                .any(|r| r.required.contains(&id))
    }

    fn resolve_geolocation(&mut self, granted: bool) {
        for waiter in self.geolocation.waiters.drain(..) {
            debug!(origin = %waiter.origin, granted, "answering geolocation prompt");
            (waiter.callback)(&waiter.origin, granted, false);
        }
        self.geolocation.phase = SlotPhase::Resolved;
    }

    /// Replay everything that queued up behind the last prompt.
    ///
    /// Work-list loop: each parked request is classified again (the user may
    /// have just granted what it needs), fully granted ones are answered on
    /// the spot, and the rest share one new prompt.
    fn flush_pending(&mut self, host: &mut dyn PermissionHost) -> Option<Vec<HostPermissionId>> {
        let queued = self.capture.pending.drain_all();
        let mut work = std::mem::take(&mut self.capture.deferred);
        let mut batch = Vec::new();

        while let Some(mut request) = work.pop_front() {
            self.classify(&*host, &mut request);
            if request.required.is_empty() {
                request.respond();
            } else {
                batch.push(request);
            }
        }

        if batch.is_empty() {
            return None;
        }

        let still_required: BTreeSet<HostPermissionId> = batch
            .iter()
            .flat_map(|r| r.required.iter().copied())
            .collect();
        let mut ids: Vec<HostPermissionId> = Vec::new();
        for id in queued.into_iter().chain(still_required.iter().copied()) {
            if still_required.contains(&id) && !ids.contains(&id) {
                ids.push(id);
            }
        }

        self.capture.in_flight = batch;
        self.show_capture_prompt(host, ids.clone());
        Some(ids)
    }

    fn show_capture_prompt(&mut self, host: &mut dyn PermissionHost, ids: Vec<HostPermissionId>) {
        self.capture.phase = SlotPhase::AwaitingPrompt;
        info!(permissions = ?ids, "showing capture permission prompt");
        host.show_prompt(&ids);
    }

    /// Split a request's outstanding capabilities into already granted and
    /// still required host ids. Capabilities already in `granted` are kept.
    fn classify(&self, host: &dyn PermissionHost, request: &mut CaptureRequest) {
        request.required.clear();
        let outstanding: Vec<ContentCapability> = request
            .requested
            .difference(&request.granted)
            .copied()
            .collect();

        for capability in outstanding {
            match self.map_capability(capability) {
                Mapping::GrantNow => {
                    request.granted.insert(capability);
                }
                Mapping::Unmapped => {
                    debug!(%capability, "no host permission for capability; not granted");
                }
                Mapping::Host(id) if self.denied.contains(&id) => {
                    debug!(%capability, permission = %id, "previously denied; not granted");
                }
                Mapping::Host(id) => {
                    if host.is_granted(id) {
                        request.granted.insert(capability);
                    } else if !request.required.contains(&id) {
                        request.required.push(id);
                    }
                }
            }
        }
    }

    fn map_capability(&self, capability: ContentCapability) -> Mapping {
        match capability {
            ContentCapability::AudioCapture => Mapping::Host(HostPermissionId::RecordAudio),
            ContentCapability::VideoCapture => Mapping::Host(HostPermissionId::Camera),
            ContentCapability::ProtectedMediaId if self.allows_protected_media => {
                Mapping::GrantNow
            }
            ContentCapability::ProtectedMediaId | ContentCapability::MidiSysex => {
                Mapping::Unmapped
            }
        }
    }
}
