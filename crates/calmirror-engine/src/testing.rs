//! In-memory connector fakes shared by the engine tests.
//!
//! `FakeSource` hands back whatever raw events a test loads into it, and
//! `FakeMirror` is a working in-memory mirror calendar: create assigns ids
//! and embeds the back-reference, update rewrites fields, delete removes.
//! Both can be told to fail, at the batch level or per item, to exercise the
//! fault paths.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use calmirror_connectors::{
    BoxFuture, ConnectorError, ConnectorResult, MirrorConnector, RawSourceEvent, SourceConnector,
    SourceSnapshot,
};
use calmirror_core::{CanonicalEvent, MirrorEvent, SyncWindow};

/// One mutation observed by the fake mirror, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MirrorOp {
    /// A create call, by subject.
    Create(String),
    /// An update call, by subject.
    Update(String),
    /// A delete call, by mirror id.
    Delete(String),
}

#[derive(Default)]
pub(crate) struct FakeSource {
    events: Mutex<Vec<RawSourceEvent>>,
    skipped: AtomicUsize,
    fail: AtomicBool,
}

impl FakeSource {
    pub(crate) fn with_events(events: Vec<RawSourceEvent>) -> Self {
        Self {
            events: Mutex::new(events),
            ..Self::default()
        }
    }

    pub(crate) fn set_events(&self, events: Vec<RawSourceEvent>) {
        *self.events.lock().unwrap() = events;
    }

    pub(crate) fn set_skipped(&self, skipped: usize) {
        self.skipped.store(skipped, Ordering::SeqCst);
    }

    pub(crate) fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl SourceConnector for FakeSource {
    fn name(&self) -> &str {
        "fake-source"
    }

    fn fetch_events(&self, _window: SyncWindow) -> BoxFuture<'_, ConnectorResult<SourceSnapshot>> {
        let result = if self.fail.load(Ordering::SeqCst) {
            Err(ConnectorError::network("source unreachable").with_connector("fake-source"))
        } else {
            Ok(
                SourceSnapshot::with_events(self.events.lock().unwrap().clone())
                    .with_skipped(self.skipped.load(Ordering::SeqCst)),
            )
        };
        Box::pin(async move { result })
    }
}

#[derive(Default)]
pub(crate) struct FakeMirror {
    events: Mutex<HashMap<String, MirrorEvent>>,
    ops: Mutex<Vec<MirrorOp>>,
    next_id: AtomicUsize,
    fail_list: AtomicBool,
    fail_subjects: Mutex<HashSet<String>>,
    fail_deletes: Mutex<HashSet<String>>,
}

impl FakeMirror {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Seeds the mirror with a pre-existing event.
    pub(crate) fn insert(&self, event: MirrorEvent) {
        self.events
            .lock()
            .unwrap()
            .insert(event.mirror_id.clone(), event);
    }

    pub(crate) fn events(&self) -> Vec<MirrorEvent> {
        self.events.lock().unwrap().values().cloned().collect()
    }

    /// Managed mirror events keyed by their back-reference.
    pub(crate) fn managed_by_source(&self) -> HashMap<String, MirrorEvent> {
        self.events
            .lock()
            .unwrap()
            .values()
            .filter_map(|e| e.source_ref.clone().map(|id| (id, e.clone())))
            .collect()
    }

    pub(crate) fn ops(&self) -> Vec<MirrorOp> {
        self.ops.lock().unwrap().clone()
    }

    pub(crate) fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Makes create/update calls for the given subject fail.
    pub(crate) fn fail_subject(&self, subject: impl Into<String>) {
        self.fail_subjects.lock().unwrap().insert(subject.into());
    }

    /// Makes delete calls for the given mirror id fail.
    pub(crate) fn fail_delete(&self, mirror_id: impl Into<String>) {
        self.fail_deletes.lock().unwrap().insert(mirror_id.into());
    }

    fn subject_fails(&self, subject: &str) -> bool {
        self.fail_subjects.lock().unwrap().contains(subject)
    }
}

impl MirrorConnector for FakeMirror {
    fn name(&self) -> &str {
        "fake-mirror"
    }

    fn list_events(
        &self,
        _calendar_id: &str,
        _window: SyncWindow,
    ) -> BoxFuture<'_, ConnectorResult<Vec<MirrorEvent>>> {
        let result = if self.fail_list.load(Ordering::SeqCst) {
            Err(ConnectorError::server("mirror listing failed").with_connector("fake-mirror"))
        } else {
            Ok(self.events())
        };
        Box::pin(async move { result })
    }

    fn create_event(
        &self,
        _calendar_id: &str,
        event: CanonicalEvent,
    ) -> BoxFuture<'_, ConnectorResult<String>> {
        self.ops
            .lock()
            .unwrap()
            .push(MirrorOp::Create(event.subject.clone()));
        let result = if self.subject_fails(&event.subject) {
            Err(ConnectorError::server("create rejected").with_connector("fake-mirror"))
        } else {
            let mirror_id = format!("g-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
            self.insert(MirrorEvent {
                mirror_id: mirror_id.clone(),
                source_ref: Some(event.source_id),
                subject: event.subject,
                location: event.location,
                description: event.description,
                start: event.start,
                end: event.end,
            });
            Ok(mirror_id)
        };
        Box::pin(async move { result })
    }

    fn update_event(
        &self,
        _calendar_id: &str,
        mirror_id: &str,
        event: CanonicalEvent,
    ) -> BoxFuture<'_, ConnectorResult<()>> {
        self.ops
            .lock()
            .unwrap()
            .push(MirrorOp::Update(event.subject.clone()));
        let result = if self.subject_fails(&event.subject) {
            Err(ConnectorError::server("update rejected").with_connector("fake-mirror"))
        } else {
            match self.events.lock().unwrap().get_mut(mirror_id) {
                Some(existing) => {
                    existing.subject = event.subject;
                    existing.location = event.location;
                    existing.description = event.description;
                    existing.start = event.start;
                    existing.end = event.end;
                    Ok(())
                }
                None => Err(ConnectorError::not_found(format!(
                    "no mirror event {mirror_id}"
                ))),
            }
        };
        Box::pin(async move { result })
    }

    fn delete_event(
        &self,
        _calendar_id: &str,
        mirror_id: &str,
    ) -> BoxFuture<'_, ConnectorResult<()>> {
        self.ops
            .lock()
            .unwrap()
            .push(MirrorOp::Delete(mirror_id.to_string()));
        let result = if self.fail_deletes.lock().unwrap().contains(mirror_id) {
            Err(ConnectorError::server("delete rejected").with_connector("fake-mirror"))
        } else if self.events.lock().unwrap().remove(mirror_id).is_some() {
            Ok(())
        } else {
            Err(ConnectorError::not_found(format!(
                "no mirror event {mirror_id}"
            )))
        };
        Box::pin(async move { result })
    }
}
