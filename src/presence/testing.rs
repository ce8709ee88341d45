//! In-memory fakes for exercising the lifecycle state machine without a
//! running host application or chat client.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::host::{HostApplication, HostDocument, HostError};

use super::payload::PresencePayload;
use super::transport::{PresenceConnection, PresenceTransport, TransportError};

/// Scriptable host double.
pub(crate) struct FakeHost {
    document: Option<FakeDocument>,
    fail_active_query: bool,
    errors_shown: Mutex<Vec<String>>,
}

#[derive(Clone)]
pub(crate) struct FakeDocument {
    name: Option<String>,
    project: FakeProject,
}

#[derive(Clone)]
enum FakeProject {
    Named(String),
    Unfiled,
    Broken,
}

impl FakeHost {
    /// No open document.
    pub fn idle() -> Self {
        Self {
            document: None,
            fail_active_query: false,
            errors_shown: Mutex::new(Vec::new()),
        }
    }

    /// Every active-document query errors.
    pub fn unavailable() -> Self {
        Self {
            fail_active_query: true,
            ..Self::idle()
        }
    }

    pub fn document(name: &str, project: Option<&str>) -> Self {
        Self {
            document: Some(FakeDocument {
                name: Some(name.to_string()),
                project: match project {
                    Some(project) => FakeProject::Named(project.to_string()),
                    None => FakeProject::Unfiled,
                },
            }),
            ..Self::idle()
        }
    }

    pub fn document_with_broken_project(name: &str) -> Self {
        Self {
            document: Some(FakeDocument {
                name: Some(name.to_string()),
                project: FakeProject::Broken,
            }),
            ..Self::idle()
        }
    }

    pub fn document_with_broken_name() -> Self {
        Self {
            document: Some(FakeDocument {
                name: None,
                project: FakeProject::Unfiled,
            }),
            ..Self::idle()
        }
    }

    pub fn errors_shown(&self) -> Vec<String> {
        self.errors_shown.lock().unwrap().clone()
    }
}

impl HostApplication for FakeHost {
    fn active_document(&self) -> Result<Option<Box<dyn HostDocument>>, HostError> {
        if self.fail_active_query {
            return Err(HostError::new("host busy"));
        }
        Ok(self
            .document
            .clone()
            .map(|d| Box::new(d) as Box<dyn HostDocument>))
    }

    fn show_error(&self, message: &str) {
        self.errors_shown.lock().unwrap().push(message.to_string());
    }
}

impl HostDocument for FakeDocument {
    fn display_name(&self) -> Result<String, HostError> {
        self.name
            .clone()
            .ok_or_else(|| HostError::new("document name unavailable"))
    }

    fn project_name(&self) -> Result<Option<String>, HostError> {
        match &self.project {
            FakeProject::Named(name) => Ok(Some(name.clone())),
            FakeProject::Unfiled => Ok(None),
            FakeProject::Broken => Err(HostError::new("data file detached")),
        }
    }
}

/// Recording transport double; clones share state.
#[derive(Clone)]
pub(crate) struct FakeTransport {
    inner: Arc<FakeTransportState>,
}

struct FakeTransportState {
    fail_connect: bool,
    connects: AtomicUsize,
    pushes: Mutex<Vec<PresencePayload>>,
    push_attempts: AtomicUsize,
    fail_next_pushes: AtomicUsize,
    cleared: AtomicBool,
    closed: AtomicBool,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::with_connect(false)
    }

    pub fn failing_connect() -> Self {
        Self::with_connect(true)
    }

    fn with_connect(fail_connect: bool) -> Self {
        Self {
            inner: Arc::new(FakeTransportState {
                fail_connect,
                connects: AtomicUsize::new(0),
                pushes: Mutex::new(Vec::new()),
                push_attempts: AtomicUsize::new(0),
                fail_next_pushes: AtomicUsize::new(0),
                cleared: AtomicBool::new(false),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Make the next `count` update calls fail before succeeding again.
    pub fn fail_next_pushes(&self, count: usize) {
        self.inner.fail_next_pushes.store(count, Ordering::SeqCst);
    }

    /// Successfully delivered payloads, in order.
    pub fn pushes(&self) -> Vec<PresencePayload> {
        self.inner.pushes.lock().unwrap().clone()
    }

    /// All update calls, including failed ones.
    pub fn push_attempts(&self) -> usize {
        self.inner.push_attempts.load(Ordering::SeqCst)
    }

    pub fn connects(&self) -> usize {
        self.inner.connects.load(Ordering::SeqCst)
    }

    pub fn cleared(&self) -> bool {
        self.inner.cleared.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PresenceTransport for FakeTransport {
    async fn connect(&self) -> Result<Box<dyn PresenceConnection>, TransportError> {
        if self.inner.fail_connect {
            return Err(TransportError::Connect("service not running".into()));
        }
        self.inner.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeConnection {
            state: Arc::clone(&self.inner),
        }))
    }
}

struct FakeConnection {
    state: Arc<FakeTransportState>,
}

#[async_trait]
impl PresenceConnection for FakeConnection {
    async fn update(&mut self, payload: &PresencePayload) -> Result<(), TransportError> {
        self.state.push_attempts.fetch_add(1, Ordering::SeqCst);

        let remaining = self.state.fail_next_pushes.load(Ordering::SeqCst);
        if remaining > 0 {
            self.state
                .fail_next_pushes
                .store(remaining - 1, Ordering::SeqCst);
            return Err(TransportError::Update("pipe broken".into()));
        }

        self.state.pushes.lock().unwrap().push(payload.clone());
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), TransportError> {
        self.state.cleared.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn close(self: Box<Self>) {
        self.state.closed.store(true, Ordering::SeqCst);
    }
}
