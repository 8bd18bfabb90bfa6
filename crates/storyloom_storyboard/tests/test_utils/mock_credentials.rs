//! Mock credential provider.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use storyloom_error::{StoryloomResult, VideoError, VideoErrorKind};
use storyloom_interface::CredentialProvider;
use tokio::sync::Semaphore;

/// Credential provider with a switchable credential and selection outcome.
pub struct MockCredentials {
    available: AtomicBool,
    selection_succeeds: AtomicBool,
    select_calls: AtomicUsize,
    select_gate: Mutex<Option<Arc<Semaphore>>>,
}

impl MockCredentials {
    /// A provider that already has a credential.
    pub fn available() -> Self {
        Self {
            available: AtomicBool::new(true),
            selection_succeeds: AtomicBool::new(true),
            select_calls: AtomicUsize::new(0),
            select_gate: Mutex::new(None),
        }
    }

    /// A provider with no credential whose selection succeeds.
    pub fn selectable() -> Self {
        Self {
            available: AtomicBool::new(false),
            selection_succeeds: AtomicBool::new(true),
            select_calls: AtomicUsize::new(0),
            select_gate: Mutex::new(None),
        }
    }

    /// A provider with no credential whose selection is refused.
    pub fn refused() -> Self {
        Self {
            available: AtomicBool::new(false),
            selection_succeeds: AtomicBool::new(false),
            select_calls: AtomicUsize::new(0),
            select_gate: Mutex::new(None),
        }
    }

    /// Make a credential present or absent.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Hold every selection open until the returned gate gets a permit.
    pub fn gate_selection(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.select_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Number of times selection was requested.
    pub fn select_calls(&self) -> usize {
        self.select_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialProvider for MockCredentials {
    async fn has_credential(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn select_credential(&self) -> StoryloomResult<()> {
        self.select_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.select_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        if self.selection_succeeds.load(Ordering::SeqCst) {
            self.available.store(true, Ordering::SeqCst);
            Ok(())
        } else {
            Err(VideoError::new(VideoErrorKind::CredentialRequired(
                "selection dismissed".to_string(),
            ))
            .into())
        }
    }
}
