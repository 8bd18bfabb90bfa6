//! Video generation session: start, poll, download.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use storyloom_config::VideoConfig;
use storyloom_core::{AspectRatio, ImageAsset, VideoAsset, VideoOperation};
use storyloom_error::{
    StoryloomError, StoryloomResult, VideoError, VideoErrorKind, is_credential_rejection,
};
use storyloom_interface::{CredentialProvider, GenerationClient};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Observable state of a video session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VideoPhase {
    /// Nothing running, nothing held
    #[default]
    Idle,
    /// A render is in progress
    Generating {
        /// Rotating status text
        status_message: String,
    },
    /// The render finished and the video was downloaded
    Succeeded {
        /// Downloaded video
        asset: VideoAsset,
        /// Location the video was downloaded from
        uri: String,
    },
    /// The render or the download failed
    Failed {
        /// Display-ready failure message
        message: String,
    },
}

impl VideoPhase {
    /// True while a render is in progress.
    pub fn is_generating(&self) -> bool {
        matches!(self, VideoPhase::Generating { .. })
    }

    /// True in the phases a render may start from: `Idle` and `Failed`.
    pub fn can_start(&self) -> bool {
        matches!(self, VideoPhase::Idle | VideoPhase::Failed { .. })
    }

    /// Why a render cannot start from this phase, if it cannot.
    fn start_refusal(&self) -> Option<VideoErrorKind> {
        match self {
            VideoPhase::Idle | VideoPhase::Failed { .. } => None,
            VideoPhase::Generating { .. } => Some(VideoErrorKind::AlreadyGenerating),
            VideoPhase::Succeeded { .. } => Some(VideoErrorKind::AlreadySucceeded),
        }
    }
}

/// Timer settings of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoTiming {
    /// Wait between operation polls
    pub poll_interval: Duration,
    /// Wait between status message changes
    pub status_interval: Duration,
    /// Status messages, cycled in order
    pub status_messages: Arc<[String]>,
}

impl From<&VideoConfig> for VideoTiming {
    fn from(config: &VideoConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            status_interval: config.status_interval(),
            status_messages: config.status_messages.clone().into(),
        }
    }
}

/// The two background tasks of a render plus the token that stops them.
///
/// Dropping the guard cancels the token and aborts both tasks.
struct SessionTasks {
    token: CancellationToken,
    ticker: JoinHandle<()>,
    driver: JoinHandle<()>,
}

impl Drop for SessionTasks {
    fn drop(&mut self) {
        self.token.cancel();
        self.ticker.abort();
        self.driver.abort();
    }
}

/// State shared between the session handle and its background tasks.
struct SessionContext {
    phase: watch::Sender<VideoPhase>,
    epoch: AtomicU64,
    credential_selected: AtomicBool,
    /// Set when the service rejected the credential; forces re-selection
    credential_rejected: AtomicBool,
    operation: Mutex<Option<VideoOperation>>,
    tasks: Mutex<Option<SessionTasks>>,
}

impl SessionContext {
    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::Acquire) == epoch
    }

    /// Apply `f` to the phase if `epoch` is still current.
    fn commit<F>(&self, epoch: u64, f: F) -> bool
    where
        F: FnOnce(&mut VideoPhase) -> bool,
    {
        self.phase.send_if_modified(|phase| {
            if !self.is_current(epoch) {
                return false;
            }
            f(phase)
        })
    }

    fn hold(&self, epoch: u64, operation: &VideoOperation) {
        if self.is_current(epoch) {
            *self.operation.lock() = Some(operation.clone());
        }
    }
}

/// How a render ended, short of a transport or service error.
enum RenderOutcome {
    Finished { asset: VideoAsset, uri: String },
    Rejected(String),
    Cancelled,
}

/// One video render at a time, observable through a watch channel.
///
/// ```text
/// Idle --start--> Generating --done+uri+fetched--> Succeeded
///                     |------any failure---------> Failed --start--> Generating
/// any --close--> Idle
/// ```
///
/// While generating, a status ticker cycles through the configured messages
/// and a driver task polls the operation. Both stop the moment the session
/// leaves `Generating`. Results that arrive after [`close`](Self::close) are
/// discarded.
pub struct VideoSession<C, P>
where
    C: GenerationClient + ?Sized + 'static,
    P: CredentialProvider + ?Sized,
{
    client: Arc<C>,
    credentials: Arc<P>,
    timing: VideoTiming,
    context: Arc<SessionContext>,
}

impl<C, P> VideoSession<C, P>
where
    C: GenerationClient + ?Sized + 'static,
    P: CredentialProvider + ?Sized,
{
    /// Creates an idle session.
    pub fn new(client: Arc<C>, credentials: Arc<P>, timing: VideoTiming) -> Self {
        let (phase, _) = watch::channel(VideoPhase::Idle);
        Self {
            client,
            credentials,
            timing,
            context: Arc::new(SessionContext {
                phase,
                epoch: AtomicU64::new(0),
                credential_selected: AtomicBool::new(false),
                credential_rejected: AtomicBool::new(false),
                operation: Mutex::new(None),
                tasks: Mutex::new(None),
            }),
        }
    }

    /// Receiver of phase snapshots.
    pub fn subscribe(&self) -> watch::Receiver<VideoPhase> {
        self.context.phase.subscribe()
    }

    /// Current phase.
    pub fn phase(&self) -> VideoPhase {
        self.context.phase.borrow().clone()
    }

    /// True once a credential has been confirmed for this session.
    pub fn credential_selected(&self) -> bool {
        self.context.credential_selected.load(Ordering::Acquire)
    }

    /// Latest operation handle of the running render.
    pub fn operation(&self) -> Option<VideoOperation> {
        self.context.operation.lock().clone()
    }

    /// Start a render.
    ///
    /// Allowed from `Idle` or `Failed`; `Succeeded` is final until the
    /// session is closed. Makes sure a credential is selected first, asking
    /// the provider if none is available or the last one was rejected.
    ///
    /// # Errors
    ///
    /// - `EmptyPrompt` if the prompt is blank
    /// - `AlreadyGenerating` if a render is running
    /// - `AlreadySucceeded` if the session holds a finished video
    /// - `CredentialRequired` if no credential could be selected
    /// - `Closed` if the session was closed while the start was pending
    #[instrument(skip(self, prompt, start_image), fields(has_image = start_image.is_some()))]
    pub async fn start(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        start_image: Option<ImageAsset>,
    ) -> StoryloomResult<()> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(VideoError::new(VideoErrorKind::EmptyPrompt).into());
        }
        if let Some(kind) = self.context.phase.borrow().start_refusal() {
            return Err(VideoError::new(kind).into());
        }

        let observed = self.context.epoch.load(Ordering::Acquire);
        self.ensure_credential().await?;

        let first_message = self
            .timing
            .status_messages
            .first()
            .cloned()
            .unwrap_or_default();
        let mut refusal = None;
        self.context.phase.send_if_modified(|phase| {
            if let Some(kind) = phase.start_refusal() {
                refusal = Some(kind);
                return false;
            }
            // A close during credential selection moved the epoch on
            if self
                .context
                .epoch
                .compare_exchange(observed, observed + 1, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                refusal = Some(VideoErrorKind::Closed);
                return false;
            }
            *phase = VideoPhase::Generating {
                status_message: first_message,
            };
            true
        });
        if let Some(kind) = refusal {
            debug!(reason = %kind, "Video start refused");
            return Err(VideoError::new(kind).into());
        }

        let epoch = observed + 1;
        *self.context.operation.lock() = None;

        let token = CancellationToken::new();
        let ticker = tokio::spawn(run_status_ticker(
            Arc::clone(&self.context),
            epoch,
            token.clone(),
            self.timing.status_interval,
            Arc::clone(&self.timing.status_messages),
        ));
        let driver = tokio::spawn(run_driver(
            Arc::clone(&self.client),
            Arc::clone(&self.context),
            epoch,
            token.clone(),
            self.timing.poll_interval,
            prompt.to_string(),
            aspect_ratio,
            start_image,
        ));

        *self.context.tasks.lock() = Some(SessionTasks {
            token,
            ticker,
            driver,
        });
        info!(epoch, "Video session started");
        Ok(())
    }

    /// Tear the session down.
    ///
    /// Stops both timers before resetting to `Idle`; the held operation and
    /// any downloaded video are released. Calls still in flight write nothing
    /// when they resolve.
    #[instrument(skip(self))]
    pub fn close(&self) {
        self.context.epoch.fetch_add(1, Ordering::AcqRel);
        let tasks = self.context.tasks.lock().take();
        drop(tasks);
        *self.context.operation.lock() = None;
        self.context.phase.send_replace(VideoPhase::Idle);
        debug!("Video session closed");
    }

    /// Wait until the session is not generating and return that phase.
    pub async fn wait_until_settled(&self) -> VideoPhase {
        let mut receiver = self.subscribe();
        match receiver.wait_for(|phase| !phase.is_generating()).await {
            Ok(phase) => phase.clone(),
            Err(_) => self.phase(),
        }
    }

    async fn ensure_credential(&self) -> StoryloomResult<()> {
        let rejected = self.context.credential_rejected.load(Ordering::Acquire);
        if self.credential_selected() && !rejected {
            return Ok(());
        }
        if rejected || !self.credentials.has_credential().await {
            info!(rejected, "Requesting credential selection");
            self.credentials.select_credential().await.map_err(|e| {
                StoryloomError::from(VideoError::new(VideoErrorKind::CredentialRequired(
                    e.user_message(),
                )))
            })?;
        }
        self.context
            .credential_rejected
            .store(false, Ordering::Release);
        self.context
            .credential_selected
            .store(true, Ordering::Release);
        Ok(())
    }
}

impl<C, P> Drop for VideoSession<C, P>
where
    C: GenerationClient + ?Sized + 'static,
    P: CredentialProvider + ?Sized,
{
    fn drop(&mut self) {
        self.context.epoch.fetch_add(1, Ordering::AcqRel);
        let tasks = self.context.tasks.lock().take();
        drop(tasks);
    }
}

async fn run_status_ticker(
    context: Arc<SessionContext>,
    epoch: u64,
    token: CancellationToken,
    interval: Duration,
    messages: Arc<[String]>,
) {
    let mut index = 0;
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {
                if messages.is_empty() {
                    continue;
                }
                index = (index + 1) % messages.len();
                let next = messages[index].clone();
                context.commit(epoch, |phase| match phase {
                    VideoPhase::Generating { status_message } => {
                        *status_message = next;
                        true
                    }
                    _ => false,
                });
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_driver<C>(
    client: Arc<C>,
    context: Arc<SessionContext>,
    epoch: u64,
    token: CancellationToken,
    poll_interval: Duration,
    prompt: String,
    aspect_ratio: AspectRatio,
    start_image: Option<ImageAsset>,
) where
    C: GenerationClient + ?Sized,
{
    let outcome = render(
        client.as_ref(),
        &context,
        epoch,
        &token,
        poll_interval,
        &prompt,
        aspect_ratio,
        start_image.as_ref(),
    )
    .await;

    token.cancel();

    let (next, credential_rejected) = match outcome {
        Ok(RenderOutcome::Cancelled) => return,
        Ok(RenderOutcome::Finished { asset, uri }) => {
            info!(bytes = asset.data().len(), "Video ready");
            (VideoPhase::Succeeded { asset, uri }, false)
        }
        Ok(RenderOutcome::Rejected(message)) => {
            warn!(message = %message, "Video render finished without a video");
            let rejected = is_credential_rejection(&message);
            (VideoPhase::Failed { message }, rejected)
        }
        Err(e) => {
            warn!(error = %e, "Video render failed");
            let message = e.user_message();
            (VideoPhase::Failed { message }, e.is_credential_rejected())
        }
    };

    if credential_rejected && context.is_current(epoch) {
        warn!("Credential rejected, selection required before the next render");
        context
            .credential_selected
            .store(false, Ordering::Release);
        context
            .credential_rejected
            .store(true, Ordering::Release);
    }

    context.commit(epoch, |phase| {
        *phase = next;
        true
    });
}

#[allow(clippy::too_many_arguments)]
async fn render<C>(
    client: &C,
    context: &SessionContext,
    epoch: u64,
    token: &CancellationToken,
    poll_interval: Duration,
    prompt: &str,
    aspect_ratio: AspectRatio,
    start_image: Option<&ImageAsset>,
) -> StoryloomResult<RenderOutcome>
where
    C: GenerationClient + ?Sized,
{
    let mut operation = client.start_video(prompt, aspect_ratio, start_image).await?;
    context.hold(epoch, &operation);
    info!(operation = %operation.name, "Video operation started");

    while !operation.done {
        tokio::select! {
            _ = token.cancelled() => return Ok(RenderOutcome::Cancelled),
            _ = tokio::time::sleep(poll_interval) => {}
        }
        operation = client.poll_video(&operation).await?;
        context.hold(epoch, &operation);
        debug!(operation = %operation.name, done = operation.done, "Polled video operation");
    }

    if let Some(message) = operation.error {
        return Ok(RenderOutcome::Rejected(message));
    }
    let Some(uri) = operation.video_uri else {
        return Ok(RenderOutcome::Rejected(
            VideoErrorKind::MissingAsset.to_string(),
        ));
    };

    let asset = client.fetch_video(&uri).await.map_err(|e| {
        StoryloomError::from(VideoError::new(VideoErrorKind::FetchFailed(
            e.user_message(),
        )))
    })?;
    Ok(RenderOutcome::Finished { asset, uri })
}
