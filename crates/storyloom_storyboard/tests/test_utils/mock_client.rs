//! Scripted generation client.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use storyloom_core::{
    AspectRatio, ImageAsset, ImageQuality, SceneDescription, StoryDuration, VideoAsset,
    VideoOperation,
};
use storyloom_error::{GeminiError, GeminiErrorKind, StoryloomError, StoryloomResult};
use storyloom_interface::GenerationClient;
use tokio::sync::Semaphore;

/// A recorded client call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// describe_scenes(prompt)
    Describe(String),
    /// compose_narrative(prompt)
    Narrative(String),
    /// render_image(description, quality)
    Image(String, ImageQuality),
    /// edit_image(instruction)
    Edit(String),
    /// start_video(prompt, has_image)
    StartVideo(String, bool),
    /// poll_video(name)
    Poll(String),
    /// fetch_video(uri)
    Fetch(String),
}

type Hook = Box<dyn Fn(usize) + Send + Sync>;

/// Generation client whose every outcome is scripted by the test.
///
/// Image, edit, start, and poll outcomes are consumed from queues in call
/// order; when a queue is empty the call succeeds with a default value.
/// Gates hold a call open until the test adds a permit; each permit
/// releases one call.
pub struct MockStoryClient {
    scenes: Mutex<Result<Vec<SceneDescription>, GeminiErrorKind>>,
    narrative: Mutex<Result<String, GeminiErrorKind>>,
    images: Mutex<VecDeque<Result<ImageAsset, GeminiErrorKind>>>,
    edits: Mutex<VecDeque<Result<ImageAsset, GeminiErrorKind>>>,
    starts: Mutex<VecDeque<Result<VideoOperation, GeminiErrorKind>>>,
    polls: Mutex<VecDeque<Result<VideoOperation, GeminiErrorKind>>>,
    fetch: Mutex<Result<VideoAsset, GeminiErrorKind>>,
    calls: Mutex<Vec<Call>>,
    describe_gate: Mutex<Option<Arc<Semaphore>>>,
    narrative_gate: Mutex<Option<Arc<Semaphore>>>,
    image_gate: Mutex<Option<Arc<Semaphore>>>,
    poll_gate: Mutex<Option<Arc<Semaphore>>>,
    image_hook: Mutex<Option<Hook>>,
    images_in_flight: AtomicUsize,
    max_images_in_flight: AtomicUsize,
    image_calls: AtomicUsize,
}

impl MockStoryClient {
    /// A client that returns `scenes` and succeeds at everything else.
    pub fn with_scenes(scenes: Vec<SceneDescription>) -> Self {
        Self {
            scenes: Mutex::new(Ok(scenes)),
            narrative: Mutex::new(Ok("Once upon a time.".to_string())),
            images: Mutex::new(VecDeque::new()),
            edits: Mutex::new(VecDeque::new()),
            starts: Mutex::new(VecDeque::new()),
            polls: Mutex::new(VecDeque::new()),
            fetch: Mutex::new(Ok(VideoAsset::new("video/mp4", vec![0, 0, 0, 24]))),
            calls: Mutex::new(Vec::new()),
            describe_gate: Mutex::new(None),
            narrative_gate: Mutex::new(None),
            image_gate: Mutex::new(None),
            poll_gate: Mutex::new(None),
            image_hook: Mutex::new(None),
            images_in_flight: AtomicUsize::new(0),
            max_images_in_flight: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
        }
    }

    /// Default image returned for a description.
    pub fn image_for(description: &str) -> ImageAsset {
        ImageAsset::new("image/png", description.as_bytes().to_vec())
    }

    /// Make scene description fail.
    pub fn fail_scenes(&self, error: GeminiErrorKind) {
        *self.scenes.lock().unwrap() = Err(error);
    }

    /// Make narrative composition fail.
    pub fn fail_narrative(&self, error: GeminiErrorKind) {
        *self.narrative.lock().unwrap() = Err(error);
    }

    /// Queue the outcome of the next unscripted image request.
    pub fn push_image(&self, outcome: Result<ImageAsset, GeminiErrorKind>) {
        self.images.lock().unwrap().push_back(outcome);
    }

    /// Queue the outcome of the next edit request.
    pub fn push_edit(&self, outcome: Result<ImageAsset, GeminiErrorKind>) {
        self.edits.lock().unwrap().push_back(outcome);
    }

    /// Queue the outcome of the next video start.
    pub fn push_start(&self, outcome: Result<VideoOperation, GeminiErrorKind>) {
        self.starts.lock().unwrap().push_back(outcome);
    }

    /// Queue the outcome of the next poll.
    pub fn push_poll(&self, outcome: Result<VideoOperation, GeminiErrorKind>) {
        self.polls.lock().unwrap().push_back(outcome);
    }

    /// Make video download fail.
    pub fn fail_fetch(&self, error: GeminiErrorKind) {
        *self.fetch.lock().unwrap() = Err(error);
    }

    /// Hold describe_scenes open until the returned gate gets a permit.
    pub fn gate_describe(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.describe_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Hold compose_narrative open until the returned gate gets a permit.
    pub fn gate_narrative(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.narrative_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Hold every render_image open until the returned gate gets a permit.
    pub fn gate_images(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.image_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Hold every poll_video open until the returned gate gets a permit.
    pub fn gate_polls(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.poll_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Run `hook` with the zero-based image call number as each image request arrives.
    pub fn on_image_request(&self, hook: impl Fn(usize) + Send + Sync + 'static) {
        *self.image_hook.lock().unwrap() = Some(Box::new(hook));
    }

    /// Every call so far, in arrival order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    /// Largest number of image requests ever in flight at once.
    pub fn max_images_in_flight(&self) -> usize {
        self.max_images_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn pass(gate: &Mutex<Option<Arc<Semaphore>>>) {
        let gate = gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
    }

    fn fail(kind: GeminiErrorKind) -> StoryloomError {
        GeminiError::new(kind).into()
    }
}

#[async_trait]
impl GenerationClient for MockStoryClient {
    async fn describe_scenes(
        &self,
        prompt: &str,
        _aspect_ratio: AspectRatio,
        _duration: StoryDuration,
        _theme: &str,
    ) -> StoryloomResult<Vec<SceneDescription>> {
        self.record(Call::Describe(prompt.to_string()));
        Self::pass(&self.describe_gate).await;
        let outcome = self.scenes.lock().unwrap().clone();
        outcome.map_err(Self::fail)
    }

    async fn render_image(
        &self,
        description: &str,
        _aspect_ratio: AspectRatio,
        quality: ImageQuality,
        _theme: &str,
    ) -> StoryloomResult<ImageAsset> {
        self.record(Call::Image(description.to_string(), quality));
        let number = self.image_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = self.image_hook.lock().unwrap().as_ref() {
            hook(number);
        }

        let in_flight = self.images_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_images_in_flight
            .fetch_max(in_flight, Ordering::SeqCst);

        Self::pass(&self.image_gate).await;
        tokio::task::yield_now().await;

        self.images_in_flight.fetch_sub(1, Ordering::SeqCst);
        let scripted = self.images.lock().unwrap().pop_front();
        match scripted {
            Some(outcome) => outcome.map_err(Self::fail),
            None => Ok(Self::image_for(description)),
        }
    }

    async fn edit_image(
        &self,
        image: &ImageAsset,
        instruction: &str,
    ) -> StoryloomResult<ImageAsset> {
        self.record(Call::Edit(instruction.to_string()));
        let scripted = self.edits.lock().unwrap().pop_front();
        match scripted {
            Some(outcome) => outcome.map_err(Self::fail),
            None => {
                let mut data = image.data().clone();
                data.extend_from_slice(instruction.as_bytes());
                Ok(ImageAsset::new(image.mime().clone(), data))
            }
        }
    }

    async fn compose_narrative(
        &self,
        prompt: &str,
        _scenes: &[SceneDescription],
        _theme: &str,
    ) -> StoryloomResult<String> {
        self.record(Call::Narrative(prompt.to_string()));
        Self::pass(&self.narrative_gate).await;
        let outcome = self.narrative.lock().unwrap().clone();
        outcome.map_err(Self::fail)
    }

    async fn start_video(
        &self,
        prompt: &str,
        _aspect_ratio: AspectRatio,
        start_image: Option<&ImageAsset>,
    ) -> StoryloomResult<VideoOperation> {
        self.record(Call::StartVideo(prompt.to_string(), start_image.is_some()));
        let scripted = self.starts.lock().unwrap().pop_front();
        match scripted {
            Some(outcome) => outcome.map_err(Self::fail),
            None => Ok(VideoOperation::started("operations/mock")),
        }
    }

    async fn poll_video(&self, operation: &VideoOperation) -> StoryloomResult<VideoOperation> {
        self.record(Call::Poll(operation.name.clone()));
        Self::pass(&self.poll_gate).await;
        let scripted = self.polls.lock().unwrap().pop_front();
        match scripted {
            Some(outcome) => outcome.map_err(Self::fail),
            None => Ok(VideoOperation::finished(
                operation,
                Some("https://example.com/video.mp4".to_string()),
                None,
            )),
        }
    }

    async fn fetch_video(&self, uri: &str) -> StoryloomResult<VideoAsset> {
        self.record(Call::Fetch(uri.to_string()));
        let outcome = self.fetch.lock().unwrap().clone();
        outcome.map_err(Self::fail)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
