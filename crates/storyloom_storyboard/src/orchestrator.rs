//! Storyboard orchestration: descriptions, narrative, and ordered image generation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use storyloom_config::StoryloomConfig;
use storyloom_core::{
    GenerationSettings, ImageState, NarrativeResult, SceneCollection, SceneDescription,
    SceneRecord,
};
use storyloom_error::{StoryboardError, StoryboardErrorKind, StoryloomResult};
use storyloom_interface::GenerationClient;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

/// Inputs of the run that produced the current collection.
///
/// Retries and edits reuse them so a panel is re-rendered the way it was
/// first rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct RunContext {
    /// Story idea
    prompt: String,
    /// Visual theme
    theme: String,
    /// Settings captured when the run started
    settings: GenerationSettings,
}

/// Snapshot of the storyboard published to observers.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct StoryboardState {
    /// Identifies the run that produced `scenes`; bumped when a new collection is seeded
    run_id: u64,
    /// Panels of the current run
    scenes: SceneCollection,
    /// Narrative of the current run
    narrative: NarrativeResult,
    /// Display-ready message of the last run-level failure
    error: Option<String>,
    /// Inputs of the current run
    run: RunContext,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct StoryboardRun {
    /// Run identifier
    run_id: u64,
    /// Final panels; none is pending
    scenes: SceneCollection,
    /// Final narrative
    narrative: NarrativeResult,
}

/// Holds the orchestrator's busy flag for the lifetime of a run.
///
/// Acquired with a compare-exchange so two callers can never both succeed;
/// released on drop, on every exit path.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::AtomicBool;
/// use storyloom_storyboard::BusyGuard;
///
/// let flag = AtomicBool::new(false);
/// let guard = BusyGuard::acquire(&flag).unwrap();
/// assert!(BusyGuard::acquire(&flag).is_none());
/// drop(guard);
/// assert!(BusyGuard::acquire(&flag).is_some());
/// ```
#[derive(Debug)]
pub struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Set the flag, or return `None` if it is already set.
    pub fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// A scene moved to `Pending` by a retry or edit.
struct Claim {
    run_id: u64,
    previous: SceneRecord,
    run: RunContext,
}

/// Drives storyboard generation against a [`GenerationClient`].
///
/// All state lives in a watch channel. Every write replaces exactly one
/// panel of the latest collection and is dropped if the collection belongs
/// to a different run than the one the write was computed for.
pub struct StoryboardOrchestrator<C: GenerationClient + ?Sized> {
    client: Arc<C>,
    fallback_narrative: String,
    busy: AtomicBool,
    state: watch::Sender<StoryboardState>,
}

impl<C: GenerationClient + ?Sized> StoryboardOrchestrator<C> {
    /// Creates an orchestrator with an empty storyboard.
    pub fn new(client: Arc<C>, fallback_narrative: impl Into<String>) -> Self {
        let (state, _) = watch::channel(StoryboardState::default());
        Self {
            client,
            fallback_narrative: fallback_narrative.into(),
            busy: AtomicBool::new(false),
            state,
        }
    }

    /// Creates an orchestrator using the configured fallback narrative.
    pub fn from_config(client: Arc<C>, config: &StoryloomConfig) -> Self {
        Self::new(client, config.narrative.fallback.clone())
    }

    /// Receiver of state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<StoryboardState> {
        self.state.subscribe()
    }

    /// Current state.
    pub fn snapshot(&self) -> StoryboardState {
        self.state.borrow().clone()
    }

    /// True while a run is in progress.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Generate a complete storyboard.
    ///
    /// Scene descriptions come first. Once they arrive the collection is
    /// replaced by one pending placeholder per scene, then the narrative and
    /// the images are produced concurrently. Images are requested one at a
    /// time in panel order. A failed image marks its scene failed and the run
    /// continues; a failed narrative falls back to fixed text.
    ///
    /// # Errors
    ///
    /// - `EmptyPrompt` / `EmptyTheme` if either input is blank
    /// - `Busy` if another run is in progress
    /// - The description request's error, which aborts the run
    #[instrument(
        skip(self, prompt, theme),
        fields(aspect_ratio = %settings.aspect_ratio(), duration = %settings.duration())
    )]
    pub async fn generate_storyboard(
        &self,
        prompt: &str,
        theme: &str,
        settings: GenerationSettings,
    ) -> StoryloomResult<StoryboardRun> {
        let prompt = prompt.trim();
        let theme = theme.trim();
        if prompt.is_empty() {
            return Err(StoryboardError::new(StoryboardErrorKind::EmptyPrompt).into());
        }
        if theme.is_empty() {
            return Err(StoryboardError::new(StoryboardErrorKind::EmptyTheme).into());
        }

        let _guard = BusyGuard::acquire(&self.busy)
            .ok_or_else(|| StoryboardError::new(StoryboardErrorKind::Busy))?;

        self.state.send_if_modified(|state| state.error.take().is_some());

        info!("Generating scene descriptions");
        let descriptions = match self
            .client
            .describe_scenes(prompt, *settings.aspect_ratio(), *settings.duration(), theme)
            .await
        {
            Ok(descriptions) => descriptions,
            Err(e) => {
                error!(error = %e, "Scene description failed, aborting run");
                let message = e.user_message();
                self.state.send_modify(|state| state.error = Some(message));
                return Err(e);
            }
        };

        let run_id = self.seed(&descriptions, prompt, theme, settings);
        info!(run_id, scene_count = descriptions.len(), "Seeded storyboard placeholders");

        tokio::join!(
            self.narrate(run_id, prompt, &descriptions, theme),
            self.render_all(run_id, &descriptions, theme, settings),
        );

        let snapshot = self.snapshot();
        info!(
            run_id,
            ready = snapshot.scenes.ready_count(),
            failed = snapshot.scenes.failed_count(),
            "Storyboard run finished"
        );

        Ok(StoryboardRun {
            run_id: snapshot.run_id,
            scenes: snapshot.scenes,
            narrative: snapshot.narrative,
        })
    }

    /// Request a fresh image for one scene.
    ///
    /// Returns `Ok(false)` without sending anything if the scene already has
    /// a request in flight. Otherwise the scene's image is discarded, one
    /// request is made with the settings of the run, and the result is
    /// committed.
    ///
    /// # Errors
    ///
    /// - `SceneOutOfRange` for an invalid index
    /// - `RunReplaced` if a new run seeded the storyboard meanwhile
    #[instrument(skip(self), fields(scene_index = index))]
    pub async fn retry_image(&self, index: usize) -> StoryloomResult<bool> {
        let claim = match self.claim_scene(index, |record| {
            if record.image_pending() {
                Err(StoryboardErrorKind::ScenePending(index))
            } else {
                Ok(())
            }
        }) {
            Ok(claim) => claim,
            Err(e) if matches!(e.kind, StoryboardErrorKind::ScenePending(_)) => {
                debug!("Scene already pending, retry ignored");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        let settings = claim.run.settings;
        let image = match self
            .client
            .render_image(
                claim.previous.description(),
                *settings.aspect_ratio(),
                *settings.image_quality(),
                &claim.run.theme,
            )
            .await
        {
            Ok(asset) => ImageState::Ready(asset),
            Err(e) => {
                warn!(error = %e, "Image retry failed");
                ImageState::Failed
            }
        };

        if !self.commit_image(claim.run_id, index, image) {
            return Err(StoryboardError::new(StoryboardErrorKind::RunReplaced).into());
        }
        Ok(true)
    }

    /// Apply a free-text edit to a scene's image.
    ///
    /// The scene is pending while the edit runs. On failure the previous
    /// image is restored and the error is returned.
    ///
    /// # Errors
    ///
    /// - `EmptyEditPrompt` if the instruction is blank
    /// - `SceneOutOfRange`, `ScenePending`, or `NoImageToEdit` if the scene
    ///   cannot be edited
    /// - The edit request's error
    /// - `RunReplaced` if a new run seeded the storyboard meanwhile
    #[instrument(skip(self, edit_prompt), fields(scene_index = index))]
    pub async fn edit_image(&self, index: usize, edit_prompt: &str) -> StoryloomResult<()> {
        let edit_prompt = edit_prompt.trim();
        if edit_prompt.is_empty() {
            return Err(StoryboardError::new(StoryboardErrorKind::EmptyEditPrompt).into());
        }

        let claim = self.claim_scene(index, |record| {
            if record.image_pending() {
                Err(StoryboardErrorKind::ScenePending(index))
            } else if record.image_asset().is_none() {
                Err(StoryboardErrorKind::NoImageToEdit(index))
            } else {
                Ok(())
            }
        })?;

        let previous = match claim.previous.image_asset() {
            Some(asset) => asset.clone(),
            None => {
                return Err(StoryboardError::new(StoryboardErrorKind::NoImageToEdit(index)).into());
            }
        };

        match self.client.edit_image(&previous, edit_prompt).await {
            Ok(edited) => {
                if !self.commit_image(claim.run_id, index, ImageState::Ready(edited)) {
                    return Err(StoryboardError::new(StoryboardErrorKind::RunReplaced).into());
                }
                info!("Image edited");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Image edit failed, restoring previous image");
                self.commit_image(claim.run_id, index, ImageState::Ready(previous));
                Err(e)
            }
        }
    }

    /// Replace the collection with placeholders and start a new run.
    fn seed(
        &self,
        descriptions: &[SceneDescription],
        prompt: &str,
        theme: &str,
        settings: GenerationSettings,
    ) -> u64 {
        let mut run_id = 0;
        self.state.send_modify(|state| {
            state.run_id += 1;
            state.scenes = SceneCollection::placeholders(descriptions);
            state.narrative = NarrativeResult::Pending;
            state.error = None;
            state.run = RunContext {
                prompt: prompt.to_string(),
                theme: theme.to_string(),
                settings,
            };
            run_id = state.run_id;
        });
        run_id
    }

    async fn narrate(
        &self,
        run_id: u64,
        prompt: &str,
        descriptions: &[SceneDescription],
        theme: &str,
    ) {
        let narrative = match self
            .client
            .compose_narrative(prompt, descriptions, theme)
            .await
        {
            Ok(text) => {
                debug!(run_id, chars = text.len(), "Narrative ready");
                NarrativeResult::Ready(text)
            }
            Err(e) => {
                warn!(run_id, error = %e, "Narrative failed, using fallback text");
                NarrativeResult::Fallback {
                    text: self.fallback_narrative.clone(),
                    error: e.user_message(),
                }
            }
        };

        self.state.send_if_modified(|state| {
            if state.run_id != run_id {
                return false;
            }
            state.narrative = narrative;
            true
        });
    }

    /// One request per scene, in panel order, each committed before the next.
    async fn render_all(
        &self,
        run_id: u64,
        descriptions: &[SceneDescription],
        theme: &str,
        settings: GenerationSettings,
    ) {
        for (index, scene) in descriptions.iter().enumerate() {
            let image = match self
                .client
                .render_image(
                    &scene.description,
                    *settings.aspect_ratio(),
                    *settings.image_quality(),
                    theme,
                )
                .await
            {
                Ok(asset) => {
                    debug!(run_id, scene_index = index, "Image ready");
                    ImageState::Ready(asset)
                }
                Err(e) => {
                    warn!(run_id, scene_index = index, error = %e, "Image generation failed");
                    ImageState::Failed
                }
            };

            if !self.commit_image(run_id, index, image) {
                debug!(run_id, "Run replaced, stopping image generation");
                return;
            }
        }
    }

    /// Check a scene and move it to `Pending` in one atomic step.
    fn claim_scene<F>(&self, index: usize, check: F) -> Result<Claim, StoryboardError>
    where
        F: FnOnce(&SceneRecord) -> Result<(), StoryboardErrorKind>,
    {
        let mut outcome = Err(StoryboardErrorKind::SceneOutOfRange { index, len: 0 });

        self.state.send_if_modified(|state| {
            let Some(current) = state.scenes.get(index).cloned() else {
                outcome = Err(StoryboardErrorKind::SceneOutOfRange {
                    index,
                    len: state.scenes.len(),
                });
                return false;
            };
            if let Err(kind) = check(&current) {
                outcome = Err(kind);
                return false;
            }
            match state
                .scenes
                .replaced(index, current.with_image(ImageState::Pending))
            {
                Ok(next) => {
                    state.scenes = next;
                    outcome = Ok(Claim {
                        run_id: state.run_id,
                        previous: current,
                        run: state.run.clone(),
                    });
                    true
                }
                Err(_) => false,
            }
        });

        outcome.map_err(StoryboardError::new)
    }

    /// Replace one scene's image if the storyboard still belongs to `run_id`.
    ///
    /// Returns false when the write was discarded.
    fn commit_image(&self, run_id: u64, index: usize, image: ImageState) -> bool {
        self.state.send_if_modified(|state| {
            if state.run_id != run_id {
                debug!(
                    run_id,
                    current = state.run_id,
                    scene_index = index,
                    "Discarding stale image result"
                );
                return false;
            }
            match state.scenes.updated(index, |record| record.with_image(image)) {
                Ok(next) => {
                    state.scenes = next;
                    true
                }
                Err(e) => {
                    warn!(error = %e, "Image result for missing scene");
                    false
                }
            }
        })
    }
}
