//! Ordered, immutable scene collection.

use crate::{SceneDescription, SceneRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storyloom_error::{StoryboardError, StoryboardErrorKind, StoryloomResult};

/// Ordered panels of one storyboard.
///
/// Insertion order is panel order is display order. A collection is never
/// mutated in place: every update produces a new collection with exactly one
/// element replaced, so readers holding a snapshot never observe a partial
/// update. Cloning is cheap.
///
/// # Examples
///
/// ```
/// use storyloom_core::{ImageState, SceneCollection, SceneDescription};
///
/// let scenes = SceneCollection::placeholders(&[
///     SceneDescription::new("One", "First panel"),
///     SceneDescription::new("Two", "Second panel"),
/// ]);
/// assert_eq!(scenes.len(), 2);
///
/// let next = scenes.updated(1, |record| record.with_image(ImageState::Failed)).unwrap();
/// assert!(next.get(1).unwrap().image_failed());
/// assert!(scenes.get(1).unwrap().image_pending());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneCollection {
    records: Arc<[SceneRecord]>,
}

impl SceneCollection {
    /// Creates a collection from records in panel order.
    pub fn new(records: Vec<SceneRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// One pending placeholder per description, in the order given.
    pub fn placeholders(descriptions: &[SceneDescription]) -> Self {
        Self::new(descriptions.iter().map(SceneRecord::placeholder).collect())
    }

    /// Number of panels.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the collection holds no panels.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Panel at `index`.
    pub fn get(&self, index: usize) -> Option<&SceneRecord> {
        self.records.get(index)
    }

    /// Panels in display order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneRecord> {
        self.records.iter()
    }

    /// True once no panel has an image request in flight.
    pub fn is_settled(&self) -> bool {
        self.records.iter().all(|record| !record.image_pending())
    }

    /// Number of panels holding an image.
    pub fn ready_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.image_asset().is_some())
            .count()
    }

    /// Number of panels whose last request failed.
    pub fn failed_count(&self) -> usize {
        self.records.iter().filter(|record| record.image_failed()).count()
    }

    /// New collection with the element at `index` replaced by `record`.
    ///
    /// # Errors
    ///
    /// Returns `SceneOutOfRange` if `index` is not a valid position.
    #[track_caller]
    pub fn replaced(&self, index: usize, record: SceneRecord) -> StoryloomResult<Self> {
        if index >= self.records.len() {
            return Err(StoryboardError::new(StoryboardErrorKind::SceneOutOfRange {
                index,
                len: self.records.len(),
            })
            .into());
        }
        let mut records = self.records.to_vec();
        records[index] = record;
        Ok(Self::new(records))
    }

    /// New collection with the element at `index` replaced by `f(current)`.
    ///
    /// # Errors
    ///
    /// Returns `SceneOutOfRange` if `index` is not a valid position.
    #[track_caller]
    pub fn updated<F>(&self, index: usize, f: F) -> StoryloomResult<Self>
    where
        F: FnOnce(&SceneRecord) -> SceneRecord,
    {
        let current = self.records.get(index).ok_or_else(|| {
            StoryboardError::new(StoryboardErrorKind::SceneOutOfRange {
                index,
                len: self.records.len(),
            })
        })?;
        let next = f(current);
        self.replaced(index, next)
    }
}

impl<'a> IntoIterator for &'a SceneCollection {
    type Item = &'a SceneRecord;
    type IntoIter = std::slice::Iter<'a, SceneRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
