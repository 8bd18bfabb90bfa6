//! Test utilities for storyboard and video session tests.
//!
//! This module provides scripted mock collaborators and small helpers.

#![allow(dead_code)]

pub mod mock_client;
pub mod mock_credentials;

#[allow(unused_imports)]
pub use mock_client::{Call, MockStoryClient};
#[allow(unused_imports)]
pub use mock_credentials::MockCredentials;

use std::time::Duration;
use storyloom_core::SceneDescription;

/// Scene descriptions titled "Scene 1".."Scene n".
pub fn scenes(n: usize) -> Vec<SceneDescription> {
    (1..=n)
        .map(|i| SceneDescription::new(format!("Scene {i}"), format!("Description of scene {i}")))
        .collect()
}

/// Poll `condition` every few milliseconds until it holds or two seconds pass.
pub async fn eventually<F>(mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..400 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
