//! Scene metadata, options, and the recalculation cache.

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{CadenzaError, CadenzaResult};

/// Identity and deterministic seed of a scene.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SceneMetadata {
    /// Unique scene name, used for diagnostics and scope labeling.
    pub name: String,
    /// Seed consumed at every reset to reseed the scene's random source.
    pub seed: u64,
}

impl SceneMetadata {
    /// Metadata with the given name and seed.
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            seed,
        }
    }

    pub(crate) fn validate(&self) -> CadenzaResult<()> {
        if self.name.is_empty() {
            return Err(CadenzaError::validation("SceneMetadata name must be non-empty"));
        }
        Ok(())
    }
}

/// Options controlling scene driving behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneOpts {
    /// Ceiling on retry-until-ready draw passes per [`render`](crate::Scene::render)
    /// call. Exceeding the ceiling stops retrying without error.
    pub max_render_iterations: usize,
}

impl Default for SceneOpts {
    fn default() -> Self {
        Self {
            max_render_iterations: 10,
        }
    }
}

impl SceneOpts {
    pub(crate) fn validate(&self) -> CadenzaResult<()> {
        if self.max_render_iterations == 0 {
            return Err(CadenzaError::validation(
                "SceneOpts max_render_iterations must be > 0",
            ));
        }
        Ok(())
    }
}

/// Timeline facts discovered by one recalculation pass.
///
/// `transition_duration` holds `-1` transiently while a recalculation is still
/// looking for the transition boundary; all other fields are non-negative frame
/// counts. Once the owning scene reports itself cached, the fields are frozen until
/// an explicit reload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CachedSceneData {
    /// Global frame at which the scene starts.
    pub first_frame: FrameIndex,
    /// Frames spent transitioning in (`-1` until observed).
    pub transition_duration: i64,
    /// Total frames the scene occupies.
    pub duration: u64,
    /// Global frame at which the scene ends.
    pub last_frame: FrameIndex,
}

/// Per-scene activity counters, cleared on every reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneCounters {
    /// Micro-steps driven since the last reset.
    pub steps: u64,
    /// Render passes completed since the last reset.
    pub renders: u64,
}
