// THEORY:
// `AsyncBlurEngine` lets async callers (a frame loop, a server handler) run a blur
// without stalling their runtime. The blur itself is CPU-bound and spawns its own
// OS threads, so the whole invocation is moved onto tokio's blocking pool and the
// caller simply awaits the result. The image is moved in and handed back blurred,
// together with the wall-clock time the blur took.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core_modules::image_store::Image;
use crate::engine::{BlurConfig, BlurEngine};
use crate::error::BlurResult;

/// A blurred image and how long the blur took.
#[derive(Debug, Clone)]
pub struct BlurOutcome {
    pub image: Image,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct AsyncBlurEngine {
    engine: Arc<BlurEngine>,
}

impl AsyncBlurEngine {
    pub fn new(config: BlurConfig) -> BlurResult<Self> {
        Ok(Self {
            engine: Arc::new(BlurEngine::new(config)?),
        })
    }

    pub fn config(&self) -> &BlurConfig {
        self.engine.config()
    }

    /// Blurs `image` on the blocking pool. On failure the image is dropped; retry
    /// from a fresh copy of the source.
    pub async fn blur(&self, mut image: Image) -> BlurResult<BlurOutcome> {
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || -> BlurResult<BlurOutcome> {
            let started = Instant::now();
            engine.blur(&mut image)?;
            Ok(BlurOutcome {
                image,
                elapsed: started.elapsed(),
            })
        })
        .await?
    }
}
