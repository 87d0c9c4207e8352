//! Application state.
//!
//! All external collaborators (metadata store, object store, media tool)
//! are injected here rather than held as process-wide singletons, so tests
//! can run concurrently with isolated fakes.

use std::sync::Arc;

use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_media::MediaTool;
use tubely_storage::Storage;

pub struct AppState {
    pub config: Config,
    pub videos: VideoRepository,
    pub storage: Arc<dyn Storage>,
    pub media_tool: Arc<dyn MediaTool>,
}

impl AppState {
    pub fn new(
        config: Config,
        videos: VideoRepository,
        storage: Arc<dyn Storage>,
        media_tool: Arc<dyn MediaTool>,
    ) -> Self {
        Self {
            config,
            videos,
            storage,
            media_tool,
        }
    }
}
