//! Terminal user interface for remdu.
//!
//! Navigate a storage backend while it is being scanned in the background:
//! the listing stays interactive the whole time, and entries can be
//! sorted, multi-selected, and deleted.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use remdu_core::MemoryBackend;
//!
//! let backend = Arc::new(MemoryBackend::demo());
//! remdu_tui::run(backend).unwrap();
//! ```

pub mod app;
mod event;
mod help;
mod theme;

use std::sync::Arc;

use remdu_core::Backend;

pub use app::sort::SortKey;
pub use app::{App, AppResult};
pub use theme::Theme;

/// Initial display settings for the TUI.
#[derive(Debug, Clone, Copy)]
pub struct TuiConfig {
    pub human_readable: bool,
    pub show_graph: bool,
    pub show_counts: bool,
    pub show_average: bool,
    pub sort_key: SortKey,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            human_readable: true,
            show_graph: true,
            show_counts: false,
            show_average: false,
            sort_key: SortKey::Size,
        }
    }
}

impl TuiConfig {
    /// Create a config with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_human_readable(mut self, on: bool) -> Self {
        self.human_readable = on;
        self
    }

    pub fn with_graph(mut self, on: bool) -> Self {
        self.show_graph = on;
        self
    }

    pub fn with_counts(mut self, on: bool) -> Self {
        self.show_counts = on;
        self
    }

    pub fn with_average(mut self, on: bool) -> Self {
        self.show_average = on;
        self
    }

    pub fn with_sort_key(mut self, key: SortKey) -> Self {
        self.sort_key = key;
        self
    }
}

/// Run the TUI on `backend` with default config.
pub fn run(backend: Arc<dyn Backend>) -> AppResult<()> {
    run_with_config(backend, TuiConfig::default())
}

/// Run the TUI on `backend`.
pub fn run_with_config(backend: Arc<dyn Backend>, config: TuiConfig) -> AppResult<()> {
    // Create tokio runtime for the event loop and the background scan
    let rt = tokio::runtime::Runtime::new()?;

    let terminal = ratatui::init();
    let result = rt.block_on(App::with_config(backend, config).run(terminal));
    ratatui::restore();

    // Shutdown runtime immediately to cancel the background walk
    rt.shutdown_timeout(std::time::Duration::from_millis(100));

    result
}
