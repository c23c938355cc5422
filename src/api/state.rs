use std::sync::{atomic::AtomicU64, Arc};

use crate::{
    backend::RecsysBackend, config::Config, populate::RowPopulator, render::Links,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn RecsysBackend>,
    pub populator: RowPopulator,
    pub config: Arc<Config>,
    /// Switch generation shared by every model selector the server renders
    pub switch_generation: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(backend: Arc<dyn RecsysBackend>, config: Config) -> Self {
        Self {
            populator: RowPopulator::new(backend.clone(), Links::default()),
            backend,
            config: Arc::new(config),
            switch_generation: Arc::new(AtomicU64::new(0)),
        }
    }
}
