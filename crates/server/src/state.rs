use std::sync::Arc;

use configs::{AppConfig, SiteConfig};
use service::{
    backend::DataBackend,
    content::{cache::QueryCache, ContentStore},
    inline_edit::{EditMode, EditSession},
    lead::{telegram::MessagingApi, LeadRelay},
    storage::objects::LocalObjectStorage,
    upload::ImageUploader,
};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: ContentStore,
    pub edit: Arc<EditSession>,
    pub uploader: Arc<ImageUploader>,
    pub relay: LeadRelay,
    pub site: Arc<SiteConfig>,
}

impl AppState {
    /// Assemble state from configuration and the already opened backend.
    /// The messaging API is injected so tests can point it elsewhere.
    pub fn new(cfg: &AppConfig, backend: Arc<dyn DataBackend>, messaging: Arc<dyn MessagingApi>) -> Self {
        let store = ContentStore::new(backend, Arc::new(QueryCache::from_config(&cfg.cache)));
        let edit = Arc::new(EditSession::new(EditMode::default(), Arc::new(store.clone())));
        let uploader = Arc::new(ImageUploader::new(
            Arc::new(LocalObjectStorage::from_config(&cfg.storage)),
            cfg.storage.max_upload_bytes,
        ));
        let relay = LeadRelay::from_config(messaging, &cfg.telegram, &cfg.site.name);
        Self { store, edit, uploader, relay, site: Arc::new(cfg.site.clone()) }
    }

    pub fn edit_mode_on(&self) -> bool { self.edit.mode().is_on() }
}
