use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tracing::{info, warn};

use super::binding::FieldBinding;
use super::edit_mode::EditMode;
use super::field::{EditError, EditableField};
use crate::content::ContentStore;
use crate::errors::ServiceError;

/// Persists one committed field value.
#[async_trait]
pub trait SaveTarget: Send + Sync {
    async fn save(&self, binding: &FieldBinding, value: &str) -> Result<(), ServiceError>;
}

#[async_trait]
impl SaveTarget for ContentStore {
    async fn save(&self, binding: &FieldBinding, value: &str) -> Result<(), ServiceError> {
        match binding {
            FieldBinding::Content { block, field } => self.site_content().set_text(block, field, value).await.map(drop),
            FieldBinding::Service { id, field } => self.services().set_text(*id, field, value).await.map(drop),
            FieldBinding::Feature { id, field } => self.features().set_text(*id, field, value).await.map(drop),
            FieldBinding::Contact { id, field } => self.contacts().set_text(*id, field, value).await.map(drop),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Edit(#[from] EditError),
    /// The save was rejected; the field is back in editing with the draft.
    #[error("save failed: {0}")]
    Save(ServiceError),
}

/// Inline-edit state for every bound field on the site, plus the edit-mode
/// flag that gates it.
pub struct EditSession {
    mode: EditMode,
    fields: DashMap<FieldBinding, EditableField>,
    target: Arc<dyn SaveTarget>,
}

impl EditSession {
    pub fn new(mode: EditMode, target: Arc<dyn SaveTarget>) -> Self {
        Self { mode, fields: DashMap::new(), target }
    }

    pub fn mode(&self) -> &EditMode { &self.mode }

    /// Current state of a field, refreshed with the value just read from
    /// the store.
    pub fn snapshot(&self, binding: &FieldBinding, persisted: &str) -> EditableField {
        match self.fields.get_mut(binding) {
            Some(mut f) => {
                f.sync_external(persisted);
                f.clone()
            }
            None => EditableField::new(binding.kind(), persisted),
        }
    }

    pub fn activate(&self, binding: &FieldBinding, persisted: &str) -> Result<(), SessionError> {
        let mut entry = self
            .fields
            .entry(binding.clone())
            .or_insert_with(|| EditableField::new(binding.kind(), persisted));
        entry.sync_external(persisted);
        entry.activate(self.mode.is_on())?;
        Ok(())
    }

    pub fn cancel(&self, binding: &FieldBinding) {
        if let Some(mut f) = self.fields.get_mut(binding) {
            f.cancel();
        }
    }

    /// Confirm `draft` for an open editor and save it. On a failed save the
    /// field rolls back to its previous value and stays in editing.
    pub async fn commit(&self, binding: &FieldBinding, draft: &str) -> Result<String, SessionError> {
        let commit = {
            let mut f = self.fields.get_mut(binding).ok_or(EditError::NotEditing)?;
            if !self.mode.is_on() {
                f.cancel();
                return Err(EditError::EditModeOff.into());
            }
            f.input(draft)?;
            f.confirm()?
        };
        match self.target.save(binding, &commit.value).await {
            Ok(()) => {
                info!(event = "inline_saved", binding = %binding);
                Ok(commit.value)
            }
            Err(e) => {
                warn!(event = "inline_save_failed", binding = %binding, error = %e);
                if let Some(mut f) = self.fields.get_mut(binding) {
                    f.rollback(commit);
                }
                Err(SessionError::Save(e))
            }
        }
    }

    /// Flip edit mode. Turning it off closes every open editor unsaved.
    pub fn toggle_mode(&self) -> bool {
        let on = self.mode.toggle();
        if !on {
            self.revert_all();
        }
        on
    }

    fn revert_all(&self) {
        let mut reverted = 0usize;
        for mut f in self.fields.iter_mut() {
            if f.sync_mode(false) {
                reverted += 1;
            }
        }
        if reverted > 0 {
            info!(event = "inline_edits_reverted", count = reverted);
        }
    }
}
