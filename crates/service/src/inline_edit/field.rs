use thiserror::Error;

/// Whether the editor is an input or a textarea.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    SingleLine,
    MultiLine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldState {
    Display,
    Editing { draft: String },
}

/// What the field renders as, given the global edit mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldView<'a> {
    /// Edit mode off: plain text, no affordances.
    Locked(&'a str),
    /// Edit mode on: text with a pencil affordance.
    Display(&'a str),
    Editing(&'a str),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("edit mode is off")]
    EditModeOff,
    #[error("field is not being edited")]
    NotEditing,
}

/// A confirmed edit waiting for the save callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub previous: String,
    pub value: String,
}

/// One bound text field of the inline edit overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableField {
    kind: FieldKind,
    value: String,
    state: FieldState,
}

impl EditableField {
    pub fn new(kind: FieldKind, value: impl Into<String>) -> Self {
        Self { kind, value: value.into(), state: FieldState::Display }
    }

    pub fn kind(&self) -> FieldKind { self.kind }

    pub fn value(&self) -> &str { &self.value }

    pub fn state(&self) -> &FieldState { &self.state }

    pub fn is_editing(&self) -> bool { matches!(self.state, FieldState::Editing { .. }) }

    pub fn view(&self, edit_mode_on: bool) -> FieldView<'_> {
        match (&self.state, edit_mode_on) {
            (_, false) => FieldView::Locked(&self.value),
            (FieldState::Display, true) => FieldView::Display(&self.value),
            (FieldState::Editing { draft }, true) => FieldView::Editing(draft),
        }
    }

    /// Display -> Editing, with the editor pre-filled with the current value.
    pub fn activate(&mut self, edit_mode_on: bool) -> Result<(), EditError> {
        if !edit_mode_on {
            return Err(EditError::EditModeOff);
        }
        if !self.is_editing() {
            self.state = FieldState::Editing { draft: self.value.clone() };
        }
        Ok(())
    }

    pub fn input(&mut self, text: impl Into<String>) -> Result<(), EditError> {
        match &mut self.state {
            FieldState::Editing { draft } => {
                *draft = text.into();
                Ok(())
            }
            FieldState::Display => Err(EditError::NotEditing),
        }
    }

    /// Editing -> Display showing the draft. The caller saves `Commit::value`
    /// and calls [`EditableField::rollback`] if the save fails.
    pub fn confirm(&mut self) -> Result<Commit, EditError> {
        let FieldState::Editing { draft } = std::mem::replace(&mut self.state, FieldState::Display) else {
            return Err(EditError::NotEditing);
        };
        let previous = std::mem::replace(&mut self.value, draft.clone());
        Ok(Commit { previous, value: draft })
    }

    /// Editing -> Display, draft discarded.
    pub fn cancel(&mut self) {
        self.state = FieldState::Display;
    }

    /// Undo an optimistic commit whose save failed: restore the persisted
    /// value and reopen the editor holding the rejected draft.
    pub fn rollback(&mut self, commit: Commit) {
        self.value = commit.previous;
        self.state = FieldState::Editing { draft: commit.value };
    }

    /// Adopt a freshly fetched value. An open editor keeps its draft.
    pub fn sync_external(&mut self, value: &str) {
        if self.value != value {
            self.value = value.to_string();
        }
    }

    /// Edit mode turned off: drop any open editor without saving.
    pub fn sync_mode(&mut self, edit_mode_on: bool) -> bool {
        if !edit_mode_on && self.is_editing() {
            self.cancel();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_when_mode_off_and_cannot_activate() {
        let mut f = EditableField::new(FieldKind::SingleLine, "Уборка");
        assert_eq!(f.view(false), FieldView::Locked("Уборка"));
        assert_eq!(f.activate(false), Err(EditError::EditModeOff));
        assert_eq!(f.state(), &FieldState::Display);
    }

    #[test]
    fn confirm_shows_the_draft_and_reports_the_previous_value() {
        let mut f = EditableField::new(FieldKind::SingleLine, "a");
        f.activate(true).unwrap();
        f.input("b").unwrap();
        assert_eq!(f.view(true), FieldView::Editing("b"));
        assert_eq!(f.confirm().unwrap(), Commit { previous: "a".into(), value: "b".into() });
        assert_eq!(f.view(true), FieldView::Display("b"));
    }

    #[test]
    fn cancel_keeps_the_value() {
        let mut f = EditableField::new(FieldKind::MultiLine, "old");
        f.activate(true).unwrap();
        f.input("new").unwrap();
        f.cancel();
        assert_eq!(f.value(), "old");
        assert!(!f.is_editing());
    }

    #[test]
    fn rollback_restores_value_and_keeps_draft() {
        let mut f = EditableField::new(FieldKind::SingleLine, "old");
        f.activate(true).unwrap();
        f.input("new").unwrap();
        let commit = f.confirm().unwrap();
        assert_eq!(f.value(), "new");
        f.rollback(commit);
        assert_eq!(f.value(), "old");
        assert_eq!(f.view(true), FieldView::Editing("new"));
    }

    #[test]
    fn turning_mode_off_reverts_editor_without_saving() {
        let mut f = EditableField::new(FieldKind::SingleLine, "persisted");
        f.activate(true).unwrap();
        f.input("unsaved").unwrap();
        assert!(f.sync_mode(false));
        assert_eq!(f.view(false), FieldView::Locked("persisted"));
        // re-enabling does not resurrect the old draft
        assert_eq!(f.view(true), FieldView::Display("persisted"));
    }

    #[test]
    fn input_outside_editing_is_rejected() {
        let mut f = EditableField::new(FieldKind::SingleLine, "x");
        assert_eq!(f.input("y"), Err(EditError::NotEditing));
        assert_eq!(f.confirm(), Err(EditError::NotEditing));
    }
}
