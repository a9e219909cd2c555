//! Inline Edit Overlay: per-field Display/Editing state machine gated by a
//! shared edit-mode flag, committing through the Data Access Layer.

pub mod binding;
pub mod edit_mode;
pub mod field;
pub mod session;

pub use binding::FieldBinding;
pub use edit_mode::EditMode;
pub use field::{EditError, EditableField, FieldKind, FieldState, FieldView};
pub use session::{EditSession, SaveTarget, SessionError};
