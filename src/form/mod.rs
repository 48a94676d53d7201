//! The task form: draft state, the pure reducer that edits it, the label
//! picker, and the submit logic that validates and commits to the store.
//!
//! The form has no rendering of its own. The TUI and the CLI both drive it
//! by dispatching [`FormEvent`] values.

pub mod draft;
pub mod label_picker;
pub mod task_form;

pub use draft::{DraftEdit, DraftError, TaskDraft, parse_due_date, reduce};
pub use label_picker::LabelPicker;
pub use task_form::{FormContext, FormError, FormEvent, FormMode, FormPhase, TaskForm};
