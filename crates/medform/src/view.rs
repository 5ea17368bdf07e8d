//! Seams between validation logic and the rendered form.

use crate::data::FormData;

/// A rendered form the engine reads from and reports errors onto.
pub trait FormView {
    /// Snapshot of the current field values.
    fn form_data(&self) -> FormData;

    /// Puts a field into its error state.
    ///
    /// The field gets its error styling and exactly one feedback element,
    /// placed right after it, showing `message`.
    fn show_field_error(&mut self, field: &str, message: &str);

    /// Removes a field's error styling and empties its feedback text.
    fn clear_field_error(&mut self, field: &str);

    /// Moves input focus to a field.
    fn focus(&mut self, field: &str);

    /// Performs the standard, non-intercepted form submission.
    fn submit_native(&mut self);
}

/// The submit button of a form.
pub trait SubmitControl {
    /// Current label, or `None` when the form has no submit control.
    fn submit_label(&self) -> Option<String>;

    /// Sets the control's disabled state and label.
    fn set_submit_state(&mut self, disabled: bool, label: &str);
}
