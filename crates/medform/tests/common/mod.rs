#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use medform::{
    FormController, FormRules, FormValidator, HtmlField, HtmlForm, MessageTable, Notification,
    NotificationSink, RuleSpec, ValidatorRegistry,
};

/// Notification sink remembering everything it was asked to show.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    shown: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn shown(&self) -> Vec<Notification> {
        self.shown.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.shown.lock().unwrap().push(notification);
    }
}

pub fn patient_rules() -> FormRules {
    FormRules::new()
        .field("name", "required")
        .field(
            "id_card",
            RuleSpec::rules().rule("required", true).rule("idCard", true),
        )
        .field(
            "age",
            RuleSpec::rules()
                .rule("required", true)
                .rule("positiveInteger", true)
                .rule("range", (0.0, 150.0)),
        )
        .field("email", RuleSpec::rules().rule("email", true))
}

pub fn patient_messages() -> MessageTable {
    MessageTable::new()
        .field("name", "Please enter the patient's name.")
        .rule("id_card", "required", "ID number is required.")
        .rule("id_card", "idCard", "Enter a valid ID number.")
        .rule("age", "range", "Age must be between 0 and 150.")
        .rule("email", "email", "Enter a valid email address.")
}

pub fn patient_controller() -> FormController {
    let registry = Arc::new(ValidatorRegistry::with_builtins());
    let validator = FormValidator::new(registry, patient_rules(), patient_messages())
        .expect("patient rules use built-in validators");
    FormController::new(validator)
}

pub fn patient_form() -> HtmlForm {
    HtmlForm::new("patient-form")
        .action("/patients/new/", "post")
        .field(HtmlField::new("name", "Name"))
        .field(HtmlField::new("id_card", "ID number"))
        .field(HtmlField::new("age", "Age").input_type("number"))
        .field(HtmlField::new("email", "Email").input_type("email"))
        .field(HtmlField::new("notes", "Notes"))
        .submit_button("Save")
}

pub fn fill_valid(form: &mut HtmlForm) {
    form.input("name", "Li Lei");
    form.input("id_card", "11010519900101123X");
    form.input("age", "34");
    form.input("email", "li.lei@example.com");
}
