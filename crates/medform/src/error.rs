//! Error types for form validation.

use thiserror::Error;

/// Form configuration errors.
#[derive(Debug, Error)]
pub enum FormError {
    /// A field references a validator the registry does not know.
    #[error("unknown validator '{rule}' on field '{field}'")]
    UnknownRule { field: String, rule: String },

    /// The rule or message declaration has an unsupported shape.
    #[error("invalid rule declaration: {0}")]
    InvalidRules(String),

    /// Declaration JSON could not be parsed.
    #[error("failed to parse declaration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Field-to-message mapping produced by one validation pass.
///
/// Holds at most one message per field. Entries keep the order in which
/// fields were declared in the form's rules, so the first entry is always
/// the first errored field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: Vec<(String, String)>,
}

impl ErrorMap {
    /// Creates a new empty error map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records an error for a field.
    ///
    /// A field that already has a message keeps it.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.entries.push((field.to_string(), message.into()));
        }
    }

    /// Removes a field's error, returning its message.
    pub fn remove(&mut self, field: &str) -> Option<String> {
        let index = self.entries.iter().position(|(name, _)| name == field)?;
        Some(self.entries.remove(index).1)
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the message for a specific field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, message)| message.as_str())
    }

    /// Returns the first errored field and its message.
    pub fn first(&self) -> Option<(&str, &str)> {
        self.entries
            .first()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    /// Iterates over `(field, message)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    /// Returns the errored field names in declaration order.
    pub fn fields(&self) -> Vec<&str> {
        self.entries.iter().map(|(field, _)| field.as_str()).collect()
    }
}

impl std::fmt::Display for ErrorMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (field, message) in &self.entries {
            writeln!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_per_field_wins() {
        let mut errors = ErrorMap::new();
        errors.insert("name", "Name is required");
        errors.insert("name", "Name is too short");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("name"), Some("Name is required"));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut errors = ErrorMap::new();
        errors.insert("name", "required");
        errors.insert("age", "out of range");
        errors.insert("email", "invalid");

        assert_eq!(errors.remove("age").as_deref(), Some("out of range"));
        assert_eq!(errors.remove("age"), None);
        assert_eq!(errors.fields(), vec!["name", "email"]);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut errors = ErrorMap::new();
        errors.insert("zeta", "z");
        errors.insert("alpha", "a");

        assert_eq!(errors.fields(), vec!["zeta", "alpha"]);
        assert_eq!(errors.first(), Some(("zeta", "z")));
    }

    #[test]
    fn test_display() {
        let mut errors = ErrorMap::new();
        errors.insert("email", "Enter a valid email address.");
        assert_eq!(errors.to_string(), "email: Enter a valid email address.\n");
    }
}
