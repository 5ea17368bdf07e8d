//! Submitted form data.

/// A single submitted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Text input, select or textarea value.
    Text(String),
    /// File input value.
    File {
        /// Original file name.
        file_name: String,
        /// MIME type reported by the browser.
        content_type: Option<String>,
        /// File contents.
        bytes: Vec<u8>,
    },
}

impl FieldValue {
    /// Returns the value as seen by validators.
    ///
    /// Files are represented by their file name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::File { file_name, .. } => file_name,
        }
    }

    /// Returns whether this value is a file.
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }
}

/// Ordered field set of a form, as serialized for submission.
///
/// A name may appear several times (checkbox groups, multi-selects).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, FieldValue)>,
}

impl FormData {
    /// Creates empty form data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a text value.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .push((name.into(), FieldValue::Text(value.into())));
    }

    /// Appends a file value.
    pub fn append_file(
        &mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<String>,
        bytes: impl Into<Vec<u8>>,
    ) {
        self.entries.push((
            name.into(),
            FieldValue::File {
                file_name: file_name.into(),
                content_type,
                bytes: bytes.into(),
            },
        ));
    }

    /// Builder form of [`append`](Self::append).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// Returns the first value submitted under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns every value submitted under `name`.
    pub fn get_all(&self, name: &str) -> Vec<&FieldValue> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, value)| value)
            .collect()
    }

    /// Returns whether any entry is a file.
    pub fn has_files(&self) -> bool {
        self.entries.iter().any(|(_, value)| value.is_file())
    }

    /// Iterates over all entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (name, value) in iter {
            data.append(name, value);
        }
        data
    }
}
