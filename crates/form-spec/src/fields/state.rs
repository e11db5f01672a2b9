/// Delimiter joining the selected values of multi-value fields.
pub const MULTI_VALUE_DELIMITER: &str = ";";

/// Locally edited value of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalValue {
    Scalar(Option<String>),
    /// Ordered selection without duplicates.
    Set(Vec<String>),
}

impl Default for LocalValue {
    fn default() -> Self {
        LocalValue::Scalar(None)
    }
}

impl LocalValue {
    /// Builds an ordered set from a `;` delimited string, dropping repeats.
    pub fn split_set(raw: Option<&str>) -> Self {
        let mut values: Vec<String> = Vec::new();
        for part in raw
            .unwrap_or_default()
            .split(MULTI_VALUE_DELIMITER)
            .filter(|part| !part.is_empty())
        {
            if !values.iter().any(|value| value == part) {
                values.push(part.to_string());
            }
        }
        LocalValue::Set(values)
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            LocalValue::Scalar(value) => value.as_deref(),
            LocalValue::Set(_) => None,
        }
    }

    pub fn contains(&self, candidate: &str) -> bool {
        match self {
            LocalValue::Scalar(value) => value.as_deref() == Some(candidate),
            LocalValue::Set(values) => values.iter().any(|value| value == candidate),
        }
    }

    /// The string a browser would submit for this value.
    pub fn submitted(&self) -> String {
        match self {
            LocalValue::Scalar(value) => value.clone().unwrap_or_default(),
            LocalValue::Set(values) => values.join(MULTI_VALUE_DELIMITER),
        }
    }

    /// Adds `value` to a set unless already present.
    pub fn insert(&mut self, value: &str) {
        if let LocalValue::Set(values) = self
            && !values.iter().any(|existing| existing == value)
        {
            values.push(value.to_string());
        }
    }

    /// Removes `value` from a set; absent values are ignored.
    pub fn remove(&mut self, value: &str) {
        if let LocalValue::Set(values) = self
            && let Some(index) = values.iter().position(|existing| existing == value)
        {
            values.remove(index);
        }
    }
}

/// Hybrid controlled/uncontrolled state of a field: the last external value
/// seen and the locally edited value derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldState {
    external: Option<String>,
    local: LocalValue,
}

impl FieldState {
    pub fn new(external: Option<&str>, local: LocalValue) -> Self {
        Self {
            external: external.map(str::to_string),
            local,
        }
    }

    pub fn local(&self) -> &LocalValue {
        &self.local
    }

    pub fn local_mut(&mut self) -> &mut LocalValue {
        &mut self.local
    }

    pub fn external(&self) -> Option<&str> {
        self.external.as_deref()
    }

    /// Overwrites the local value when the external value differs from the last
    /// one seen. Returns whether a reset happened; user edits survive otherwise.
    pub fn reconcile(
        &mut self,
        external: Option<&str>,
        normalize: impl FnOnce(Option<&str>) -> LocalValue,
    ) -> bool {
        if self.external.as_deref() == external {
            return false;
        }
        self.external = external.map(str::to_string);
        self.local = normalize(external);
        true
    }
}
