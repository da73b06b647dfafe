use serde::Serialize;

/// Outcome of one or more checks.
///
/// Errors and warnings keep insertion order. Pre-flight code merges every
/// sub-check into one result instead of returning on the first failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            errors: vec![error.into()],
            warnings: Vec::new(),
        }
    }

    pub fn failures<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            errors: errors.into_iter().map(Into::into).collect(),
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Appends `other`'s errors and warnings. Valid only if both were.
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.absorb(other);
        self
    }

    /// In-place form of [`merge`](Self::merge).
    pub fn absorb(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }

    pub fn all_errors(&self) -> String {
        self.errors.join("\n")
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.errors, self.warnings)
    }
}

impl From<Result<(), crate::domain::DomainError>> for ValidationResult {
    fn from(result: Result<(), crate::domain::DomainError>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}
