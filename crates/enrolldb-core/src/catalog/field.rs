//! Field definitions for entities.

/// Scalar type of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    /// 64-bit signed integer.
    Int64,
    /// Timestamp (microseconds since Unix epoch).
    Timestamp,
    /// UTF-8 string.
    String,
    /// Reference to another record by internal identity.
    Reference,
}

/// A field definition within an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Field data type.
    pub scalar: ScalarType,
    /// Whether the field is required at the application level.
    ///
    /// Declared for documentation; presence checking belongs to the
    /// input-validation layer in front of the core.
    pub required: bool,
    /// Strip surrounding whitespace from string values on write.
    pub trim: bool,
    /// Upper-case string values on write.
    pub uppercase: bool,
}

impl FieldDef {
    /// Create a required field.
    pub fn new(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self {
            name: name.into(),
            scalar,
            required: true,
            trim: false,
            uppercase: false,
        }
    }

    /// Create a required integer field.
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::Int64)
    }

    /// Create a required timestamp field.
    pub fn timestamp(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::Timestamp)
    }

    /// Create a required text field (trimmed on write).
    pub fn text(name: impl Into<String>) -> Self {
        let mut field = Self::new(name, ScalarType::String);
        field.trim = true;
        field
    }

    /// Create an optional text field (trimmed on write).
    pub fn optional_text(name: impl Into<String>) -> Self {
        let mut field = Self::text(name);
        field.required = false;
        field
    }

    /// Upper-case string values on write.
    pub fn uppercased(mut self) -> Self {
        self.uppercase = true;
        self
    }

    /// Mark the field optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_fields_trim() {
        let field = FieldDef::text("Last_Name");
        assert!(field.trim);
        assert!(field.required);
        assert!(!field.uppercase);
    }

    #[test]
    fn test_uppercased_optional() {
        let field = FieldDef::optional_text("Middle_Initial").uppercased();
        assert!(!field.required);
        assert!(field.trim);
        assert!(field.uppercase);
    }
}
