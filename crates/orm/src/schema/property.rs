//! Column property descriptors

use serde::{Deserialize, Serialize};

/// SQLite column type affinity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    Blob,
}

impl ColumnType {
    /// SQL type keyword used in CREATE TABLE statements.
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
            ColumnType::Blob => "BLOB",
        }
    }
}

/// Descriptor for a single declared column
///
/// Properties are ordered; the declaration order drives positional cursor
/// reads and statement binding, so it must match the generated SQL exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    name: String,
    column_type: ColumnType,
    nullable: bool,
    primary_key: bool,
}

impl Property {
    /// Create a nullable, non-key column property.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            primary_key: false,
        }
    }

    /// Mark the column NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark the column as (part of) the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_defaults() {
        let prop = Property::new("name", ColumnType::Text);
        assert!(prop.is_nullable());
        assert!(!prop.is_primary_key());
    }

    #[test]
    fn test_property_modifiers() {
        let prop = Property::new("id", ColumnType::Integer).not_null().primary_key();
        assert!(!prop.is_nullable());
        assert!(prop.is_primary_key());
        assert_eq!(prop.column_type().sql_type(), "INTEGER");
    }
}
