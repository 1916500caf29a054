//! Table descriptors - immutable per-entity-type metadata
//!
//! Built once when an entity type is registered, validated at construction
//! time so that malformed mappings surface as `OrmError::Configuration`
//! before any load or save runs. Generated SQL text is cached lazily and is
//! idempotent across calls.

use std::collections::HashMap;

use once_cell::unsync::OnceCell;

use crate::error::{OrmError, OrmResult};
use crate::schema::{ColumnType, ConflictAction, Property};
use crate::sql;

/// Immutable metadata for one mapped table
#[derive(Debug)]
pub struct TableDescriptor {
    table: String,
    properties: Vec<Property>,
    index_by_name: HashMap<String, usize>,
    caching_column: usize,
    auto_increment: Option<usize>,
    insert_conflict: ConflictAction,
    update_conflict: ConflictAction,
    insert_query: OnceCell<String>,
    update_query: OnceCell<String>,
    delete_query: OnceCell<String>,
    creation_query: OnceCell<String>,
}

impl TableDescriptor {
    pub fn builder(table: impl Into<String>) -> TableDescriptorBuilder {
        TableDescriptorBuilder {
            table: table.into(),
            properties: Vec::new(),
            caching_column: None,
            auto_increment: None,
            insert_conflict: ConflictAction::default(),
            update_conflict: ConflictAction::default(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Declared columns, in declaration order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Look up a property by column name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.property_index(name).map(|i| &self.properties[i])
    }

    /// Positional index of a column, matching cursor and bind positions.
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    /// The column whose value keys the model cache.
    pub fn caching_column(&self) -> &Property {
        &self.properties[self.caching_column]
    }

    pub fn caching_column_index(&self) -> usize {
        self.caching_column
    }

    pub fn auto_increment(&self) -> Option<&Property> {
        self.auto_increment.map(|i| &self.properties[i])
    }

    pub fn insert_conflict(&self) -> ConflictAction {
        self.insert_conflict
    }

    pub fn update_conflict(&self) -> ConflictAction {
        self.update_conflict
    }

    /// Primary key columns, in declaration order.
    pub fn primary_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.is_primary_key())
    }

    /// Columns written by the UPDATE SET clause (everything but the key).
    pub fn update_set_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| !p.is_primary_key())
    }

    pub fn insert_query(&self) -> &str {
        self.insert_query.get_or_init(|| sql::insert_query(self))
    }

    pub fn update_query(&self) -> &str {
        self.update_query.get_or_init(|| sql::update_query(self))
    }

    pub fn delete_query(&self) -> &str {
        self.delete_query.get_or_init(|| sql::delete_query(self))
    }

    pub fn creation_query(&self) -> &str {
        self.creation_query.get_or_init(|| sql::creation_query(self))
    }
}

/// Builder for `TableDescriptor`; `build` performs all validation.
#[derive(Debug)]
pub struct TableDescriptorBuilder {
    table: String,
    properties: Vec<Property>,
    caching_column: Option<String>,
    auto_increment: Option<String>,
    insert_conflict: ConflictAction,
    update_conflict: ConflictAction,
}

impl TableDescriptorBuilder {
    /// Declare the next column. Declaration order is binding order.
    pub fn column(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Name the column used as the cache key. Defaults to the primary key
    /// column when the table has exactly one.
    pub fn caching_column(mut self, name: impl Into<String>) -> Self {
        self.caching_column = Some(name.into());
        self
    }

    /// Name the autoincrement rowid column. Only valid for tables whose
    /// primary key is that single INTEGER column.
    pub fn auto_increment(mut self, name: impl Into<String>) -> Self {
        self.auto_increment = Some(name.into());
        self
    }

    pub fn insert_conflict(mut self, action: ConflictAction) -> Self {
        self.insert_conflict = action;
        self
    }

    pub fn update_conflict(mut self, action: ConflictAction) -> Self {
        self.update_conflict = action;
        self
    }

    pub fn build(self) -> OrmResult<TableDescriptor> {
        if self.properties.is_empty() {
            return Err(OrmError::Configuration(format!(
                "table '{}' declares no columns",
                self.table
            )));
        }

        let mut index_by_name = HashMap::with_capacity(self.properties.len());
        for (index, property) in self.properties.iter().enumerate() {
            if index_by_name
                .insert(property.name().to_string(), index)
                .is_some()
            {
                return Err(OrmError::Configuration(format!(
                    "table '{}' declares column '{}' twice",
                    self.table,
                    property.name()
                )));
            }
        }

        let caching_column = match &self.caching_column {
            Some(name) => *index_by_name.get(name.as_str()).ok_or_else(|| {
                OrmError::Configuration(format!(
                    "caching column '{}' is not declared on table '{}'",
                    name, self.table
                ))
            })?,
            None => {
                let mut keys = self
                    .properties
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.is_primary_key());
                match (keys.next(), keys.next()) {
                    (Some((index, _)), None) => index,
                    _ => {
                        return Err(OrmError::Configuration(format!(
                            "table '{}' needs an explicit caching column: it does \
                             not have exactly one primary key column",
                            self.table
                        )))
                    }
                }
            }
        };

        let auto_increment = match &self.auto_increment {
            Some(name) => {
                let index = *index_by_name.get(name.as_str()).ok_or_else(|| {
                    OrmError::Configuration(format!(
                        "autoincrement column '{}' is not declared on table '{}'",
                        name, self.table
                    ))
                })?;
                let property = &self.properties[index];
                let single_key = self
                    .properties
                    .iter()
                    .filter(|p| p.is_primary_key())
                    .count()
                    == 1;
                if !property.is_primary_key()
                    || !single_key
                    || property.column_type() != ColumnType::Integer
                {
                    return Err(OrmError::Configuration(format!(
                        "autoincrement column '{}' on table '{}' must be the \
                         single INTEGER primary key",
                        name, self.table
                    )));
                }
                Some(index)
            }
            None => None,
        };

        Ok(TableDescriptor {
            table: self.table,
            properties: self.properties,
            index_by_name,
            caching_column,
            auto_increment,
            insert_conflict: self.insert_conflict,
            update_conflict: self.update_conflict,
            insert_query: OnceCell::new(),
            update_query: OnceCell::new(),
            delete_query: OnceCell::new(),
            creation_query: OnceCell::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_descriptor() -> TableDescriptor {
        TableDescriptor::builder("users")
            .column(Property::new("id", ColumnType::Integer).primary_key())
            .column(Property::new("name", ColumnType::Text).not_null())
            .column(Property::new("age", ColumnType::Integer))
            .auto_increment("id")
            .build()
            .unwrap()
    }

    #[test]
    fn test_caching_column_defaults_to_primary_key() {
        let descriptor = user_descriptor();
        assert_eq!(descriptor.caching_column().name(), "id");
        assert_eq!(descriptor.caching_column_index(), 0);
    }

    #[test]
    fn test_property_lookup_table() {
        let descriptor = user_descriptor();
        assert_eq!(descriptor.property_index("age"), Some(2));
        assert!(descriptor.property("missing").is_none());
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = TableDescriptor::builder("t")
            .column(Property::new("a", ColumnType::Text))
            .column(Property::new("a", ColumnType::Text))
            .build();
        assert!(matches!(result, Err(OrmError::Configuration(_))));
    }

    #[test]
    fn test_missing_caching_column_rejected() {
        let result = TableDescriptor::builder("t")
            .column(Property::new("a", ColumnType::Text))
            .column(Property::new("b", ColumnType::Text))
            .build();
        assert!(matches!(result, Err(OrmError::Configuration(_))));
    }

    #[test]
    fn test_autoincrement_must_be_single_integer_key() {
        let result = TableDescriptor::builder("t")
            .column(Property::new("id", ColumnType::Text).primary_key())
            .auto_increment("id")
            .build();
        assert!(matches!(result, Err(OrmError::Configuration(_))));
    }

    #[test]
    fn test_queries_are_idempotent() {
        let descriptor = user_descriptor();
        let first = descriptor.insert_query().to_string();
        assert_eq!(descriptor.insert_query(), first);
    }
}
