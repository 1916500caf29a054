//! SQL text generation
//!
//! Builds the per-table statement strings from descriptor metadata. The
//! output is deterministic: same descriptor, same text. Identifiers are
//! double-quoted, placeholders are positional `?`.

use crate::schema::TableDescriptor;

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier)
}

/// `INSERT[ OR <action>] INTO "t"("a","b") VALUES (?,?)`
pub fn insert_query(descriptor: &TableDescriptor) -> String {
    let columns: Vec<String> = descriptor
        .properties()
        .iter()
        .map(|p| quote(p.name()))
        .collect();
    let placeholders = vec!["?"; columns.len()].join(",");
    format!(
        "INSERT{} INTO {}({}) VALUES ({})",
        descriptor.insert_conflict().sql_infix(),
        quote(descriptor.table()),
        columns.join(","),
        placeholders
    )
}

/// `UPDATE[ OR <action>] "t" SET "a"=?,"b"=? WHERE "id"=?`
pub fn update_query(descriptor: &TableDescriptor) -> String {
    let set: Vec<String> = descriptor
        .update_set_properties()
        .map(|p| format!("{}=?", quote(p.name())))
        .collect();
    format!(
        "UPDATE{} {} SET {} WHERE {}",
        descriptor.update_conflict().sql_infix(),
        quote(descriptor.table()),
        set.join(","),
        key_clause(descriptor)
    )
}

/// `DELETE FROM "t" WHERE "id"=?`
pub fn delete_query(descriptor: &TableDescriptor) -> String {
    format!(
        "DELETE FROM {} WHERE {}",
        quote(descriptor.table()),
        key_clause(descriptor)
    )
}

/// `CREATE TABLE IF NOT EXISTS "t"(...)`
pub fn creation_query(descriptor: &TableDescriptor) -> String {
    let auto_increment = descriptor.auto_increment().map(|p| p.name());
    let mut columns = Vec::with_capacity(descriptor.properties().len());
    for property in descriptor.properties() {
        let mut column = format!(
            "{} {}",
            quote(property.name()),
            property.column_type().sql_type()
        );
        if auto_increment == Some(property.name()) {
            column.push_str(" PRIMARY KEY AUTOINCREMENT");
        } else if !property.is_nullable() {
            column.push_str(" NOT NULL");
        }
        columns.push(column);
    }

    // Without an autoincrement rowid alias the key becomes a table constraint.
    if auto_increment.is_none() {
        let keys: Vec<String> = descriptor
            .primary_properties()
            .map(|p| quote(p.name()))
            .collect();
        if !keys.is_empty() {
            columns.push(format!("PRIMARY KEY({})", keys.join(",")));
        }
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {}({})",
        quote(descriptor.table()),
        columns.join(",")
    )
}

fn key_clause(descriptor: &TableDescriptor) -> String {
    let keys: Vec<String> = descriptor
        .primary_properties()
        .map(|p| format!("{}=?", quote(p.name())))
        .collect();
    keys.join(" AND ")
}
