//! Shared test fixture: a `users` table with an autoincrement id, a NOT
//! NULL name, and a nullable group relationship column.

#![allow(dead_code)]

use pocket_orm::{
    bind_property, ColumnType, Cursor, DatabaseStatement, ModelAdapter, OrmResult, Property,
    SqlValue, TableDescriptor,
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub group_id: Option<i64>,
}

pub struct UserAdapter {
    descriptor: TableDescriptor,
    caching: bool,
}

impl UserAdapter {
    pub fn new(caching: bool) -> Self {
        let descriptor = TableDescriptor::builder("users")
            .column(Property::new("id", ColumnType::Integer).primary_key())
            .column(Property::new("name", ColumnType::Text).not_null())
            .column(Property::new("group_id", ColumnType::Integer))
            .auto_increment("id")
            .build()
            .expect("valid users descriptor");
        Self {
            descriptor,
            caching,
        }
    }
}

impl ModelAdapter for UserAdapter {
    type Model = User;

    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    fn new_model(&self) -> User {
        User::default()
    }

    fn load_from_cursor(&self, cursor: &dyn Cursor, model: &mut User) -> OrmResult<()> {
        model.id = cursor.get_optional_integer(0)?;
        model.name = cursor.get_text(1)?;
        model.group_id = cursor.get_optional_integer(2)?;
        Ok(())
    }

    fn bind_to_insert(
        &self,
        statement: &mut dyn DatabaseStatement,
        model: &User,
        start_index: usize,
    ) -> OrmResult<()> {
        let table = self.descriptor.table();
        let properties = self.descriptor.properties();
        bind_property(
            statement,
            start_index,
            &SqlValue::from(model.id),
            table,
            &properties[0],
        )?;
        bind_property(
            statement,
            start_index + 1,
            &SqlValue::from(model.name.clone()),
            table,
            &properties[1],
        )?;
        bind_property(
            statement,
            start_index + 2,
            &SqlValue::from(model.group_id),
            table,
            &properties[2],
        )?;
        Ok(())
    }

    fn bind_to_update(
        &self,
        statement: &mut dyn DatabaseStatement,
        model: &User,
        start_index: usize,
    ) -> OrmResult<()> {
        let table = self.descriptor.table();
        let properties = self.descriptor.properties();
        bind_property(
            statement,
            start_index,
            &SqlValue::from(model.name.clone()),
            table,
            &properties[1],
        )?;
        bind_property(
            statement,
            start_index + 1,
            &SqlValue::from(model.group_id),
            table,
            &properties[2],
        )?;
        bind_property(
            statement,
            start_index + 2,
            &SqlValue::from(model.id),
            table,
            &properties[0],
        )?;
        Ok(())
    }

    fn bind_to_delete(
        &self,
        statement: &mut dyn DatabaseStatement,
        model: &User,
        start_index: usize,
    ) -> OrmResult<()> {
        bind_property(
            statement,
            start_index,
            &SqlValue::from(model.id),
            self.descriptor.table(),
            &self.descriptor.properties()[0],
        )
    }

    fn caching_enabled(&self) -> bool {
        self.caching
    }

    fn reload_relationships(&self, cursor: &dyn Cursor, model: &mut User) -> OrmResult<()> {
        model.group_id = cursor.get_optional_integer(2)?;
        Ok(())
    }

    fn auto_increment_id(&self, model: &User) -> OrmResult<Option<i64>> {
        Ok(model.id)
    }

    fn update_auto_increment(&self, model: &mut User, id: i64) {
        model.id = Some(id);
    }
}

/// Row builder for buffered cursors: (id, name, group_id).
pub fn user_row(id: Option<i64>, name: &str, group_id: Option<i64>) -> Vec<SqlValue> {
    vec![
        SqlValue::from(id),
        SqlValue::Text(name.to_string()),
        SqlValue::from(group_id),
    ]
}
