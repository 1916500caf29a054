//! End-to-end tests against the rusqlite backend.

#![cfg(feature = "sqlite")]

mod common;

use std::rc::Rc;

use common::{User, UserAdapter};
use pocket_orm::backends::{SqliteCursor, SqliteDatabase};
use pocket_orm::{
    CacheableModelLoader, Database, MapModelCache, ModelAdapter, ModelSaver, SqlValue,
};

fn setup(adapter: &UserAdapter) -> SqliteDatabase {
    let db = SqliteDatabase::open_in_memory().unwrap();
    db.execute_raw(adapter.descriptor().creation_query()).unwrap();
    db
}

fn insert_users(db: &SqliteDatabase, adapter: &UserAdapter, names: &[&str]) -> Vec<User> {
    let mut saver = ModelSaver::new(db, adapter);
    names
        .iter()
        .map(|name| {
            let mut user = User {
                id: None,
                name: name.to_string(),
                group_id: None,
            };
            saver.insert(&mut user).unwrap();
            user
        })
        .collect()
}

fn load_all(
    db: &SqliteDatabase,
    loader: &mut CacheableModelLoader<'_, UserAdapter, MapModelCache<User>>,
) -> Vec<std::rc::Rc<std::cell::RefCell<User>>> {
    let mut stmt = db
        .connection()
        .prepare("SELECT \"id\",\"name\",\"group_id\" FROM \"users\" ORDER BY \"id\"")
        .unwrap();
    let mut cursor = SqliteCursor::new(&mut stmt, &[]).unwrap();
    loader.load(&mut cursor, None).unwrap()
}

#[test]
fn insert_assigns_sequential_autoincrement_ids() {
    let adapter = UserAdapter::new(false);
    let db = setup(&adapter);
    let users = insert_users(&db, &adapter, &["a", "b"]);
    assert_eq!(users[0].id, Some(1));
    assert_eq!(users[1].id, Some(2));
}

#[test]
fn loaded_rows_match_inserted_models() {
    let adapter = UserAdapter::new(true);
    let db = setup(&adapter);
    insert_users(&db, &adapter, &["a", "b"]);

    let mut loader = CacheableModelLoader::new(&adapter, MapModelCache::new());
    let results = load_all(&db, &mut loader);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].borrow().name, "a");
    assert_eq!(results[1].borrow().id, Some(2));
}

#[test]
fn reload_hits_cache_and_refreshes_relationships() {
    let adapter = UserAdapter::new(true);
    let db = setup(&adapter);
    insert_users(&db, &adapter, &["a"]);

    let mut loader = CacheableModelLoader::new(&adapter, MapModelCache::new());
    let first = load_all(&db, &mut loader);

    // Mutate the relationship column behind the cache's back.
    let mut stmt = db
        .compile_statement("UPDATE \"users\" SET \"group_id\"=? WHERE \"id\"=?")
        .unwrap();
    stmt.bind(1, &SqlValue::Integer(42)).unwrap();
    stmt.bind(2, &SqlValue::Integer(1)).unwrap();
    assert_eq!(stmt.execute_update_delete().unwrap(), 1);
    drop(stmt);

    let second = load_all(&db, &mut loader);
    assert!(Rc::ptr_eq(&first[0], &second[0]));
    assert_eq!(second[0].borrow().group_id, Some(42));
}

#[test]
fn update_and_delete_round_trip() {
    let adapter = UserAdapter::new(false);
    let db = setup(&adapter);
    let mut users = insert_users(&db, &adapter, &["a"]);
    let mut saver = ModelSaver::new(&db, &adapter);

    users[0].name = "renamed".to_string();
    assert!(saver.update(&users[0]).unwrap());

    let mut loader = CacheableModelLoader::new(&adapter, MapModelCache::new());
    let results = load_all(&db, &mut loader);
    assert_eq!(results[0].borrow().name, "renamed");

    assert!(saver.delete(&users[0]).unwrap());
    let mut loader = CacheableModelLoader::new(&adapter, MapModelCache::new());
    assert!(load_all(&db, &mut loader).is_empty());
}

#[test]
fn on_disk_database_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pocket.db");
    let path = path.to_str().unwrap();
    let adapter = UserAdapter::new(false);

    {
        let db = SqliteDatabase::open(path).unwrap();
        db.execute_raw(adapter.descriptor().creation_query()).unwrap();
        insert_users(&db, &adapter, &["persisted"]);
    }

    let db = SqliteDatabase::open(path).unwrap();
    let reread_adapter = UserAdapter::new(true);
    let mut loader = CacheableModelLoader::new(&reread_adapter, MapModelCache::new());
    let results = load_all(&db, &mut loader);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].borrow().name, "persisted");
}
