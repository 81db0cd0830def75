//! Temp-database fixture shared by the repository tests.

use diesel::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

use crate::db::{create_pool, get_connection, run_migrations, spawn_writer, DbPool, WriteHandle};
use crate::schema::users;

pub(crate) struct TestDb {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    // Keeps the database file alive for the duration of the test.
    _dir: TempDir,
}

/// Migrated database in a fresh temp directory, with its writer running.
/// Must be called from inside a Tokio runtime.
pub(crate) fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db").to_string_lossy().to_string();

    crate::db::init(&db_path).expect("Failed to init database");
    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());

    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}

pub(crate) fn insert_user(pool: &DbPool, user_id: &str) {
    let mut conn = get_connection(pool).expect("Failed to get connection");
    diesel::insert_or_ignore_into(users::table)
        .values((
            users::id.eq(user_id),
            users::created_at.eq("2024-01-01T00:00:00.000000Z"),
        ))
        .execute(&mut conn)
        .expect("Failed to create test user");
}

pub(crate) fn count_rows(pool: &DbPool, table: &str) -> i64 {
    use diesel::sql_types::BigInt;

    #[derive(diesel::QueryableByName)]
    struct Count {
        #[diesel(sql_type = BigInt)]
        n: i64,
    }

    let mut conn = get_connection(pool).expect("Failed to get connection");
    diesel::sql_query(format!("SELECT COUNT(*) AS n FROM {}", table))
        .get_result::<Count>(&mut conn)
        .expect("Failed to count rows")
        .n
}
