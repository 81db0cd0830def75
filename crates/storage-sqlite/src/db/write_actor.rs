use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use log::{debug, error};
use std::any::Any;
use stocky_core::errors::{DatabaseError, Error, Result};
use tokio::sync::{mpsc, oneshot};

// Type alias for the job to be executed by the writer actor.
// We use core::Result here since that's what callers expect.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type AnyResult = Result<Box<dyn Any + Send + 'static>>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    #[allow(clippy::type_complexity)]
    tx: mpsc::Sender<(Job<Box<dyn Any + Send + 'static>>, oneshot::Sender<AnyResult>)>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// The job runs inside `BEGIN IMMEDIATE`. If the returned future is
    /// dropped before the job starts, the job is skipped; if it is dropped
    /// while the job runs, the transaction is rolled back instead of committed.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| {
                Error::Database(DatabaseError::ConnectionFailed(
                    "writer actor is not running".to_string(),
                ))
            })?;

        let boxed = ret_rx.await.map_err(|_| {
            Error::Database(DatabaseError::TransactionFailed(
                "writer actor dropped the reply without a result".to_string(),
            ))
        })??;

        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            Error::Unexpected("writer actor returned a value of the wrong type".to_string())
        })
    }
}

/// Spawns a background Tokio task that acts as the single writer to the database.
/// The actor owns one pooled connection and processes write jobs serially.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) =
        mpsc::channel::<(Job<Box<dyn Any + Send + 'static>>, oneshot::Sender<AnyResult>)>(1024);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                // Dropping the receiver fails every pending and future exec.
                error!("Writer actor could not acquire a connection: {}", e);
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            if reply_tx.is_closed() {
                debug!("Skipping write job whose caller is gone");
                continue;
            }

            let result: AnyResult = conn
                .immediate_transaction::<_, StorageError, _>(|c| {
                    let value = job(c).map_err(StorageError::from)?;
                    if reply_tx.is_closed() {
                        return Err(StorageError::Abandoned);
                    }
                    Ok(value)
                })
                .map_err(|e: StorageError| e.into());

            if let Err(Error::Database(DatabaseError::TransactionFailed(ref msg))) = result {
                debug!("Write job rolled back: {}", msg);
            }

            // The receiver may drop between commit and send; the write stands.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}

#[cfg(test)]
mod tests {
    use crate::schema::users;
    use crate::test_utils::{count_rows, test_db};
    use diesel::prelude::*;
    use diesel::SqliteConnection;
    use std::time::Duration;
    use stocky_core::errors::{Error, ValidationError};

    fn insert_user(conn: &mut SqliteConnection, id: &str) -> stocky_core::Result<()> {
        diesel::insert_into(users::table)
            .values((users::id.eq(id), users::created_at.eq("2024-01-01T00:00:00.000000Z")))
            .execute(conn)
            .map_err(crate::errors::StorageError::from)?;
        Ok(())
    }

    #[tokio::test]
    async fn test_exec_commits_and_returns_value() {
        let db = test_db();
        let value = db
            .writer
            .exec(|conn| {
                insert_user(conn, "u1")?;
                Ok(42_u32)
            })
            .await
            .unwrap();
        assert_eq!(value, 42);
        assert_eq!(count_rows(&db.pool, "users"), 1);
    }

    #[tokio::test]
    async fn test_job_error_rolls_back_and_surfaces_unchanged() {
        let db = test_db();
        let err = db
            .writer
            .exec(|conn| -> stocky_core::Result<()> {
                insert_user(conn, "u1")?;
                Err(Error::Validation(ValidationError::InvalidInput(
                    "late failure".to_string(),
                )))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::InvalidInput(_))));
        assert_eq!(count_rows(&db.pool, "users"), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_abandoned_caller_rolls_back_running_job() {
        let db = test_db();

        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            db.writer.exec(|conn| {
                insert_user(conn, "slow")?;
                std::thread::sleep(Duration::from_millis(200));
                Ok(())
            }),
        )
        .await;
        assert!(abandoned.is_err());

        // Serialized behind the abandoned job.
        db.writer.exec(|_| Ok(())).await.unwrap();
        assert_eq!(count_rows(&db.pool, "users"), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_queued_job_of_departed_caller_is_skipped() {
        let db = test_db();

        let writer = db.writer.clone();
        let blocker = tokio::spawn(async move {
            writer
                .exec(|_| {
                    std::thread::sleep(Duration::from_millis(200));
                    Ok(())
                })
                .await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        let queued = tokio::time::timeout(
            Duration::from_millis(20),
            db.writer.exec(|conn| insert_user(conn, "queued")),
        )
        .await;
        assert!(queued.is_err());

        blocker.await.unwrap().unwrap();
        db.writer.exec(|_| Ok(())).await.unwrap();
        assert_eq!(count_rows(&db.pool, "users"), 0);
    }
}
