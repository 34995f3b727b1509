use std::path::PathBuf;

use nanoid::nanoid;
use sqlx::SqlitePool;

use crate::{
    config::Config,
    init::db,
    ledger::Ledger,
    models::{NewGuess, PredictedSex},
};

/// A throwaway SQLite file under the OS temp dir, removed on drop.
pub struct TestDb {
    pub cfg: Config,
    pub pool: SqlitePool,
    path: PathBuf,
}

impl TestDb {
    /// Pool with the schema in place.
    pub async fn new() -> Self {
        let test_db = Self::unmigrated().await;
        crate::init::schema::ensure_schema(&test_db.pool).await.unwrap();
        return test_db;
    }

    pub async fn unmigrated() -> Self {
        let path = std::env::temp_dir().join(format!("guess-the-baby-{}.db", nanoid!(12)));
        let cfg = Config::with_database_url(format!("sqlite://{}", path.display()));
        let pool = db::connect(&cfg).await.unwrap();

        return Self { cfg, pool, path };
    }

    pub fn ledger(&self) -> Ledger {
        return Ledger::new(self.pool.clone());
    }

    pub fn guess(name: &str) -> NewGuess {
        return NewGuess {
            name: name.to_string(),
            predicted_sex: PredictedSex::Girl,
            suggested_name: None,
            message: "congratulations".to_string(),
            guess_date: "2024-05-01".to_string(),
        };
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.path.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}
