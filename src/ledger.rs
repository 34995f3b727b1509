use sqlx::SqlitePool;

use crate::{
    models::{decide_winner_on_insert, Guess, NewGuess, PredictedSex, Stats},
    result::LedgerError,
};

const SELECT_GUESSES: &str = "SELECT id, name, predicted_sex, suggested_name, message, guess_date, registered_at, is_winner FROM guesses";

/// Outcome of recording a guess through the winner rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recorded {
    pub id: i64,
    pub is_winner: bool,
}

/// The guess ledger. Every call checks a connection out of the pool and
/// returns it before completing, so one `Ledger` can be cloned freely across
/// concurrent requests.
#[derive(Clone, Debug)]
pub struct Ledger {
    db: SqlitePool,
}

impl Ledger {
    pub fn new(db: SqlitePool) -> Self {
        return Self { db };
    }

    pub async fn insert(&self, guess: &NewGuess, is_winner: bool) -> Result<i64, LedgerError> {
        let result = sqlx::query("INSERT INTO guesses (name, predicted_sex, suggested_name, message, guess_date, is_winner) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(&guess.name)
            .bind(guess.predicted_sex)
            .bind(&guess.suggested_name)
            .bind(&guess.message)
            .bind(&guess.guess_date)
            .bind(is_winner)
            .execute(&self.db)
            .await?;

        return Ok(result.last_insert_rowid());
    }

    /// Newest first. Rows sharing a timestamp keep insertion order.
    pub async fn list_all(&self) -> Result<Vec<Guess>, LedgerError> {
        let query = format!("{SELECT_GUESSES} ORDER BY registered_at DESC, id DESC");

        let guesses: Vec<Guess> = sqlx::query_as(&query).fetch_all(&self.db).await?;

        return Ok(guesses);
    }

    /// Removes every row. The id sequence is left alone, so ids are never
    /// handed out twice.
    pub async fn clear_all(&self) -> Result<u64, LedgerError> {
        let result = sqlx::query("DELETE FROM guesses").execute(&self.db).await?;

        return Ok(result.rows_affected());
    }

    pub async fn count(&self, predicted_sex: Option<PredictedSex>) -> Result<i64, LedgerError> {
        let count: i64 = match predicted_sex {
            Some(predicted_sex) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM guesses WHERE predicted_sex = ?")
                    .bind(predicted_sex)
                    .fetch_one(&self.db)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM guesses")
                    .fetch_one(&self.db)
                    .await?
            }
        };

        return Ok(count);
    }

    pub async fn compute_stats(&self) -> Result<Stats, LedgerError> {
        let total = self.count(None).await?;
        let girls = self.count(Some(PredictedSex::Girl)).await?;
        let boys = self.count(Some(PredictedSex::Boy)).await?;

        let winner: Option<String> =
            sqlx::query_scalar("SELECT name FROM guesses WHERE is_winner = 1 ORDER BY id LIMIT 1")
                .fetch_optional(&self.db)
                .await?;

        return Ok(Stats {
            total,
            girls,
            boys,
            winner,
        });
    }

    pub async fn winner_details(&self) -> Result<Option<Guess>, LedgerError> {
        let query = format!("{SELECT_GUESSES} WHERE is_winner = 1 ORDER BY id LIMIT 1");

        let winner: Option<Guess> = sqlx::query_as(&query).fetch_optional(&self.db).await?;

        return Ok(winner);
    }

    /// Reads the current total, applies the winner rule and inserts.
    ///
    /// The read and the write are separate statements. Two inserts racing
    /// on a total of 9 can both decide they won; the partial unique index on
    /// `is_winner` then fails the later one with a storage error.
    pub async fn record(&self, guess: &NewGuess) -> Result<Recorded, LedgerError> {
        let total_before = self.count(None).await?;
        let is_winner = decide_winner_on_insert(total_before);

        let id = self.insert(guess, is_winner).await?;

        return Ok(Recorded { id, is_winner });
    }
}
