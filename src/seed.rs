use chrono::{Duration, Local};

use crate::{
    init,
    ledger::Ledger,
    models::{NewGuess, PredictedSex},
    prelude::*,
};

struct Fixture {
    name: &'static str,
    predicted_sex: PredictedSex,
    suggested_name: &'static str,
    message: &'static str,
    days_ago: i64,
}

const FIXTURES: &[Fixture] = &[
    Fixture {
        name: "Ana Silva",
        predicted_sex: PredictedSex::Girl,
        suggested_name: "Isabella",
        message: "May she arrive healthy and bring so much joy to this family.",
        days_ago: 10,
    },
    Fixture {
        name: "Carlos Oliveira",
        predicted_sex: PredictedSex::Boy,
        suggested_name: "Gabriel",
        message: "Congratulations! Wishing you unforgettable moments together.",
        days_ago: 9,
    },
    Fixture {
        name: "Maria Santos",
        predicted_sex: PredictedSex::Girl,
        suggested_name: "Sofia",
        message: "Wishing you all the love and happiness in the world.",
        days_ago: 8,
    },
    Fixture {
        name: "Joao Pereira",
        predicted_sex: PredictedSex::Boy,
        suggested_name: "Miguel",
        message: "May the baby bring light to the whole family.",
        days_ago: 7,
    },
    Fixture {
        name: "Fernanda Costa",
        predicted_sex: PredictedSex::Girl,
        suggested_name: "Alice",
        message: "A new life full of smiles and special moments!",
        days_ago: 6,
    },
    Fixture {
        name: "Roberto Alves",
        predicted_sex: PredictedSex::Boy,
        suggested_name: "Rafael",
        message: "Congratulations on the reveal party! Healthy and happy baby.",
        days_ago: 5,
    },
    Fixture {
        name: "Juliana Ferreira",
        predicted_sex: PredictedSex::Girl,
        suggested_name: "Laura",
        message: "What a special moment! Health and happiness to all of you.",
        days_ago: 4,
    },
    Fixture {
        name: "Paulo Mendes",
        predicted_sex: PredictedSex::Boy,
        suggested_name: "Lucas",
        message: "May this new journey be full of love and joy.",
        days_ago: 3,
    },
    Fixture {
        name: "Patricia Lima",
        predicted_sex: PredictedSex::Girl,
        suggested_name: "Julia",
        message: "Wishing the baby brings happiness to all of you!",
        days_ago: 2,
    },
    Fixture {
        name: "Marcia Brandao",
        predicted_sex: PredictedSex::Girl,
        suggested_name: "Beatriz",
        message: "How lovely! Congratulations, and come with lots of love!",
        days_ago: 1,
    },
    Fixture {
        name: "Ricardo Souza",
        predicted_sex: PredictedSex::Boy,
        suggested_name: "Enzo",
        message: "Congratulations on the new life on its way!",
        days_ago: 0,
    },
];

impl Fixture {
    fn to_new_guess(&self) -> NewGuess {
        let guess_date = Local::now().date_naive() - Duration::days(self.days_ago);

        return NewGuess {
            name: self.name.to_string(),
            predicted_sex: self.predicted_sex,
            suggested_name: Some(self.suggested_name.to_string()),
            message: self.message.to_string(),
            guess_date: guess_date.format("%Y-%m-%d").to_string(),
        };
    }
}

/// Replaces whatever is in the ledger with the fixture guesses, recorded
/// through the winner rule like any other submission.
pub async fn populate(ledger: &Ledger) -> Result {
    let removed = ledger.clear_all().await?;
    tracing::info!(removed, "cleared existing guesses");

    for (position, fixture) in FIXTURES.iter().enumerate() {
        let recorded = ledger.record(&fixture.to_new_guess()).await?;
        tracing::info!(
            position = position + 1,
            id = recorded.id,
            name = fixture.name,
            predicted_sex = %fixture.predicted_sex,
            winner = recorded.is_winner,
            "seeded guess"
        );
    }

    return Ok(());
}

pub async fn run(cfg: Config) -> Result {
    let pool = init::db::init_sqlite_pool(&cfg).await?;
    let ledger = Ledger::new(pool);

    populate(&ledger).await?;

    let stats = ledger.compute_stats().await?;
    tracing::info!(
        total = stats.total,
        girls = stats.girls,
        boys = stats.boys,
        winner = stats.winner.as_deref().unwrap_or("-"),
        "seed complete"
    );

    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestDb;

    #[tokio::test]
    async fn tenth_fixture_wins_and_existing_rows_are_replaced() {
        let test_db = TestDb::new().await;
        let ledger = test_db.ledger();
        ledger.insert(&TestDb::guess("left over"), false).await.unwrap();

        populate(&ledger).await.unwrap();

        let stats = ledger.compute_stats().await.unwrap();
        assert_eq!(stats.total, FIXTURES.len() as i64);
        assert_eq!(stats.girls, 6);
        assert_eq!(stats.boys, 5);
        assert_eq!(stats.winner.as_deref(), Some(FIXTURES[9].name));

        let guesses = ledger.list_all().await.unwrap();
        assert_eq!(guesses[0].name, "Ricardo Souza");
        assert!(guesses.iter().all(|g| g.name != "left over"));
    }

    #[tokio::test]
    async fn seeding_twice_keeps_a_single_winner() {
        let test_db = TestDb::new().await;
        let ledger = test_db.ledger();

        populate(&ledger).await.unwrap();
        populate(&ledger).await.unwrap();

        let winners = ledger
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .filter(|g| g.is_winner)
            .count();
        assert_eq!(winners, 1);
    }
}
