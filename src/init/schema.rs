use sqlx::SqlitePool;

pub const GUESSES_TABLE: &str = "guesses";

const CREATE_GUESSES_TABLE: &str = r#"
    create table if not exists guesses
    (
        id integer primary key autoincrement,
        name text not null,
        predicted_sex text not null check (predicted_sex in ('girl', 'boy')),
        suggested_name text,
        message text not null,
        guess_date text not null,
        registered_at timestamp not null default (strftime('%Y-%m-%d %H:%M:%f', 'now'))
    )
    "#;

/// Columns introduced after the first revision of the table, in the order
/// they were added.
const LATER_COLUMNS: &[(&str, &str)] = &[("is_winner", "boolean not null default 0")];

const CREATE_SINGLE_WINNER_INDEX: &str = r#"
    create unique index if not exists guesses_single_winner
    on guesses (is_winner) where is_winner = 1
    "#;

/// Creates the guesses table or upgrades an older revision in place.
/// Safe to run on every start and before every use.
pub async fn ensure_schema(db: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_GUESSES_TABLE).execute(db).await?;

    for (column, decl) in LATER_COLUMNS {
        add_column_if_missing(db, GUESSES_TABLE, column, decl).await?;
    }

    sqlx::query(CREATE_SINGLE_WINNER_INDEX).execute(db).await?;

    return Ok(());
}

async fn add_column_if_missing(
    db: &SqlitePool,
    table: &str,
    column: &str,
    decl: &str,
) -> Result<(), sqlx::Error> {
    let query = format!("ALTER TABLE {table} ADD COLUMN {column} {decl}");

    return match sqlx::query(&query).execute(db).await {
        Ok(_) => {
            tracing::info!(table, column, "added column");
            Ok(())
        }
        Err(err) if is_duplicate_column(&err) => Ok(()),
        Err(err) => Err(err),
    };
}

fn is_duplicate_column(err: &sqlx::Error) -> bool {
    return match err {
        sqlx::Error::Database(db_err) => db_err.message().contains("duplicate column name"),
        _ => false,
    };
}
