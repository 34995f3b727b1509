use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx;

pub const SEX_GIRL: &str = "girl";
pub const SEX_BOY: &str = "boy";

#[derive(sqlx::Type, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PredictedSex {
    Girl,
    Boy,
}

impl PredictedSex {
    pub fn as_str(&self) -> &'static str {
        return match self {
            Self::Girl => SEX_GIRL,
            Self::Boy => SEX_BOY,
        };
    }
}

impl FromStr for PredictedSex {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        return match s {
            SEX_GIRL => Ok(Self::Girl),
            SEX_BOY => Ok(Self::Boy),
            _ => Err(()),
        };
    }
}

impl fmt::Display for PredictedSex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted guess. `id`, `registered_at` and `is_winner` are owned by the
/// ledger; callers never supply them.
#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Guess {
    pub id: i64,

    pub name: String,
    pub predicted_sex: PredictedSex,
    pub suggested_name: Option<String>,
    pub message: String,
    pub guess_date: String,

    pub registered_at: NaiveDateTime,
    pub is_winner: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuess {
    pub name: String,
    pub predicted_sex: PredictedSex,
    pub suggested_name: Option<String>,
    pub message: String,
    pub guess_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicted_sex_accepts_only_the_two_literals() {
        assert_eq!("girl".parse::<PredictedSex>(), Ok(PredictedSex::Girl));
        assert_eq!("boy".parse::<PredictedSex>(), Ok(PredictedSex::Boy));
        assert!("other".parse::<PredictedSex>().is_err());
        assert!("Girl".parse::<PredictedSex>().is_err());
    }

    #[test]
    fn guess_serializes_with_camel_case_keys() {
        let guess = Guess {
            id: 7,
            name: "Helena".to_string(),
            predicted_sex: PredictedSex::Girl,
            suggested_name: None,
            message: "welcome".to_string(),
            guess_date: "2024-05-01".to_string(),
            registered_at: chrono::NaiveDate::from_ymd_opt(2024, 5, 2)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            is_winner: true,
        };

        let value = serde_json::to_value(&guess).unwrap();

        assert_eq!(value["predictedSex"], "girl");
        assert_eq!(value["suggestedName"], serde_json::Value::Null);
        assert_eq!(value["guessDate"], "2024-05-01");
        assert_eq!(value["isWinner"], true);
        assert_eq!(value["registeredAt"], "2024-05-02T09:30:00");
    }
}
