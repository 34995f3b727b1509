use serde::Serialize;

/// Insertion position (1-based) of the guess that wins the prize.
pub const WINNER_POSITION: i64 = 10;

/// `current_total_before_insert` must be read fresh right before the insert.
pub fn decide_winner_on_insert(current_total_before_insert: i64) -> bool {
    return current_total_before_insert + 1 == WINNER_POSITION;
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: i64,
    pub girls: i64,
    pub boys: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_tenth_insert_wins() {
        let winners: Vec<i64> = (0..25).filter(|n| decide_winner_on_insert(*n)).collect();

        assert_eq!(winners, vec![9]);
    }

    #[test]
    fn absent_winner_is_omitted() {
        let value = serde_json::to_value(Stats::default()).unwrap();

        assert_eq!(value, serde_json::json!({ "total": 0, "girls": 0, "boys": 0 }));
    }
}
