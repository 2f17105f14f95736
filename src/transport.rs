//! Flat named-value encoding for the hop between round entry and the
//! session view.
//!
//! Every field travels as a UTF-8 `(key, value)` pair so any carrier that
//! preserves text (query string, message payload, RPC body) round-trips the
//! submission losslessly.

use crate::error::ValidationError;
use crate::player::{GameMode, SEAT_COUNT, Seat, check_seat};

/// Parameters handed from the round-entry step to the session step.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundSubmission {
    pub mode: GameMode,
    pub players: [String; SEAT_COUNT],
    pub team_names: Option<[String; 2]>,
    pub round: u32,
    pub dealer: Seat,
    pub totals: [i32; SEAT_COUNT],
}

impl RoundSubmission {
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("mode".to_string(), self.mode.as_str().to_string())];
        for (idx, name) in self.players.iter().enumerate() {
            pairs.push((format!("player{}", idx + 1), name.clone()));
        }
        if let Some([team1, team2]) = &self.team_names {
            pairs.push(("team1".to_string(), team1.clone()));
            pairs.push(("team2".to_string(), team2.clone()));
        }
        pairs.push(("round".to_string(), self.round.to_string()));
        pairs.push(("dealer".to_string(), self.dealer.to_string()));
        for (idx, total) in self.totals.iter().enumerate() {
            pairs.push((format!("total{}", idx + 1), total.to_string()));
        }
        pairs
    }

    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, ValidationError> {
        let mode_text = field(pairs, "mode")?;
        let mode = GameMode::parse(mode_text).ok_or_else(|| ValidationError::MalformedField {
            field: "mode".to_string(),
            value: mode_text.to_string(),
        })?;

        let players = seat_fields(pairs, "player")?;
        let team_names = match mode {
            GameMode::Team => Some([
                field(pairs, "team1")?.to_string(),
                field(pairs, "team2")?.to_string(),
            ]),
            GameMode::Individual => None,
        };

        let round = parse_number(pairs, "round")?;
        let dealer: Seat = parse_number(pairs, "dealer")?;
        check_seat(dealer)?;

        let total_texts = seat_fields(pairs, "total")?;
        let mut totals = [0i32; SEAT_COUNT];
        for (idx, text) in total_texts.iter().enumerate() {
            totals[idx] = text
                .parse()
                .map_err(|_| ValidationError::MalformedField {
                    field: format!("total{}", idx + 1),
                    value: text.clone(),
                })?;
        }

        Ok(Self {
            mode,
            players,
            team_names,
            round,
            dealer,
            totals,
        })
    }
}

fn field<'a>(pairs: &'a [(String, String)], key: &str) -> Result<&'a str, ValidationError> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .ok_or_else(|| ValidationError::MissingField(key.to_string()))
}

fn seat_fields(
    pairs: &[(String, String)],
    prefix: &str,
) -> Result<[String; SEAT_COUNT], ValidationError> {
    let mut values: [String; SEAT_COUNT] = Default::default();
    for (idx, value) in values.iter_mut().enumerate() {
        *value = field(pairs, &format!("{}{}", prefix, idx + 1))?.to_string();
    }
    Ok(values)
}

fn parse_number<T: std::str::FromStr>(
    pairs: &[(String, String)],
    key: &str,
) -> Result<T, ValidationError> {
    let text = field(pairs, key)?;
    text.parse().map_err(|_| ValidationError::MalformedField {
        field: key.to_string(),
        value: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team_submission() -> RoundSubmission {
        RoundSubmission {
            mode: GameMode::Team,
            players: ["Ali", "Veli", "Ayşe", "Fatma"].map(String::from),
            team_names: Some(["Doğu", "Batı"].map(String::from)),
            round: 3,
            dealer: 2,
            totals: [-91, 404, 0, -202],
        }
    }

    #[test]
    fn team_submission_round_trips() {
        let original = team_submission();
        let decoded = RoundSubmission::from_pairs(&original.to_pairs()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn individual_submission_round_trips_without_team_fields() {
        let original = RoundSubmission {
            mode: GameMode::Individual,
            team_names: None,
            ..team_submission()
        };
        let pairs = original.to_pairs();
        assert!(!pairs.iter().any(|(k, _)| k.starts_with("team")));
        assert_eq!(RoundSubmission::from_pairs(&pairs).unwrap(), original);
    }

    #[test]
    fn missing_and_malformed_fields_are_reported() {
        let mut pairs = team_submission().to_pairs();
        pairs.retain(|(k, _)| k != "team2");
        assert!(matches!(
            RoundSubmission::from_pairs(&pairs),
            Err(ValidationError::MissingField(field)) if field == "team2"
        ));

        let mut pairs = team_submission().to_pairs();
        for (k, v) in &mut pairs {
            if k == "round" {
                *v = "third".to_string();
            }
        }
        assert!(matches!(
            RoundSubmission::from_pairs(&pairs),
            Err(ValidationError::MalformedField { field, .. }) if field == "round"
        ));
    }
}
