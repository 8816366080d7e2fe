//! Field-by-field console editing of each entity type.

use chrono::NaiveDateTime;
use valorant_store::{Agent, Entity, Id, Map, Match, Player, Weapon};

use crate::error::InputError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One editable field as shown to the user.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub label: &'static str,
    /// Format reminder shown when the value is first entered.
    pub hint: Option<&'static str>,
}

const fn field(label: &'static str) -> Field {
    Field { label, hint: None }
}

/// An entity editable through the console menus.
///
/// `FIELDS` lists the editable fields in prompt order; `value` and
/// `set_value` are indexed the same way.
pub trait Form: Entity + Default {
    /// Plural for menu titles, e.g. `"Agents"`.
    const PLURAL: &'static str;
    const FIELDS: &'static [Field];

    fn value(&self, index: usize) -> String;

    fn set_value(&mut self, index: usize, input: &str) -> Result<(), InputError>;

    /// `<Entity> ID: ..` followed by one `label: value` line per field.
    fn describe(&self) -> Vec<String> {
        let mut lines = vec![format!("{} ID: {}", Self::NAME, self.id())];
        lines.extend(
            Self::FIELDS
                .iter()
                .enumerate()
                .map(|(i, f)| format!("{}: {}", f.label, self.value(i))),
        );
        lines
    }
}

pub fn parse_id(input: &str) -> Result<Id, InputError> {
    input
        .parse()
        .map_err(|_| InputError::InvalidId(input.to_string()))
}

impl Form for Agent {
    const PLURAL: &'static str = "Agents";
    const FIELDS: &'static [Field] = &[
        field("Agent Name"),
        field("Agent Description"),
        field("Agent Role"),
    ];

    fn value(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            1 => self.description.clone(),
            _ => self.role.clone(),
        }
    }

    fn set_value(&mut self, index: usize, input: &str) -> Result<(), InputError> {
        let target = match index {
            0 => &mut self.name,
            1 => &mut self.description,
            _ => &mut self.role,
        };
        *target = input.to_string();
        Ok(())
    }
}

impl Form for Map {
    const PLURAL: &'static str = "Maps";
    const FIELDS: &'static [Field] = &[field("Map Name"), field("Map Type")];

    fn value(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            _ => self.kind.clone(),
        }
    }

    fn set_value(&mut self, index: usize, input: &str) -> Result<(), InputError> {
        match index {
            0 => self.name = input.to_string(),
            _ => self.kind = input.to_string(),
        }
        Ok(())
    }
}

impl Form for Match {
    const PLURAL: &'static str = "Matches";
    const FIELDS: &'static [Field] = &[
        Field {
            label: "Match Played On",
            hint: Some("YYYY-MM-DDTHH:MM:SS"),
        },
        field("Map ID"),
        field("Match Outcome"),
    ];

    fn value(&self, index: usize) -> String {
        match index {
            0 => self.played_on.format(TIMESTAMP_FORMAT).to_string(),
            1 => self.map_id.to_string(),
            _ => self.outcome.clone(),
        }
    }

    fn set_value(&mut self, index: usize, input: &str) -> Result<(), InputError> {
        match index {
            0 => {
                self.played_on = NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT)
                    .map_err(|_| InputError::InvalidTimestamp {
                        field: "Match Played On",
                        value: input.to_string(),
                    })?;
            }
            1 => {
                self.map_id = input.parse().map_err(|_| InputError::InvalidNumber {
                    field: "Map ID",
                    value: input.to_string(),
                })?;
            }
            _ => self.outcome = input.to_string(),
        }
        Ok(())
    }
}

impl Form for Player {
    const PLURAL: &'static str = "Players";
    const FIELDS: &'static [Field] = &[
        field("Username"),
        field("Display Name"),
        field("Email"),
        field("Region"),
        field("Rank"),
    ];

    fn value(&self, index: usize) -> String {
        match index {
            0 => self.username.clone(),
            1 => self.display_name.clone(),
            2 => self.email.clone(),
            3 => self.region.clone(),
            _ => self.rank.clone(),
        }
    }

    fn set_value(&mut self, index: usize, input: &str) -> Result<(), InputError> {
        let target = match index {
            0 => &mut self.username,
            1 => &mut self.display_name,
            2 => &mut self.email,
            3 => &mut self.region,
            _ => &mut self.rank,
        };
        *target = input.to_string();
        Ok(())
    }
}

impl Form for Weapon {
    const PLURAL: &'static str = "Weapons";
    const FIELDS: &'static [Field] = &[field("Weapon Name"), field("Weapon Type")];

    fn value(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            _ => self.kind.clone(),
        }
    }

    fn set_value(&mut self, index: usize, input: &str) -> Result<(), InputError> {
        match index {
            0 => self.name = input.to_string(),
            _ => self.kind = input.to_string(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_fields_roundtrip_through_text() {
        let mut m = Match::default();
        m.set_value(0, "2024-03-14T20:30:00").unwrap();
        m.set_value(1, "4").unwrap();
        m.set_value(2, "Victory").unwrap();

        assert_eq!(m.value(0), "2024-03-14T20:30:00");
        assert_eq!(m.map_id, 4);
        assert_eq!(
            m.describe(),
            vec![
                "Match ID: 0",
                "Match Played On: 2024-03-14T20:30:00",
                "Map ID: 4",
                "Match Outcome: Victory",
            ]
        );
    }

    #[test]
    fn test_match_rejects_bad_values() {
        let mut m = Match::default();
        assert!(matches!(
            m.set_value(0, "yesterday"),
            Err(InputError::InvalidTimestamp { .. })
        ));
        assert!(matches!(
            m.set_value(1, "four"),
            Err(InputError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_player_describe() {
        let mut p = Player::default();
        for (i, value) in ["tenz", "TenZ", "tenz@example.com", "NA", "Radiant"]
            .into_iter()
            .enumerate()
        {
            p.set_value(i, value).unwrap();
        }
        p.id = 3;
        assert_eq!(p.describe()[0], "Player ID: 3");
        assert_eq!(p.describe()[2], "Display Name: TenZ");
        assert_eq!(p.describe().len(), 1 + Player::FIELDS.len());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12"), Ok(12));
        assert_eq!(parse_id("x"), Err(InputError::InvalidId("x".to_string())));
    }
}
