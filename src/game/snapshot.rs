//! The saved form of a board, as stored in a session record
use super::direction::Direction;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A board's saved state.
///
/// Serializes as `{"snake": [[x, y], ...], "direction": [dx, dy], "food":
/// [x, y], "score": int, "level": int}`.  When deserializing, only `snake`
/// is required; the other fields fall back to a rightwards-moving snake with
/// no score on level 1, with the food placed anew.  Grid-dependent checks
/// happen in [`Board::restore()`][super::board::Board::restore].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "RawSnapshot")]
pub(crate) struct Snapshot {
    pub(crate) snake: Vec<(u16, u16)>,
    #[serde(serialize_with = "serialize_direction")]
    pub(crate) direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) food: Option<(u16, u16)>,
    pub(crate) score: u32,
    pub(crate) level: u32,
}

impl Snapshot {
    pub(crate) fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub(crate) fn from_json(s: &str) -> Result<Snapshot, SnapshotError> {
        serde_json::from_str(s).map_err(SnapshotError::Deserialize)
    }
}

fn serialize_direction<S: serde::Serializer>(
    d: &Direction,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    d.delta().serialize(serializer)
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct RawSnapshot {
    snake: Option<Vec<(u16, u16)>>,
    direction: Option<(i8, i8)>,
    food: Option<(u16, u16)>,
    score: Option<u32>,
    level: Option<u32>,
}

impl TryFrom<RawSnapshot> for Snapshot {
    type Error = InvalidSnapshot;

    fn try_from(value: RawSnapshot) -> Result<Snapshot, InvalidSnapshot> {
        let snake = value.snake.ok_or(InvalidSnapshot::NoSnake)?;
        if snake.is_empty() {
            return Err(InvalidSnapshot::EmptySnake);
        }
        let direction = match value.direction {
            Some(delta) => {
                Direction::from_delta(delta).ok_or(InvalidSnapshot::BadDirection(delta.0, delta.1))?
            }
            None => Direction::Right,
        };
        let level = value.level.unwrap_or(1);
        if level == 0 {
            return Err(InvalidSnapshot::ZeroLevel);
        }
        Ok(Snapshot {
            snake,
            direction,
            food: value.food,
            score: value.score.unwrap_or(0),
            level,
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum InvalidSnapshot {
    #[error(r#"missing "snake" field"#)]
    NoSnake,
    #[error("snake has no cells")]
    EmptySnake,
    #[error("invalid direction [{0}, {1}]")]
    BadDirection(i8, i8),
    #[error("level must be at least 1")]
    ZeroLevel,
}

#[derive(Debug, Error)]
pub(crate) enum SnapshotError {
    #[error("failed to deserialize saved game")]
    Deserialize(#[source] serde_json::Error),
    #[error("saved snake has no cells")]
    EmptySnake,
    #[error("saved snake cell ({x}, {y}) lies outside the {width}x{height} grid")]
    OutOfBounds { x: u16, y: u16, width: u16, height: u16 },
    #[error("saved snake occupies ({x}, {y}) more than once")]
    SelfOverlap { x: u16, y: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serialize() {
        let snapshot = Snapshot {
            snake: vec![(10, 10), (9, 10)],
            direction: Direction::Up,
            food: Some((3, 4)),
            score: 20,
            level: 2,
        };
        assert_eq!(
            snapshot.to_json().unwrap(),
            r#"{"snake":[[10,10],[9,10]],"direction":[0,-1],"food":[3,4],"score":20,"level":2}"#
        );
    }

    #[test]
    fn deserialize_full() {
        let snapshot = Snapshot::from_json(concat!(
            r#"{"snake": [[1, 2], [1, 3]], "direction": [-1, 0], "#,
            r#""food": [7, 7], "score": 30, "level": 3}"#,
        ))
        .unwrap();
        assert_eq!(
            snapshot,
            Snapshot {
                snake: vec![(1, 2), (1, 3)],
                direction: Direction::Left,
                food: Some((7, 7)),
                score: 30,
                level: 3,
            }
        );
    }

    #[test]
    fn deserialize_defaults() {
        let snapshot = Snapshot::from_json(r#"{"snake": [[5, 5]]}"#).unwrap();
        assert_eq!(
            snapshot,
            Snapshot {
                snake: vec![(5, 5)],
                direction: Direction::Right,
                food: None,
                score: 0,
                level: 1,
            }
        );
    }

    #[test]
    fn round_trip() {
        let snapshot = Snapshot {
            snake: vec![(4, 4), (4, 5), (5, 5)],
            direction: Direction::Down,
            food: Some((0, 0)),
            score: 40,
            level: 1,
        };
        let json = snapshot.to_json().unwrap();
        assert_eq!(Snapshot::from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn missing_snake() {
        let r = Snapshot::from_json(r#"{"direction": [1, 0], "score": 10, "level": 1}"#);
        assert!(matches!(r, Err(SnapshotError::Deserialize(_))));
    }

    #[test]
    fn empty_snake() {
        let r = Snapshot::from_json(r#"{"snake": []}"#);
        assert!(matches!(r, Err(SnapshotError::Deserialize(_))));
    }

    #[test]
    fn bad_direction() {
        let r = Snapshot::from_json(r#"{"snake": [[1, 1]], "direction": [1, 1]}"#);
        assert!(matches!(r, Err(SnapshotError::Deserialize(_))));
    }

    #[test]
    fn negative_coordinate() {
        let r = Snapshot::from_json(r#"{"snake": [[-1, 1]]}"#);
        assert!(matches!(r, Err(SnapshotError::Deserialize(_))));
    }

    #[test]
    fn zero_level() {
        let r = Snapshot::from_json(r#"{"snake": [[1, 1]], "level": 0}"#);
        assert!(matches!(r, Err(SnapshotError::Deserialize(_))));
    }

    #[test]
    fn not_json() {
        let r = Snapshot::from_json("snake");
        assert!(matches!(r, Err(SnapshotError::Deserialize(_))));
    }
}
