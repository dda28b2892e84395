use std::str::FromStr;

use crate::error::EyesError;

/// Expressive eyelid state. Exactly one mood is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Mood {
    #[default]
    Default,
    Tired,
    Angry,
    Happy,
}

impl FromStr for Mood {
    type Err = EyesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "neutral" | "" => Ok(Mood::Default),
            "tired" => Ok(Mood::Tired),
            "angry" => Ok(Mood::Angry),
            "happy" => Ok(Mood::Happy),
            _ => Err(EyesError::UnknownName { kind: "mood", name: s.to_string() }),
        }
    }
}

/// Gaze anchor inside the travel rectangle. `Center` is the resting position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    #[default]
    Center,
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Position {
    pub const ALL: [Position; 9] = [
        Position::Center,
        Position::N,
        Position::NE,
        Position::E,
        Position::SE,
        Position::S,
        Position::SW,
        Position::W,
        Position::NW,
    ];

    /// Top-left anchor of the left eye for a travel rectangle of
    /// `[0, travel_x] x [0, travel_y]` (y grows downward).
    pub fn anchor(self, travel_x: f64, travel_y: f64) -> (f64, f64) {
        let (mid_x, mid_y) = (travel_x / 2.0, travel_y / 2.0);
        match self {
            Position::Center => (mid_x, mid_y),
            Position::N => (mid_x, 0.0),
            Position::NE => (travel_x, 0.0),
            Position::E => (travel_x, mid_y),
            Position::SE => (travel_x, travel_y),
            Position::S => (mid_x, travel_y),
            Position::SW => (0.0, travel_y),
            Position::W => (0.0, mid_y),
            Position::NW => (0.0, 0.0),
        }
    }
}

impl FromStr for Position {
    type Err = EyesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "default" | "center" | "" => Position::Center,
            "n" | "north" => Position::N,
            "ne" | "northeast" => Position::NE,
            "e" | "east" => Position::E,
            "se" | "southeast" => Position::SE,
            "s" | "south" => Position::S,
            "sw" | "southwest" => Position::SW,
            "w" | "west" => Position::W,
            "nw" | "northwest" => Position::NW,
            _ => return Err(EyesError::UnknownName { kind: "position", name: s.to_string() }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_cover_travel_rectangle() {
        assert_eq!(Position::Center.anchor(40.0, 170.0), (20.0, 85.0));
        assert_eq!(Position::NE.anchor(40.0, 170.0), (40.0, 0.0));
        assert_eq!(Position::SW.anchor(40.0, 170.0), (0.0, 170.0));
        for p in Position::ALL {
            let (x, y) = p.anchor(40.0, 170.0);
            assert!((0.0..=40.0).contains(&x) && (0.0..=170.0).contains(&y));
        }
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("Happy".parse::<Mood>().unwrap(), Mood::Happy);
        assert_eq!("DEFAULT".parse::<Mood>().unwrap(), Mood::Default);
        assert_eq!("nE".parse::<Position>().unwrap(), Position::NE);
        assert_eq!("default".parse::<Position>().unwrap(), Position::Center);
        assert!("sleepy".parse::<Mood>().is_err());
        assert!("up".parse::<Position>().is_err());
    }
}
