use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Mean equatorial radius used for all distances, in meters
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Distance at which proximity bottoms out at 0%
pub const MAX_DISTANCE_ON_EARTH_M: f64 = 20_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Sixteen-point compass rose, plus `Same` for a guess on the target itself
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
pub enum Direction {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
    Same,
}

const COMPASS: [Direction; 16] = [
    Direction::N,
    Direction::NNE,
    Direction::NE,
    Direction::ENE,
    Direction::E,
    Direction::ESE,
    Direction::SE,
    Direction::SSE,
    Direction::S,
    Direction::SSW,
    Direction::SW,
    Direction::WSW,
    Direction::W,
    Direction::WNW,
    Direction::NW,
    Direction::NNW,
];

impl Direction {
    /// Narrow arrow for the terminal grid
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::N => "↑",
            Direction::NNE | Direction::NE | Direction::ENE => "↗",
            Direction::E => "→",
            Direction::ESE | Direction::SE | Direction::SSE => "↘",
            Direction::S => "↓",
            Direction::SSW | Direction::SW | Direction::WSW => "↙",
            Direction::W => "←",
            Direction::WNW | Direction::NW | Direction::NNW => "↖",
            Direction::Same => "★",
        }
    }

    /// Emoji used in the shareable summary
    pub fn emoji(&self) -> &'static str {
        match self {
            Direction::N => "⬆️",
            Direction::NNE | Direction::NE | Direction::ENE => "↗️",
            Direction::E => "➡️",
            Direction::ESE | Direction::SE | Direction::SSE => "↘️",
            Direction::S => "⬇️",
            Direction::SSW | Direction::SW | Direction::WSW => "↙️",
            Direction::W => "⬅️",
            Direction::WNW | Direction::NW | Direction::NNW => "↖️",
            Direction::Same => "🎉",
        }
    }
}

/// Great-circle distance in whole meters (spherical law of cosines)
pub fn distance(from: Coordinate, to: Coordinate) -> u64 {
    let from_lat = from.latitude.to_radians();
    let from_lon = from.longitude.to_radians();
    let to_lat = to.latitude.to_radians();
    let to_lon = to.longitude.to_radians();

    let cos_angle = to_lat.sin() * from_lat.sin()
        + to_lat.cos() * from_lat.cos() * (from_lon - to_lon).cos();

    // float error can push the argument just outside acos' domain
    let angle = cos_angle.clamp(-1.0, 1.0).acos();

    (angle * EARTH_RADIUS_M).round() as u64
}

/// Rhumb-line bearing in degrees, 0 = north, clockwise
pub fn rhumb_line_bearing(from: Coordinate, to: Coordinate) -> f64 {
    let mut diff_lon = to.longitude.to_radians() - from.longitude.to_radians();
    let diff_phi = ((to.latitude.to_radians() / 2.0 + PI / 4.0).tan()
        / (from.latitude.to_radians() / 2.0 + PI / 4.0).tan())
    .ln();

    if diff_lon.abs() > PI {
        diff_lon = if diff_lon > 0.0 {
            -(2.0 * PI - diff_lon)
        } else {
            2.0 * PI + diff_lon
        };
    }

    (diff_lon.atan2(diff_phi).to_degrees() + 360.0) % 360.0
}

/// Compass point from `from` towards `to`
pub fn compass_direction(from: Coordinate, to: Coordinate) -> Direction {
    if from == to {
        return Direction::Same;
    }

    let bearing = rhumb_line_bearing(from, to);
    let idx = (bearing / 22.5).round() as usize % COMPASS.len();
    COMPASS[idx]
}

/// How close a guess was, 0..=100
pub fn proximity_percent(distance_m: u64) -> u8 {
    let remaining = (MAX_DISTANCE_ON_EARTH_M - distance_m as f64).max(0.0);
    (remaining / MAX_DISTANCE_ON_EARTH_M * 100.0).floor() as u8
}
