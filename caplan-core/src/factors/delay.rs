//! Delay risk: the flight's recorded disruption probability, unchanged.

use crate::domain::FlightProfile;

use super::NEUTRAL_SCORE;

pub fn score_delay_risk(flight: Option<&FlightProfile>) -> f64 {
    flight.map_or(NEUTRAL_SCORE, |f| f.delay_risk_score)
}
