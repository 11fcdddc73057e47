//! Real-time flexibility: a capability switch, not a graded measure.

use crate::domain::FlightProfile;

use super::NEUTRAL_SCORE;

/// Score for a flight that accepts real-time capacity updates.
pub const FLEXIBLE_SCORE: f64 = 0.9;

/// Score for a flight without real-time updates.
pub const RIGID_SCORE: f64 = 0.3;

pub fn score_flexibility(flight: Option<&FlightProfile>) -> f64 {
    match flight {
        None => NEUTRAL_SCORE,
        Some(f) if f.real_time_update_flag => FLEXIBLE_SCORE,
        Some(_) => RIGID_SCORE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::make_flight;

    #[test]
    fn missing_flight_is_neutral() {
        assert_eq!(score_flexibility(None), NEUTRAL_SCORE);
    }

    #[test]
    fn realtime_flight_is_flexible() {
        let f = make_flight(100.0, 1.0, 10.0, 0.1, true);
        assert_eq!(score_flexibility(Some(&f)), 0.9);
    }

    #[test]
    fn fixed_flight_is_rigid() {
        let f = make_flight(100.0, 1.0, 10.0, 0.1, false);
        assert_eq!(score_flexibility(Some(&f)), 0.3);
    }
}
