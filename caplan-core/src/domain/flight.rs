//! Flight economics reference data.

use serde::{Deserialize, Serialize};

/// Capacity and cost profile of a single flight, looked up by `flight_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightProfile {
    pub flight_id: String,
    pub max_capacity: f64,
    pub fixed_cost: f64,
    pub variable_cost_per_unit: f64,
    /// Recorded probability of disruption, expected in [0, 1].
    pub delay_risk_score: f64,
    /// Whether capacity on this flight can be adjusted from real-time signals.
    pub real_time_update_flag: bool,
}

impl FlightProfile {
    /// Total cost if the flight flies full: fixed + variable × capacity.
    pub fn cost_at_capacity(&self) -> f64 {
        self.fixed_cost + self.variable_cost_per_unit * self.max_capacity
    }

    /// Describe any field outside its documented range.
    ///
    /// Scoring still accepts such a profile unchanged; this is for data-quality
    /// reporting by the loading layer.
    pub fn range_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.max_capacity < 0.0 {
            issues.push(format!(
                "{}: negative max_capacity {}",
                self.flight_id, self.max_capacity
            ));
        }
        if self.fixed_cost < 0.0 {
            issues.push(format!(
                "{}: negative fixed_cost {}",
                self.flight_id, self.fixed_cost
            ));
        }
        if self.variable_cost_per_unit < 0.0 {
            issues.push(format!(
                "{}: negative variable_cost_per_unit {}",
                self.flight_id, self.variable_cost_per_unit
            ));
        }
        if !(0.0..=1.0).contains(&self.delay_risk_score) {
            issues.push(format!(
                "{}: delay_risk_score {} outside [0, 1]",
                self.flight_id, self.delay_risk_score
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_flight() -> FlightProfile {
        FlightProfile {
            flight_id: "FX366".into(),
            max_capacity: 500.0,
            fixed_cost: 1000.0,
            variable_cost_per_unit: 1.0,
            delay_risk_score: 0.2,
            real_time_update_flag: true,
        }
    }

    #[test]
    fn cost_at_capacity_adds_variable_share() {
        assert_eq!(sample_flight().cost_at_capacity(), 1500.0);
    }

    #[test]
    fn clean_profile_has_no_issues() {
        assert!(sample_flight().range_issues().is_empty());
    }

    #[test]
    fn out_of_range_fields_are_reported() {
        let mut f = sample_flight();
        f.fixed_cost = -5.0;
        f.delay_risk_score = 1.4;
        let issues = f.range_issues();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("fixed_cost"));
        assert!(issues[1].contains("delay_risk_score"));
    }

    #[test]
    fn flight_serialization_roundtrip() {
        let f = sample_flight();
        let json = serde_json::to_string(&f).unwrap();
        let deser: FlightProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(f, deser);
    }
}
