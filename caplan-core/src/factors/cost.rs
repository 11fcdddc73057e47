//! Cost exposure: the fixed share of the flight's cost at full capacity.
//!
//! A high fixed share means the flight costs nearly the same whether it flies
//! full or empty, which favours committing capacity regardless of the demand
//! signal.

use crate::domain::FlightProfile;

use super::NEUTRAL_SCORE;

/// `fixed_cost / (fixed_cost + variable_cost_per_unit × max_capacity)`.
///
/// Not clamped; callers pass non-negative costs. A zero-capacity flight with a
/// positive fixed cost scores 1.0. A zero denominator scores 0.0 instead of NaN.
pub fn score_cost_exposure(flight: Option<&FlightProfile>) -> f64 {
    let Some(flight) = flight else {
        return NEUTRAL_SCORE;
    };

    let total = flight.cost_at_capacity();
    if total == 0.0 {
        return 0.0;
    }
    flight.fixed_cost / total
}
