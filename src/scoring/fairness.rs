use crate::config::FairnessCurve;

/// Visit count below which the stepped curve still pays a partial bonus
const STEPPED_PARTIAL_LIMIT: u64 = 5;

/// Fairness bonus for a domain that has been visited `visits` times
///
/// The value is taken at discovery time and never revised as the domain
/// accumulates visits afterwards.
pub fn fairness_bonus(curve: FairnessCurve, retention: f64, visits: u64) -> f64 {
    match curve {
        FairnessCurve::Decaying => retention / (1.0 + visits as f64),
        FairnessCurve::Stepped => match visits {
            0 => retention,
            v if v < STEPPED_PARTIAL_LIMIT => retention / 3.0,
            _ => 0.0,
        },
    }
}
