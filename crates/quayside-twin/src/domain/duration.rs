//! Random duration contract
//!
//! Service times come from a [`DurationSource`]. The core only calls
//! [`DurationSource::generate`]; concrete distributions live in
//! `infrastructure::distributions`.

use crate::domain::clock::SimTime;
use rand::RngCore;
use std::fmt;

/// Produces non-negative durations
pub trait DurationSource: Send + fmt::Debug {
    /// Draw the next duration using the run's random stream
    fn generate(&mut self, rng: &mut dyn RngCore) -> SimTime;
}

/// Always the same duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixed(pub SimTime);

impl DurationSource for Fixed {
    fn generate(&mut self, _rng: &mut dyn RngCore) -> SimTime {
        self.0.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fixed_is_clamped() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Fixed(3.5).generate(&mut rng), 3.5);
        assert_eq!(Fixed(-2.0).generate(&mut rng), 0.0);
    }
}
