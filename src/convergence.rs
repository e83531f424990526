use std::time::Duration;

use serde::Serialize;

/// Why the EM loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    MaxIterations,
    Converged,
    TimeCutoff,
}

/// Stopping rules, checked once after every completed iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Convergence {
    pub max_iterations: usize,  // 0 runs no EM updates at all
    pub epsilon: f64,           // Minimum log-likelihood gain to keep going
    pub time_cutoff: Duration,  // Wall-clock budget for the whole loop
}

impl Convergence {
    /// `previous` is `-inf` before the first iteration, so the first
    /// iteration never reports a plateau.
    pub fn check(
        &self,
        completed: usize,
        previous: f64,
        current: f64,
        elapsed: Duration,
    ) -> Option<StopReason> {
        if current - previous < self.epsilon {
            return Some(StopReason::Converged);
        }
        if elapsed > self.time_cutoff {
            return Some(StopReason::TimeCutoff);
        }
        if completed >= self.max_iterations {
            return Some(StopReason::MaxIterations);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Convergence {
        Convergence {
            max_iterations: 10,
            epsilon: 0.001,
            time_cutoff: Duration::from_secs(60),
        }
    }

    #[test]
    fn first_iteration_never_plateaus() {
        let stop = rules().check(1, f64::NEG_INFINITY, -1234.5, Duration::ZERO);
        assert_eq!(stop, None);
    }

    #[test]
    fn small_gain_means_converged() {
        let stop = rules().check(3, -100.0, -99.9995, Duration::ZERO);
        assert_eq!(stop, Some(StopReason::Converged));
    }

    #[test]
    fn likelihood_drop_also_stops() {
        let stop = rules().check(3, -100.0, -101.0, Duration::ZERO);
        assert_eq!(stop, Some(StopReason::Converged));
    }

    #[test]
    fn time_cutoff_is_checked_after_plateau() {
        let stop = rules().check(2, -100.0, -50.0, Duration::from_secs(61));
        assert_eq!(stop, Some(StopReason::TimeCutoff));
    }

    #[test]
    fn iteration_bound_stops_the_loop() {
        assert_eq!(rules().check(9, -100.0, -50.0, Duration::ZERO), None);
        assert_eq!(
            rules().check(10, -100.0, -50.0, Duration::ZERO),
            Some(StopReason::MaxIterations)
        );
    }
}
