//! sampler::adaptation — step-size and metric adaptation during warmup.
//!
//! - [`DualAveraging`]: Nesterov dual averaging of `ln ε` toward a target
//!   acceptance rate (Hoffman & Gelman, 2014).
//! - [`RunningVariance`]: Welford accumulator for the 1-D inverse metric.
//! - [`WarmupSchedule`]: a single slow window over the middle of warmup
//!   (15% to 75%); the metric is updated once when it closes.

const GAMMA: f64 = 0.05;
const T0: f64 = 10.0;
const KAPPA: f64 = 0.75;

const WINDOW_START: f64 = 0.15;
const WINDOW_END: f64 = 0.75;

/// Shrinkage toward `METRIC_FLOOR` with the weight of five pseudo-draws.
const SHRINK_DRAWS: f64 = 5.0;
const METRIC_FLOOR: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualAveraging {
    mu: f64,
    target: f64,
    log_eps: f64,
    log_eps_bar: f64,
    h_bar: f64,
    t: f64,
}

impl DualAveraging {
    pub fn new(initial_step: f64, target: f64) -> Self {
        Self {
            mu: (10.0 * initial_step).ln(),
            target,
            log_eps: initial_step.ln(),
            log_eps_bar: 0.0,
            h_bar: 0.0,
            t: 0.0,
        }
    }

    /// Feed one transition's acceptance statistic; returns the next step size.
    pub fn update(&mut self, accept_prob: f64) -> f64 {
        self.t += 1.0;
        let eta = 1.0 / (self.t + T0);
        self.h_bar = (1.0 - eta) * self.h_bar + eta * (self.target - accept_prob);
        self.log_eps = self.mu - self.t.sqrt() / GAMMA * self.h_bar;
        let w = self.t.powf(-KAPPA);
        self.log_eps_bar = w * self.log_eps + (1.0 - w) * self.log_eps_bar;
        self.log_eps.exp()
    }

    pub fn step_size(&self) -> f64 {
        self.log_eps.exp()
    }

    /// Averaged step size used after warmup.
    pub fn final_step_size(&self) -> f64 {
        if self.t == 0.0 { self.step_size() } else { self.log_eps_bar.exp() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningVariance {
    n: usize,
    mean: f64,
    m2: f64,
}

impl RunningVariance {
    pub fn push(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
    }

    pub fn count(&self) -> usize {
        self.n
    }

    /// Sample variance shrunk toward a small floor; `None` with < 2 points.
    pub fn regularized(&self) -> Option<f64> {
        if self.n < 2 {
            return None;
        }
        let n = self.n as f64;
        let var = self.m2 / (n - 1.0);
        Some((n / (n + SHRINK_DRAWS)) * var + METRIC_FLOOR * (SHRINK_DRAWS / (n + SHRINK_DRAWS)))
    }
}

/// WarmupSchedule — where in warmup the metric window sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmupSchedule {
    warmup: usize,
    window_start: usize,
    window_end: usize,
}

impl WarmupSchedule {
    pub fn new(warmup: usize) -> Self {
        let window_start = (WINDOW_START * warmup as f64).floor() as usize;
        let window_end = (WINDOW_END * warmup as f64).floor() as usize;
        Self { warmup, window_start, window_end }
    }

    pub fn is_warmup(&self, iter: usize) -> bool {
        iter < self.warmup
    }

    pub fn in_metric_window(&self, iter: usize) -> bool {
        iter >= self.window_start && iter < self.window_end
    }

    /// The metric window closes after this iteration.
    pub fn closes_window(&self, iter: usize) -> bool {
        self.window_end > self.window_start && iter + 1 == self.window_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Direction of dual-averaging updates.
    // - Welford variance and its regularization.
    // - Window placement for the default warmup length.
    //
    // They intentionally DO NOT cover:
    // - Adaptation inside a full HMC run (see `hmc`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Acceptance above target grows the step; below target shrinks it.
    //
    // Given
    // -----
    // - Two averagers at ε = 0.5, target 0.8, fed 50 accepts of 1.0 or 0.2.
    //
    // Expect
    // ------
    // - Final step sizes above and below the start respectively.
    fn dual_averaging_moves_toward_target() {
        // Arrange
        let mut eager = DualAveraging::new(0.5, 0.8);
        let mut timid = DualAveraging::new(0.5, 0.8);

        // Act
        for _ in 0..50 {
            eager.update(1.0);
            timid.update(0.2);
        }

        // Assert
        assert!(eager.final_step_size() > 0.5);
        assert!(timid.final_step_size() < 0.5);
    }

    #[test]
    // Purpose
    // -------
    // Welford matches the two-pass variance; shrinkage pulls toward the floor.
    //
    // Given
    // -----
    // - Data 1..=10 (sample variance 55/6).
    //
    // Expect
    // ------
    // - regularized = (10/15)(55/6) + 1e-3 · (5/15); None for one point.
    fn running_variance_is_regularized() {
        // Arrange
        let mut acc = RunningVariance::default();
        let mut single = RunningVariance::default();
        single.push(3.0);

        // Act
        (1..=10).for_each(|i| acc.push(i as f64));

        // Assert
        let expected = (10.0 / 15.0) * (55.0 / 6.0) + 1e-3 * (5.0 / 15.0);
        assert_relative_eq!(acc.regularized().expect("ten points"), expected, max_relative = 1e-12);
        assert_eq!(single.regularized(), None);
    }

    #[test]
    // Purpose
    // -------
    // The metric window covers [75, 375) of a 500-iteration warmup.
    //
    // Given
    // -----
    // - WarmupSchedule::new(500).
    //
    // Expect
    // ------
    // - Window membership at the edges and a single closing iteration 374.
    fn window_sits_in_middle_of_warmup() {
        // Arrange
        let schedule = WarmupSchedule::new(500);

        // Act / Assert
        assert!(!schedule.in_metric_window(74));
        assert!(schedule.in_metric_window(75));
        assert!(schedule.in_metric_window(374));
        assert!(!schedule.in_metric_window(375));
        assert_eq!((0..500).filter(|&i| schedule.closes_window(i)).count(), 1);
        assert!(schedule.closes_window(374));
        assert!(!schedule.is_warmup(500));
    }
}
