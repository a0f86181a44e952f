use std::array;

use pendulum_core::OdeSystem;

use super::{Config, Stats};

/// Highest extrapolation column.
pub(super) const K_MAX: usize = 8;

// Step size control factors.
const STEPFAC1: f64 = 0.65;
const STEPFAC2: f64 = 0.94;
const STEPFAC3: f64 = 0.02;
const STEPFAC4: f64 = 4.0;

// Order control factor.
const KFAC2: f64 = 0.9;

/// Outcome of a single trial step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StepResult {
    Accepted,
    Rejected,
}

/// Precomputed step-count sequence and extrapolation weights.
#[derive(Debug)]
struct Tables {
    /// Modified-midpoint sub-step counts `n_k = 2(k + 1)`.
    sequence: [u32; K_MAX + 1],
    /// Cumulative derivative evaluations needed to reach column `k`.
    cost: [u32; K_MAX + 1],
    /// `coeff[k][j] = 1 / ((n_k / n_j)^2 - 1)` for `j < k`.
    coeff: [[f64; K_MAX + 1]; K_MAX + 1],
    /// Smallest step shrink factor allowed at column `k`.
    facmin: [f64; K_MAX + 1],
}

impl Tables {
    fn new() -> Self {
        let mut sequence = [0; K_MAX + 1];
        let mut cost = [0; K_MAX + 1];
        let mut coeff = [[0.0; K_MAX + 1]; K_MAX + 1];
        let mut facmin = [0.0; K_MAX + 1];

        for k in 0..=K_MAX {
            let n = 2 * (k as u32 + 1);
            sequence[k] = n;
            cost[k] = if k == 0 { n } else { cost[k - 1] + n };
            facmin[k] = STEPFAC3.powf(1.0 / f64::from(2 * k as u32 + 1));
            for j in 0..k {
                let ratio = f64::from(n) / f64::from(sequence[j]);
                coeff[k][j] = 1.0 / (ratio * ratio - 1.0);
            }
        }

        Self {
            sequence,
            cost,
            coeff,
            facmin,
        }
    }
}

/// Bulirsch–Stoer stepper with step size and order control.
///
/// Each trial step runs the modified midpoint method with an increasing
/// number of sub-steps, extrapolates the results toward zero sub-step size,
/// and compares successive extrapolations to estimate the local error. The
/// stepper remembers the preferred extrapolation order between steps, so one
/// instance should live for exactly one integration call.
#[derive(Debug)]
pub(super) struct Stepper<const N: usize> {
    abs_tol: f64,
    rel_tol: f64,
    tables: Tables,
    table: [[f64; N]; K_MAX],
    k_opt: usize,
    first: bool,
    last_rejected: bool,
    stats: Stats,
}

impl<const N: usize> Stepper<N> {
    pub(super) fn new(config: &Config) -> Self {
        // Tighter tolerances start at a higher extrapolation order.
        let log_fact = -config.rel_tol().max(1.0e-12).log10() * 0.6 + 0.5;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let k_opt = (log_fact.max(0.0) as usize).clamp(2, K_MAX - 1);

        Self {
            abs_tol: config.abs_tol(),
            rel_tol: config.rel_tol(),
            tables: Tables::new(),
            table: [[0.0; N]; K_MAX],
            k_opt,
            first: true,
            last_rejected: false,
            stats: Stats::default(),
        }
    }

    pub(super) fn stats(&self) -> Stats {
        self.stats
    }

    /// Attempts one step of size `dt` from `(t, state)`.
    ///
    /// On acceptance `state` and `t` are advanced. In both cases `dt` is
    /// updated to the step size to try next.
    pub(super) fn try_step<S: OdeSystem<N>>(
        &mut self,
        system: &S,
        state: &mut [f64; N],
        t: &mut f64,
        dt: &mut f64,
    ) -> StepResult {
        let h = *dt;
        let dxdt = self.evaluate(system, *t, state);

        let mut estimate = [0.0; N];
        let mut h_opt = [0.0; K_MAX + 1];
        let mut work = [0.0; K_MAX + 1];
        let mut new_h = h;
        let mut reject = true;

        for k in 0..=self.k_opt + 1 {
            let steps = self.tables.sequence[k];
            if k == 0 {
                estimate = self.midpoint(system, state, &dxdt, *t, h, steps);
                continue;
            }

            self.table[k - 1] = self.midpoint(system, state, &dxdt, *t, h, steps);
            self.extrapolate(k, &mut estimate);

            let error = self.scaled_error(state, &dxdt, &estimate, h);
            h_opt[k] = self.optimal_step(h, error, k);
            work[k] = f64::from(self.tables.cost[k]) / h_opt[k].abs();

            // Converged one column before the preferred order?
            if k + 1 == self.k_opt || self.first {
                if error < 1.0 {
                    reject = false;
                    if work[k] < KFAC2 * work[k - 1] || self.k_opt <= 2 {
                        self.k_opt = (k + 1).clamp(2, K_MAX - 1);
                        let next = (k + 1).min(K_MAX);
                        new_h = h_opt[k] * f64::from(self.tables.cost[next])
                            / f64::from(self.tables.cost[k]);
                    } else {
                        self.k_opt = k.clamp(2, K_MAX - 1);
                        new_h = h_opt[k];
                    }
                    break;
                } else if self.should_reject(error, k) && !self.first {
                    reject = true;
                    new_h = h_opt[k];
                    break;
                }
            }

            // Converged at the preferred order?
            if k == self.k_opt {
                if error < 1.0 {
                    reject = false;
                    if work[k - 1] < KFAC2 * work[k] {
                        self.k_opt = self.k_opt.saturating_sub(1).max(2);
                        new_h = h_opt[self.k_opt];
                    } else if work[k] < KFAC2 * work[k - 1] && !self.last_rejected {
                        self.k_opt = (self.k_opt + 1).min(K_MAX - 1);
                        new_h = h_opt[k] * f64::from(self.tables.cost[self.k_opt])
                            / f64::from(self.tables.cost[k]);
                    } else {
                        new_h = h_opt[self.k_opt];
                    }
                    break;
                } else if self.should_reject(error, k) {
                    reject = true;
                    new_h = h_opt[self.k_opt];
                    break;
                }
            }

            // Last chance, one column past the preferred order.
            if k == self.k_opt + 1 {
                if error < 1.0 {
                    reject = false;
                    if work[k - 2] < KFAC2 * work[k - 1] {
                        self.k_opt = self.k_opt.saturating_sub(1).max(2);
                    }
                    if work[k] < KFAC2 * work[self.k_opt] && !self.last_rejected {
                        self.k_opt = k.min(K_MAX - 1);
                    }
                } else {
                    reject = true;
                }
                new_h = h_opt[self.k_opt];
                break;
            }
        }

        if reject {
            self.stats.rejected += 1;
            log::trace!("rejected step h = {h:e} at t = {t}, order {}", self.k_opt);
        } else {
            *t += h;
            *state = estimate;
            self.stats.accepted += 1;
        }

        // After a rejection only ever shrink the step.
        if !self.last_rejected || new_h.abs() < h.abs() {
            *dt = new_h;
        }

        self.last_rejected = reject;
        self.first = false;

        if reject {
            StepResult::Rejected
        } else {
            StepResult::Accepted
        }
    }

    fn evaluate<S: OdeSystem<N>>(&mut self, system: &S, t: f64, state: &[f64; N]) -> [f64; N] {
        self.stats.evaluations += 1;
        system.derivative(t, state)
    }

    /// Modified midpoint method over `dt` with `steps` equal sub-steps.
    fn midpoint<S: OdeSystem<N>>(
        &mut self,
        system: &S,
        x: &[f64; N],
        dxdt: &[f64; N],
        t: f64,
        dt: f64,
        steps: u32,
    ) -> [f64; N] {
        let h = dt / f64::from(steps);
        let h2 = 2.0 * h;

        let mut x0 = *x;
        let mut x1: [f64; N] = array::from_fn(|i| x[i] + h * dxdt[i]);
        let mut th = t + h;
        let mut deriv = self.evaluate(system, th, &x1);

        for _ in 1..steps {
            let next: [f64; N] = array::from_fn(|i| x0[i] + h2 * deriv[i]);
            x0 = x1;
            x1 = next;
            th += h;
            deriv = self.evaluate(system, th, &x1);
        }

        array::from_fn(|i| 0.5 * (x0[i] + x1[i] + h * deriv[i]))
    }

    /// Aitken–Neville extrapolation of column `k` into `estimate`.
    ///
    /// On return `estimate` holds the highest-order value and `table[0]` the
    /// one just below it, whose difference is the error estimate.
    fn extrapolate(&mut self, k: usize, estimate: &mut [f64; N]) {
        let coeff = &self.tables.coeff[k];
        for j in (1..k).rev() {
            let c = coeff[j];
            for i in 0..N {
                self.table[j - 1][i] = (1.0 + c) * self.table[j][i] - c * self.table[j - 1][i];
            }
        }
        let c = coeff[0];
        for i in 0..N {
            estimate[i] = (1.0 + c) * self.table[0][i] - c * estimate[i];
        }
    }

    /// Max-norm of the error estimate scaled by the tolerances.
    ///
    /// `f64::max` skips NaN, so a non-finite estimate scores as zero error.
    fn scaled_error(&self, x: &[f64; N], dxdt: &[f64; N], estimate: &[f64; N], h: f64) -> f64 {
        (0..N)
            .map(|i| {
                let err = (estimate[i] - self.table[0][i]).abs();
                let scale = self.abs_tol + self.rel_tol * (x[i].abs() + h.abs() * dxdt[i].abs());
                err / scale
            })
            .fold(0.0, f64::max)
    }

    /// Step size that would bring column `k` to the target error.
    fn optimal_step(&self, h: f64, error: f64, k: usize) -> f64 {
        let facmin = self.tables.facmin[k];
        let fac = if error == 0.0 {
            1.0 / facmin
        } else {
            let expo = 1.0 / f64::from(2 * k as u32 + 1);
            let fac = STEPFAC2 / (error / STEPFAC1).powf(expo);
            fac.min(1.0 / facmin).max(facmin / STEPFAC4)
        };
        h * fac
    }

    /// Convergence monitor: gives up on a step early when the error at
    /// column `k` is too large to be fixed by the remaining columns.
    fn should_reject(&self, error: f64, k: usize) -> bool {
        let seq = &self.tables.sequence;
        let n0 = f64::from(seq[0]);
        if k + 1 == self.k_opt {
            let d = f64::from(seq[self.k_opt]) * f64::from(seq[self.k_opt + 1]) / (n0 * n0);
            error > d * d
        } else if k == self.k_opt {
            let d = f64::from(seq[self.k_opt]) / n0;
            error > d * d
        } else {
            error > 1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn tables_follow_even_sequence() {
        let tables = Tables::new();

        assert_eq!(tables.sequence, [2, 4, 6, 8, 10, 12, 14, 16, 18]);
        assert_eq!(tables.cost[0], 2);
        assert_eq!(tables.cost[3], 2 + 4 + 6 + 8);
        // (4/2)^2 - 1 = 3
        assert_relative_eq!(tables.coeff[1][0], 1.0 / 3.0);
        assert_relative_eq!(tables.facmin[0], STEPFAC3);
    }

    #[test]
    fn tight_tolerance_starts_at_high_order() {
        let stepper = Stepper::<1>::new(&Config::default());
        assert_eq!(stepper.k_opt, K_MAX - 1);

        let loose = Config::new(1e-3, 1e-3, 0.1, 10).unwrap();
        let stepper = Stepper::<1>::new(&loose);
        assert_eq!(stepper.k_opt, 2);
    }

    #[test]
    fn midpoint_is_exact_for_linear_growth() {
        let mut stepper = Stepper::<1>::new(&Config::default());
        let system = |_t: f64, _x: &[f64; 1]| [3.0];

        let out = stepper.midpoint(&system, &[1.0], &[3.0], 0.0, 0.5, 4);

        assert_relative_eq!(out[0], 2.5);
        // One evaluation per sub-step.
        assert_eq!(stepper.stats().evaluations, 4);
    }

    #[test]
    fn accepted_step_advances_time_and_state() {
        let mut stepper = Stepper::<1>::new(&Config::default());
        let decay = |_t: f64, x: &[f64; 1]| [-x[0]];

        let mut state = [1.0];
        let mut t = 0.0;
        let mut dt = 0.01;
        let result = stepper.try_step(&decay, &mut state, &mut t, &mut dt);

        assert_eq!(result, StepResult::Accepted);
        assert_relative_eq!(t, 0.01);
        assert_relative_eq!(state[0], (-0.01_f64).exp(), max_relative = 1e-13);
        assert!(dt > 0.0);
    }
}
