use crate::error::{CbResult, CipherBreakError};
use fastrand::Rng;

/// Geometric cooling `T_i = max(T_min, T_0 * rate^i)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoolingSchedule {
    pub initial_temperature: f64,
    pub cooling_rate: f64,
    pub min_temperature: f64,
}

impl CoolingSchedule {
    pub fn new(initial_temperature: f64, cooling_rate: f64, min_temperature: f64) -> CbResult<Self> {
        if !(initial_temperature.is_finite() && initial_temperature > 0.0) {
            return Err(CipherBreakError::Config(format!(
                "initial temperature must be positive, got {}",
                initial_temperature
            )));
        }
        if !(min_temperature.is_finite() && min_temperature > 0.0) {
            return Err(CipherBreakError::Config(format!(
                "minimum temperature must be positive, got {}",
                min_temperature
            )));
        }
        if min_temperature > initial_temperature {
            return Err(CipherBreakError::Config(format!(
                "minimum temperature {} exceeds initial temperature {}",
                min_temperature, initial_temperature
            )));
        }
        if !(cooling_rate > 0.0 && cooling_rate <= 1.0) {
            return Err(CipherBreakError::Config(format!(
                "cooling rate must be in (0, 1], got {}",
                cooling_rate
            )));
        }
        Ok(Self {
            initial_temperature,
            cooling_rate,
            min_temperature,
        })
    }

    /// Rate that takes the temperature to 1% of its start over `iterations` steps.
    pub fn rate_for_budget(iterations: usize) -> f64 {
        if iterations == 0 {
            return 1.0;
        }
        (0.01f64.ln() / iterations as f64).exp()
    }

    #[inline(always)]
    pub fn temperature(&self, iteration: usize) -> f64 {
        let t = self.initial_temperature * self.cooling_rate.powf(iteration as f64);
        t.max(self.min_temperature)
    }
}

/// Rule deciding whether the chain moves to a candidate key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Acceptance {
    /// Improvements always, anything else with a fixed escape probability.
    Metropolis { escape_probability: f64 },
    /// Non-worsening always, worsening with `exp(delta / T_i)`.
    Annealing(CoolingSchedule),
}

impl Acceptance {
    pub fn metropolis(escape_probability: f64) -> CbResult<Self> {
        if !(0.0..=1.0).contains(&escape_probability) {
            return Err(CipherBreakError::Config(format!(
                "escape probability must be in [0, 1], got {}",
                escape_probability
            )));
        }
        Ok(Self::Metropolis { escape_probability })
    }

    pub fn annealing(schedule: CoolingSchedule) -> Self {
        Self::Annealing(schedule)
    }

    pub fn temperature(&self, iteration: usize) -> Option<f64> {
        match self {
            Self::Metropolis { .. } => None,
            Self::Annealing(s) => Some(s.temperature(iteration)),
        }
    }

    #[inline(always)]
    pub fn accepts(&self, candidate: f64, current: f64, iteration: usize, rng: &mut Rng) -> bool {
        match self {
            Self::Metropolis { escape_probability } => {
                candidate > current || rng.f64() < *escape_probability
            }
            Self::Annealing(schedule) => {
                let delta = candidate - current;
                if delta >= 0.0 {
                    return true;
                }
                rng.f64() < (delta / schedule.temperature(iteration)).exp()
            }
        }
    }
}
