use log::{debug, info, warn};
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::observation::{Observation, ObservationSet};
use super::report::{BatchReport, ObservationOutcome};
use crate::correction;
use crate::emulator::Emulator;

/// Shared flag for stopping a batch between observations.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs the emulator and the correction pipeline over many observations
/// on the rayon thread pool.
#[derive(Debug, Clone)]
pub struct BatchRunner<'a> {
    emulator: Emulator<'a>,
    cancel: CancelToken,
}

impl<'a> BatchRunner<'a> {
    pub fn new(emulator: Emulator<'a>) -> Self {
        Self {
            emulator,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Processes every observation; one failure never stops the others.
    ///
    /// Observations not yet started when the token is cancelled are
    /// reported as cancelled.
    pub fn run(&self, observations: &[Observation]) -> BatchReport {
        self.report(self.outcomes(observations))
    }

    /// Like [`BatchRunner::run`], with the records rejected while reading
    /// listed as failed observations.
    pub fn run_set(&self, set: &ObservationSet) -> BatchReport {
        let mut outcomes = self.outcomes(&set.observations);
        outcomes.extend(set.rejected.iter().map(|record| ObservationOutcome::Rejected {
            id: record.id.clone(),
            error: record.error.clone(),
        }));
        self.report(outcomes)
    }

    fn outcomes(&self, observations: &[Observation]) -> Vec<ObservationOutcome> {
        info!(
            "Processing {} observations with {} band tables",
            observations.len(),
            self.emulator.store().len()
        );

        observations
            .par_iter()
            .map(|observation| self.process(observation))
            .collect()
    }

    fn report(&self, outcomes: Vec<ObservationOutcome>) -> BatchReport {
        let report = BatchReport::new(outcomes);
        info!(
            "Batch finished: {} succeeded, {} failed, {} cancelled, {} bands skipped",
            report.summary.succeeded,
            report.summary.failed,
            report.summary.cancelled,
            report.summary.omissions.len()
        );
        report
    }

    pub fn process(&self, observation: &Observation) -> ObservationOutcome {
        let id = observation.id.clone();
        if self.cancel.is_cancelled() {
            return ObservationOutcome::Cancelled { id };
        }

        match self.emulator.run(&observation.inputs) {
            Ok(coefficients) => {
                let image = correction::correct(
                    &observation.toa,
                    &observation.solar_irradiance,
                    &observation.inputs,
                    &coefficients,
                    self.emulator.reflectance_scale(),
                );
                debug!(
                    "Observation {}: {} bands corrected, {} skipped",
                    id,
                    image.bands.len(),
                    image.skipped.len()
                );
                ObservationOutcome::Succeeded {
                    id,
                    coefficients,
                    surface_reflectance: image.bands,
                    skipped: image.skipped,
                }
            }
            Err(error) => {
                warn!("Observation {} rejected: {}", id, error);
                ObservationOutcome::Failed { id, error }
            }
        }
    }
}
