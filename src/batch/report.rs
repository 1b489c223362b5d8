use serde::{Serialize, Serializer};
use std::fmt::{self, Display};

use crate::correction::{BandImages, SkipReason, SkippedBand};
use crate::emulator::{CorrectionCoefficients, EmulatorError};

fn serialize_display<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Display,
{
    serializer.collect_str(value)
}

/// Result of processing one observation.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ObservationOutcome {
    Succeeded {
        id: String,
        coefficients: CorrectionCoefficients,
        surface_reflectance: BandImages,
        skipped: Vec<SkippedBand>,
    },
    Failed {
        id: String,
        #[serde(serialize_with = "serialize_display")]
        error: EmulatorError,
    },
    Cancelled {
        id: String,
    },
    /// The record could not be turned into an observation.
    Rejected {
        id: String,
        error: String,
    },
}

impl ObservationOutcome {
    pub fn id(&self) -> &str {
        match self {
            ObservationOutcome::Succeeded { id, .. }
            | ObservationOutcome::Failed { id, .. }
            | ObservationOutcome::Cancelled { id }
            | ObservationOutcome::Rejected { id, .. } => id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ObservationOutcome::Succeeded { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandCount {
    pub id: String,
    pub bands: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Omission {
    pub id: String,
    pub band: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub id: String,
    pub error: String,
}

/// Counts and listings for a whole batch; nothing is dropped silently.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub bands_per_observation: Vec<BandCount>,
    pub omissions: Vec<Omission>,
    pub rejections: Vec<Rejection>,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[ObservationOutcome]) -> Self {
        outcomes
            .iter()
            .fold(BatchSummary::default(), |mut summary, outcome| {
                summary.total += 1;
                match outcome {
                    ObservationOutcome::Succeeded {
                        id,
                        surface_reflectance,
                        skipped,
                        ..
                    } => {
                        summary.succeeded += 1;
                        summary.bands_per_observation.push(BandCount {
                            id: id.clone(),
                            bands: surface_reflectance.len(),
                        });
                        summary
                            .omissions
                            .extend(skipped.iter().map(|s| Omission {
                                id: id.clone(),
                                band: s.band.clone(),
                                reason: s.reason,
                            }));
                    }
                    ObservationOutcome::Failed { id, error } => {
                        summary.failed += 1;
                        summary.rejections.push(Rejection {
                            id: id.clone(),
                            error: error.to_string(),
                        });
                    }
                    ObservationOutcome::Rejected { id, error } => {
                        summary.failed += 1;
                        summary.rejections.push(Rejection {
                            id: id.clone(),
                            error: error.clone(),
                        });
                    }
                    ObservationOutcome::Cancelled { .. } => summary.cancelled += 1,
                }
                summary
            })
    }
}

impl Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Observations: {} total, {} succeeded, {} failed, {} cancelled",
            self.total, self.succeeded, self.failed, self.cancelled
        )?;

        if !self.bands_per_observation.is_empty() {
            writeln!(f, "Bands corrected per observation:")?;
            for count in &self.bands_per_observation {
                writeln!(f, "  {}: {}", count.id, count.bands)?;
            }
        }

        if !self.omissions.is_empty() {
            writeln!(f, "Skipped bands ({}):", self.omissions.len())?;
            for omission in &self.omissions {
                writeln!(f, "  {} {}: {}", omission.id, omission.band, omission.reason)?;
            }
        }

        if !self.rejections.is_empty() {
            writeln!(f, "Rejected observations ({}):", self.rejections.len())?;
            for rejection in &self.rejections {
                writeln!(f, "  {}: {}", rejection.id, rejection.error)?;
            }
        }

        Ok(())
    }
}

/// Outcomes of a batch run with their summary.
///
/// Processed observations come in input order, followed by the records
/// rejected while reading.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub observations: Vec<ObservationOutcome>,
}

impl BatchReport {
    pub fn new(observations: Vec<ObservationOutcome>) -> Self {
        Self {
            summary: BatchSummary::from_outcomes(&observations),
            observations,
        }
    }
}
