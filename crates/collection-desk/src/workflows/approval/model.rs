use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{money_to_f64, round_places, Employment};

use super::{ApprovalError, LoanApplication};

/// Fewest samples that still leave both the training and the test split non-empty.
pub const MIN_TRAINING_SAMPLES: usize = 5;

const FEATURE_COUNT: usize = 12;
const EPOCHS: usize = 500;
const LEARNING_RATE: f64 = 0.1;
const L2_PENALTY: f64 = 0.001;

/// A classifier that estimates the probability an application is approved.
pub trait ApprovalModel: Send + Sync {
    fn train(
        &mut self,
        samples: &[LoanApplication],
        labels: &[bool],
    ) -> Result<TrainingMetrics, ApprovalError>;

    fn predict(&self, application: &LoanApplication) -> Result<f64, ApprovalError>;

    fn is_trained(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub accuracy: f64,
    pub train_size: usize,
    pub test_size: usize,
    /// Rows are actual rejected/approved, columns predicted rejected/approved.
    pub confusion_matrix: [[usize; 2]; 2],
}

/// Logistic regression over standardised application features.
///
/// Training is deterministic. Samples at positions `i % 5 < 3` train the model,
/// the rest form the test split, and weights start at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogisticApprovalModel {
    weights: Vec<f64>,
    bias: f64,
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl LogisticApprovalModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&self, path: &Path) -> Result<(), ApprovalError> {
        if !self.is_trained() {
            return Err(ApprovalError::NotTrained);
        }
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        info!(path = %path.display(), "approval model saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ApprovalError> {
        let reader = BufReader::new(File::open(path)?);
        let model: Self = serde_json::from_reader(reader)?;
        for actual in [model.weights.len(), model.means.len(), model.scales.len()] {
            if actual != FEATURE_COUNT {
                return Err(ApprovalError::CorruptModel {
                    expected: FEATURE_COUNT,
                    actual,
                });
            }
        }
        info!(path = %path.display(), "approval model loaded");
        Ok(model)
    }

    fn standardise(&self, raw: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut scaled = [0.0; FEATURE_COUNT];
        for (index, value) in raw.iter().enumerate() {
            scaled[index] = (value - self.means[index]) / self.scales[index];
        }
        scaled
    }

    fn probability(&self, scaled: &[f64; FEATURE_COUNT]) -> f64 {
        let logit = self.bias
            + self
                .weights
                .iter()
                .zip(scaled)
                .map(|(weight, value)| weight * value)
                .sum::<f64>();
        sigmoid(logit)
    }

    fn fit_scaling(&mut self, rows: &[[f64; FEATURE_COUNT]]) {
        let count = rows.len() as f64;
        self.means = (0..FEATURE_COUNT)
            .map(|column| rows.iter().map(|row| row[column]).sum::<f64>() / count)
            .collect();
        self.scales = (0..FEATURE_COUNT)
            .map(|column| {
                let mean = self.means[column];
                let variance = rows
                    .iter()
                    .map(|row| (row[column] - mean).powi(2))
                    .sum::<f64>()
                    / count;
                let deviation = variance.sqrt();
                if deviation > f64::EPSILON {
                    deviation
                } else {
                    1.0
                }
            })
            .collect();
    }

    fn fit_weights(&mut self, rows: &[[f64; FEATURE_COUNT]], labels: &[bool]) {
        let count = rows.len() as f64;
        self.weights = vec![0.0; FEATURE_COUNT];
        self.bias = 0.0;

        for _ in 0..EPOCHS {
            let mut gradient = [0.0; FEATURE_COUNT];
            let mut bias_gradient = 0.0;
            for (row, label) in rows.iter().zip(labels) {
                let error = self.probability(row) - if *label { 1.0 } else { 0.0 };
                for (slot, value) in gradient.iter_mut().zip(row) {
                    *slot += error * value;
                }
                bias_gradient += error;
            }
            for (weight, slope) in self.weights.iter_mut().zip(gradient) {
                *weight -= LEARNING_RATE * (slope / count + L2_PENALTY * *weight);
            }
            self.bias -= LEARNING_RATE * bias_gradient / count;
        }
    }
}

impl ApprovalModel for LogisticApprovalModel {
    fn train(
        &mut self,
        samples: &[LoanApplication],
        labels: &[bool],
    ) -> Result<TrainingMetrics, ApprovalError> {
        if samples.len() != labels.len() {
            return Err(ApprovalError::LabelCountMismatch {
                samples: samples.len(),
                labels: labels.len(),
            });
        }
        if samples.len() < MIN_TRAINING_SAMPLES {
            return Err(ApprovalError::InsufficientSamples {
                required: MIN_TRAINING_SAMPLES,
                actual: samples.len(),
            });
        }

        let mut train_rows = Vec::new();
        let mut train_labels = Vec::new();
        let mut test_rows = Vec::new();
        let mut test_labels = Vec::new();
        for (index, (sample, label)) in samples.iter().zip(labels).enumerate() {
            let row = features(sample);
            if index % 5 < 3 {
                train_rows.push(row);
                train_labels.push(*label);
            } else {
                test_rows.push(row);
                test_labels.push(*label);
            }
        }

        self.fit_scaling(&train_rows);
        let scaled: Vec<[f64; FEATURE_COUNT]> =
            train_rows.iter().map(|row| self.standardise(row)).collect();
        self.fit_weights(&scaled, &train_labels);

        let mut confusion_matrix = [[0usize; 2]; 2];
        for (row, label) in test_rows.iter().zip(&test_labels) {
            let predicted = self.probability(&self.standardise(row)) >= 0.5;
            confusion_matrix[usize::from(*label)][usize::from(predicted)] += 1;
        }
        let correct = confusion_matrix[0][0] + confusion_matrix[1][1];
        let metrics = TrainingMetrics {
            accuracy: round_places(correct as f64 / test_rows.len() as f64, 4),
            train_size: train_rows.len(),
            test_size: test_rows.len(),
            confusion_matrix,
        };

        info!(
            accuracy = metrics.accuracy,
            train_size = metrics.train_size,
            test_size = metrics.test_size,
            "approval model trained"
        );
        Ok(metrics)
    }

    fn predict(&self, application: &LoanApplication) -> Result<f64, ApprovalError> {
        if !self.is_trained() {
            return Err(ApprovalError::NotTrained);
        }
        Ok(self.probability(&self.standardise(&features(application))))
    }

    fn is_trained(&self) -> bool {
        self.weights.len() == FEATURE_COUNT
            && self.means.len() == FEATURE_COUNT
            && self.scales.len() == FEATURE_COUNT
    }
}

fn sigmoid(value: f64) -> f64 {
    1.0 / (1.0 + (-value).exp())
}

fn features(application: &LoanApplication) -> [f64; FEATURE_COUNT] {
    let flag = |condition: bool| if condition { 1.0 } else { 0.0 };
    let employment = application.employment;
    [
        money_to_f64(application.monthly_income),
        money_to_f64(application.monthly_expenses),
        money_to_f64(application.loan_amount),
        f64::from(application.loan_term_months),
        f64::from(application.dependents),
        flag(application.good_credit_history),
        application.debt_to_income().unwrap_or(1.0),
        flag(employment == Employment::Employed),
        flag(employment == Employment::SelfEmployed),
        flag(employment == Employment::Unemployed),
        flag(employment == Employment::Retired),
        flag(employment == Employment::Student),
    ]
}
