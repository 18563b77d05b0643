//! Close/far partitioning of distance records and the Phi objective.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::distance::DistanceRecord;
use crate::error::{ReduceError, ReduceResult};

/// Suffix marking the noisy variant of a read in paired datasets.
pub const NOISE_SUFFIX: &str = "_err";

/// Splits records into `(close, far)` by `raw_distance <= radius`, keeping
/// the input order within each part.
///
/// # Examples
/// ```
/// use redeval::distance::DistanceRecord;
/// use redeval::partition::make_sequence_sets;
///
/// let records = [
///     DistanceRecord::new("a", "b", 0.1, 0.1),
///     DistanceRecord::new("a", "c", 0.6, 0.6),
/// ];
/// let (close, far) = make_sequence_sets(&records, 0.4);
/// assert_eq!(close, &records[..1]);
/// assert_eq!(far, &records[1..]);
/// ```
#[must_use]
pub fn make_sequence_sets(
    records: &[DistanceRecord],
    radius: f64,
) -> (Vec<DistanceRecord>, Vec<DistanceRecord>) {
    records
        .iter()
        .cloned()
        .partition(|record| record.raw_distance() <= radius)
}

fn base_identifier(identifier: &str) -> &str {
    identifier
        .strip_suffix(NOISE_SUFFIX)
        .unwrap_or(identifier)
}

/// Splits records into `(close, far)` by ground truth: a pair is close if
/// both identifiers name the same read once the [`NOISE_SUFFIX`] is
/// stripped, e.g. `read1` and `read1_err`.
///
/// # Examples
/// ```
/// use redeval::distance::DistanceRecord;
/// use redeval::partition::make_wfa_sequence_sets;
///
/// let records = [
///     DistanceRecord::new("read1", "read1_err", 0.3, 0.2),
///     DistanceRecord::new("read1", "read2_err", 0.1, 0.2),
/// ];
/// let (close, far) = make_wfa_sequence_sets(&records);
/// assert_eq!(close, &records[..1]);
/// assert_eq!(far, &records[1..]);
/// ```
#[must_use]
pub fn make_wfa_sequence_sets(
    records: &[DistanceRecord],
) -> (Vec<DistanceRecord>, Vec<DistanceRecord>) {
    records
        .iter()
        .cloned()
        .partition(|record| base_identifier(record.key1()) == base_identifier(record.key2()))
}

/// Score of a reduction function, computed from a close/far partition.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PhiRecord {
    /// `C + F / mu`; lower is better.
    pub phi: f64,
    /// Mean reduced distance of close pairs.
    #[serde(rename = "C")]
    pub close_distance: f64,
    /// Population variance of the reduced/raw distance ratio of far pairs.
    #[serde(rename = "F")]
    pub far_variance: f64,
    /// Mean reduced/raw distance ratio of far pairs.
    #[serde(rename = "mu")]
    pub far_mean: f64,
}

impl Display for PhiRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "phi = {:.6} (C = {:.6}, F = {:.6}, mu = {:.6})",
            self.phi, self.close_distance, self.far_variance, self.far_mean
        )
    }
}

fn mean<I: ExactSizeIterator<Item = f64>>(values: I) -> f64 {
    let len = values.len();
    values.sum::<f64>() / len as f64
}

/// Computes the Phi objective of a reduction function.
///
/// `C` is the mean reduced distance over the close set. For every far record
/// the ratio `reduced / raw` is taken; `mu` is the mean and `F` the
/// population variance of these ratios. Then `phi = C + F / mu`.
///
/// # Errors
/// Fails with an [`InvalidState`](crate::error::ErrorKind::InvalidState)
/// error if either set is empty, a far record has a raw distance of zero, or
/// `mu` is zero.
pub fn objective_phi(
    close_set: &[DistanceRecord],
    far_set: &[DistanceRecord],
) -> ReduceResult<PhiRecord> {
    if close_set.is_empty() {
        return Err(ReduceError::EmptyRecordSet("close"));
    }
    if far_set.is_empty() {
        return Err(ReduceError::EmptyRecordSet("far"));
    }
    if let Some(record) = far_set.iter().find(|record| record.raw_distance() == 0.0) {
        return Err(ReduceError::ZeroRawDistance {
            key1: record.key1().to_owned(),
            key2: record.key2().to_owned(),
        });
    }

    let close_distance = mean(close_set.iter().map(DistanceRecord::reduced_distance));

    let ratios: Vec<f64> = far_set
        .iter()
        .map(|record| record.reduced_distance() / record.raw_distance())
        .collect();
    let far_mean = mean(ratios.iter().copied());
    if far_mean == 0.0 {
        return Err(ReduceError::ZeroFarMean);
    }
    let far_variance = mean(ratios.iter().map(|ratio| (ratio - far_mean).powi(2)));

    Ok(PhiRecord {
        phi: close_distance + far_variance / far_mean,
        close_distance,
        far_variance,
        far_mean,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::_internal_test_data::SCENARIO_HOMOPOLYMER_RECORDS;
    use crate::distance::DistanceRecord;
    use crate::error::{ErrorKind, ReduceError};
    use crate::partition::{make_sequence_sets, make_wfa_sequence_sets, objective_phi};

    fn records_with_distances(distances: &[f64]) -> Vec<DistanceRecord> {
        distances
            .iter()
            .enumerate()
            .map(|(i, &distance)| {
                DistanceRecord::new(format!("seq{}", i), format!("seq{}", i + 1), distance, distance)
            })
            .collect()
    }

    #[test]
    fn test_make_sequence_sets() {
        let records = records_with_distances(&[0.1, 0.2, 0.3, 0.6, 0.7, 0.9]);
        let (close, far) = make_sequence_sets(&records, 0.4);

        assert_eq!(close, records[..3]);
        assert_eq!(far, records[3..]);
    }

    #[test]
    fn test_make_sequence_sets_inclusive_radius() {
        let records = records_with_distances(&[0.4, 0.5, 0.4]);
        let (close, far) = make_sequence_sets(&records, 0.4);

        assert_eq!(close.len(), 2);
        assert_eq!(far.len(), 1);
        assert_eq!(far[0].raw_distance(), 0.5);
    }

    #[test]
    fn test_make_wfa_sequence_sets() {
        let records = [
            DistanceRecord::new("read1", "read1_err", 0.2, 0.1),
            DistanceRecord::new("read1", "read2", 0.8, 0.7),
            DistanceRecord::new("read2_err", "read2", 0.3, 0.3),
            DistanceRecord::new("read1_err", "read2_err", 0.9, 0.9),
            DistanceRecord::new("read_err_err", "read_err", 0.9, 0.9),
        ];
        let (close, far) = make_wfa_sequence_sets(&records);

        assert_eq!(close, [records[0].clone(), records[2].clone()]);
        assert_eq!(
            far,
            [records[1].clone(), records[3].clone(), records[4].clone()]
        );
    }

    #[test]
    fn test_objective_phi() {
        let close = [
            DistanceRecord::new("a", "b", 0.1, 0.2),
            DistanceRecord::new("a", "c", 0.2, 0.4),
        ];
        let far = [
            DistanceRecord::new("a", "d", 0.5, 0.5),
            DistanceRecord::new("b", "d", 0.8, 0.4),
        ];

        let phi = objective_phi(&close, &far).unwrap();

        // ratios: 1.0, 0.5; mu = 0.75; F = 0.0625
        assert_abs_diff_eq!(phi.close_distance, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(phi.far_mean, 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(phi.far_variance, 0.0625, epsilon = 1e-12);
        assert_abs_diff_eq!(phi.phi, 0.3 + 0.0625 / 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_objective_phi_scenario() {
        let (close, far) = make_sequence_sets(&SCENARIO_HOMOPOLYMER_RECORDS, 0.7);
        assert_eq!(close.len(), 3);
        assert_eq!(far.len(), 3);

        let phi = objective_phi(&close, &far).unwrap();
        assert!(phi.phi.is_finite());
        assert_abs_diff_eq!(
            phi.close_distance,
            (0.5 + 0.375 + 0.6666666666666667) / 3.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            phi.phi,
            phi.close_distance + phi.far_variance / phi.far_mean,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_objective_phi_identity_has_no_variance() {
        let (close, far) = make_sequence_sets(&records_with_distances(&[0.1, 0.5, 0.9]), 0.3);
        let phi = objective_phi(&close, &far).unwrap();

        assert_abs_diff_eq!(phi.far_mean, 1.0);
        assert_abs_diff_eq!(phi.far_variance, 0.0);
        assert_abs_diff_eq!(phi.phi, 0.1);
    }

    #[test]
    fn test_objective_phi_errors() {
        let close = [DistanceRecord::new("a", "b", 0.1, 0.2)];
        let far = [DistanceRecord::new("a", "c", 0.5, 0.5)];

        assert_eq!(
            objective_phi(&[], &far),
            Err(ReduceError::EmptyRecordSet("close"))
        );
        assert_eq!(
            objective_phi(&close, &[]),
            Err(ReduceError::EmptyRecordSet("far"))
        );

        let zero_raw = [DistanceRecord::new("a", "c", 0.0, 0.5)];
        assert_eq!(
            objective_phi(&close, &zero_raw),
            Err(ReduceError::ZeroRawDistance {
                key1: "a".to_owned(),
                key2: "c".to_owned()
            })
        );

        let zero_reduced = [DistanceRecord::new("a", "c", 0.5, 0.0)];
        let error = objective_phi(&close, &zero_reduced).unwrap_err();
        assert_eq!(error, ReduceError::ZeroFarMean);
        assert_eq!(error.kind(), ErrorKind::InvalidState);
    }
}
