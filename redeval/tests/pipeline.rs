use std::sync::Arc;

use approx::assert_abs_diff_eq;
use redeval::_internal_test_data::{
    HOMOPOLYMER_2MER_TABLE, SCENARIO_FASTA_STR, SCENARIO_HOMOPOLYMER_RECORDS, SCENARIO_K,
    SCENARIO_NOISY_FASTA_STR, SCENARIO_WRAPPED_FASTA_STR,
};
use redeval::distance::{are_distance_record_slices_equal, DistanceEngine, DistanceParams};
use redeval::fasta::paired::read_paired;
use redeval::fasta::reader::read_collection;
use redeval::partition::{make_sequence_sets, make_wfa_sequence_sets, objective_phi};
use redeval::reduction::mapping::ReductionMapping;
use redeval::reduction::transducer::SequenceTransducer;
use redeval::reduction::HomopolymerCompression;

#[test_log::test]
fn test_fasta_to_phi() {
    let sequences = read_collection(SCENARIO_WRAPPED_FASTA_STR.as_bytes()).unwrap();
    let engine = DistanceEngine::with_reduction(
        Arc::new(sequences),
        Arc::new(HomopolymerCompression),
        DistanceParams::builder().k(SCENARIO_K).build(),
    );

    let records = engine.compute().unwrap();
    assert!(are_distance_record_slices_equal(
        &records,
        &SCENARIO_HOMOPOLYMER_RECORDS
    ));

    let (close, far) = make_sequence_sets(&records, 0.7);
    let phi = objective_phi(&close, &far).unwrap();
    assert_abs_diff_eq!(
        phi.close_distance,
        (0.5 + 0.375 + 0.6666666666666667) / 3.0,
        epsilon = 1e-12
    );
    assert!(phi.phi >= phi.close_distance);
}

#[test_log::test]
fn test_table_transducer_matches_homopolymer_compression() {
    let sequences = Arc::new(read_collection(SCENARIO_FASTA_STR.as_bytes()).unwrap());
    let params = DistanceParams::builder().k(SCENARIO_K).thread_num(2).build();

    let transducer =
        SequenceTransducer::new(ReductionMapping::new(HOMOPOLYMER_2MER_TABLE).unwrap());
    let with_table =
        DistanceEngine::with_reduction(sequences.clone(), Arc::new(transducer), params.clone())
            .get_distances_pooled()
            .unwrap();
    let with_compression =
        DistanceEngine::with_reduction(sequences, Arc::new(HomopolymerCompression), params)
            .get_distances()
            .unwrap();

    assert_eq!(with_table, with_compression);
}

#[test_log::test]
fn test_paired_ground_truth_phi() {
    let sequences = read_paired(
        SCENARIO_FASTA_STR.as_bytes(),
        SCENARIO_NOISY_FASTA_STR.as_bytes(),
    )
    .unwrap();
    assert_eq!(sequences.len(), 8);

    let engine = DistanceEngine::with_reduction(
        Arc::new(sequences),
        Arc::new(HomopolymerCompression),
        DistanceParams::builder().k(SCENARIO_K).build(),
    );
    let records = engine.get_distances().unwrap();
    assert_eq!(records.len(), 28);

    let (close, far) = make_wfa_sequence_sets(&records);
    assert_eq!(close.len(), 4);
    assert_eq!(far.len(), 24);
    assert!(close
        .iter()
        .all(|record| format!("{}_err", record.sorted_keys().0) == record.sorted_keys().1));

    let phi = objective_phi(&close, &far).unwrap();
    assert_abs_diff_eq!(phi.close_distance, 0.12142857142857144, epsilon = 1e-9);
    assert_abs_diff_eq!(phi.far_mean, 0.9310333994708996, epsilon = 1e-9);
    assert_abs_diff_eq!(phi.far_variance, 0.022341921869860334, epsilon = 1e-9);
    assert_abs_diff_eq!(phi.phi, 0.1454254783951283, epsilon = 1e-9);
}
