use std::collections::HashSet;
use std::sync::Arc;

use redeval::_internal_test_data::{make_random_collection, SCENARIO_COLLECTION};
use redeval::distance::{DistanceEngine, DistanceParams, PairErrorPolicy, ScheduleStrategy};
use redeval::reduction::alignment::RunLengthAlignment;
use redeval::reduction::mapping::ReductionMapping;
use redeval::reduction::transducer::SequenceTransducer;
use redeval::surjection::SurjectionGenerator;

#[test]
fn test_random_reduction_is_surjective() {
    let mut generator = SurjectionGenerator::from_seed(2022);

    for (input_size, output_size) in [(2, 1), (3, 1), (3, 2), (4, 2)] {
        let mapping = generator
            .random_reduction("ACGT", "ACG", input_size, output_size)
            .unwrap();
        assert_eq!(mapping.window(), input_size);
        assert_eq!(mapping.len(), 4usize.pow(input_size as u32));

        let outputs: HashSet<&str> = mapping.iter().map(|(_, symbol)| symbol.as_str()).collect();
        assert_eq!(outputs.len(), 3usize.pow(output_size as u32));
    }
}

#[test]
fn test_random_reduction_json_round_trip() {
    let mapping = SurjectionGenerator::from_seed(7)
        .random_reduction("ACGT", "ACGT.", 3, 1)
        .unwrap();

    let mut data = Vec::new();
    mapping.write_json(&mut data).unwrap();
    let read = ReductionMapping::read_json(data.as_slice()).unwrap();

    assert_eq!(read, mapping);
}

#[test]
fn test_random_reduction_alignments() {
    let mapping = SurjectionGenerator::from_seed(99)
        .random_reduction("ACGT", "ACGT.", 3, 1)
        .unwrap();
    let transducer = SequenceTransducer::new(mapping);

    for record in make_random_collection(20, 100).iter() {
        let read = record.sequence();
        let plain = transducer.transduce(read).unwrap();
        let (_, offsets) = transducer.transduce_with_offsets(read).unwrap();
        let (_, bits) = transducer.transduce_with_bit_vector(read).unwrap();

        assert_eq!(bits.len(), read.len());
        assert_eq!(bits.count_ones(), plain.len());
        assert_eq!(bits.count_zeros(), read.len() - plain.len());
        assert_eq!(offsets.kept_count(), bits.count_ones());
        assert_eq!(RunLengthAlignment::from(&bits), offsets);
    }
}

#[test_log::test]
fn test_strategies_agree_on_random_reduction() {
    let mapping = SurjectionGenerator::from_seed(404)
        .random_reduction("ACGT", "ACGT", 2, 1)
        .unwrap();
    let reduction = Arc::new(SequenceTransducer::new(mapping));
    let sequences = Arc::new(SCENARIO_COLLECTION.clone());

    let make_engine = |strategy| {
        DistanceEngine::with_reduction(
            sequences.clone(),
            reduction.clone(),
            DistanceParams::builder()
                .k(3)
                .thread_num(3)
                .strategy(strategy)
                .build(),
        )
    };

    let fan_out = make_engine(ScheduleStrategy::FanOut).compute().unwrap();
    let pooled = make_engine(ScheduleStrategy::Pool).compute().unwrap();

    assert_eq!(fan_out.len(), 6);
    assert_eq!(fan_out, pooled);
    assert!(fan_out
        .iter()
        .all(|record| (0.0..=1.0).contains(&record.reduced_distance())));
}

#[test_log::test]
fn test_deleting_reduction_with_skip_policy() {
    let mapping = SurjectionGenerator::from_seed(5)
        .random_reduction("ACGT", "ACGT.", 4, 1)
        .unwrap();
    let reduction = Arc::new(SequenceTransducer::new(mapping));
    let sequences = Arc::new(make_random_collection(12, 30));

    let make_engine = |strategy| {
        DistanceEngine::with_reduction(
            sequences.clone(),
            reduction.clone(),
            DistanceParams::builder()
                .k(5)
                .strategy(strategy)
                .error_policy(PairErrorPolicy::Skip)
                .build(),
        )
    };

    let fan_out = make_engine(ScheduleStrategy::FanOut).compute().unwrap();
    let pooled = make_engine(ScheduleStrategy::Pool).compute().unwrap();

    assert!(fan_out.len() <= 66);
    assert_eq!(fan_out, pooled);
}
