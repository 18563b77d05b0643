use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::distance::DistanceRecord;
use crate::sequence::SequenceCollection;

pub const SCENARIO_K: usize = 3;

pub const SCENARIO_SEQUENCES: [(&str, &str); 4] = [
    ("seq1", "ATTGCATCAT"),
    ("seq2", "AGTCAGGCAG"),
    ("seq3", "GTCAGGCATA"),
    ("seq4", "CGATGGCATA"),
];

pub const SCENARIO_FASTA_STR: &str = ">seq1
ATTGCATCAT
>seq2
AGTCAGGCAG
>seq3
GTCAGGCATA
>seq4
CGATGGCATA
";

pub const SCENARIO_WRAPPED_FASTA_STR: &str = ">seq1

ATTGC
ATCAT
>seq2
AGTCAGGCAG
>seq3
GTCAG
GCATA

>seq4
CGATGGCATA";

/// Noisy counterparts of the scenario reads, matching them by position.
pub const SCENARIO_NOISY_FASTA_STR: &str = ">seq1
ATTGCATCAA
>seq2
AGTCAGGCAT
>seq3
GTCAGGCATT
>seq4
CGATGGCATT
";

/// `(key1, key2, raw distance, homopolymer-compressed distance)` for the
/// scenario with `k = 3`.
pub const SCENARIO_DISTANCES: [(&str, &str, f64, f64); 6] = [
    ("seq1", "seq2", 0.8181818181818181, 0.75),
    ("seq1", "seq3", 0.7272727272727273, 0.625),
    ("seq1", "seq4", 0.7, 0.5),
    ("seq2", "seq3", 0.33333333333333337, 0.375),
    ("seq2", "seq4", 0.8333333333333334, 0.9),
    ("seq3", "seq4", 0.6363636363636364, 0.6666666666666667),
];

lazy_static! {
    pub static ref SCENARIO_COLLECTION: SequenceCollection =
        SequenceCollection::from_iter(SCENARIO_SEQUENCES);
    pub static ref SCENARIO_IDENTITY_RECORDS: Vec<DistanceRecord> = SCENARIO_DISTANCES
        .iter()
        .map(|&(key1, key2, raw, _)| DistanceRecord::new(key1, key2, raw, raw))
        .collect();
    pub static ref SCENARIO_HOMOPOLYMER_RECORDS: Vec<DistanceRecord> = SCENARIO_DISTANCES
        .iter()
        .map(|&(key1, key2, raw, reduced)| DistanceRecord::new(key1, key2, raw, reduced))
        .collect();
}

lazy_static! {
    pub static ref RANDOM_50_READS: SequenceCollection = make_random_collection(50, 150);
}

#[must_use]
pub fn make_random_collection(num: usize, len: usize) -> SequenceCollection {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(1337);

    (0..num)
        .map(|i| (format!("read{}", i), make_random_read(&mut rng, len)))
        .collect()
}

fn make_random_read<T: Rng>(rng: &mut T, len: usize) -> String {
    const BASES: [char; 4] = ['A', 'C', 'G', 'T'];

    (0..len).map(|_| BASES[rng.gen_range(0..4)]).collect()
}

/// Every 2-mer is deleted.
pub const DELETE_ALL_2MER_TABLE: [(&str, &str); 16] = [
    ("AA", "."),
    ("AC", "."),
    ("AG", "."),
    ("AT", "."),
    ("CA", "."),
    ("CC", "."),
    ("CG", "."),
    ("CT", "."),
    ("GA", "."),
    ("GC", "."),
    ("GG", "."),
    ("GT", "."),
    ("TA", "."),
    ("TC", "."),
    ("TG", "."),
    ("TT", "."),
];

/// Homopolymer 2-mers are deleted, others emit their last symbol.
pub const HOMOPOLYMER_2MER_TABLE: [(&str, &str); 16] = [
    ("AA", "."),
    ("AC", "C"),
    ("AG", "G"),
    ("AT", "T"),
    ("CA", "A"),
    ("CC", "."),
    ("CG", "G"),
    ("CT", "T"),
    ("GA", "A"),
    ("GC", "C"),
    ("GG", "."),
    ("GT", "T"),
    ("TA", "A"),
    ("TC", "C"),
    ("TG", "G"),
    ("TT", "."),
];

/// Every 2-mer emits its first symbol.
pub const FIRST_LETTER_2MER_TABLE: [(&str, &str); 16] = [
    ("AA", "A"),
    ("AC", "A"),
    ("AG", "A"),
    ("AT", "A"),
    ("CA", "C"),
    ("CC", "C"),
    ("CG", "C"),
    ("CT", "C"),
    ("GA", "G"),
    ("GC", "G"),
    ("GG", "G"),
    ("GT", "G"),
    ("TA", "T"),
    ("TC", "T"),
    ("TG", "T"),
    ("TT", "T"),
];
