use std::io::BufRead;

use log::debug;

use crate::fasta::reader::{FastaReader, FastaReaderError, FastaResult};
use crate::partition::NOISE_SUFFIX;
use crate::sequence::SequenceCollection;

/// Reads a paired dataset: a clean FASTA file and a noisy FASTA file holding
/// the noisy variant of every clean read, in the same order.
///
/// Each clean record is stored under its own identifier `base` and the noisy
/// record at the same position under `base_err`, so the result can be
/// partitioned with
/// [`make_wfa_sequence_sets`](crate::partition::make_wfa_sequence_sets).
/// Identifiers of the noisy file are ignored.
///
/// # Errors
/// Fails with [`FastaReaderError::PairedLengthMismatch`] if one file has
/// more records than the other.
///
/// # Examples
/// ```
/// use redeval::fasta::paired::read_paired;
///
/// let clean = ">read1\nATTGCATCAT\n";
/// let noisy = ">whatever\nATTGCATCAA\n";
/// let sequences = read_paired(clean.as_bytes(), noisy.as_bytes()).unwrap();
///
/// assert_eq!(sequences.get("read1"), Some("ATTGCATCAT"));
/// assert_eq!(sequences.get("read1_err"), Some("ATTGCATCAA"));
/// ```
pub fn read_paired<R1: BufRead, R2: BufRead>(
    clean: R1,
    noisy: R2,
) -> FastaResult<SequenceCollection> {
    let mut clean_records = FastaReader::new(clean).into_iter();
    let mut noisy_records = FastaReader::new(noisy).into_iter();
    let mut sequences = SequenceCollection::new();
    let mut pairs = 0;

    loop {
        match (clean_records.next(), noisy_records.next()) {
            (Some(clean), Some(noisy)) => {
                let (identifier, clean_sequence) = clean?.into_data();
                let (_, noisy_sequence) = noisy?.into_data();

                let noisy_identifier = format!("{}{}", identifier, NOISE_SUFFIX);
                sequences.insert(identifier, clean_sequence);
                sequences.insert(noisy_identifier, noisy_sequence);
                pairs += 1;
            }
            (None, None) => break,
            (clean, noisy) => {
                let remaining_clean = clean.into_iter().chain(clean_records).count();
                let remaining_noisy = noisy.into_iter().chain(noisy_records).count();

                return Err(FastaReaderError::PairedLengthMismatch {
                    clean: pairs + remaining_clean,
                    noisy: pairs + remaining_noisy,
                });
            }
        }
    }

    debug!("Read {} read pairs", pairs);
    Ok(sequences)
}

#[cfg(test)]
mod tests {
    use crate::_internal_test_data::{SCENARIO_FASTA_STR, SCENARIO_NOISY_FASTA_STR};
    use crate::fasta::paired::read_paired;
    use crate::fasta::reader::FastaReaderError;

    #[test]
    fn test_read_paired() {
        let sequences =
            read_paired(SCENARIO_FASTA_STR.as_bytes(), SCENARIO_NOISY_FASTA_STR.as_bytes())
                .unwrap();

        let identifiers: Vec<&str> = sequences.identifiers().collect();
        assert_eq!(
            identifiers,
            [
                "seq1", "seq1_err", "seq2", "seq2_err", "seq3", "seq3_err", "seq4", "seq4_err"
            ]
        );
        assert_eq!(sequences.get("seq2"), Some("AGTCAGGCAG"));
        assert_eq!(sequences.get("seq2_err"), Some("AGTCAGGCAT"));
    }

    #[test]
    fn test_read_paired_length_mismatch() {
        let error = read_paired(
            SCENARIO_FASTA_STR.as_bytes(),
            ">seq1\nATTGCATCAA\n".as_bytes(),
        )
        .unwrap_err();

        assert!(matches!(
            error,
            FastaReaderError::PairedLengthMismatch { clean: 4, noisy: 1 }
        ));
    }

    #[test]
    fn test_read_paired_invalid() {
        let error = read_paired(SCENARIO_FASTA_STR.as_bytes(), "ATTG\n".as_bytes()).unwrap_err();
        assert!(matches!(error, FastaReaderError::InvalidFormat));
    }
}
