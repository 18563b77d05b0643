use std::io::Write;

use anyhow::Context;
use log::info;
use redeval::surjection::SurjectionGenerator;

pub(crate) struct GenerateOptions<'a> {
    pub input_alphabet: &'a str,
    pub output_alphabet: &'a str,
    pub input_size: usize,
    pub output_size: usize,
    pub seed: Option<u64>,
}

pub(crate) fn generate(
    options: &GenerateOptions<'_>,
    mut output: Box<dyn Write + Send>,
) -> anyhow::Result<()> {
    let mut generator = match options.seed {
        Some(seed) => SurjectionGenerator::from_seed(seed),
        None => SurjectionGenerator::from_entropy(),
    };

    let mapping = generator
        .random_reduction(
            options.input_alphabet,
            options.output_alphabet,
            options.input_size,
            options.output_size,
        )
        .context("Could not generate a reduction table")?;
    info!("Generated a reduction table with {} windows", mapping.len());

    mapping.write_json(&mut output)?;
    writeln!(output)?;
    output.flush()?;

    Ok(())
}
