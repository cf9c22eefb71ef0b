use std::io::Write;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use cnbin_calls::io::write_bins_bed;
use cnbin_core::models::ChromSizes;

use crate::output::open_output;

pub fn run_bins(matches: &ArgMatches) -> Result<()> {
    let chrom_sizes_path = matches
        .get_one::<String>("chrom-sizes")
        .expect("--chrom-sizes is required");
    let bin_width = *matches
        .get_one::<u32>("bin-width")
        .expect("--bin-width has a default");
    let chroms: Option<Vec<String>> = matches
        .get_many::<String>("chroms")
        .map(|values| values.cloned().collect());

    let sizes = ChromSizes::try_from(chrom_sizes_path.as_str())
        .with_context(|| format!("Failed to read chromosome sizes: {}", chrom_sizes_path))?;
    let bins = sizes.tile(bin_width, chroms.as_deref())?;

    let mut out = open_output(matches.get_one::<String>("output"))?;
    write_bins_bed(&bins, &mut out)?;
    out.flush()?;

    info!("Wrote {} bins of width {}", bins.len(), bin_width);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_parser;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_run_bins_writes_bed() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("bins.bed");
        let matches = build_parser()
            .try_get_matches_from([
                "cnbin",
                "bins",
                "--chrom-sizes",
                "../tests/data/chrom.sizes",
                "--bin-width",
                "1000000",
                "--chroms",
                "chrX",
                "--output",
                out.to_str().unwrap(),
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        run_bins(sub).unwrap();

        let bed = std::fs::read_to_string(&out).unwrap();
        assert_eq!(bed, "chrX\t0\t1000000\t0\nchrX\t1000000\t1200000\t1\n");
    }

    #[rstest]
    fn test_run_bins_unknown_chromosome_fails() {
        let matches = build_parser()
            .try_get_matches_from([
                "cnbin",
                "bins",
                "--chrom-sizes",
                "../tests/data/chrom.sizes",
                "--chroms",
                "chr21",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert!(run_bins(sub).is_err());
    }
}
