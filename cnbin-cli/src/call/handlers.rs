use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::ProgressBar;
use log::{info, warn};
use serde::Serialize;

use cnbin_calls::cohort::call_cohort_with_progress;
use cnbin_calls::io::{read_segments, read_uncallable, write_calls, write_frequencies, write_matrix};
use cnbin_calls::{CallConfig, CohortCalls, OverlapPolicy, call_cohort};
use cnbin_core::models::{BinCall, ChromSizes};

use crate::output::open_output;

#[derive(Serialize)]
struct CallTotal {
    call: BinCall,
    count: usize,
}

#[derive(Serialize)]
struct FailedSample {
    sample_id: String,
    error: String,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    config: &'a CallConfig,
    number_of_bins: usize,
    samples_called: usize,
    totals: Vec<CallTotal>,
    failed_samples: Vec<FailedSample>,
}

impl<'a> RunSummary<'a> {
    fn new(config: &'a CallConfig, calls: &CohortCalls) -> Self {
        let totals = BinCall::ALL
            .iter()
            .map(|&call| CallTotal {
                call,
                count: calls.rows().filter(|(_, _, c)| *c == call).count(),
            })
            .collect();
        let failed_samples = calls
            .failures
            .iter()
            .map(|f| FailedSample {
                sample_id: f.sample_id.clone(),
                error: f.error.to_string(),
            })
            .collect();
        RunSummary {
            config,
            number_of_bins: calls.bins.len(),
            samples_called: calls.samples.len(),
            totals,
            failed_samples,
        }
    }
}

/// Settings file (if any) with command-line flags layered on top.
fn resolve_config(matches: &ArgMatches) -> Result<CallConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(p) => CallConfig::try_from(Path::new(p))
            .with_context(|| format!("Failed to load config file: {}", p))?,
        None => CallConfig::default(),
    };

    if let Some(&bin_width) = matches.get_one::<u32>("bin-width") {
        config.bin_width = bin_width;
    }
    if let Some(&frac) = matches.get_one::<f64>("frac-threshold") {
        config.frac_threshold = frac;
    }
    if let Some(&frac) = matches.get_one::<f64>("frac-uncallable") {
        config.frac_uncallable = frac;
    }
    if let Some(policy) = matches.get_one::<String>("overlap-policy") {
        config.overlap_policy = policy.parse::<OverlapPolicy>()?;
    }
    if let Some(chroms) = matches.get_many::<String>("chroms") {
        config.chromosomes = Some(chroms.cloned().collect());
    }

    config.params().validate()?;
    Ok(config)
}

pub fn run_call(matches: &ArgMatches) -> Result<()> {
    let chrom_sizes_path = matches
        .get_one::<String>("chrom-sizes")
        .expect("--chrom-sizes is required");
    let segments_path = matches
        .get_one::<String>("segments")
        .expect("--segments is required");
    let threads = *matches
        .get_one::<usize>("threads")
        .expect("--threads has a default");

    let config = resolve_config(matches)?;
    let labels = config.status_labels()?;
    let params = config.params();

    let sizes = ChromSizes::try_from(chrom_sizes_path.as_str())
        .with_context(|| format!("Failed to read chromosome sizes: {}", chrom_sizes_path))?;
    let bins = sizes.tile(config.bin_width, config.chromosomes.as_deref())?;

    let table = read_segments(Path::new(segments_path))
        .with_context(|| format!("Failed to read segment table: {}", segments_path))?;
    for chr in table
        .sample_ids()
        .filter_map(|s| table.segments(s))
        .flatten()
        .map(|s| s.region.chr.as_str())
        .filter(|chr| !sizes.contains(chr))
        .collect::<std::collections::BTreeSet<_>>()
    {
        warn!("Segments on {} are ignored: not in the chromosome size table", chr);
    }

    let uncallable = match matches.get_one::<String>("uncallable") {
        Some(p) => read_uncallable(Path::new(p))
            .with_context(|| format!("Failed to read uncallable regions: {}", p))?,
        None => Vec::new(),
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("Failed to build worker thread pool")?;

    let calls = if matches.get_flag("progress") {
        let bar = ProgressBar::new(table.n_samples() as u64);
        let calls = pool
            .install(|| call_cohort_with_progress(bins, &table, &uncallable, &params, &bar))?;
        bar.finish_and_clear();
        calls
    } else {
        pool.install(|| call_cohort(bins, &table, &uncallable, &params))?
    };

    let mut out = open_output(matches.get_one::<String>("output"))?;
    write_calls(&calls, &labels, &mut out)?;
    out.flush()?;

    if let Some(p) = matches.get_one::<String>("matrix") {
        let mut out = open_output(Some(p))?;
        write_matrix(&calls, &labels, &mut out)?;
        out.flush()?;
        info!("Matrix written to {}", p);
    }

    if let Some(p) = matches.get_one::<String>("frequencies") {
        let mut out = open_output(Some(p))?;
        write_frequencies(&calls, &labels, &mut out)?;
        out.flush()?;
        info!("Frequencies written to {}", p);
    }

    if let Some(p) = matches.get_one::<String>("summary") {
        let summary = RunSummary::new(&config, &calls);
        let json = serde_json::to_string_pretty(&summary)
            .context("Failed to serialize run summary to JSON")?;
        let mut out = open_output(Some(p))?;
        out.write_all(json.as_bytes())?;
        writeln!(out)?;
        out.flush()?;
    }

    info!(
        "Called {} samples over {} bins ({} failed)",
        calls.samples.len(),
        calls.bins.len(),
        calls.failures.len()
    );

    if calls.samples.is_empty() && !calls.failures.is_empty() {
        anyhow::bail!("All {} samples failed", calls.failures.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_parser;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn sub_matches(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["cnbin", "call"];
        argv.extend_from_slice(args);
        let matches = build_parser().try_get_matches_from(argv).unwrap();
        matches.subcommand().unwrap().1.clone()
    }

    #[rstest]
    fn test_flags_override_config_file() {
        let matches = sub_matches(&[
            "--chrom-sizes",
            "../tests/data/chrom.sizes",
            "--segments",
            "../tests/data/segments.tsv",
            "--config",
            "../tests/data/call.toml",
            "--frac-threshold",
            "0.6",
            "--overlap-policy",
            "additive",
        ]);
        let config = resolve_config(&matches).unwrap();
        assert_eq!(config.bin_width, 500_000);
        assert_eq!(config.frac_threshold, 0.6);
        assert_eq!(config.frac_uncallable, 0.5);
        assert_eq!(config.overlap_policy, OverlapPolicy::Additive);
    }

    #[rstest]
    fn test_out_of_range_flag_is_rejected() {
        let matches = sub_matches(&[
            "--chrom-sizes",
            "../tests/data/chrom.sizes",
            "--segments",
            "../tests/data/segments.tsv",
            "--frac-uncallable",
            "3",
        ]);
        assert!(resolve_config(&matches).is_err());
    }

    #[rstest]
    fn test_run_call_writes_all_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("calls.tsv");
        let matrix = dir.path().join("matrix.tsv");
        let summary = dir.path().join("summary.json");
        let matches = sub_matches(&[
            "--chrom-sizes",
            "../tests/data/chrom.sizes",
            "--segments",
            "../tests/data/segments.tsv",
            "--uncallable",
            "../tests/data/uncallable.bed",
            "--chroms",
            "chr1,chr2",
            "--threads",
            "2",
            "--output",
            output.to_str().unwrap(),
            "--matrix",
            matrix.to_str().unwrap(),
            "--summary",
            summary.to_str().unwrap(),
        ]);
        run_call(&matches).unwrap();

        let long = std::fs::read_to_string(&output).unwrap();
        // header + 3 samples x 6 bins
        assert_eq!(long.lines().count(), 19);
        assert_eq!(
            long.lines().nth(1).unwrap(),
            "BS_A\t0\tchr1\t0\t1000000\tuncallable"
        );

        let wide = std::fs::read_to_string(&matrix).unwrap();
        let rows: Vec<&str> = wide.lines().collect();
        assert_eq!(rows[0], "bin_index\tchr\tstart\tend\tBS_A\tBS_B\tBS_C");
        assert_eq!(rows[4], "3\tchr2\t0\t1000000\tneutral\tgain\tunstable");

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&summary).unwrap()).unwrap();
        assert_eq!(json["number_of_bins"], 6);
        assert_eq!(json["samples_called"], 3);
        assert_eq!(json["totals"][0]["call"], "loss");
        assert_eq!(json["config"]["overlap_policy"], "additive");
    }
}
