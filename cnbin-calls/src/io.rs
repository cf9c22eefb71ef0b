//! Reading the cohort tables and writing call tables.
//!
//! Inputs may be plain or gzip-compressed. Outputs are tab-separated with a header row,
//! except the bins BED.

use std::io::{BufRead, Write};
use std::path::Path;

use log::debug;

use cnbin_core::models::{Bin, BinCall, CnStatus, Region, Segment};
use cnbin_core::utils::{get_dynamic_reader, is_bed_header_line};
use cnbin_core::{CnBinError, Result};

use crate::cohort::{CohortCalls, SegmentTable};
use crate::config::StatusLabels;

const SAMPLE_COLUMNS: &[&str] = &["ID", "sample", "sample_id", "Kids_First_Biospecimen_ID"];
const CHROM_COLUMNS: &[&str] = &["chrom", "chr", "chromosome"];
const START_COLUMNS: &[&str] = &["loc.start", "start"];
const END_COLUMNS: &[&str] = &["loc.end", "end"];
const COPY_NUMBER_COLUMNS: &[&str] = &["copy.num", "copy_number", "cn"];
const PLOIDY_COLUMNS: &[&str] = &["ploidy", "tumor_ploidy"];

/// Column positions of the fields a segment row needs.
struct SegmentColumns {
    sample: usize,
    chrom: usize,
    start: usize,
    end: usize,
    copy_number: usize,
    ploidy: usize,
}

impl SegmentColumns {
    fn from_header(header: &str) -> Result<Self> {
        let names: Vec<&str> = header.split('\t').map(|s| s.trim().trim_matches('"')).collect();
        let find = |aliases: &[&str]| -> Result<usize> {
            names
                .iter()
                .position(|name| aliases.iter().any(|a| a.eq_ignore_ascii_case(name)))
                .ok_or_else(|| {
                    CnBinError::Parse(format!(
                        "segment table header: none of the columns {:?} found",
                        aliases
                    ))
                })
        };
        Ok(SegmentColumns {
            sample: find(SAMPLE_COLUMNS)?,
            chrom: find(CHROM_COLUMNS)?,
            start: find(START_COLUMNS)?,
            end: find(END_COLUMNS)?,
            copy_number: find(COPY_NUMBER_COLUMNS)?,
            ploidy: find(PLOIDY_COLUMNS)?,
        })
    }
}

fn is_missing(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("NA") || value.eq_ignore_ascii_case("NaN")
}

/// Parse an optional numeric field; `Ok(None)` when the value is missing.
fn parse_optional_f64(value: &str) -> std::result::Result<Option<f64>, String> {
    if is_missing(value) {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("`{value}` is not a number"))
}

fn parse_row(fields: &[&str], cols: &SegmentColumns) -> std::result::Result<Option<Segment>, String> {
    let field = |i: usize| fields.get(i).copied().map(str::trim).ok_or("missing column");

    let chrom = field(cols.chrom)?;
    let start = field(cols.start)?
        .parse::<u32>()
        .map_err(|_| format!("bad start `{}`", fields[cols.start]))?;
    let end = field(cols.end)?
        .parse::<u32>()
        .map_err(|_| format!("bad end `{}`", fields[cols.end]))?;
    let copy_number = parse_optional_f64(field(cols.copy_number)?)?;
    let ploidy = parse_optional_f64(field(cols.ploidy)?)?;

    let status = match (copy_number, ploidy) {
        (Some(cn), Some(ploidy)) => CnStatus::from_copy_number(cn, ploidy),
        _ => None,
    };

    // end < start is kept so the sample fails validation instead of the whole table
    Ok(status.map(|status| {
        Segment::new(
            fields[cols.sample].trim(),
            Region {
                chr: chrom.to_string(),
                start,
                end,
            },
            status,
        )
    }))
}

///
/// Read a consensus segment table.
///
/// The first non-empty line must be a header naming the sample, chromosome, start, end,
/// copy number and ploidy columns. Rows with a missing copy number or ploidy carry no
/// status and are skipped. A row that cannot be parsed fails only its own sample.
///
pub fn read_segments(path: &Path) -> Result<SegmentTable> {
    let reader = get_dynamic_reader(path)?;
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => {
                return Err(CnBinError::Parse(format!(
                    "segment table {}: file is empty",
                    path.display()
                )));
            }
        }
    };
    let cols = SegmentColumns::from_header(&header)?;

    let mut table = SegmentTable::new();
    let mut skipped = 0usize;
    for (line_no, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let sample_id = fields
            .get(cols.sample)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                CnBinError::Parse(format!(
                    "segment table {} line {}: no sample id",
                    path.display(),
                    line_no + 1
                ))
            })?;

        match parse_row(&fields, &cols) {
            Ok(Some(segment)) => table.push(segment),
            Ok(None) => {
                table.add_sample(sample_id);
                skipped += 1;
            }
            Err(reason) => table.add_load_error(
                sample_id,
                format!("segment table line {}: {}", line_no + 1, reason),
            ),
        }
    }

    debug!(
        "Read {} segments for {} samples from {} ({} rows without copy number or ploidy)",
        table.n_segments(),
        table.n_samples(),
        path.display(),
        skipped
    );
    Ok(table)
}

///
/// Read uncallable regions from a BED file. Columns past the third are ignored.
///
/// Any malformed line fails the read, since the regions apply to every sample.
///
pub fn read_uncallable(path: &Path) -> Result<Vec<Region>> {
    let reader = get_dynamic_reader(path)?;
    let mut regions = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || is_bed_header_line(&line) {
            continue;
        }
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 3 {
            return Err(CnBinError::Parse(format!(
                "uncallable regions {} line {}: expected chr, start and end",
                path.display(),
                line_no + 1
            )));
        }
        let coordinate = |value: &str| {
            value.trim().parse::<u32>().map_err(|_| {
                CnBinError::Parse(format!(
                    "uncallable regions {} line {}: bad coordinate `{}`",
                    path.display(),
                    line_no + 1,
                    value
                ))
            })
        };
        regions.push(Region::try_new(
            parts[0],
            coordinate(parts[1])?,
            coordinate(parts[2])?,
        )?);
    }

    debug!("Read {} uncallable regions from {}", regions.len(), path.display());
    Ok(regions)
}

/// Write bins as BED4 with the bin index in the name column.
pub fn write_bins_bed<W: Write>(bins: &[Bin], out: &mut W) -> Result<()> {
    for bin in bins {
        writeln!(out, "{}\t{}", bin.region.as_string(), bin.index)?;
    }
    Ok(())
}

/// Long table: one row per sample and bin.
pub fn write_calls<W: Write>(calls: &CohortCalls, labels: &StatusLabels, out: &mut W) -> Result<()> {
    writeln!(out, "sample_id\tbin_index\tchr\tstart\tend\tstatus")?;
    for (sample_id, bin, call) in calls.rows() {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            sample_id,
            bin.index,
            bin.region.chr,
            bin.region.start,
            bin.region.end,
            labels.label(call)
        )?;
    }
    Ok(())
}

/// Wide table: one row per bin, one column per sample.
pub fn write_matrix<W: Write>(calls: &CohortCalls, labels: &StatusLabels, out: &mut W) -> Result<()> {
    write!(out, "bin_index\tchr\tstart\tend")?;
    for sample_id in calls.sample_ids() {
        write!(out, "\t{}", sample_id)?;
    }
    writeln!(out)?;

    for (bin, row) in calls.bins.iter().zip(calls.matrix()) {
        write!(out, "{}\t{}", bin.index, bin.region.as_string())?;
        for call in row {
            write!(out, "\t{}", labels.label(call))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Per-bin counts of every call across samples.
pub fn write_frequencies<W: Write>(calls: &CohortCalls, labels: &StatusLabels, out: &mut W) -> Result<()> {
    write!(out, "bin_index\tchr\tstart\tend")?;
    for call in BinCall::ALL {
        write!(out, "\t{}", labels.label(call))?;
    }
    writeln!(out)?;

    for freq in calls.frequencies() {
        write!(out, "{}\t{}", freq.bin.index, freq.bin.region.as_string())?;
        for count in freq.counts {
            write!(out, "\t{}", count)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
