use clap::{Arg, ArgAction, Command, arg, value_parser};

pub const CALL_CMD: &str = "call";

pub fn create_call_cli() -> Command {
    Command::new(CALL_CMD)
        .about("Call copy-number status per sample and genome bin from a consensus segment table.")
        .arg(
            Arg::new("chrom-sizes")
                .long("chrom-sizes")
                .required(true)
                .help("Path to chrom.sizes file used to tile the genome"),
        )
        .arg(
            arg!(--segments <SEGMENTS>)
                .required(true)
                .help("Segment table (TSV with sample, chrom, start, end, copy number and ploidy columns)"),
        )
        .arg(
            arg!(--uncallable <BED>)
                .required(false)
                .help("BED file of regions excluded from confident calling"),
        )
        .arg(
            arg!(--config <TOML>)
                .required(false)
                .help("TOML file with calling settings; flags below override it"),
        )
        .arg(
            Arg::new("bin-width")
                .long("bin-width")
                .required(false)
                .value_parser(value_parser!(u32))
                .help("Bin width in base pairs [default: 1000000]"),
        )
        .arg(
            Arg::new("frac-threshold")
                .long("frac-threshold")
                .required(false)
                .value_parser(value_parser!(f64))
                .help("Minimum fraction of a bin the dominant status must cover [default: 0.75]"),
        )
        .arg(
            Arg::new("frac-uncallable")
                .long("frac-uncallable")
                .required(false)
                .value_parser(value_parser!(f64))
                .help("Bins with a larger uncallable fraction are called uncallable [default: 0.75]"),
        )
        .arg(
            Arg::new("overlap-policy")
                .long("overlap-policy")
                .required(false)
                .value_parser(["additive", "merge"])
                .help("How overlapping same-status segments are counted [default: additive]"),
        )
        .arg(
            Arg::new("chroms")
                .long("chroms")
                .required(false)
                .num_args(1..)
                .value_delimiter(',')
                .help("Only call these chromosomes, in this order"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Long call table (sample_id, bin_index, chr, start, end, status); default: stdout"),
        )
        .arg(
            arg!(--matrix <MATRIX>)
                .required(false)
                .help("Also write a bins x samples status matrix"),
        )
        .arg(
            arg!(--frequencies <FREQUENCIES>)
                .required(false)
                .help("Also write per-bin counts of each status across samples"),
        )
        .arg(
            arg!(--summary <SUMMARY>)
                .required(false)
                .help("Also write a JSON run summary"),
        )
        .arg(
            arg!(-p --threads <THREADS>)
                .required(false)
                .value_parser(value_parser!(usize))
                .default_value("0")
                .help("Worker threads (0 uses all cores)"),
        )
        .arg(
            Arg::new("progress")
                .long("progress")
                .action(ArgAction::SetTrue)
                .help("Show a progress bar over samples"),
        )
}
