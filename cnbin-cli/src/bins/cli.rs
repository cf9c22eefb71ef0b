use clap::{Arg, Command, value_parser};

pub const BINS_CMD: &str = "bins";

pub fn create_bins_cli() -> Command {
    Command::new(BINS_CMD)
        .about("Tile the genome into fixed-width bins and write them as BED (chr, start, end, bin index).")
        .arg(
            Arg::new("chrom-sizes")
                .long("chrom-sizes")
                .required(true)
                .help("Path to chrom.sizes file"),
        )
        .arg(
            Arg::new("bin-width")
                .long("bin-width")
                .required(false)
                .value_parser(value_parser!(u32))
                .default_value("1000000")
                .help("Bin width in base pairs"),
        )
        .arg(
            Arg::new("chroms")
                .long("chroms")
                .required(false)
                .num_args(1..)
                .value_delimiter(',')
                .help("Only tile these chromosomes, in this order"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .required(false)
                .help("Output BED file (default: stdout)"),
        )
}
