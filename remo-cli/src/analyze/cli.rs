use clap::{Arg, ArgAction, Command, arg};

pub const ANALYZE_CMD: &str = "analyze";

pub fn create_analyze_cli() -> Command {
    Command::new(ANALYZE_CMD)
        .about("Run a motif x stage analysis over a sequence file and print the results as JSON.")
        .arg(Arg::new("file").required(true).help(
            "Sequence file to analyze (.fasta, optionally gzipped); annotation lines carry \
             expression levels and markers",
        ))
        .arg(arg!(--motif <name> "Preset motif name; repeatable").action(ArgAction::Append))
        .arg(
            arg!(--definition <iupac> "Custom motif definition; repeatable")
                .action(ArgAction::Append),
        )
        .arg(arg!(--stage <name> "Stage to analyze; repeatable. Use __ALL__ for the whole set")
            .action(ArgAction::Append))
        .arg(arg!(--organisms <path> "JSON file of organism presets"))
        .arg(arg!(--organism <name> "Organism preset to apply"))
        .arg(arg!(--strategy <strategy> "top or bottom").value_parser(["top", "bottom"]))
        .arg(
            arg!(--mode <mode> "percentile or fixed gene count")
                .value_parser(["percentile", "count"]),
        )
        .arg(arg!(--percentile <fraction> "Expression percentile in (0, 1]"))
        .arg(arg!(--count <n> "Fixed gene count for --mode count"))
        .arg(arg!(--min <position> "Lower bound of the distribution range"))
        .arg(arg!(--max <position> "Upper bound of the distribution range"))
        .arg(arg!(--"bucket-size" <size> "Distribution bucket width"))
        .arg(arg!(--"align-marker" <name> "Marker to align positions to, e.g. atg"))
        .arg(arg!(--output <path> "Write JSON here instead of stdout"))
        .arg(arg!(--tables "Include per-gene and per-bucket tables in the output").action(ArgAction::SetTrue))
}
