use clap::{Arg, Command};

pub const MOTIF_CMD: &str = "motif";
pub const MOTIF_VALIDATE: &str = "validate";
pub const MOTIF_REVCOMP: &str = "revcomp";
pub const MOTIF_DRILLDOWN: &str = "drilldown";

pub fn create_motif_cli() -> Command {
    Command::new(MOTIF_CMD)
        .about("Inspect IUPAC motif definitions.")
        .subcommand_required(true)
        .subcommand(
            Command::new(MOTIF_VALIDATE)
                .about("Check one or more definitions against the supported alphabet.")
                .arg(
                    Arg::new("definitions")
                        .num_args(1..)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(MOTIF_REVCOMP)
                .about("Print the reverse complement of a definition.")
                .arg(Arg::new("definition").required(true)),
        )
        .subcommand(
            Command::new(MOTIF_DRILLDOWN)
                .about("Print the concrete bases an ambiguous code can stand for.")
                .arg(Arg::new("code").required(true)),
        )
}
