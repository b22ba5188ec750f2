mod analyze;
mod motif;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "remo";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Positional motif distribution analysis over gene sets grouped by developmental stage.")
        .subcommand_required(true)
        .subcommand(analyze::cli::create_analyze_cli())
        .subcommand(motif::cli::create_motif_cli())
}

fn main() -> Result<()> {
    env_logger::init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // ANALYZE
        //
        Some((analyze::cli::ANALYZE_CMD, matches)) => {
            analyze::handlers::run_analyze(matches)?;
        }

        //
        // MOTIF TOOLS
        //
        Some((motif::cli::MOTIF_CMD, matches)) => match matches.subcommand() {
            Some((motif::cli::MOTIF_VALIDATE, matches)) => {
                motif::handlers::run_validate(matches)?;
            }
            Some((motif::cli::MOTIF_REVCOMP, matches)) => {
                motif::handlers::run_revcomp(matches)?;
            }
            Some((motif::cli::MOTIF_DRILLDOWN, matches)) => {
                motif::handlers::run_drilldown(matches)?;
            }
            _ => unreachable!("Motif subcommand not found"),
        },

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
