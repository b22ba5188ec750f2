use anyhow::{Result, bail};
use clap::ArgMatches;

pub fn run_validate(matches: &ArgMatches) -> Result<()> {
    let definitions: Vec<&String> = matches
        .get_many::<String>("definitions")
        .expect("At least one definition is required.")
        .collect();

    remo_motif::validate(&definitions)?;
    println!("ok");
    Ok(())
}

pub fn run_revcomp(matches: &ArgMatches) -> Result<()> {
    let definition = matches
        .get_one::<String>("definition")
        .expect("A definition is required.");

    println!("{}", remo_motif::reverse_complement(definition)?);
    Ok(())
}

pub fn run_drilldown(matches: &ArgMatches) -> Result<()> {
    let code = matches
        .get_one::<String>("code")
        .expect("A single IUPAC code is required.");

    let mut chars = code.chars();
    let (Some(code), None) = (chars.next(), chars.next()) else {
        bail!("expected a single IUPAC code, got `{code}`");
    };

    let bases = remo_motif::drill_down(code)?;
    if bases.is_empty() {
        println!("{code} is a concrete base");
    } else {
        let bases: Vec<String> = bases.iter().map(|b| b.to_string()).collect();
        println!("{}", bases.join(" "));
    }
    Ok(())
}
