use clap::{Arg, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the CLI surface from src/main.rs.
// We need to duplicate this here since build scripts can't access src/ modules.
fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("markweave")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting rich-text documents between tree models")
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .help("Path to the input document (.md or .json)")
                .index(1)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .value_name("FORMAT")
                .help("Input format (default: detected from the file)")
                .value_parser(["markdown", "nested", "flat"]),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .value_name("MODEL")
                .help("Destination model")
                .value_parser(["flat", "nested"])
                .default_value("flat"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("FILE")
                .help("Write output to a file instead of stdout")
                .value_hint(ValueHint::FilePath),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "markweave", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "markweave", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "markweave", &outdir)?;

    Ok(())
}
