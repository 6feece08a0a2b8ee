use std::path::Path;

use clap::{App, Arg};
use env_logger::Env;
use log::{error, info, warn};
use nbtree_tools::{read_input, Result};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let matches = App::new("nbt-check")
        .about("Check that a tag file decodes and is already in canonical form.")
        .arg(
            Arg::with_name("file")
                .takes_value(true)
                .required(false)
                .help("file to read, stdin if absent"),
        )
        .get_matches();

    match run(matches.value_of("file").map(Path::new)) {
        Ok(true) => info!("canonical"),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    }
}

/// Decodes and re-encodes the input, returning whether the bytes matched.
fn run(file: Option<&Path>) -> Result<bool> {
    let data = read_input(file)?;
    let root = nbtree::from_bytes(&data)?;
    let reencoded = nbtree::to_bytes(&root)?;

    if reencoded == data {
        return Ok(true);
    }

    match data.iter().zip(&reencoded).position(|(a, b)| a != b) {
        Some(i) => warn!("not canonical: first difference at byte {}", i),
        None => warn!(
            "not canonical: {} bytes in, {} bytes out",
            data.len(),
            reencoded.len()
        ),
    }
    Ok(false)
}
