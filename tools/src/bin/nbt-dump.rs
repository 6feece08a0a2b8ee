use std::path::Path;

use clap::{value_t, App, Arg};
use env_logger::Env;
use log::{error, info};
use nbtree::DecodeOpts;
use nbtree_tools::{read_input, Result};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let default_depth = nbtree::DEFAULT_MAX_DEPTH.to_string();
    let matches = App::new("nbt-dump")
        .about("Print a tag file in readable form. Gzipped input is unwrapped automatically.")
        .arg(
            Arg::with_name("file")
                .takes_value(true)
                .required(false)
                .help("file to read, stdin if absent"),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .takes_value(false)
                .required(false)
                .help("print as JSON instead"),
        )
        .arg(
            Arg::with_name("max-depth")
                .long("max-depth")
                .takes_value(true)
                .required(false)
                .default_value(&default_depth)
                .help("deepest nesting of lists and compounds to accept"),
        )
        .get_matches();

    let max_depth = value_t!(matches, "max-depth", usize).unwrap_or_else(|e| e.exit());

    if let Err(e) = run(
        matches.value_of("file").map(Path::new),
        matches.is_present("json"),
        max_depth,
    ) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(file: Option<&Path>, json: bool, max_depth: usize) -> Result<()> {
    let opts = DecodeOpts::new().max_depth(max_depth);
    let data = read_input(file)?;
    info!("read {} bytes", data.len());

    let root = nbtree::from_bytes_with_opts(&data, opts)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&root)?);
    } else {
        println!("{}", root);
    }

    Ok(())
}
