//! # clapconf demo application
//!
//! A sample CLI tool that showcases how to integrate
//! [clapconf](https://docs.rs/clapconf) into a real application. This is
//! **not** a real app; it exists purely to demonstrate and manually verify
//! clapconf's features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example clapconf_demo -- greet
//! cargo run --example clapconf_demo -- --config demo.yml greet
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature               | How to exercise it                                        |
//! |-----------------------|-----------------------------------------------------------|
//! | Compiled defaults     | `cargo run --example clapconf_demo -- greet`              |
//! | Config file           | Create `demo.yml`, then pass `--config demo.yml`          |
//! | Default config path   | Create `clapconf-demo.yml` in cwd, run without `--config` |
//! | CLI override          | `--config demo.yml greet --name Ada` (flag wins)          |
//! | Section extraction    | Put keys under a `demo:` mapping, see `SECTION` below     |
//! | Dumping               | `cargo run --example clapconf_demo -- dump out.toml`      |

use clap::{Arg, ArgMatches, Command};

use clapconf::{ConfigOption, Format, dump, values_from_matches};

// Flip to narrow the config to a nested `demo:` section before injection.
const SECTION: Option<&str> = None;

fn command() -> Command {
    Command::new("clapconf-demo")
        .subcommand_required(true)
        .arg(
            Arg::new("name")
                .long("name")
                .global(true)
                .default_value("world")
                .help("Who to greet."),
        )
        .arg(
            Arg::new("greeting")
                .long("greeting")
                .global(true)
                .default_value("Hello")
                .help("Greeting word."),
        )
        .arg(
            Arg::new("shout")
                .long("shout")
                .global(true)
                .default_value("false")
                .help("Uppercase the output (true/false)."),
        )
        .subcommand(Command::new("greet").about("Print the resolved greeting."))
        .subcommand(
            Command::new("dump")
                .about("Write the resolved values to a config file.")
                .arg(Arg::new("output").required(true).help("Output file path.")),
        )
}

fn greet(matches: &ArgMatches) {
    let name = matches.get_one::<String>("name").unwrap();
    let greeting = matches.get_one::<String>("greeting").unwrap();
    let mut line = format!("{greeting}, {name}!");
    if matches.get_one::<String>("shout").map(String::as_str) == Some("true") {
        line = line.to_uppercase();
    }
    println!("{line}");
}

fn dump_values(matches: &ArgMatches, config_id: &str) {
    let sub = matches.subcommand_matches("dump").unwrap();
    let output = sub.get_one::<String>("output").unwrap();
    let format = Format::from_path(output).unwrap_or(Format::Toml);

    let values = values_from_matches(matches, &[config_id]);
    match dump(&values, format, output) {
        Ok(()) => println!("wrote {output}"),
        Err(e) => {
            eprintln!("dump failed: {e}");
            std::process::exit(1);
        }
    }
}

fn main() {
    let mut opt = ConfigOption::format_default(Format::Yaml, "clapconf-demo.yml")
        .help("YAML configuration file (default: clapconf-demo.yml).");
    if let Some(section) = SECTION {
        opt = opt.section([section]);
    }

    let matches = opt.get_matches(command());
    match matches.subcommand_name() {
        Some("greet") => greet(&matches),
        Some("dump") => dump_values(&matches, opt.id()),
        _ => unreachable!("subcommand_required"),
    }
}
