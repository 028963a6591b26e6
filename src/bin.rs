use std::path::Path;
use std::process::ExitCode;

use clap::{Arg, ArgAction, Command};

use chaselog::error::Result;
use chaselog::logging::parse_log_level;
use chaselog::{parse_atom, Reasoner, Term};

fn main() -> ExitCode {
    let matches = Command::new("chaselog")
        .version("0.1.0")
        .about("Materializes a set of rules over csv facts and answers queries")
        .arg(
            Arg::new("EDB")
                .help("a directory of csv files (one per predicate) or an edb config file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("RULES")
                .help("a rule file, one rule per line, e.g. path(X, Z) :- edge(X, Y), path(Y, Z)")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("QUERY")
                .help("an optional query atom, e.g. path(?X, 3); ?-prefixed terms are variables")
                .index(3),
        )
        .arg(
            Arg::new("skolem")
                .long("skolem")
                .help("witness existential head variables with fresh constants")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .help("debug, info, warning or error")
                .default_value("info"),
        )
        .get_matches();

    let level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("info");
    env_logger::Builder::new()
        .filter_level(parse_log_level(level))
        .init();

    let outcome = run(
        matches.get_one::<String>("EDB").map(String::as_str).unwrap_or(""),
        matches.get_one::<String>("RULES").map(String::as_str).unwrap_or(""),
        matches.get_one::<String>("QUERY").map(String::as_str),
        matches.get_flag("skolem"),
    );

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(edb: &str, rules: &str, query: Option<&str>, skolem: bool) -> Result<()> {
    let mut reasoner = Reasoner::new();

    let edb_path = Path::new(edb);
    if edb_path.is_dir() {
        reasoner.start_from_csv_directory(edb_path)?;
    } else {
        reasoner.start_from_config_file(edb_path)?;
    }
    reasoner.set_rules_from_file(rules, true)?;

    let report = reasoner.materialize(skolem)?;
    println!(
        "materialized {} facts in {} rounds",
        report.derived, report.rounds
    );

    if let Some(query) = query {
        let atom = parse_atom(query)?;
        let terms: Vec<String> = atom
            .terms
            .iter()
            .map(|term| match term {
                Term::Variable(name) => format!("?{}", name),
                Term::Constant(text) => text.clone(),
            })
            .collect();
        let term_refs: Vec<&str> = terms.iter().map(String::as_str).collect();

        let mut answers = 0;
        for binding in reasoner.query_text(&atom.symbol, &term_refs)? {
            println!("{}", binding.join(","));
            answers += 1;
        }
        println!("{} answers", answers);
    }

    Ok(())
}
