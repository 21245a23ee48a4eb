use clap::{App, Arg};
use log::debug;
use propsat::*;
use std::fs::File;

fn main() {
    env_logger::init();

    let matches = App::new("propsat")
        .about("Check satisfiability and entailment of propositional formulas")
        .arg(Arg::with_name("AXIOM").help("axiom formulas").multiple(true).index(1))
        .arg(
            Arg::with_name("file")
                .short("f")
                .long("file")
                .value_name("FILE")
                .help("read axioms from FILE, one per line ('-' for stdin)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("prove")
                .short("p")
                .long("prove")
                .value_name("PROP")
                .help("check whether the axioms entail PROP")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("models")
                .short("m")
                .long("models")
                .value_name("N")
                .help("number of models to print")
                .default_value("10"),
        )
        .arg(
            Arg::with_name("max-vars")
                .long("max-vars")
                .value_name("N")
                .help("refuse to enumerate more than N variables")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("classify")
                .short("t")
                .long("classify")
                .help("report whether each axiom is a tautology, a contradiction, or contingent"),
        )
        .get_matches();

    let mut checker = Checker::new();
    match matches.value_of("models").map(str::parse::<usize>) {
        Some(Ok(n)) => checker = checker.max_models(n),
        Some(Err(_)) => fail("--models expects a number"),
        None => {}
    }
    match matches.value_of("max-vars").map(str::parse::<usize>) {
        Some(Ok(n)) => checker = checker.max_variables(Some(n)),
        Some(Err(_)) => fail("--max-vars expects a number"),
        None => {}
    }

    let mut axioms = match matches.value_of("file") {
        Some("-") => parse_reader(std::io::stdin()).unwrap_or_else(|e| fail(e)),
        Some(path) => parse_from_file(path).unwrap_or_else(|e| fail(format!("{}: {}", path, e))),
        None => vec![],
    };
    for text in matches.values_of("AXIOM").into_iter().flatten() {
        axioms.push(parse_or_fail(text));
    }
    let proposition = matches.value_of("prove").map(parse_or_fail);
    debug!("{} axiom(s), proposition {:?}", axioms.len(), proposition);

    if matches.is_present("classify") {
        for axiom in &axioms {
            let kind = if checker.is_tautology(axiom).unwrap_or_else(|e| fail(e)) {
                "tautology"
            } else if checker.is_contradiction(axiom).unwrap_or_else(|e| fail(e)) {
                "contradiction"
            } else {
                "contingent"
            };
            println!("{}: {}", axiom, kind);
        }
    }

    let result = checker.is_satisfiable(&axioms).unwrap_or_else(|e| fail(e));
    match &result {
        SatResult::Satisfiable(models) => {
            println!("satisfiable");
            for model in models {
                println!("  {}", format_valuation(model));
            }
        }
        SatResult::Unsatisfiable => println!("unsatisfiable"),
    }

    let exit_code = match proposition {
        Some(proposition) => {
            match checker.find_counterexample(&axioms, &proposition).unwrap_or_else(|e| fail(e)) {
                None => {
                    println!("entails {}", proposition);
                    0
                }
                Some(counterexample) => {
                    println!("does not entail {}", proposition);
                    println!("  counterexample: {}", format_valuation(&counterexample));
                    1
                }
            }
        }
        None if result.is_satisfiable() => 0,
        None => 1,
    };
    std::process::exit(exit_code);
}

fn parse_or_fail(text: &str) -> Expr {
    parse(text).unwrap_or_else(|e| fail(format!("{:?}: {}", text, e)))
}

fn parse_from_file(path: &str) -> Result<Vec<Expr>, LoadError> {
    let file = File::open(path)?;
    parse_reader(file)
}

fn format_valuation(valuation: &Valuation) -> String {
    if valuation.is_empty() {
        return "(empty valuation)".to_string();
    }
    valuation
        .iter()
        .map(|(name, value)| format!("{}={}", name, if *value { 1 } else { 0 }))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", message);
    std::process::exit(-1);
}
