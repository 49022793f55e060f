use std::{fs, io::Read};

use log::{error, info};
use parsing_table_helper::{
    grammar::pretty_print::ParseOutput,
    tokenize::{tokenize_chars, tokenize_words},
    FirstFollow, Grammar, LL1Parser, SLRParser,
};

fn print_help() {
    println!("Usage: parsing-table-helper outputs [options] [grammar file]");
    println!("outputs:");
    println!("  prod: Productions");
    println!("  ff: First and follow sets");
    println!("  ll1: LL(1) parsing table");
    println!("  lr0fsm: LR(0) Automata");
    println!("  slr: SLR(1) parsing table");
    println!("  check: Whether the grammar is LL(1) and SLR(1)");
    println!("options:");
    println!("  -h: Print this help");
    println!("  -l: Print in LaTeX format");
    println!("  -j: Print in JSON format");
    println!("  -w: Split parser input on whitespace instead of characters");
    println!("  -s <symbol>: Use <symbol> as the start symbol");
    println!("  -p <input>: Parse <input> with every parser that can be built");
}

enum OutputFormat {
    Plain,
    LaTeX,
    JSON,
}

struct Options<'a> {
    outputs: Vec<&'a str>,
    format: OutputFormat,
    split_words: bool,
    start_symbol: Option<&'a str>,
    inputs: Vec<&'a str>,
    grammar_file: Option<&'a str>,
}

const OUTPUTS: [&str; 6] = ["prod", "ff", "ll1", "lr0fsm", "slr", "check"];

/// `None` means the help text should be printed.
fn parse_args(args: &[String]) -> Option<Options> {
    let mut options = Options {
        outputs: Vec::new(),
        format: OutputFormat::Plain,
        split_words: false,
        start_symbol: None,
        inputs: Vec::new(),
        grammar_file: None,
    };

    let mut i: usize = 0;
    while i < args.len() && OUTPUTS.contains(&args[i].as_str()) {
        options.outputs.push(args[i].as_str());
        i += 1;
    }

    while i < args.len() && args[i].starts_with('-') {
        match args[i].as_str() {
            "-l" => options.format = OutputFormat::LaTeX,
            "-j" => options.format = OutputFormat::JSON,
            "-w" => options.split_words = true,
            "-s" => {
                i += 1;
                options.start_symbol = Some(args.get(i)?.as_str());
            }
            "-p" => {
                i += 1;
                options.inputs.push(args.get(i)?.as_str());
            }
            _ => return None,
        }
        i += 1;
    }

    if i + 1 < args.len() || (options.outputs.is_empty() && options.inputs.is_empty()) {
        return None;
    }
    options.grammar_file = args.get(i).map(|s| s.as_str());
    Some(options)
}

macro_rules! emit {
    ($format:expr, $t:expr) => {
        println!(
            "{}",
            match $format {
                OutputFormat::Plain => $t.to_plaintext(),
                OutputFormat::LaTeX => $t.to_latex(),
                OutputFormat::JSON => serde_json::to_string(&$t).unwrap_or_default(),
            }
        )
    };
}

fn main() {
    pretty_env_logger::init();

    let args = std::env::args().skip(1).collect::<Vec<String>>();
    let options = match parse_args(&args) {
        Some(options) => options,
        None => {
            print_help();
            return;
        }
    };

    let input = match options.grammar_file {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
    };
    let input = match input {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Failed to read grammar: {}", e);
            std::process::exit(1);
        }
    };

    let mut g = match Grammar::parse(&input) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Invalid grammar: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(start) = options.start_symbol {
        if let Err(e) = g.set_start_symbol(start) {
            eprintln!("Invalid grammar: {}", e);
            std::process::exit(1);
        }
    }

    // Each parser is attempted on its own; a conflict in one leaves the
    // other usable.
    let ll1 = LL1Parser::new(&g);
    let slr = SLRParser::new(&g);
    match (&ll1, &slr) {
        (Ok(_), Ok(_)) => info!("grammar is LL(1) and SLR(1)"),
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => info!("only one parser available: {}", e),
        (Err(_), Err(_)) => info!("grammar is neither LL(1) nor SLR(1)"),
    }

    for output in &options.outputs {
        match *output {
            "prod" => {
                let t = g.to_production_output_vec();
                emit!(options.format, t);
            }
            "ff" => {
                let ff = FirstFollow::new(&g);
                match options.format {
                    OutputFormat::JSON => {
                        println!("{}", serde_json::to_string(&ff).unwrap_or_default())
                    }
                    _ => {
                        let t = ff.to_output_vec();
                        emit!(options.format, t);
                    }
                }
            }
            "ll1" => match &ll1 {
                Ok(parser) => emit!(options.format, parser.table()),
                Err(e) => eprintln!("The grammar is not LL(1): {}", e),
            },
            "lr0fsm" => match &slr {
                Ok(parser) => {
                    let automaton = parser.automaton();
                    match options.format {
                        OutputFormat::Plain => println!("{}", automaton.to_plaintext()),
                        OutputFormat::LaTeX => println!("{}", automaton.to_latex()),
                        OutputFormat::JSON => println!(
                            "{}",
                            serde_json::to_string(&automaton.to_output_vec()).unwrap_or_default()
                        ),
                    }
                }
                Err(e) => eprintln!("The grammar is not SLR(1): {}", e),
            },
            "slr" => match &slr {
                Ok(parser) => {
                    if let OutputFormat::Plain = options.format {
                        println!("{}\n", parser.rules().to_plaintext());
                    }
                    emit!(options.format, parser.table());
                }
                Err(e) => eprintln!("The grammar is not SLR(1): {}", e),
            },
            "check" => {
                println!("{}", g.to_production_output_vec().to_plaintext());
                match &ll1 {
                    Ok(_) => println!("- The grammar IS LL(1)"),
                    Err(e) => println!("- The grammar is NOT LL(1): {}", e),
                }
                match &slr {
                    Ok(_) => println!("- The grammar IS SLR(1)"),
                    Err(e) => println!("- The grammar is NOT SLR(1): {}", e),
                }
            }
            _ => unreachable!(),
        }
    }

    for text in &options.inputs {
        let tokens = if options.split_words {
            tokenize_words(text, &g)
        } else {
            tokenize_chars(text)
        };
        let tokens = match tokens {
            Ok(tokens) => tokens,
            Err(e) => {
                error!("rejected input {:?}", text);
                eprintln!("{}: {}", text, e);
                continue;
            }
        };

        if let Ok(parser) = &ll1 {
            emit!(options.format, ParseOutput::new("LL(1)", &parser.parse(&tokens)));
        }
        if let Ok(parser) = &slr {
            emit!(options.format, ParseOutput::new("SLR(1)", &parser.parse(&tokens)));
        }
    }
}
