use std::env;
use std::path::PathBuf;
use std::process;

use cssvar::config::CssVarOptions;
use cssvar::diagnostics::ConsoleSink;
use cssvar::error::CssVarResult;
use cssvar::host::{FileLoader, HtmlDocument};
use cssvar::logging;
use cssvar::variables::{Lookup, VariableStore};
use log::{error, info};
use url::Url;

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} [--url <page_url>] [--config <options.json>] <html_file> <command>",
        program
    );
    eprintln!("Commands:");
    eprintln!("  log [selector]                  Print all variables, or those of one selector");
    eprintln!("  get [name] [selector]           Print the value of a variable");
    eprintln!("  set <name> [value] [selector]   Set a variable, then print its new value");
    eprintln!("  is-global <name>                Print whether the variable is declared on :root");
    eprintln!("Example: {} index.html get brand-color :root", program);
}

struct Args {
    url: Option<String>,
    config: Option<PathBuf>,
    html_file: PathBuf,
    command: Vec<String>,
}

fn parse_args(args: &[String]) -> Option<Args> {
    let mut url = None;
    let mut config = None;
    let mut positional = Vec::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--url" => url = Some(iter.next()?.clone()),
            "--config" => config = Some(PathBuf::from(iter.next()?)),
            _ => positional.push(arg.clone()),
        }
    }

    let mut positional = positional.into_iter();
    let html_file = PathBuf::from(positional.next()?);
    let command: Vec<String> = positional.collect();
    if command.is_empty() {
        return None;
    }

    Some(Args { url, config, html_file, command })
}

fn load_document(args: &Args) -> CssVarResult<HtmlDocument> {
    match &args.url {
        None => HtmlDocument::from_file(&args.html_file),
        Some(url) => {
            let location = Url::parse(url).map_err(|e| cssvar::CssVarError::Url {
                url: url.clone(),
                source: e,
            })?;
            let html = std::fs::read_to_string(&args.html_file)?;
            HtmlDocument::parse_with_loader(&html, location, &FileLoader)
        }
    }
}

fn main() {
    let raw_args: Vec<String> = env::args().collect();
    let program = raw_args.first().map(String::as_str).unwrap_or("cssvar");

    let Some(args) = parse_args(&raw_args) else {
        print_usage(program);
        process::exit(1);
    };

    let options = match &args.config {
        Some(path) => match CssVarOptions::load(path) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("Failed to load options: {}", e);
                process::exit(1);
            }
        },
        None => CssVarOptions::default(),
    };

    if let Err(e) = logging::init_logger(&options) {
        eprintln!("Failed to initialize logger: {}", e);
        process::exit(1);
    }
    info!("cssvar starting with arguments: {:?}", raw_args);

    let document = match load_document(&args) {
        Ok(document) => document,
        Err(e) => {
            error!("Failed to load {}: {}", args.html_file.display(), e);
            eprintln!("Failed to load {}: {}", args.html_file.display(), e);
            process::exit(1);
        }
    };

    let mut store = VariableStore::with_sink(document, ConsoleSink::stdout())
        .with_selector(&options.selector);

    let arg = |i: usize| args.command.get(i).map(String::as_str);
    match arg(0).unwrap_or_default() {
        "log" => store.log(arg(1)),
        "get" => match store.get(arg(1), arg(2)) {
            Lookup::Value(value) => println!("{}", value),
            Lookup::Snapshot(snapshot) => match serde_json::to_string_pretty(snapshot) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("Failed to serialize snapshot: {}", e),
            },
            Lookup::NotFound => process::exit(2),
        },
        "set" => {
            let outcome = store.set(arg(1), arg(2), arg(3));
            info!("set outcome: {:?}", outcome);
            if let cssvar::SetOutcome::Written { selector } = outcome {
                if let Some(value) = store.get(arg(1), Some(selector.as_str())).value() {
                    println!("{}", value);
                }
            } else {
                process::exit(2);
            }
        }
        "is-global" => match arg(1) {
            Some(name) => println!("{}", store.is_global(name)),
            None => {
                print_usage(program);
                process::exit(1);
            }
        },
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(program);
            process::exit(1);
        }
    }

    info!("cssvar done");
}
