//! Tinct CLI

use tinct::commands::{check_paths, inspect, View};
use tinct::options::Options;
use tinct::{init_tracing, CliError};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let result = match args[1].as_str() {
        "styles" => run_inspect(View::Styles, &args[2..]),
        "folds" => run_inspect(View::Folds, &args[2..]),
        "states" => run_inspect(View::States, &args[2..]),
        "check" => run_check(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => Err(CliError::Usage(format!("unknown command '{other}'"))),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        if matches!(err, CliError::Usage(_)) {
            eprintln!();
            print_usage();
        }
        std::process::exit(1);
    }
}

fn run_inspect(view: View, args: &[String]) -> Result<(), CliError> {
    let options = Options::parse(args)?;
    inspect(view, &options)
}

fn run_check(args: &[String]) -> Result<(), CliError> {
    let options = Options::parse(args)?;
    let report = check_paths(&options)?;
    for (path, divergence) in &report.diverged {
        println!("DIVERGED: {}: {divergence}", path.display());
    }
    for (path, err) in &report.failed {
        eprintln!("FAILED: {}: {err}", path.display());
    }
    if !report.failed.is_empty() {
        return Err(CliError::Unchecked {
            count: report.failed.len(),
        });
    }
    if !report.diverged.is_empty() {
        return Err(CliError::Diverged {
            count: report.diverged.len(),
        });
    }
    println!("OK: {} file(s) rescan identically from every line", report.checked);
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: tinct <command> [options] <paths...>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  styles    Print style runs for each line");
    eprintln!("  folds     Print fold levels for each line");
    eprintln!("  states    Print packed line states");
    eprintln!("  check     Verify line-by-line rescans match a full scan (parallel)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --lang=<name>              dart, asymptote, cmake, powershell, fsharp or vhdl");
    eprintln!("  --keywords=<index>=<file>  Replace keyword list <index> with the words in <file>");
    eprintln!();
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=tinct_core=debug) for trace output.");
}
