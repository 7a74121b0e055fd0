use clap::Parser;
use color_print::cprintln;
use serde::Serialize;

use mcc::compile;

#[derive(Parser, Debug)]
#[clap(
    name = "Mini-C Compiler",
    version = "v1.0.0",
    about = "Compiles a small C subset to MIPS-style assembly"
)]
struct Args {
    /// Source file
    #[arg(default_value = "main.c")]
    input: String,

    /// Assembly output
    #[arg(short, long, default_value = "main.s")]
    output: String,

    /// Print the token list as YAML
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree as YAML
    #[arg(long)]
    ast: bool,

    /// Print the symbol table as YAML
    #[arg(long)]
    symbols: bool,

    /// Write the whole compile result as YAML
    #[arg(long)]
    report: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    simple_logger::SimpleLogger::new()
        .with_level(match args.verbose {
            true => log::LevelFilter::Debug,
            false => log::LevelFilter::Warn,
        })
        .env()
        .init()
        .ok();
    println!("Mini-C Compiler");
    println!("  < {}", args.input);

    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(e) => {
            cprintln!("<r,s>Failed to open File</>: {}: {}", args.input, e);
            std::process::exit(1);
        }
    };

    let result = compile(&source);

    if args.tokens {
        print_yaml("tokens", &result.tokens);
    }
    if args.ast {
        print_yaml("ast", &result.ast);
    }
    if args.symbols {
        print_yaml("symbols", &result.symbols);
    }
    write_yaml(&args.report, &result);

    for warning in &result.warnings {
        cprintln!("<yellow,bold>warning</>: {}", warning);
    }

    let Some(asm) = &result.asm else {
        result.print_diag(&args.input, &source);
        std::process::exit(1);
    };

    if let Err(e) = std::fs::write(&args.output, asm) {
        cprintln!("<r,s>Failed to write File</>: {}: {}", args.output, e);
        std::process::exit(1);
    }
    println!("  > {}", args.output);
    if let Some(stats) = &result.stats {
        println!(
            "  {} tokens, {} functions, {} variables, {} lines, {} warnings",
            stats.tokens, stats.functions, stats.variables, stats.code_lines, stats.warnings
        );
    }
}

fn print_yaml<T: Serialize>(title: &str, value: &T) {
    cprintln!("<blue,bold>[{}]</>", title);
    match serde_yaml::to_string(value) {
        Ok(yaml) => print!("{}", yaml),
        Err(e) => log::error!("{}", e),
    }
}

fn write_yaml<T: Serialize>(path: &Option<String>, value: &T) {
    let Some(path) = path else { return };
    let written = std::fs::File::create(path)
        .map_err(|e| e.to_string())
        .and_then(|file| serde_yaml::to_writer(file, value).map_err(|e| e.to_string()));
    match written {
        Ok(()) => println!("  > {}", path),
        Err(e) => cprintln!("<r,s>Failed to write File</>: {}: {}", path, e),
    }
}
