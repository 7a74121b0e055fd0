use clap::Parser;
use color_print::cprintln;
use serde::Serialize;

use mcemu::hooks::{dump::Dump, echo::Echo};
use mcemu::{Computer, Config, Error, Failure};

#[derive(Parser, Debug)]
#[clap(
    name = "Mini-C Emulator",
    version = "v1.0.0",
    about = "Runs assembly produced by mcc"
)]
struct Args {
    /// Instruction ceiling
    #[arg(short = 't', long, default_value_t = 10000)]
    tmax: u64,

    /// Replay N+1 single steps and print the machine state
    #[arg(short, long)]
    step: Option<usize>,

    #[arg(short, long)]
    dump_cfg: Option<String>,

    #[arg(short = 'a', long)]
    dump_all: bool,

    /// Write the execution trace as YAML
    #[arg(long)]
    trace: Option<String>,

    /// Write the execution result as YAML
    #[arg(long)]
    report: Option<String>,

    #[arg(short, long)]
    verbose: bool,

    #[arg(default_value = "main.s")]
    input_file: String,
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
    println!("Mini-C Emulator");

    println!("+-----------------------------------------------+");
    println!("| Emulate: {:<36} |", args.input_file);
    if let Some(fname) = &args.dump_cfg {
        println!("|  - Dump: {:<36} |", fname);
    }
    if args.dump_all {
        println!("|  - Dump: {:<36} |", "All");
    }
    println!("+-----------------------------------------------+");

    let text = match std::fs::read_to_string(&args.input_file) {
        Ok(text) => text,
        Err(e) => {
            cprintln!("<r,s>Failed to open File</>: {}: {}", args.input_file, e);
            std::process::exit(1);
        }
    };

    let dump = match Dump::arg(args.dump_cfg.clone(), args.dump_all) {
        Ok(dump) => dump,
        Err(e) => {
            cprintln!("<r,s>Failed to read dump config</>: {}", e);
            std::process::exit(1);
        }
    };

    let config = Config {
        max_instructions: args.tmax,
        trace: args.trace.is_some() || args.report.is_some(),
        ..Config::default()
    };

    println!("[INIT]");
    let computer = match Computer::new(&text, &config) {
        Ok(computer) => computer,
        Err(failure) => exit_with(&args, failure),
    };
    let computer = computer
        .hook(Box::new(dump))
        .hook(Box::new(Echo::new(args.step.is_none())));

    match args.step {
        Some(n) => match computer.step(n) {
            Ok(state) => {
                println!();
                print_yaml(&state);
                write_yaml(&args.report, &state);
            }
            Err(failure) => exit_with(&args, failure),
        },
        None => match computer.run() {
            Ok(result) => {
                println!();
                println!("=================================================");
                println!(" {} instructions executed", result.instructions_executed);
                write_yaml(&args.trace, &result.trace);
                write_yaml(&args.report, &result);
            }
            Err(failure) => exit_with(&args, failure),
        },
    }
}

fn exit_with(args: &Args, failure: Failure) -> ! {
    println!();
    match &failure.error {
        Error::Load(e) => e.print_diag(&args.input_file),
        e => cprintln!("<red,bold>error</>: {}", e),
    }
    write_yaml(&args.report, &failure);
    std::process::exit(1);
}

fn print_yaml<T: Serialize>(value: &T) {
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
