use color_print::{cformat, cprintln};
use mcasm::Program;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "main.s")]
    input: String,

    /// Dump data symbols and the instruction table
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init()
        .ok();

    println!("Mini-C Assembler");
    println!("  < {}", args.input);

    let text = match std::fs::read_to_string(&args.input) {
        Ok(text) => text,
        Err(e) => {
            cprintln!("<r,s>Failed to open File</>: {}: {}", args.input, e);
            std::process::exit(1);
        }
    };

    let program = match Program::load(&text) {
        Ok(program) => program,
        Err(e) => {
            e.print_diag(&args.input);
            std::process::exit(1);
        }
    };

    println!(
        "  {} instructions, {} labels, {} data symbols",
        program.instruction_count(),
        program.entries.len() - program.instruction_count(),
        program.symbols.len()
    );

    if args.dump {
        println!("-------------------+-----------------------------------------------------");
        let mut symbols: Vec<_> = program.symbols.iter().collect();
        symbols.sort_by_key(|(_, addr)| **addr);
        for (label, addr) in symbols {
            println!("{}", cformat!(" <blue>{:0>8X}</> | {}", addr, label));
        }
        println!("-------------------+-----------------------------------------------------");
        for line in program.cformat() {
            println!("{}", line);
        }
        println!("-------------------+-----------------------------------------------------");
    }
}
