use arch::reg::Reg;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;

use crate::model::State;

use super::Hook;

#[derive(Debug)]
pub struct Dump {
    file: Option<String>,
    all: bool,
    list: List,
}

/// Instruction index -> what to print after it executes
#[derive(Debug, Default, Deserialize)]
struct List(HashMap<usize, Config>);

#[derive(Debug, Default, Deserialize)]
struct Config {
    #[serde(default)]
    regs: Vec<String>,
    #[serde(default)]
    stack: bool,
    #[serde(default)]
    data: Vec<String>,
}

impl Dump {
    pub fn arg(file: Option<String>, all: bool) -> Result<Self, String> {
        let list = match &file {
            Some(fname) => {
                let file = File::open(fname).map_err(|e| format!("{}: {}", fname, e))?;
                serde_yaml::from_reader(BufReader::new(file))
                    .map_err(|e| format!("{}: {}", fname, e))?
            }
            None => List::default(),
        };
        Ok(Self { file, all, list })
    }

    fn get(&self, addr: usize) -> Option<&Config> {
        self.list.0.get(&addr)
    }
}

impl Hook for Dump {
    fn init(&mut self, state: State) -> State {
        if self.all {
            println!(" * Dump all");
        }
        if let Some(fname) = &self.file {
            println!(" * Dump[{}] {:?}", self.list.0.len(), fname);
        }
        state
    }

    fn exec(&mut self, time: u64, addr: usize, code: &str, cpu: State) -> State {
        if let Some(cfg) = self.get(addr) {
            println!(" [{:0>5}] {:>4}: {}", time, addr, code);
            self.print_reg(&cpu);
            self.print_named(&cpu, &cfg.regs);
            if cfg.stack {
                self.print_stack(&cpu);
            }
            self.print_data(&cpu, &cfg.data);
        } else if self.all {
            println!(" [{:0>5}] {:>4}: {}", time, addr, code);
            self.print_reg(&cpu);
        }
        cpu
    }
}

impl Dump {
    fn print_reg(&self, cpu: &State) {
        println!(" +----------------+----------------+----------------+----------------+");
        for row in 0..8u8 {
            let cells: Vec<String> = (0..4u8)
                .map(|col| {
                    let reg = Reg::from(col * 8 + row);
                    format!(" {:>5}: {:0>8X}", reg.name(), cpu.get(reg))
                })
                .collect();
            println!(" |{} |", cells.join(" |"));
        }
        println!(" +----------------+----------------+----------------+----------------+");
    }

    fn print_named(&self, cpu: &State, regs: &[String]) {
        for name in regs {
            match cpu.get_by_name(name) {
                Ok(val) => println!(" | {:>5} : {:>11}", name, val),
                Err(e) => log::warn!("{}", e),
            }
        }
    }

    fn print_stack(&self, cpu: &State) {
        let sp = cpu.get(Reg::SP) as u32;
        let top = State::SP_INIT as u32;
        for addr in (sp..top).step_by(4) {
            println!(" | {:0>8X} : {:>11}", addr, cpu.load_word(addr));
        }
        println!(" +------------------------------+");
    }

    fn print_data(&self, cpu: &State, labels: &[String]) {
        for label in labels {
            match cpu.program().symbol(label) {
                Some(addr) => println!(
                    " | {:0>8X} : {:>11}  {}",
                    addr,
                    cpu.load_word(addr),
                    label
                ),
                None => log::warn!("Unknown data label: {}", label),
            }
        }
        if !labels.is_empty() {
            println!(" +------------------------------+");
        }
    }
}
