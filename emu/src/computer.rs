use indexmap::IndexMap;
use mcasm::Program;
use serde::Serialize;

use crate::error::Error;
use crate::hooks::trace::{Trace, TraceEntry};
use crate::hooks::Hook;
use crate::model::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Executed-instruction ceiling
    pub max_instructions: u64,
    /// Longest string a print-string syscall will scan
    pub max_string: usize,
    pub trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_instructions: 10000,
            max_string: 1000,
            trace: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Execution {
    pub output: String,
    pub registers: IndexMap<String, i32>,
    pub memory: IndexMap<String, u8>,
    pub instructions_executed: u64,
    pub trace: Vec<TraceEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepState {
    pub current_step: usize,
    pub registers: IndexMap<String, i32>,
    pub memory: IndexMap<String, u8>,
    pub output: String,
    pub pc: usize,
    pub current_instruction: Option<String>,
    pub completed: bool,
}

/// A fatal error together with what the program produced before it
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[error("{error}")]
pub struct Failure {
    #[serde(serialize_with = "display")]
    pub error: Error,
    pub output: String,
    pub registers: IndexMap<String, i32>,
}

fn display<S: serde::Serializer>(error: &Error, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

impl Failure {
    fn new(error: Error, state: &State) -> Self {
        Failure {
            error,
            output: state.output().to_string(),
            registers: state.registers(),
        }
    }

    /// Load errors happen before any state exists
    fn load(error: mcasm::Error) -> Self {
        let state = State::new(Program::default(), 0);
        Failure::new(Error::Load(error), &state)
    }
}

pub struct Computer {
    state: State,
    config: Config,
    hooks: Vec<Box<dyn Hook>>,
}

impl Computer {
    pub fn new(text: &str, config: &Config) -> Result<Self, Failure> {
        let program = Program::load(text).map_err(Failure::load)?;
        Ok(Computer {
            state: State::new(program, config.max_string),
            config: *config,
            hooks: vec![],
        })
    }

    pub fn hook(mut self, hook: Box<dyn Hook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Run until halt, the end of the program, or the instruction ceiling
    pub fn run(self) -> Result<Execution, Failure> {
        let Computer {
            mut state,
            config,
            mut hooks,
        } = self;
        let mut trace = Trace::new(config.trace);
        state = init(state, &mut trace, &mut hooks);

        while state.is_running() {
            if state.executed() >= config.max_instructions {
                let error = Error::LimitExceeded(config.max_instructions);
                return Err(Failure::new(error, &state));
            }
            let (next, more) = tick(state, &mut trace, &mut hooks)?;
            state = next;
            if !more {
                break;
            }
        }

        log::info!("executed {} instructions", state.executed());
        Ok(Execution {
            output: state.output().to_string(),
            registers: state.registers(),
            memory: state.memory(),
            instructions_executed: state.executed(),
            trace: trace.into_entries(),
        })
    }

    /// Replay single steps `0..=n` from the start, stopping early on halt
    pub fn step(self, n: usize) -> Result<StepState, Failure> {
        let Computer {
            mut state,
            config,
            mut hooks,
        } = self;
        let mut trace = Trace::new(false);
        state = init(state, &mut trace, &mut hooks);

        for _ in 0..=n {
            if !state.is_running() {
                break;
            }
            if state.executed() >= config.max_instructions {
                let error = Error::LimitExceeded(config.max_instructions);
                return Err(Failure::new(error, &state));
            }
            state = tick(state, &mut trace, &mut hooks)?.0;
        }

        Ok(StepState {
            current_step: n,
            registers: state.registers(),
            memory: state.memory(),
            output: state.output().to_string(),
            pc: state.pc(),
            current_instruction: state.current().map(str::to_string),
            completed: !state.is_running(),
        })
    }
}

fn init(state: State, trace: &mut Trace, hooks: &mut [Box<dyn Hook>]) -> State {
    let state = trace.init(state);
    hooks.iter_mut().fold(state, |state, hook| hook.init(state))
}

/// Execute one instruction and apply side effects.
/// The flag is false once the program has run off its end.
fn tick(
    mut state: State,
    trace: &mut Trace,
    hooks: &mut [Box<dyn Hook>],
) -> Result<(State, bool), Failure> {
    let time = state.executed();
    match state.exec() {
        Ok(Some((addr, code))) => {
            let state = trace.exec(time, addr, &code, state);
            let state = hooks
                .iter_mut()
                .fold(state, |state, hook| hook.exec(time, addr, &code, state));
            Ok((state, true))
        }
        Ok(None) => Ok((state, false)),
        Err(e) => Err(Failure::new(e, &state)),
    }
}

/// Load and run `text` to completion
pub fn execute(text: &str, config: &Config) -> Result<Execution, Failure> {
    Computer::new(text, config)?.run()
}

/// Load `text` and replay `n + 1` single steps
pub fn step(text: &str, n: usize) -> Result<StepState, Failure> {
    Computer::new(text, &Config::default())?.step(n)
}
