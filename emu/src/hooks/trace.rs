use indexmap::IndexMap;
use serde::Serialize;

use super::Hook;
use crate::model::State;

/// Registers after one executed instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub pc: usize,
    pub instruction: String,
    pub registers: IndexMap<String, i32>,
}

#[derive(Debug, Default)]
pub struct Trace {
    enabled: bool,
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new(enabled: bool) -> Self {
        Trace {
            enabled,
            entries: vec![],
        }
    }

    pub fn into_entries(self) -> Vec<TraceEntry> {
        self.entries
    }
}

impl Hook for Trace {
    fn init(&mut self, state: State) -> State {
        self.entries.clear();
        state
    }

    fn exec(&mut self, _time: u64, addr: usize, code: &str, state: State) -> State {
        if self.enabled {
            self.entries.push(TraceEntry {
                pc: addr,
                instruction: code.to_string(),
                registers: state.registers(),
            });
        }
        state
    }
}
