pub mod dump;
pub mod echo;
pub mod trace;

use crate::model::State;

/// Side effects observed around the fetch-execute loop
pub trait Hook {
    fn init(&mut self, state: State) -> State;
    fn exec(&mut self, time: u64, addr: usize, code: &str, state: State) -> State;
}
