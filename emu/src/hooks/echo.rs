use std::io::Write;

use color_print::cprint;

use super::Hook;
use crate::model::State;

/// Streams program output to stdout as it is produced
pub struct Echo {
    style: bool,
    printed: usize,
}

impl Echo {
    pub fn new(style: bool) -> Self {
        Echo { style, printed: 0 }
    }
}

impl Hook for Echo {
    fn init(&mut self, state: State) -> State {
        self.printed = 0;
        state
    }

    fn exec(&mut self, _time: u64, _addr: usize, _code: &str, state: State) -> State {
        let fresh = &state.output()[self.printed..];
        if !fresh.is_empty() {
            match self.style {
                true => cprint!("<g,s>{}</>", fresh),
                false => print!("{}", fresh),
            }
            std::io::stdout().flush().ok();
            self.printed = state.output().len();
        }
        state
    }
}
