use arch::reg::Reg;
use serde::Serialize;

/// Round-robin scratch register pool.
/// Values live only until the pool wraps around.
#[derive(Debug, Default)]
pub struct RegAlloc {
    next: usize,
    allocations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegStats {
    pub pool: usize,
    pub allocations: usize,
}

impl RegAlloc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self) -> Reg {
        let reg = Reg::TEMPS[self.next];
        self.next = (self.next + 1) % Reg::TEMPS.len();
        self.allocations += 1;
        reg
    }

    /// Restart from `$t0`
    pub fn reset(&mut self) {
        self.next = 0;
    }

    pub fn stats(&self) -> RegStats {
        RegStats {
            pool: Reg::TEMPS.len(),
            allocations: self.allocations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_around() {
        let mut regs = RegAlloc::new();
        let first: Vec<Reg> = (0..10).map(|_| regs.alloc()).collect();
        assert_eq!(first, Reg::TEMPS.to_vec());
        assert_eq!(regs.alloc(), Reg::T0);
        regs.reset();
        assert_eq!(regs.alloc(), Reg::T0);
        assert_eq!(regs.stats().allocations, 12);
    }
}
