/// Session-wide switch for player interaction input.
///
/// Suspensions nest: input is enabled again only after every `suspend` has
/// been matched by a `resume`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputGate {
    suspended: u32,
}

impl InputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suspend(&mut self) {
        self.suspended += 1;
    }

    pub fn resume(&mut self) {
        self.suspended = self.suspended.saturating_sub(1);
    }

    pub fn is_enabled(&self) -> bool {
        self.suspended == 0
    }

    pub fn depth(&self) -> u32 {
        self.suspended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_suspensions_balance() {
        let mut gate = InputGate::new();
        gate.suspend();
        gate.suspend();
        gate.resume();
        assert!(!gate.is_enabled());
        gate.resume();
        assert!(gate.is_enabled());
        gate.resume();
        assert_eq!(gate.depth(), 0);
    }
}
