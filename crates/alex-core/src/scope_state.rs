use std::cell::Cell;
use std::rc::Rc;

/// Shared run-state of a session. A depth counter rather than a flag, so a nested
/// session exiting cannot mark the enclosing one as idle.
#[derive(Debug, Clone, Default)]
pub struct SessionScope {
    depth: Rc<Cell<usize>>,
}

impl SessionScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.depth.get() > 0
    }

    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    pub fn enter(&self) -> ActiveSession {
        self.depth.set(self.depth.get() + 1);
        ActiveSession {
            depth: Rc::clone(&self.depth),
        }
    }
}

/// Leaves the session scope when dropped.
#[must_use = "the session is only active while this guard is alive"]
#[derive(Debug)]
pub struct ActiveSession {
    depth: Rc<Cell<usize>>,
}

impl ActiveSession {
    pub fn depth(&self) -> usize {
        self.depth.get()
    }
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}
