use std::{cell::Cell, rc::Rc};

/// Proof that a start is in flight. Dispose cancels it, and a cancelled or
/// superseded ticket can no longer install its cube.
#[derive(Debug, Clone)]
pub struct StartTicket {
    cancelled: Rc<Cell<bool>>,
}

impl StartTicket {
    fn new() -> Self {
        Self {
            cancelled: Rc::new(Cell::new(false)),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    fn cancel(&self) {
        self.cancelled.set(true);
    }

    fn same(&self, other: &StartTicket) -> bool {
        Rc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

/// The one cube a page may run, from the start request until dispose.
///
/// GPU setup is asynchronous, so a cube spends some time `Starting` before it
/// has a handle. Dispose has to work in that window too.
#[derive(Debug)]
pub enum CubeSlot<H> {
    Idle,
    Starting(StartTicket),
    Running(H),
}

impl<H> Default for CubeSlot<H> {
    fn default() -> Self {
        CubeSlot::Idle
    }
}

impl<H> CubeSlot<H> {
    /// Reserves the slot. `None` if a cube is already starting or running.
    pub fn begin(&mut self) -> Option<StartTicket> {
        match self {
            CubeSlot::Idle => {
                let ticket = StartTicket::new();
                *self = CubeSlot::Starting(ticket.clone());
                Some(ticket)
            }
            CubeSlot::Starting(_) | CubeSlot::Running(_) => None,
        }
    }

    /// Installs the started cube. Hands `handle` back if the start was
    /// cancelled in the meantime, so the caller can tear it down.
    pub fn finish(&mut self, ticket: &StartTicket, handle: H) -> Result<(), H> {
        match self {
            CubeSlot::Starting(current) if current.same(ticket) && !ticket.is_cancelled() => {
                *self = CubeSlot::Running(handle);
                Ok(())
            }
            _ => Err(handle),
        }
    }

    /// Gives the slot back after a start that mounted nothing or failed.
    pub fn abort(&mut self, ticket: &StartTicket) {
        if matches!(self, CubeSlot::Starting(current) if current.same(ticket)) {
            *self = CubeSlot::Idle;
        }
    }

    /// Empties the slot. Returns the running handle for teardown; a pending
    /// start is cancelled instead.
    pub fn dispose(&mut self) -> Option<H> {
        match std::mem::take(self) {
            CubeSlot::Idle => None,
            CubeSlot::Starting(ticket) => {
                ticket.cancel();
                None
            }
            CubeSlot::Running(handle) => Some(handle),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, CubeSlot::Idle)
    }
}
