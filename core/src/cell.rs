use serde::{Deserialize, Serialize};

/// Player-applied markings stored for one board square.
///
/// The two bits are independent on purpose: flagging a revealed square is
/// allowed, the caller decides whether to forbid it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub flagged: bool,
    pub revealed: bool,
}

impl Cell {
    /// A square the reveal flow may still open: neither revealed nor flagged.
    pub const fn can_reveal(self) -> bool {
        !self.revealed && !self.flagged
    }
}
