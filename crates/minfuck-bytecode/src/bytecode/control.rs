//! Plain control codes (one nibble, no operand).

use std::fmt;

/// Plain control code applied directly to the tape.
///
/// Nibble values 4 and 5 are unused as plain codes. Values 8-15 only reach
/// this type as the `0xE` low nibble, which never carries an extended opcode.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Control {
    /// `0`: increment current cell.
    Inc,
    /// `1`: decrement current cell.
    Dec,
    /// `2`: move cursor right.
    Right,
    /// `3`: move cursor left.
    Left,
    /// `6`: write current cell to output.
    Output,
    /// `7`: read one input byte into current cell.
    Input,
    /// Any other nibble. Kept so the encoding round-trips.
    Nop(u8),
}

impl Control {
    /// Decode the low 4 bits of `nibble`.
    pub fn from_nibble(nibble: u8) -> Self {
        match nibble & 0xF {
            0 => Self::Inc,
            1 => Self::Dec,
            2 => Self::Right,
            3 => Self::Left,
            6 => Self::Output,
            7 => Self::Input,
            other => Self::Nop(other),
        }
    }

    pub fn to_nibble(self) -> u8 {
        match self {
            Self::Inc => 0,
            Self::Dec => 1,
            Self::Right => 2,
            Self::Left => 3,
            Self::Output => 6,
            Self::Input => 7,
            Self::Nop(n) => n & 0xF,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Inc => "inc",
            Self::Dec => "dec",
            Self::Right => "right",
            Self::Left => "left",
            Self::Output => "out",
            Self::Input => "in",
            Self::Nop(_) => "nop",
        }
    }

    /// Brainfuck character with the same effect, if any.
    pub fn brainfuck(self) -> Option<char> {
        match self {
            Self::Inc => Some('+'),
            Self::Dec => Some('-'),
            Self::Right => Some('>'),
            Self::Left => Some('<'),
            Self::Output => Some('.'),
            Self::Input => Some(','),
            Self::Nop(_) => None,
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
