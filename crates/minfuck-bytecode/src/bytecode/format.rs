//! Shared formatting utilities for bytecode dump and execution trace.
//!
//! Both dump and trace use the same column layout:
//! ```text
//! | 2 | offset | 2 | raw bytes   | 2 | text
//! |   | 4 hex  |   | 11, padded  |   |
//! ```
//! Sub-lines (trace events) start at the text column.

use minfuck_core::Colors;

/// Column widths for instruction line formatting.
pub mod cols {
    /// Leading indentation.
    pub const INDENT: usize = 2;
    /// Offset column (4 hex digits).
    pub const OFFSET: usize = 4;
    /// Gap between columns.
    pub const GAP: usize = 2;
    /// Raw bytes column: opcode byte, space, 8 hex digits of operand.
    pub const RAW: usize = 11;
    /// Start of the text column.
    pub const TEXT: usize = INDENT + OFFSET + GAP + RAW + GAP;
}

/// Hex rendering of an instruction's bytes: `66` or `80 00000005`.
///
/// Works on partial (truncated) instructions too.
pub fn raw_column(bytes: &[u8]) -> String {
    let Some((first, rest)) = bytes.split_first() else {
        return String::new();
    };
    let mut out = format!("{first:02x}");
    if !rest.is_empty() {
        out.push(' ');
        for b in rest {
            out.push_str(&format!("{b:02x}"));
        }
    }
    out
}

/// One instruction line: offset, raw bytes, text painted in `text_color`.
pub fn instruction_line(
    offset: usize,
    raw: &str,
    text: &str,
    text_color: &str,
    colors: Colors,
) -> String {
    format!(
        "{indent}{dim}{offset:04x}{reset}{gap}{dim}{raw:<raw_w$}{reset}{gap}{text_color}{text}{reset}",
        indent = " ".repeat(cols::INDENT),
        gap = " ".repeat(cols::GAP),
        raw_w = cols::RAW,
        dim = colors.dim,
        reset = colors.reset,
    )
}

/// Line aligned with the text column of [`instruction_line`].
pub fn sub_line(text: &str) -> String {
    format!("{}{text}", " ".repeat(cols::TEXT))
}

/// A byte as hex, plus its character when printable ASCII: `41 'A'`.
pub fn byte_repr(b: u8) -> String {
    if b.is_ascii_graphic() || b == b' ' {
        format!("{b:02x} '{}'", b as char)
    } else {
        format!("{b:02x}")
    }
}
