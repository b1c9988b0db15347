//! Bytecode format constants.

/// Magic bytes of an MF binary (interleaved tape layout).
pub const MF_MAGIC: [u8; 4] = [0xFF, 0x6D, 0x66, 0xFD];

/// Magic bytes of a BF binary (plain zeroed tape).
pub const BF_MAGIC: [u8; 4] = [0xFF, 0x6D, 0x68, 0xFD];

/// Header size in bytes: magic + big-endian memsize.
pub const HEADER_SIZE: usize = 8;

/// Offset of the first instruction; the program counter starts here.
pub const CODE_START: usize = HEADER_SIZE;

/// Operand size of an extended instruction.
pub const OPERAND_SIZE: usize = 4;

/// Size of an instruction that carries an extended opcode.
pub const EXTENDED_SIZE: usize = 1 + OPERAND_SIZE;
