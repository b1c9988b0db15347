//! Tests for instruction decoding.

use super::control::Control;
use super::instructions::{DecodeError, EncodeError, Extended, ExtendedOpcode, Instruction};

fn decode(bytes: &[u8]) -> Result<Instruction, DecodeError> {
    Instruction::decode(bytes, 0)
}

#[test]
fn packed_pair() {
    assert_eq!(
        decode(&[0x66]),
        Ok(Instruction::PlainPair(Control::Output, Control::Output))
    );
    assert_eq!(
        decode(&[0x02]),
        Ok(Instruction::PlainPair(Control::Inc, Control::Right))
    );
    assert_eq!(
        decode(&[0x73]),
        Ok(Instruction::PlainPair(Control::Input, Control::Left))
    );
}

#[test]
fn unused_plain_codes_are_nops() {
    assert_eq!(
        decode(&[0x45]),
        Ok(Instruction::PlainPair(Control::Nop(4), Control::Nop(5)))
    );
}

#[test]
fn standalone_extended_reads_big_endian_operand() {
    let instr = decode(&[0x80, 0x00, 0x00, 0x00, 0x05]).unwrap();
    assert_eq!(instr, Instruction::Extended(Extended::add(5)));
    assert_eq!(instr.size(), 5);

    let instr = decode(&[0xA0, 0x01, 0x02, 0x03, 0x04]).unwrap();
    assert_eq!(instr, Instruction::Extended(Extended::forward(0x0102_0304)));
}

#[test]
fn standalone_extended_ignores_low_nibble() {
    let instr = decode(&[0xC7, 0x00, 0x00, 0x00, 0x10]).unwrap();
    assert_eq!(instr, Instruction::Extended(Extended::jump_if_zero(0x10)));
}

#[test]
fn plain_then_extended() {
    // c1 = 1 (dec), c2 = 0xD -> spb 5 (jnz)
    let instr = decode(&[0x1D, 0x00, 0x00, 0x00, 0x0D]).unwrap();
    assert_eq!(
        instr,
        Instruction::PlainThenExtended(Control::Dec, Extended::jump_if_nonzero(0x0D))
    );
    assert_eq!(instr.size(), 5);
}

#[test]
fn low_nibble_spb_six_stays_plain() {
    let instr = decode(&[0x0E, 0xFF, 0xFF, 0xFF, 0xFF]).unwrap();
    assert_eq!(instr, Instruction::PlainPair(Control::Inc, Control::Nop(0xE)));
    assert_eq!(instr.size(), 1);
}

#[test]
fn high_nibble_spb_six_is_extended_align() {
    let instr = decode(&[0xE0, 0, 0, 0, 0]).unwrap();
    assert_eq!(
        instr,
        Instruction::Extended(Extended::new(ExtendedOpcode::Align, 0))
    );
}

#[test]
fn truncated_operand() {
    assert_eq!(
        decode(&[0x80, 0x00, 0x00]),
        Err(DecodeError::Truncated {
            offset: 0,
            needed: 5,
            available: 3,
        })
    );
    assert_eq!(
        Instruction::decode(&[0x00, 0x08], 1),
        Err(DecodeError::Truncated {
            offset: 1,
            needed: 5,
            available: 1,
        })
    );
}

#[test]
fn decode_past_end() {
    assert_eq!(
        Instruction::decode(&[0x00], 1),
        Err(DecodeError::OutOfRange { offset: 1, len: 1 })
    );
}

#[test]
fn add_and_sub_use_low_byte() {
    let ext = Extended::new(ExtendedOpcode::Add, 0x1234_5603);
    assert_eq!(ext.low_byte(), 0x03);
    assert_eq!(ext.to_string(), "add 3");
}

#[test]
fn encode_matches_decode() {
    let cases = [
        Instruction::PlainPair(Control::Output, Control::Output),
        Instruction::PlainPair(Control::Inc, Control::Nop(0xE)),
        Instruction::PlainThenExtended(Control::Right, Extended::jump_if_zero(0x15)),
        Instruction::Extended(Extended::back(7)),
    ];
    for instr in cases {
        let bytes = instr.to_bytes().unwrap();
        assert_eq!(bytes.len(), instr.size());
        assert_eq!(Instruction::decode(&bytes, 0), Ok(instr));
    }
}

#[test]
fn opcode_bytes() {
    assert_eq!(
        Instruction::PlainThenExtended(Control::Right, Extended::jump_if_zero(0)).opcode_byte(),
        Ok(0x2C)
    );
    assert_eq!(
        Instruction::Extended(Extended::sub(1)).opcode_byte(),
        Ok(0x90)
    );
}

#[test]
fn unencodable_instructions_are_rejected() {
    assert_eq!(
        Instruction::PlainPair(Control::Inc, Control::Nop(0x9)).opcode_byte(),
        Err(EncodeError::PlainNibble { nibble: 0x9 })
    );
    assert_eq!(
        Instruction::PlainPair(Control::Nop(0xE), Control::Inc).opcode_byte(),
        Err(EncodeError::PlainNibble { nibble: 0xE })
    );
    assert_eq!(
        Instruction::PlainThenExtended(Control::Inc, Extended::new(ExtendedOpcode::Align, 0))
            .opcode_byte(),
        Err(EncodeError::AlignAfterPlain)
    );
}

#[test]
fn failed_encode_writes_nothing() {
    let mut out = vec![0xAA];
    let instr = Instruction::PlainThenExtended(Control::Nop(0xC), Extended::add(1));

    assert_eq!(
        instr.write_to(&mut out),
        Err(EncodeError::PlainNibble { nibble: 0xC })
    );
    assert_eq!(out, [0xAA]);
}

#[test]
fn display() {
    let instr = Instruction::PlainThenExtended(Control::Left, Extended::jump_if_nonzero(0x2A));
    assert_eq!(instr.to_string(), "left jnz 002a");
    assert_eq!(
        Instruction::PlainPair(Control::Input, Control::Output).to_string(),
        "in out"
    );
    assert_eq!(
        Instruction::Extended(Extended::new(ExtendedOpcode::Reserved, 9)).to_string(),
        "reserved"
    );
}
