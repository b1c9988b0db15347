//! Tests for the bytecode module.

use super::*;

fn program(code: &[u8]) -> Vec<u8> {
    let mut bytes = Header::new(Variant::Bf, 16).to_bytes().to_vec();
    bytes.extend_from_slice(code);
    bytes
}

#[test]
fn byte_storage_copy_from_slice() {
    let data = [1u8, 2, 3, 4, 5];
    let storage = ByteStorage::copy_from_slice(&data);

    assert_eq!(&*storage, &data[..]);
    assert_eq!(storage.len(), 5);
    assert_eq!(storage[2], 3);
}

#[test]
fn module_error_display() {
    assert_eq!(
        ModuleError::FileTooSmall(3).to_string(),
        "Invalid MF binary(file too small)"
    );
    assert_eq!(
        ModuleError::BadMagic([0; 4]).to_string(),
        "Invalid MF binary(magic mismatch)"
    );
}

#[test]
fn header_only_module_has_empty_code() {
    let module = Module::from_bytes(program(&[])).unwrap();
    assert_eq!(module.size(), CODE_START);
    assert!(module.code().is_empty());
    assert_eq!(module.instructions().count(), 0);
}

#[test]
fn load_rejects_bad_input() {
    assert!(matches!(
        Module::load(&[0xFF, 0x6D]),
        Err(ModuleError::FileTooSmall(2))
    ));
    assert!(matches!(
        Module::load(&[1, 2, 3, 4, 0, 0, 0, 0]),
        Err(ModuleError::BadMagic([1, 2, 3, 4]))
    ));
}

#[test]
fn linear_sweep_offsets() {
    let module = Module::from_bytes(program(&[0x66, 0x80, 0, 0, 0, 5, 0x23])).unwrap();
    let offsets: Vec<usize> = module.instructions().map(|(offset, _)| offset).collect();
    assert_eq!(offsets, [8, 9, 14]);
    assert_eq!(
        module.decode_at(9),
        Ok(Instruction::Extended(Extended::add(5)))
    );
}

#[test]
fn linear_sweep_stops_after_truncation() {
    let module = Module::from_bytes(program(&[0x00, 0x90, 0x00])).unwrap();
    let items: Vec<_> = module.instructions().collect();
    assert_eq!(items.len(), 2);
    assert_eq!(
        items[1],
        (
            9,
            Err(DecodeError::Truncated {
                offset: 9,
                needed: 5,
                available: 2,
            })
        )
    );
}

#[test]
fn from_path_reads_file() {
    let path = std::env::temp_dir().join(format!("minfuck-module-{}.mf", std::process::id()));
    std::fs::write(&path, program(&[0x66])).unwrap();
    let module = Module::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(module.header(), Header::new(Variant::Bf, 16));
    assert_eq!(module.code(), &[0x66]);
}
