use mockall::{Sequence, mock};

use rvtest_core::common::error::ToolchainError;
use rvtest_core::toolchain::Assembler;

mock! {
    pub Assembler {}
    impl Assembler for Assembler {
        fn assemble(&self, source: &str, padding: usize) -> Result<Vec<u8>, ToolchainError>;
    }
}

/// Expects `source` to be assembled with `padding`, once, next in `seq`, yielding `image`.
pub fn expect_assembly(asm: &mut MockAssembler, seq: &mut Sequence, source: String, padding: usize, image: &[u8]) {
    let image = image.to_vec();
    let _ = asm
        .expect_assemble()
        .withf(move |s, p| s == source && *p == padding)
        .times(1)
        .in_sequence(seq)
        .returning(move |_, _| Ok(image.clone()));
}

/// Assembler returning `image` for any listing.
pub fn assembler(image: &[u8]) -> MockAssembler {
    let image = image.to_vec();
    let mut asm = MockAssembler::new();
    let _ = asm.expect_assemble().returning(move |_, _| Ok(image.clone()));
    asm
}

/// Assembler rejecting its first listing like gcc with a syntax error.
pub fn failing_assembler() -> MockAssembler {
    let mut asm = MockAssembler::new();
    let _ = asm.expect_assemble().times(1).returning(|_, _| {
        Err(ToolchainError::Failed {
            tool: "riscv64-unknown-elf-gcc".into(),
            status: "exit status: 1".into(),
            stderr: "prog.s:3: Error: unrecognized opcode".into(),
        })
    });
    asm
}
