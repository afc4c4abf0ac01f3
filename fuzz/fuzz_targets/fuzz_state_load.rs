//! Fuzz target for save-state loading.
//!
//! Arbitrary blobs must either load cleanly or be rejected without touching
//! the CPU. Accepted states must survive another save and parse.

#![no_main]

use lib65c02::{Cpu, CpuState, FlatMemory};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut cpu = Cpu::new(FlatMemory::new());
    let before = CpuState::capture(&cpu);

    match cpu.load_state(&mut &data[..]) {
        Ok(()) => {
            let mut blob = Vec::new();
            cpu.save_state(&mut blob).expect("Vec sink never fails");
            let reparsed = CpuState::from_bytes(&blob).expect("saved blob must parse");
            assert_eq!(reparsed, CpuState::capture(&cpu));
        }
        Err(_) => assert_eq!(CpuState::capture(&cpu), before),
    }
});
