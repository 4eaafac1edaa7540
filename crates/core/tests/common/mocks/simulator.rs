use mockall::{Sequence, mock};

use rvtest_core::common::error::ToolchainError;
use rvtest_core::toolchain::Simulator;

mock! {
    pub Simulator {}
    impl Simulator for Simulator {
        fn run(&self, testbench: &str, image: &[u8], sources: &[String]) -> Result<String, ToolchainError>;
    }
}

/// Expects one run of `testbench` over `image` and `sources`, next in `seq`, printing `trace`.
pub fn expect_testbench(
    sim: &mut MockSimulator,
    seq: &mut Sequence,
    testbench: &'static str,
    (image, sources): (&[u8], &[String]),
    trace: String,
) {
    let (image, sources) = (image.to_vec(), sources.to_vec());
    let _ = sim
        .expect_run()
        .withf(move |tb, img, src| tb == testbench && img == image.as_slice() && src == sources.as_slice())
        .times(1)
        .in_sequence(seq)
        .returning(move |_, _, _| Ok(trace.clone()));
}

/// Simulator printing `trace` for one run of any testbench.
pub fn simulator(trace: impl Into<String>) -> MockSimulator {
    let trace = trace.into();
    let mut sim = MockSimulator::new();
    let _ = sim.expect_run().times(1).returning(move |_, _, _| Ok(trace.clone()));
    sim
}
