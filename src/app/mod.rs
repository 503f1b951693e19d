// Application layer: entry points shared by the binaries.

#[cfg(feature = "cli")]
pub mod runner;
