pub mod benchmark;
pub mod generator;
pub mod plots;

pub use benchmark::{Benchmarker, BenchmarkResults};
pub use generator::{Profile, generate};
pub use plots::generate_plots;
