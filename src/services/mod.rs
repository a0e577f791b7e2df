pub mod batch_driver;
pub mod output;

pub use batch_driver::{BatchDriver, BatchOutcome, CancelFlag};
pub use output::write_samples;
