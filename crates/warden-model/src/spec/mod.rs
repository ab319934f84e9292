mod process;
pub use process::ProcessSpec;
