pub mod vcs;

pub use vcs::{GitStatus, Vcs};
