#![allow(dead_code, unused_imports)]

pub mod builders;

pub use builders::entries::{sample_batch, TestNavigationBuilder};
pub use builders::host::{TestEnvironment, TestEnvironmentBuilder};
