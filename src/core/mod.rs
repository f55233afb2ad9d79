// Core modules
pub mod metrics;
pub mod timing;

pub use metrics::{Metric, WebVitals};
pub use timing::{diff, round};
