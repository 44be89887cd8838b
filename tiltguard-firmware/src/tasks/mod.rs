//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod posture;
pub mod report;

pub use posture::posture_task;
pub use report::report_task;
