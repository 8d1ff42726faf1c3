pub mod amp;
pub mod cli;
pub mod collector;
pub mod error;
pub mod exclusion;
pub mod report;
