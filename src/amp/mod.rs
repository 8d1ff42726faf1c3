pub mod client;
pub mod model;

pub use client::{AmpClient, PolicySource};
pub use model::{PolicyLinks, PolicyList, PolicySummary};
