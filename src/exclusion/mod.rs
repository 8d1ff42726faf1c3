pub mod flags;
pub mod model;
pub mod parser;

pub use flags::ExclusionFlags;
pub use model::{ExclusionClass, PathExclusion, PolicyRef, ProcessExclusion, path_type_label};
pub use parser::{PolicyExclusions, XMLDSIG_NS, parse_exclusions};
