//! Record-set normalisation stages.
//!
//! Three pure table-to-table transforms, applied in this order by
//! [`crate::pipeline::NormalisationPipeline`]:
//! - `projector`: keep only the configured fields present in the source
//! - `explode`: one row per element of delimiter-joined cells
//! - `identifier`: content-hash ids for rows carrying the `"."` sentinel

pub mod projector;
pub mod explode;
pub mod identifier;

pub use projector::project;
pub use explode::{explode, ExplodeGroup, ExplodeTarget};
pub use identifier::{md5_hex, IdentifierDeriver, SENTINEL_ID};
