//! Source adapters.
//!
//! Each adapter owns one normalised source table and replays it as a graph
//! stream. Construction does all the fallible work (loading, normalising,
//! checking key columns); streaming afterwards cannot fail.

pub mod variants;
pub mod copy_number;
pub mod clinical;
pub mod oncokb;
pub mod oncodash;

pub use clinical::{ClinicalAdapter, ClinicalSettings};
pub use copy_number::{CopyNumberAdapter, CopyNumberSettings};
pub use oncodash::{OncodashAdapter, OncodashSettings};
pub use oncokb::{OncoKbAdapter, OncoKbSettings};
pub use variants::{VariantsAdapter, VariantsSettings};

use tracing::info;

use oncograph_common::{Edge, Node, Result};

use crate::merge::GraphSink;

/// Common interface for all source adapters.
pub trait GraphAdapter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Lazy node stream. Each call starts over.
    fn nodes(&self) -> Box<dyn Iterator<Item = Node> + '_>;

    /// Lazy edge stream. Each call starts over.
    fn edges(&self) -> Box<dyn Iterator<Item = Edge> + '_>;
}

/// Stream every node, then every edge, of `adapter` into `sink`.
/// Returns the (node, edge) counts written.
pub fn stream_into(adapter: &dyn GraphAdapter, sink: &mut dyn GraphSink) -> Result<(usize, usize)> {
    let nodes = sink.write_nodes(adapter.nodes())?;
    let edges = sink.write_edges(adapter.edges())?;
    info!(adapter = adapter.name(), nodes, edges, "Streamed adapter into sink");
    Ok((nodes, edges))
}

/// The picked subset of `all`, in `all` order regardless of how the
/// configuration lists it.
pub(crate) fn chosen<F: Copy + PartialEq>(all: &[F], picked: &[F]) -> Vec<F> {
    all.iter().copied().filter(|f| picked.contains(f)).collect()
}
