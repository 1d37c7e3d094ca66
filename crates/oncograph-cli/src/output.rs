//! JSON-lines export of the merged graph: one node per line in
//! `nodes.jsonl`, one edge per line in `edges.jsonl`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use oncograph_common::{Edge, Node, Result};
use oncograph_kg::GraphSink;

pub const NODES_FILE: &str = "nodes.jsonl";
pub const EDGES_FILE: &str = "edges.jsonl";

pub struct JsonLinesWriter {
    dir: PathBuf,
    nodes: BufWriter<File>,
    edges: BufWriter<File>,
}

impl JsonLinesWriter {
    /// Create `dir` if needed and truncate both output files.
    pub fn create(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            nodes: BufWriter::new(File::create(dir.join(NODES_FILE))?),
            edges: BufWriter::new(File::create(dir.join(EDGES_FILE))?),
        })
    }

    pub fn finish(mut self) -> Result<()> {
        self.nodes.flush()?;
        self.edges.flush()?;
        info!(dir = %self.dir.display(), "Graph written");
        Ok(())
    }
}

fn write_lines<T: Serialize>(out: &mut BufWriter<File>, items: impl Iterator<Item = T>) -> Result<usize> {
    let mut n = 0;
    for item in items {
        serde_json::to_writer(&mut *out, &item)?;
        out.write_all(b"\n")?;
        n += 1;
    }
    Ok(n)
}

impl GraphSink for JsonLinesWriter {
    fn write_nodes(&mut self, nodes: Box<dyn Iterator<Item = Node> + '_>) -> Result<usize> {
        write_lines(&mut self.nodes, nodes)
    }

    fn write_edges(&mut self, edges: Box<dyn Iterator<Item = Edge> + '_>) -> Result<usize> {
        write_lines(&mut self.edges, edges)
    }
}
