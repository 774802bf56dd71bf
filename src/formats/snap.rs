//! SNAP edge-list format (`.snap`)
//!
//! ```text
//! # Undirected graph (each unordered pair of nodes is saved once): web.snap
//! # A graph.
//! # Nodes: 4 Edges: 3
//! # FromNodeId	ToNodeId
//! 0	1
//! 1	2
//! 2	3
//! ```
//!
//! Vertex ids are 0-based and edges may appear in any order, so reading goes
//! through the [`CoordinateAssembler`]. An undirected edge is stored once and
//! materialized in both directions; a self loop is materialized once. When
//! the `Nodes`/`Edges` comment is missing the file is scanned to count them.

use std::cmp::Ordering;
use std::path::Path;

use log::{debug, info, warn};

use crate::assembly::{push_mirrored, CoordinateAssembler};
use crate::config::DEFAULT_PROGRESS_STEPS;
use crate::error::{FormatError, Result};
use crate::line_file::LineFile;
use crate::stream::{
    check_buffer, check_csr_input, GraphInfo, GraphReader, GraphWriter, MatrixInfo, Progress,
};
use crate::utils::split_tokens;
use crate::Value;

const COMMENT_CHAR: char = '#';

/// A graph stored as one `src dst [weight]` line per edge
#[derive(Debug)]
pub struct SnapFile {
    file: LineFile,
    line: String,
    info: Option<GraphInfo>,
    directed: bool,
    /// Edge lines in the file
    nlines: usize,
    consumed: bool,
    progress_steps: usize,
}

/// What the leading comment block declares
#[derive(Debug, Default)]
struct Directives {
    directed: Option<bool>,
    nodes: Option<usize>,
    edges: Option<usize>,
    /// Line holding the `Edges:` count
    edges_line: usize,
}

impl SnapFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: LineFile::new(path),
            line: String::new(),
            info: None,
            directed: false,
            nlines: 0,
            consumed: false,
            progress_steps: DEFAULT_PROGRESS_STEPS,
        }
    }

    /// Chooses whether a writer emits a directed edge list
    pub fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Sets how many times the progress cursor advances over one read
    pub fn with_progress_steps(mut self, steps: usize) -> Self {
        self.progress_steps = steps;
        self
    }

    /// Whether the edge list is directed, as declared by the file once read
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Reads the next edge line, skipping comments and blank lines
    fn next_edge_line(&mut self) -> Result<bool> {
        loop {
            if !self.file.next_line(&mut self.line)? {
                return Ok(false);
            }
            let trimmed = self.line.trim_start();
            if !trimmed.is_empty() && !trimmed.starts_with(COMMENT_CHAR) {
                return Ok(true);
            }
        }
    }

    fn observe_comment(&self, directives: &mut Directives) -> Result<()> {
        let line = self.line.as_str();
        if line.contains("Undirected graph") {
            directives.directed = Some(false);
        } else if line.contains("Directed graph") {
            directives.directed = Some(true);
        }

        let tokens: Vec<&str> = split_tokens(line).collect();
        for (k, &token) in tokens.iter().enumerate() {
            let slot = match token {
                "Nodes:" => &mut directives.nodes,
                "Edges:" => &mut directives.edges,
                _ => continue,
            };
            let value = tokens.get(k + 1).ok_or_else(|| {
                self.file
                    .bad_line(format!("Missing count after '{}'", token))
            })?;
            *slot = Some(value.parse::<usize>().map_err(|_| {
                self.file
                    .bad_line(format!("Failed to read count '{}' after '{}'", value, token))
            })?);
            if token == "Edges:" {
                directives.edges_line = self.file.current_line();
            }
        }
        Ok(())
    }

    fn parse_edge(&self, weighted: bool) -> Result<(usize, usize, Value)> {
        let mut tokens = split_tokens(&self.line);
        let mut vertex = |what: &str| -> Result<usize> {
            let token = tokens
                .next()
                .ok_or_else(|| self.file.bad_line(format!("Missing {} vertex", what)))?;
            token
                .parse::<usize>()
                .map_err(|_| self.file.bad_line(format!("Failed to read {} vertex '{}'", what, token)))
        };
        let src = vertex("source")?;
        let dst = vertex("destination")?;

        let weight = if weighted {
            let token = tokens
                .next()
                .ok_or_else(|| self.file.bad_line("Missing edge weight"))?;
            token
                .parse::<Value>()
                .map_err(|_| self.file.bad_line(format!("Failed to read edge weight '{}'", token)))?
        } else {
            1.0
        };
        Ok((src, dst, weight))
    }

    fn parse_header(&mut self) -> Result<GraphInfo> {
        if let Some(info) = self.info {
            return Ok(info);
        }
        self.file.open_read()?;

        let mut directives = Directives::default();
        let mut has_data = false;
        while self.file.next_line(&mut self.line)? {
            let trimmed = self.line.trim_start();
            if trimmed.is_empty() {
                continue;
            }
            if !trimmed.starts_with(COMMENT_CHAR) {
                has_data = true;
                break;
            }
            self.observe_comment(&mut directives)?;
        }

        let weighted = has_data && split_tokens(&self.line).count() >= 3;
        self.directed = directives.directed.unwrap_or(true);

        let (nvtxs, nlines) = match (directives.nodes, directives.edges) {
            (Some(nodes), Some(edges)) => (nodes, edges),
            (nodes, _) => {
                // count edges and find the largest id
                let mut nlines = 0;
                let mut max_id = None;
                if has_data {
                    loop {
                        let (src, dst, _) = self.parse_edge(weighted)?;
                        max_id = max_id.max(Some(src.max(dst)));
                        nlines += 1;
                        if !self.next_edge_line()? {
                            break;
                        }
                    }
                }
                let scanned = max_id.map_or(0, |id| id + 1);
                (nodes.unwrap_or(0).max(scanned), nlines)
            }
        };

        self.file.reset_stream()?;

        let nedges = if self.directed {
            nlines
        } else {
            nlines.checked_mul(2).ok_or_else(|| {
                FormatError::bad_file(
                    self.file.path(),
                    directives.edges_line,
                    format!("Number of edges {} is too large", nlines),
                )
            })?
        };
        let info = GraphInfo::new(nvtxs, nedges, 0, weighted);
        debug!(
            "{}: {} vertices, {} edge lines, directed: {}, weighted: {}",
            self.file.path().display(),
            nvtxs,
            nlines,
            self.directed,
            weighted
        );
        self.nlines = nlines;
        self.info = Some(info);
        Ok(info)
    }
}

impl GraphReader for SnapFile {
    /// Returns the graph shape.
    ///
    /// For undirected files `nedges` is an upper bound until the graph has
    /// been read, since self loops are only materialized once.
    fn info(&mut self) -> Result<GraphInfo> {
        self.parse_header()
    }

    fn read(
        &mut self,
        xadj: &mut [usize],
        adjncy: &mut [usize],
        vwgt: Option<&mut [Value]>,
        adjwgt: Option<&mut [Value]>,
        progress: Option<&mut f64>,
    ) -> Result<()> {
        let info = self
            .info
            .ok_or_else(|| FormatError::UnsetInfo("Cannot call read() before info()".to_string()))?;
        if self.consumed {
            return Err(FormatError::bad_state(
                self.file.path(),
                "Graph has already been read",
            ));
        }
        self.consumed = true;

        check_buffer("adjncy", adjncy.len(), info.nedges)?;
        if let Some(adjwgt) = adjwgt.as_deref() {
            check_buffer("adjwgt", adjwgt.len(), info.nedges)?;
        }
        if let Some(vwgt) = vwgt {
            check_buffer("vwgt", vwgt.len(), info.nvtxs)?;
            vwgt[..info.nvtxs].fill(1.0);
        }

        let mut progress = Progress::new(progress, self.nlines, self.progress_steps);
        let mut assembler = CoordinateAssembler::new(info.nvtxs, info.nedges, xadj, adjncy, adjwgt)?;

        let mut nlines = 0;
        while self.next_edge_line()? {
            if nlines == self.nlines {
                return Err(self.file.bad_line(format!(
                    "More edges than the {} declared",
                    self.nlines
                )));
            }
            let (src, dst, weight) = self.parse_edge(info.edge_weights)?;
            if src >= info.nvtxs || dst >= info.nvtxs {
                return Err(self.file.bad_line(format!(
                    "Edge ({}, {}) outside the {} declared vertices",
                    src, dst, info.nvtxs
                )));
            }

            if self.directed {
                assembler.push(src, dst, weight)?;
            } else {
                push_mirrored(&mut assembler, src, dst, weight)?;
            }

            progress.tick(nlines);
            nlines += 1;
        }

        if nlines < self.nlines {
            return Err(FormatError::eof(self.file.path(), nlines, self.nlines, "edges"));
        }

        let nedges = assembler.finish();
        self.info = Some(GraphInfo { nedges, ..info });

        info!(
            "read {} vertices and {} edges from {}",
            info.nvtxs,
            nedges,
            self.file.path().display()
        );
        Ok(())
    }
}

/// True when the entries above the diagonal mirror those below it
fn halves_match(
    nvtxs: usize,
    xadj: &[usize],
    adjncy: &[usize],
    adjwgt: Option<&[Value]>,
) -> bool {
    let mut upper = Vec::new();
    let mut lower = Vec::new();
    for src in 0..nvtxs {
        for k in xadj[src]..xadj[src + 1] {
            let dst = adjncy[k];
            let weight = adjwgt.map_or(1.0, |w| w[k]);
            match src.cmp(&dst) {
                Ordering::Less => upper.push((src, dst, weight)),
                Ordering::Greater => lower.push((dst, src, weight)),
                Ordering::Equal => {}
            }
        }
    }
    if upper.len() != lower.len() {
        return false;
    }

    let order = |a: &(usize, usize, Value), b: &(usize, usize, Value)| {
        a.0.cmp(&b.0)
            .then(a.1.cmp(&b.1))
            .then(a.2.total_cmp(&b.2))
    };
    upper.sort_unstable_by(order);
    lower.sort_unstable_by(order);
    upper
        .iter()
        .zip(&lower)
        .all(|(a, b)| order(a, b) == Ordering::Equal)
}

impl GraphWriter for SnapFile {
    fn set_info(&mut self, info: GraphInfo) -> Result<()> {
        if self.info.is_some() {
            return Err(FormatError::bad_state(self.file.path(), "Info already set"));
        }
        if info.nvwgt > 0 {
            warn!(
                "{}: SNAP edge lists hold no vertex weights, dropping {} per vertex",
                self.file.path().display(),
                info.nvwgt
            );
        }
        self.file.open_write()?;
        self.info = Some(info);
        Ok(())
    }

    fn write(
        &mut self,
        xadj: &[usize],
        adjncy: &[usize],
        _vwgt: Option<&[Value]>,
        adjwgt: Option<&[Value]>,
    ) -> Result<()> {
        let info = self.info.ok_or_else(|| {
            FormatError::bad_state(self.file.path(), "Cannot call write() before set_info()")
        })?;
        check_csr_input(
            &MatrixInfo::new(info.nvtxs, info.nvtxs, info.nedges),
            xadj,
            adjncy,
            adjwgt,
        )?;

        if !self.directed {
            let weights = if info.edge_weights { adjwgt } else { None };
            if !halves_match(info.nvtxs, xadj, adjncy, weights) {
                return Err(FormatError::BadParameter(format!(
                    "{}: undirected edge lists need every edge stored in both directions \
                     with equal weights; write the graph as directed instead",
                    self.file.path().display()
                )));
            }
        }

        let keep = |src: usize, dst: usize| self.directed || src <= dst;
        let nlines = (0..info.nvtxs)
            .map(|v| adjncy[xadj[v]..xadj[v + 1]].iter().filter(|&&d| keep(v, d)).count())
            .sum::<usize>();

        let name = self.file.path().display().to_string();
        let banner = if self.directed {
            format!("# Directed graph: {}", name)
        } else {
            format!(
                "# Undirected graph (each unordered pair of nodes is saved once): {}",
                name
            )
        };
        self.file.set_next_line(&banner)?;
        self.file.set_next_line("# A graph.")?;
        self.file
            .set_next_line(&format!("# Nodes: {} Edges: {}", info.nvtxs, nlines))?;
        if info.edge_weights {
            self.file.set_next_line("# FromNodeId\tToNodeId\tWeight")?;
        } else {
            self.file.set_next_line("# FromNodeId\tToNodeId")?;
        }

        for src in 0..info.nvtxs {
            for k in xadj[src]..xadj[src + 1] {
                let dst = adjncy[k];
                if !self.directed && src > dst {
                    continue;
                }
                let line = if info.edge_weights {
                    let weight = adjwgt.map_or(1.0, |w| w[k]);
                    format!("{}\t{}\t{}", src, dst, weight)
                } else {
                    format!("{}\t{}", src, dst)
                };
                self.file.set_next_line(&line)?;
            }
        }
        self.file.flush()?;

        info!(
            "wrote {} vertices and {} edge lines to {}",
            info.nvtxs,
            nlines,
            self.file.path().display()
        );
        Ok(())
    }
}
