//! Metis/Chaco row-adjacency graph format (`.graph`, `.metis`, `.chaco`)
//!
//! The header is `nvtxs nedges [fmt [ncon]]`, where `nedges` counts each
//! undirected edge once. The decimal digits of `fmt` are flags: units for
//! edge weights, tens for vertex weights (with `ncon` weights per vertex,
//! default 1) and hundreds for vertex sizes, which are not supported.
//!
//! Line `i` after the header describes vertex `i`: its `ncon` weights, then
//! `dest [weight]` for every neighbor, with 1-based destinations. Lines
//! starting with `#`, `%`, `"` or `/` are comments.

use std::path::Path;

use log::{debug, info};

use crate::config::DEFAULT_PROGRESS_STEPS;
use crate::error::{FormatError, Result};
use crate::line_file::LineFile;
use crate::stream::{
    check_buffer, CsrDecoder, CsrEncoder, GraphInfo, GraphReader, GraphWriter, MatrixInfo,
    Progress, RowReader, RowWriter,
};
use crate::utils::{split_tokens, starts_with_any};
use crate::Value;

const COMMENT_CHARS: &[u8] = b"#%\"/";

/// Flags decoded from the `fmt` header field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct FormatFlags {
    edge_weights: bool,
    vertex_weights: bool,
    vertex_sizes: bool,
}

impl FormatFlags {
    fn parse(token: &str) -> Option<Self> {
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits: Vec<u8> = token.bytes().rev().map(|b| b - b'0').collect();
        let flag = |k: usize| digits.get(k).is_some_and(|&d| d != 0);
        Some(Self {
            edge_weights: flag(0),
            vertex_weights: flag(1),
            vertex_sizes: flag(2),
        })
    }
}

/// An undirected graph stored one vertex per line
#[derive(Debug)]
pub struct MetisFile {
    file: LineFile,
    line: String,
    info: Option<GraphInfo>,
    consumed: bool,
    progress_steps: usize,
}

impl MetisFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: LineFile::new(path),
            line: String::new(),
            info: None,
            consumed: false,
            progress_steps: DEFAULT_PROGRESS_STEPS,
        }
    }

    /// Sets how many times the progress cursor advances over one read
    pub fn with_progress_steps(mut self, steps: usize) -> Self {
        self.progress_steps = steps;
        self
    }

    /// Opens `path` as a row-streamed matrix reader
    pub fn reader(path: impl AsRef<Path>) -> CsrDecoder<Self> {
        CsrDecoder::new(Self::new(path))
    }

    /// Opens `path` as a row-streamed matrix writer
    pub fn writer(path: impl AsRef<Path>) -> CsrEncoder<Self> {
        CsrEncoder::new(Self::new(path))
    }

    fn next_noncomment_line(&mut self) -> Result<bool> {
        loop {
            if !self.file.next_line(&mut self.line)? {
                return Ok(false);
            }
            if !starts_with_any(&self.line, COMMENT_CHARS) {
                return Ok(true);
            }
        }
    }

    fn parse_header(&mut self) -> Result<GraphInfo> {
        if let Some(info) = self.info {
            return Ok(info);
        }
        if !self.file.is_open_read() {
            self.file.open_read()?;
        }
        if !self.next_noncomment_line()? {
            return Err(self.file.bad_line("Missing header line"));
        }

        let tokens: Vec<&str> = split_tokens(&self.line).collect();
        if tokens.len() < 2 {
            return Err(self
                .file
                .bad_line("Header must hold at least the vertex and edge counts"));
        }
        let nvtxs = parse_count(&self.file, tokens[0], "number of vertices")?;
        let nedges = parse_count(&self.file, tokens[1], "number of edges")?;

        let flags = match tokens.get(2) {
            Some(token) => FormatFlags::parse(token).ok_or_else(|| {
                self.file
                    .bad_line(format!("Invalid format string '{}'", token))
            })?,
            None => FormatFlags::default(),
        };
        if flags.vertex_sizes {
            return Err(self.file.bad_line("Vertex sizes are not supported"));
        }

        let nvwgt = if flags.vertex_weights {
            match tokens.get(3) {
                Some(token) => parse_count(&self.file, token, "number of vertex weights")?,
                None => 1,
            }
        } else {
            0
        };

        let directed = nedges
            .checked_mul(2)
            .ok_or_else(|| self.file.bad_line(format!("Number of edges {} is too large", nedges)))?;
        let info = GraphInfo::new(nvtxs, directed, nvwgt, flags.edge_weights);
        debug!(
            "{}: {} vertices, {} edges, {} vertex weights, edge weights: {}",
            self.file.path().display(),
            info.nvtxs,
            info.nedges,
            info.nvwgt,
            info.edge_weights
        );
        self.info = Some(info);
        Ok(info)
    }

    /// Reads the next vertex line.
    ///
    /// Neighbors go to `columns` (0-based), edge weights to `values` (1 when
    /// the file has none) and vertex weights to `vwgt`. Returns the degree,
    /// or `None` at end of file.
    fn next_vertex(
        &mut self,
        columns: &mut [usize],
        mut values: Option<&mut [Value]>,
        mut vwgt: Option<&mut [Value]>,
    ) -> Result<Option<usize>> {
        let info = self
            .info
            .ok_or_else(|| FormatError::UnsetInfo("Cannot read vertices before the header".to_string()))?;
        if !self.next_noncomment_line()? {
            return Ok(None);
        }

        let mut tokens = split_tokens(&self.line);

        for k in 0..info.nvwgt {
            let token = tokens
                .next()
                .ok_or_else(|| self.file.bad_line(format!("Missing vertex weight {}", k + 1)))?;
            let weight = parse_value(&self.file, token, "vertex weight")?;
            if let Some(vwgt) = vwgt.as_deref_mut() {
                vwgt[k] = weight;
            }
        }

        let mut degree = 0;
        while let Some(token) = tokens.next() {
            let dest = parse_count(&self.file, token, "destination vertex")?;
            if dest < 1 || dest > info.nvtxs {
                return Err(self.file.bad_line(format!(
                    "Destination vertex {} outside [1, {}]",
                    dest, info.nvtxs
                )));
            }
            let weight = if info.edge_weights {
                let token = tokens.next().ok_or_else(|| {
                    self.file
                        .bad_line(format!("Missing weight for edge to {}", dest))
                })?;
                parse_value(&self.file, token, "edge weight")?
            } else {
                1.0
            };

            if degree >= columns.len() {
                return Err(self
                    .file
                    .bad_line("Vertex holds more edges than the header declares"));
            }
            columns[degree] = dest - 1;
            if let Some(values) = values.as_deref_mut() {
                values[degree] = weight;
            }
            degree += 1;
        }

        Ok(Some(degree))
    }

    fn open_output(&mut self, info: GraphInfo) -> Result<()> {
        if self.info.is_some() {
            return Err(FormatError::bad_state(self.file.path(), "Info already set"));
        }
        if info.nedges % 2 != 0 {
            return Err(FormatError::BadParameter(format!(
                "Metis graphs are undirected, {} directed edges cannot be paired",
                info.nedges
            )));
        }

        self.file.open_write()?;

        let nedges = info.nedges / 2;
        let header = match (info.nvwgt > 0, info.edge_weights) {
            (false, false) => format!("{} {}", info.nvtxs, nedges),
            (false, true) => format!("{} {} 1", info.nvtxs, nedges),
            (true, false) => format!("{} {} 10 {}", info.nvtxs, nedges, info.nvwgt),
            (true, true) => format!("{} {} 11 {}", info.nvtxs, nedges, info.nvwgt),
        };
        self.file.set_next_line(&header)?;
        self.info = Some(info);
        Ok(())
    }

    fn write_vertex(
        &mut self,
        info: &GraphInfo,
        columns: &[usize],
        values: Option<&[Value]>,
        vwgt: Option<&[Value]>,
    ) -> Result<()> {
        let mut tokens = Vec::with_capacity(info.nvwgt + 2 * columns.len());
        for k in 0..info.nvwgt {
            tokens.push(vwgt.map_or(1.0, |w| w[k]).to_string());
        }
        for (k, &col) in columns.iter().enumerate() {
            tokens.push((col + 1).to_string());
            if info.edge_weights {
                tokens.push(values.map_or(1.0, |v| v[k]).to_string());
            }
        }
        self.file.set_next_line(&tokens.join(" "))
    }
}

fn parse_count(file: &LineFile, token: &str, what: &str) -> Result<usize> {
    token
        .parse::<usize>()
        .map_err(|_| file.bad_line(format!("Failed to read {} '{}'", what, token)))
}

fn parse_value(file: &LineFile, token: &str, what: &str) -> Result<Value> {
    token
        .parse::<Value>()
        .map_err(|_| file.bad_line(format!("Failed to read {} '{}'", what, token)))
}

impl GraphReader for MetisFile {
    fn info(&mut self) -> Result<GraphInfo> {
        self.parse_header()
    }

    fn read(
        &mut self,
        xadj: &mut [usize],
        adjncy: &mut [usize],
        mut vwgt: Option<&mut [Value]>,
        mut adjwgt: Option<&mut [Value]>,
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

        let ncon = info.nvwgt.max(1);
        check_buffer("xadj", xadj.len(), info.nvtxs + 1)?;
        check_buffer("adjncy", adjncy.len(), info.nedges)?;
        if let Some(vwgt) = vwgt.as_deref() {
            check_buffer("vwgt", vwgt.len(), info.nvtxs * ncon)?;
        }
        if let Some(adjwgt) = adjwgt.as_deref() {
            check_buffer("adjwgt", adjwgt.len(), info.nedges)?;
        }

        let mut progress = Progress::new(progress, info.nvtxs, self.progress_steps);

        xadj[0] = 0;
        for i in 0..info.nvtxs {
            let start = xadj[i];
            let columns = &mut adjncy[start..info.nedges];
            let values = adjwgt.as_deref_mut().map(|w| &mut w[start..info.nedges]);
            let weights = match vwgt.as_deref_mut() {
                Some(vwgt) => {
                    let weights = &mut vwgt[i * ncon..(i + 1) * ncon];
                    if info.nvwgt == 0 {
                        weights.fill(1.0);
                        None
                    } else {
                        Some(weights)
                    }
                }
                None => None,
            };

            match self.next_vertex(columns, values, weights)? {
                Some(degree) => xadj[i + 1] = start + degree,
                None => {
                    return Err(FormatError::eof(self.file.path(), i, info.nvtxs, "vertices"));
                }
            }

            progress.tick(i);
        }

        if xadj[info.nvtxs] != info.nedges {
            return Err(FormatError::eof(
                self.file.path(),
                xadj[info.nvtxs],
                info.nedges,
                "edges",
            ));
        }

        info!(
            "read {} vertices and {} edges from {}",
            info.nvtxs,
            info.nedges,
            self.file.path().display()
        );
        Ok(())
    }
}

impl GraphWriter for MetisFile {
    fn set_info(&mut self, info: GraphInfo) -> Result<()> {
        self.open_output(info)
    }

    fn write(
        &mut self,
        xadj: &[usize],
        adjncy: &[usize],
        vwgt: Option<&[Value]>,
        adjwgt: Option<&[Value]>,
    ) -> Result<()> {
        let info = self.info.ok_or_else(|| {
            FormatError::bad_state(self.file.path(), "Cannot call write() before set_info()")
        })?;

        crate::stream::check_csr_input(
            &MatrixInfo::new(info.nvtxs, info.nvtxs, info.nedges),
            xadj,
            adjncy,
            adjwgt,
        )?;
        if let Some(vwgt) = vwgt {
            check_buffer("vwgt", vwgt.len(), info.nvtxs * info.nvwgt)?;
        }

        for i in 0..info.nvtxs {
            let (start, end) = (xadj[i], xadj[i + 1]);
            let weights = vwgt.map(|w| &w[i * info.nvwgt..(i + 1) * info.nvwgt]);
            self.write_vertex(
                &info,
                &adjncy[start..end],
                adjwgt.map(|w| &w[start..end]),
                weights,
            )?;
        }
        self.file.flush()?;

        info!(
            "wrote {} vertices and {} edges to {}",
            info.nvtxs,
            info.nedges,
            self.file.path().display()
        );
        Ok(())
    }
}

impl RowReader for MetisFile {
    fn path(&self) -> &Path {
        self.file.path()
    }

    fn read_header(&mut self) -> Result<MatrixInfo> {
        let info = self.parse_header()?;
        Ok(MatrixInfo::new(info.nvtxs, info.nvtxs, info.nedges))
    }

    fn next_row(
        &mut self,
        columns: &mut [usize],
        values: Option<&mut [Value]>,
    ) -> Result<Option<usize>> {
        self.next_vertex(columns, values, None)
    }
}

impl RowWriter for MetisFile {
    fn path(&self) -> &Path {
        self.file.path()
    }

    fn write_header(&mut self, info: MatrixInfo) -> Result<()> {
        if info.nrows != info.ncols {
            return Err(FormatError::BadParameter(format!(
                "A {} x {} matrix is not a graph",
                info.nrows, info.ncols
            )));
        }
        self.open_output(GraphInfo::new(info.nrows, info.nnz, 0, true))
    }

    fn set_next_row(&mut self, columns: &[usize], values: Option<&[Value]>) -> Result<()> {
        let info = self.info.ok_or_else(|| {
            FormatError::bad_state(self.file.path(), "Cannot write rows before the header")
        })?;
        self.write_vertex(&info, columns, values, None)
    }

    fn finish(&mut self) -> Result<()> {
        self.file.flush()
    }
}
