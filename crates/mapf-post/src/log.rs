//! Result summary and key=value result log.
//!
//! # Log format
//!
//! ```text
//! agents=2
//! map_file=empty-8-8.map
//! solver=pibt
//! solved=1
//! soc=4
//! soc_lb=4
//! makespan=3
//! makespan_lb=2
//! sum_of_loss=4
//! comp_time=0.4
//! seed=0
//! starts=(0,0),(0,1),
//! goals=
//! (1,1),
//! (1,0),
//! solution=
//! 0:(0,0),(0,1),
//! 1:(1,0),(0,1),
//! ```
//!
//! Coordinates are `(x, y)` grid cells.  The `solution=` section is omitted
//! in short logs.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use mapf_core::{ConflictMode, VertexId};
use mapf_dist::DistTable;
use mapf_graph::{Graph, Solution};
use mapf_instance::Instance;

use crate::{PostResult, is_feasible_solution, metrics};

/// Headline numbers of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionStats {
    pub agents:       usize,
    pub solved:       bool,
    pub makespan:     usize,
    pub makespan_lb:  usize,
    pub soc:          usize,
    pub soc_lb:       usize,
    pub sum_of_loss:  usize,
    pub comp_time_ms: f64,
}

impl SolutionStats {
    /// Compute every metric of `solution`.  `solved` means feasible with
    /// all goals reached under `mode`.
    pub fn new(
        instance:     &Instance,
        dist:         &DistTable,
        solution:     &Solution,
        mode:         ConflictMode,
        comp_time_ms: f64,
    ) -> Self {
        Self {
            agents:       instance.agent_count(),
            solved:       is_feasible_solution(instance, solution, None, mode),
            makespan:     metrics::makespan(solution),
            makespan_lb:  metrics::makespan_lower_bound(instance, dist),
            soc:          metrics::sum_of_costs(solution),
            soc_lb:       metrics::sum_of_costs_lower_bound(instance, dist),
            sum_of_loss:  metrics::sum_of_loss(solution),
            comp_time_ms,
        }
    }

    /// Emit the stats as one `info` event.
    pub fn log(&self) {
        info!(
            agents = self.agents,
            solved = self.solved,
            makespan = self.makespan,
            makespan_lb = self.makespan_lb,
            soc = self.soc,
            soc_lb = self.soc_lb,
            sum_of_loss = self.sum_of_loss,
            comp_time_ms = self.comp_time_ms,
            "solution stats"
        );
    }
}

impl fmt::Display for SolutionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "solved: {}\tmakespan: {} (lb={}, ub={:.2})\tsum_of_costs: {} (lb={}, ub={:.2})\tsum_of_loss: {}\tcomp_time: {:.1}ms",
            self.solved,
            self.makespan,
            self.makespan_lb,
            ratio(self.makespan, self.makespan_lb),
            self.soc,
            self.soc_lb,
            ratio(self.soc, self.soc_lb),
            self.sum_of_loss,
            self.comp_time_ms,
        )
    }
}

fn ratio(value: usize, lb: usize) -> f64 {
    if lb == 0 { 1.0 } else { value as f64 / lb as f64 }
}

// ── Log writer ────────────────────────────────────────────────────────────────

/// Run metadata written alongside the stats.
#[derive(Debug, Clone)]
pub struct LogHeader<'a> {
    pub map_name: &'a str,
    pub solver:   &'a str,
    pub seed:     u64,
    /// Omit the `solution=` section.
    pub short:    bool,
}

/// Write the result log to `path`, creating or truncating it.
pub fn write_log(
    path:     &Path,
    header:   &LogHeader<'_>,
    instance: &Instance,
    solution: &Solution,
    stats:    &SolutionStats,
) -> PostResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    render_log(&mut out, header, instance, solution, stats)?;
    out.flush()?;
    Ok(())
}

/// Like [`write_log`] but accepts any `Write` sink.
pub fn render_log<W: Write>(
    mut out:  W,
    header:   &LogHeader<'_>,
    instance: &Instance,
    solution: &Solution,
    stats:    &SolutionStats,
) -> PostResult<()> {
    let graph = instance.graph();

    writeln!(out, "agents={}", stats.agents)?;
    writeln!(out, "map_file={}", header.map_name)?;
    writeln!(out, "solver={}", header.solver)?;
    writeln!(out, "solved={}", u8::from(stats.solved))?;
    writeln!(out, "soc={}", stats.soc)?;
    writeln!(out, "soc_lb={}", stats.soc_lb)?;
    writeln!(out, "makespan={}", stats.makespan)?;
    writeln!(out, "makespan_lb={}", stats.makespan_lb)?;
    writeln!(out, "sum_of_loss={}", stats.sum_of_loss)?;
    writeln!(out, "comp_time={:.1}", stats.comp_time_ms)?;
    writeln!(out, "seed={}", header.seed)?;

    write!(out, "starts=")?;
    write_coords(&mut out, graph, &instance.starts.positions)?;
    writeln!(out)?;

    writeln!(out, "goals=")?;
    for seq in &instance.goal_sequences {
        write_coords(&mut out, graph, seq)?;
        writeln!(out)?;
    }

    if !header.short {
        writeln!(out, "solution=")?;
        for (t, q) in solution.iter().enumerate() {
            write!(out, "{t}:")?;
            write_coords(&mut out, graph, &q.positions)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_coords<W: Write>(out: &mut W, graph: &Graph, vertices: &[VertexId]) -> std::io::Result<()> {
    for &v in vertices {
        let (x, y) = graph.coords(v);
        write!(out, "({x},{y}),")?;
    }
    Ok(())
}
