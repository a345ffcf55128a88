//! MovingAI scenario (`.scen`) loader.
//!
//! # Format
//!
//! A `version` line followed by one tab-separated row per agent:
//!
//! ```text
//! version 1
//! 0	random-32-32-10.map	32	32	11	6	7	18	16.00000000
//! 0	random-32-32-10.map	32	32	22	20	27	6	19.41421356
//! ```
//!
//! Columns: bucket, map file, map width, map height, start x, start y,
//! goal x, goal y, optimal length.  Each row yields one agent with a single
//! goal.  Rows whose start or goal lies outside the map or on an obstacle are
//! skipped; loading stops after `agent_count` agents.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use mapf_core::VertexId;
use mapf_graph::Graph;

use crate::{Instance, InstanceError, InstanceResult};

#[derive(Deserialize)]
struct ScenRecord {
    _bucket:         u32,
    _map:            String,
    _map_width:      u32,
    _map_height:     u32,
    start_x:         i64,
    start_y:         i64,
    goal_x:          i64,
    goal_y:          i64,
    _optimal_length: f64,
}

/// Load the first `agent_count` valid agents of a scenario file.
pub fn load_scen(path: &Path, graph: Graph, agent_count: usize) -> InstanceResult<Instance> {
    let file = std::fs::File::open(path)?;
    parse_scen(file, graph, agent_count)
}

/// Like [`load_scen`] but accepts any `Read` source.
pub fn parse_scen<R: Read>(reader: R, graph: Graph, agent_count: usize) -> InstanceResult<Instance> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut starts: Vec<VertexId> = Vec::with_capacity(agent_count);
    let mut goals:  Vec<Vec<VertexId>> = Vec::with_capacity(agent_count);

    for result in csv_reader.records() {
        if starts.len() == agent_count {
            break;
        }
        let record = result?;
        // `version 1` and blank lines.
        if record.len() < 9 {
            continue;
        }
        let row: ScenRecord = record
            .deserialize(None)
            .map_err(|e| InstanceError::Parse(e.to_string()))?;

        let (Some(s), Some(g)) = (
            cell(&graph, row.start_x, row.start_y),
            cell(&graph, row.goal_x, row.goal_y),
        ) else {
            continue;
        };
        starts.push(s);
        goals.push(vec![g]);
    }

    if starts.len() < agent_count {
        return Err(InstanceError::AgentCountMismatch {
            expected: agent_count,
            got:      starts.len(),
            what:     "scenario entries",
        });
    }

    Instance::new(graph, starts, goals)
}

fn cell(graph: &Graph, x: i64, y: i64) -> Option<VertexId> {
    let x = u32::try_from(x).ok()?;
    let y = u32::try_from(y).ok()?;
    graph.vertex_at_xy(x, y)
}
