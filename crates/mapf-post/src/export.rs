//! CSV export of a solution, one row per agent per timestep.
//!
//! Columns: `t, agent, x, y, cell, goal_index`.

use std::path::Path;

use csv::Writer;

use mapf_core::AgentId;
use mapf_graph::Solution;
use mapf_instance::Instance;

use crate::PostResult;

/// Column names, in order.
pub const SOLUTION_HEADER: [&str; 6] = ["t", "agent", "x", "y", "cell", "goal_index"];

/// Write `solution` to a CSV file at `path`.
pub fn write_solution_csv(path: &Path, instance: &Instance, solution: &Solution) -> PostResult<()> {
    let mut wtr = Writer::from_path(path)?;
    write_solution_records(&mut wtr, instance, solution)?;
    wtr.flush()?;
    Ok(())
}

/// Like [`write_solution_csv`] but into an existing `csv::Writer`.
pub fn write_solution_records<W: std::io::Write>(
    wtr:      &mut Writer<W>,
    instance: &Instance,
    solution: &Solution,
) -> PostResult<()> {
    let graph = instance.graph();
    wtr.write_record(SOLUTION_HEADER)?;
    for (t, q) in solution.iter().enumerate() {
        for i in AgentId::range(q.len()) {
            let v = q.position(i);
            let (x, y) = graph.coords(v);
            wtr.write_record(&[
                t.to_string(),
                i.0.to_string(),
                x.to_string(),
                y.to_string(),
                graph.cell_index(v).to_string(),
                q.goal_index(i).to_string(),
            ])?;
        }
    }
    Ok(())
}
