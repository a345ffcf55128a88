//! rollout — run Scatter + PIBT step by step until every agent is home.
//!
//! ```text
//! rollout                 # embedded 16×8 warehouse, random agents
//! rollout MAP SCEN [N]    # MovingAI map + scenario, first N agents
//! ```
//!
//! Set `RUST_LOG=debug` to see per-round Scatter progress.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use mapf_core::{AgentId, SolverConfig, SolverRng};
use mapf_dist::DistTable;
use mapf_graph::{Solution, load_map, parse_map};
use mapf_instance::{Instance, load_scen};
use mapf_pibt::Pibt;
use mapf_post::{LogHeader, SolutionStats, check_solution, write_log, write_solution_csv};
use mapf_scatter::Scatter;

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT:   usize = 24;
const SEED:          u64   = 42;
const TIME_LIMIT_MS: u64   = 10_000;
const MAX_STEPS:     usize = 1_000;
const OUTPUT_DIR:    &str  = "output/rollout";

const WAREHOUSE_MAP: &str = "\
type octile
height 8
width 16
map
................
.@@@@..@@@@..@@.
.@@@@..@@@@..@@.
................
................
.@@@@..@@@@..@@.
.@@@@..@@@@..@@.
................
";

// ── Logging ───────────────────────────────────────────────────────────────────

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}

// ── Instance ──────────────────────────────────────────────────────────────────

fn load_instance(args: &[String], rng: &mut SolverRng) -> Result<(Instance, String)> {
    match args {
        [] => {
            let graph = parse_map(Cursor::new(WAREHOUSE_MAP))?;
            let ins = Instance::random(graph, AGENT_COUNT, rng)?;
            Ok((ins, "warehouse-16-8 (embedded)".to_owned()))
        }
        [map, scen, rest @ ..] => {
            let n = match rest.first() {
                Some(s) => s.parse().with_context(|| format!("bad agent count {s:?}"))?,
                None => AGENT_COUNT,
            };
            let graph = load_map(Path::new(map)).with_context(|| format!("loading {map}"))?;
            let ins = load_scen(Path::new(scen), graph, n).with_context(|| format!("loading {scen}"))?;
            Ok((ins, map.clone()))
        }
        [_] => bail!("usage: rollout [MAP SCEN [N]]"),
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging("info")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = SolverConfig {
        seed:          SEED,
        time_limit_ms: Some(TIME_LIMIT_MS),
        ..SolverConfig::default()
    };
    let deadline = config.make_deadline();
    let mut rng = SolverRng::new(config.seed);

    // 1. Instance and distance table.
    let (ins, map_name) = load_instance(&args, &mut rng)?;
    let graph = ins.graph();
    info!(
        map = %map_name,
        vertices = graph.size(),
        agents = ins.agent_count(),
        mode = ?config.conflict_mode,
        "instance loaded"
    );
    let dist = DistTable::new(&ins);

    // 2. Scatter preprocessing.
    let scatter = config
        .use_scatter
        .then(|| Scatter::new(&ins, &dist, &config, Some(&deadline)));
    if let Some(s) = &scatter {
        info!(
            rounds = s.rounds,
            collisions = s.collision_cnt,
            path_length = s.sum_of_path_length(),
            "scatter paths ready"
        );
    }

    // 3. Roll PIBT forward one configuration at a time.
    let mut pibt = Pibt::new(&ins, &dist, scatter.as_ref().map(|s| &s.hints), &config);
    let mut order_rng = rng.child(1);
    let mut order: Vec<AgentId> = AgentId::range(ins.agent_count()).collect();
    let mut solution: Solution = vec![ins.starts.clone()];

    loop {
        let Some(q_from) = solution.last() else { break };
        if ins.is_goal_config(q_from) {
            break;
        }
        if solution.len() > MAX_STEPS || deadline.is_expired() {
            warn!(steps = solution.len() - 1, "stopped before every agent finished");
            break;
        }

        order_rng.shuffle(&mut order);
        let mut q_to = vec![None; ins.agent_count()];
        if !pibt.set_new_config(q_from, &mut q_to, &order) {
            bail!("no valid step from timestep {}", solution.len() - 1);
        }
        let Some(next) = q_to.into_iter().collect::<Option<Vec<_>>>() else {
            bail!("step from timestep {} left agents unplaced", solution.len() - 1);
        };
        let q_next = ins.successor(q_from, next);
        solution.push(q_next);
    }

    // 4. Validate and report.
    if let Err(err) = check_solution(&ins, &solution, None, config.conflict_mode) {
        warn!(%err, "solution rejected");
    }
    let stats = SolutionStats::new(&ins, &dist, &solution, config.conflict_mode, deadline.elapsed_ms());
    stats.log();
    println!("{stats}");

    // 5. Result log and per-step CSV.
    let out_dir = PathBuf::from(OUTPUT_DIR);
    std::fs::create_dir_all(&out_dir)?;
    let header = LogHeader {
        map_name: &map_name,
        solver:   if config.use_scatter { "scatter+pibt" } else { "pibt" },
        seed:     config.seed,
        short:    false,
    };
    write_log(&out_dir.join("result.txt"), &header, &ins, &solution, &stats)?;
    write_solution_csv(&out_dir.join("solution.csv"), &ins, &solution)?;
    info!(dir = %out_dir.display(), "results written");

    Ok(())
}
