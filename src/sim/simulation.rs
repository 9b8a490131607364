//! One maze instance's lifetime
//!
//! Builds the lattice, carves it incrementally under a per-tick budget,
//! then freezes the graph and drives the search scheduler and the agent
//! swarm. Maze generation and pathfinding never overlap: searches only
//! exist once the graph is frozen behind an `Arc`.

use std::sync::Arc;

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::agent::Agent;
use crate::graph::{GridGraph, NodeKey, NodeMetadata};
use crate::maze::MazeGenerator;
use crate::nav::{AStarManager, ManhattanCost};
use crate::sim::config::SimConfig;

/// Heuristic weighting used by the swarm's searches.
const HEURISTIC_SCALE: f32 = 2.0;
/// Agent height above the ground plane.
const AGENT_HEIGHT: f32 = 0.25;
/// Longest tick the simulation will integrate, in seconds.
const MAX_TICK_SECONDS: f32 = 0.1;

/// Simulation phase: carve first, navigate after.
#[derive(Debug)]
enum Phase {
    /// The maze generator owns the mutable graph.
    Carving {
        graph: GridGraph,
        generator: MazeGenerator,
    },
    /// The graph is frozen; searches and agents run.
    Running {
        nav: AStarManager,
        agents: Vec<Agent>,
    },
}

/// Headless host loop for one maze instance.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    phase: Phase,
    ticks: u64,
}

impl Simulation {
    /// Build the visible lattice and begin carving from the origin cell.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        let graph = GridGraph::lattice(config.tiles_x, config.tiles_y);
        log::info!(
            "grid graph built: {} nodes ({}x{})",
            graph.len(),
            config.tiles_x,
            config.tiles_y
        );
        let generator = MazeGenerator::new(NodeKey::new(0, 0), config.seed);
        Self {
            config,
            phase: Phase::Carving { graph, generator },
            ticks: 0,
        }
    }

    /// Advance one tick.
    ///
    /// `dt` is clamped to 100 ms so motion stays stable across host
    /// stalls.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.min(MAX_TICK_SECONDS);
        self.ticks += 1;

        let carved = match &mut self.phase {
            Phase::Carving { graph, generator } => {
                for _ in 0..self.config.carve_steps_per_tick {
                    if !generator.step(graph) {
                        break;
                    }
                }
                generator.is_done()
            }
            Phase::Running { nav, agents } => {
                nav.step();
                for agent in agents.iter_mut() {
                    agent.update(dt, nav);
                }
                false
            }
        };

        if carved {
            self.finish_generation();
        }
    }

    /// Randomize edges, attach the hidden extension regions, freeze the
    /// graph, and spawn the swarm.
    fn finish_generation(&mut self) {
        let Phase::Carving { graph, generator } = &mut self.phase else {
            return;
        };

        generator.randomize(graph);
        let visits = generator.visits();
        Self::add_extension_rows(graph, &self.config);
        graph.dedup_edges();
        log::info!(
            "maze carved: {} visits, {} nodes after extension",
            visits,
            graph.len()
        );

        let frozen = Arc::new(std::mem::take(graph));
        let costs = Arc::new(ManhattanCost::new(HEURISTIC_SCALE));
        let mut nav =
            AStarManager::new(frozen, costs).with_max_live(self.config.max_live_searches);

        let config = &self.config;
        let spread = config.goal_spread.max(0);
        let mut rng = SmallRng::seed_from_u64(config.seed.wrapping_add(1));
        let mut agents = Vec::new();
        for row in 0..config.agent_rows as i32 {
            for column in 0..config.tiles_x as i32 {
                let start = NodeKey::new(column, -row - 1);
                let goal_column = (column + rng.random_range(-spread..=spread))
                    .clamp(0, config.tiles_x as i32 - 1);
                let goal = NodeKey::new(
                    goal_column,
                    config.tiles_y as i32 + config.extension_depth as i32 / 2,
                );
                let client = nav.create_client(start, goal);
                let position = Vec3::new(column as f32, AGENT_HEIGHT, (-row - 1) as f32);
                agents.push(Agent::new(position, config.agent, client));
            }
        }
        log::info!(
            "spawned {} agents, search ceiling {}",
            agents.len(),
            self.config.max_live_searches
        );

        self.phase = Phase::Running { nav, agents };
    }

    /// Hidden, fully-open rows above and below the lattice where agents
    /// spawn and their goals live.
    fn add_extension_rows(graph: &mut GridGraph, config: &SimConfig) {
        let width = config.tiles_x as i32;
        let height = config.tiles_y as i32;
        let depth = config.extension_depth as i32;

        let mut added = Vec::new();
        for x in 0..width {
            for y in (-depth..0).chain(height..height + depth) {
                let key = NodeKey::new(x, y);
                if graph.contains(key) {
                    continue;
                }
                graph.add_node(key, NodeMetadata::hidden(key));
                added.push(key);
            }
        }
        // Open edges only after every extension node exists, so each one
        // sees its full candidate set.
        for key in added {
            graph.open_all_edges(key);
        }
    }

    /// Still carving the maze.
    #[must_use]
    pub fn is_carving(&self) -> bool {
        matches!(self.phase, Phase::Carving { .. })
    }

    /// The search scheduler, once running.
    #[must_use]
    pub fn nav(&self) -> Option<&AStarManager> {
        match &self.phase {
            Phase::Running { nav, .. } => Some(nav),
            Phase::Carving { .. } => None,
        }
    }

    /// The agent swarm, once running.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        match &self.phase {
            Phase::Running { agents, .. } => agents,
            Phase::Carving { .. } => &[],
        }
    }

    /// Number of spawned agents (zero while carving).
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.agents().len()
    }

    /// The graph in its current phase.
    #[must_use]
    pub fn graph(&self) -> &GridGraph {
        match &self.phase {
            Phase::Carving { graph, .. } => graph,
            Phase::Running { nav, .. } => nav.graph(),
        }
    }

    /// Ticks advanced so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The configuration this instance was built with.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn small_config() -> SimConfig {
        SimConfig::default()
            .with_tiles(16, 8)
            .with_extension_depth(4)
            .with_agent_rows(2)
            .with_goal_spread(5)
            .with_seed(3)
            .with_max_live_searches(50)
    }

    fn run_until_running(sim: &mut Simulation, limit: u32) {
        for _ in 0..limit {
            if !sim.is_carving() {
                return;
            }
            sim.tick(DT);
        }
        panic!("still carving after {limit} ticks");
    }

    #[test]
    fn test_carving_finishes_and_spawns_swarm() {
        let mut sim = Simulation::new(small_config());
        assert!(sim.is_carving());
        assert_eq!(sim.graph().len(), 16 * 8);

        run_until_running(&mut sim, 100);

        // Lattice plus two extension regions.
        assert_eq!(sim.graph().len(), 16 * 8 + 2 * 16 * 4);
        assert_eq!(sim.agents().len(), 16 * 2);
        let nav = sim.nav().unwrap();
        assert_eq!(nav.client_count(), 32);
    }

    #[test]
    fn test_extension_rows_are_open_and_hidden() {
        let mut sim = Simulation::new(small_config());
        run_until_running(&mut sim, 100);
        let graph = sim.graph();

        let below = NodeKey::new(3, -2);
        let node = graph.node(below).unwrap();
        assert!(!node.metadata.visible);
        assert_eq!(node.edge_count(), node.potential_edges.len());

        // The extension connects into the lattice boundary row.
        let boundary = NodeKey::new(3, 0);
        assert!(graph.node(boundary).unwrap().has_edge(NodeKey::new(3, -1)));
        let top = NodeKey::new(3, 8);
        assert!(graph.node(NodeKey::new(3, 7)).unwrap().has_edge(top));
    }

    #[test]
    fn test_all_searches_resolve() {
        let mut sim = Simulation::new(small_config());
        run_until_running(&mut sim, 100);

        for _ in 0..20_000 {
            sim.tick(DT);
            let nav = sim.nav().unwrap();
            assert!(nav.live_count() <= 50);
            if nav.finished_count() == nav.client_count() {
                break;
            }
        }
        let nav = sim.nav().unwrap();
        assert_eq!(nav.finished_count(), nav.client_count());
    }

    #[test]
    fn test_agents_start_moving() {
        let mut sim = Simulation::new(small_config());
        run_until_running(&mut sim, 100);

        for _ in 0..600 {
            sim.tick(DT);
        }
        let moving = sim
            .agents()
            .iter()
            .filter(|a| a.velocity().length_squared() > 0.0)
            .count();
        assert!(moving > 0, "no agent moved after 600 ticks");
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let run = |ticks: u32| {
            let mut sim = Simulation::new(small_config());
            for _ in 0..ticks {
                sim.tick(DT);
            }
            sim.agents()
                .iter()
                .map(|a| a.position())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(300), run(300));
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut sim = Simulation::new(small_config());
        run_until_running(&mut sim, 100);

        // A huge stall must not teleport agents further than a 100 ms
        // tick would.
        for _ in 0..200 {
            sim.tick(10.0);
        }
        for agent in sim.agents() {
            let speed = agent.velocity().length();
            assert!(speed <= sim.config().agent.max_speed + 1e-4, "speed {speed}");
        }
    }
}
