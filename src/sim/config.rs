//! Simulation configuration

use crate::agent::AgentParams;
use crate::nav::AStarManager;

/// Tunables for one maze instance and its agent swarm.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Visible lattice width in cells
    pub tiles_x: u32,
    /// Visible lattice height in cells
    pub tiles_y: u32,
    /// Hidden extension rows added above and below after carving
    pub extension_depth: u32,
    /// Rows of agents spawned in the bottom extension
    pub agent_rows: u32,
    /// Horizontal jitter applied to each agent's goal column
    pub goal_spread: i32,
    /// Seed for maze carving and goal jitter
    pub seed: u64,
    /// Live-search ceiling for the scheduler
    pub max_live_searches: usize,
    /// Maze generator steps per tick
    pub carve_steps_per_tick: u32,
    /// Kinematics applied to every agent
    pub agent: AgentParams,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tiles_x: 64,
            tiles_y: 16,
            extension_depth: 16,
            agent_rows: 8,
            goal_spread: 20,
            seed: 7,
            max_live_searches: AStarManager::DEFAULT_MAX_LIVE,
            carve_steps_per_tick: 100,
            agent: AgentParams::default(),
        }
    }
}

impl SimConfig {
    /// Set the visible lattice dimensions
    pub fn with_tiles(mut self, tiles_x: u32, tiles_y: u32) -> Self {
        self.tiles_x = tiles_x;
        self.tiles_y = tiles_y;
        self
    }

    /// Set the hidden extension depth
    pub fn with_extension_depth(mut self, extension_depth: u32) -> Self {
        self.extension_depth = extension_depth;
        self
    }

    /// Set the number of agent rows
    pub fn with_agent_rows(mut self, agent_rows: u32) -> Self {
        self.agent_rows = agent_rows;
        self
    }

    /// Set the goal column jitter
    pub fn with_goal_spread(mut self, goal_spread: i32) -> Self {
        self.goal_spread = goal_spread;
        self
    }

    /// Set the carve and jitter seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the live-search ceiling
    pub fn with_max_live_searches(mut self, max_live_searches: usize) -> Self {
        self.max_live_searches = max_live_searches;
        self
    }

    /// Set the carve budget per tick
    pub fn with_carve_steps_per_tick(mut self, carve_steps_per_tick: u32) -> Self {
        self.carve_steps_per_tick = carve_steps_per_tick;
        self
    }

    /// Set the agent kinematics
    pub fn with_agent_params(mut self, agent: AgentParams) -> Self {
        self.agent = agent;
        self
    }
}
