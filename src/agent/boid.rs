//! Path-following agents
//!
//! Each agent polls its pathfinding handle, consumes waypoints from the
//! front of its route, and integrates steering forces into velocity and
//! facing. Motion stays on the ground plane: grid (x, y) maps to world
//! (x, z), and the vertical axis is zeroed before integration.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};

use crate::agent::steering::{Seek, SteeringBehavior};
use crate::graph::NodeKey;
use crate::nav::{AStarManager, ClientHandle};

/// Fixed magnitude of the seek force.
const SEEK_FORCE: f32 = 5.0;
/// How far past the projected point the agent aims along a segment.
const LOOK_AHEAD: f32 = 0.1;
/// Distance at which the pursued point counts as reached.
const WAYPOINT_RADIUS: f32 = 0.25;

fn ground(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z)
}

fn lift(point: Vec2, height: f32) -> Vec3 {
    Vec3::new(point.x, height, point.y)
}

/// Tunable kinematic limits for an agent.
#[derive(Debug, Clone, Copy)]
pub struct AgentParams {
    /// Velocity magnitude cap
    pub max_speed: f32,
    /// Scales steering force into acceleration
    pub acceleration: f32,
    /// Per-tick steering force cap
    pub max_steering_force: f32,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            max_speed: 0.25,
            acceleration: 0.1,
            max_steering_force: 0.02,
        }
    }
}

impl AgentParams {
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn with_acceleration(mut self, acceleration: f32) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_max_steering_force(mut self, max_steering_force: f32) -> Self {
        self.max_steering_force = max_steering_force;
        self
    }
}

/// A steered agent following one pathfinding request.
#[derive(Debug)]
pub struct Agent {
    position: Vec3,
    velocity: Vec3,
    direction: Vec3,
    params: AgentParams,
    waypoints: VecDeque<Vec2>,
    client: Option<ClientHandle>,
}

impl Agent {
    /// Spawn at `position`, bound to a pathfinding request.
    #[must_use]
    pub fn new(position: Vec3, params: AgentParams, client: ClientHandle) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            direction: Vec3::X,
            params,
            waypoints: VecDeque::new(),
            client: Some(client),
        }
    }

    /// Spawn with no pathfinding request; the route is supplied with
    /// [`set_waypoints`](Self::set_waypoints).
    #[must_use]
    pub fn detached(position: Vec3, params: AgentParams) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            direction: Vec3::X,
            params,
            waypoints: VecDeque::new(),
            client: None,
        }
    }

    /// Current world position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Unit facing vector, the last non-zero travel direction.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Remaining waypoints.
    #[must_use]
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// No followable route left and no request outstanding.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.client.is_none() && self.waypoints.len() < 2
    }

    /// Replace the route.
    pub fn set_waypoints(&mut self, waypoints: impl IntoIterator<Item = Vec2>) {
        self.waypoints = waypoints.into_iter().collect();
    }

    /// Advance one tick: poll the pathfinding handle, steer, integrate.
    pub fn update(&mut self, dt: f32, nav: &mut AStarManager) {
        self.poll_client(nav);
        let force = self.path_following_force(nav);
        self.integrate(force, dt);
        self.position += self.velocity * dt;
    }

    /// Adopt a resolved path, or keep re-aiming an unadmitted search at
    /// the agent's current cell.
    fn poll_client(&mut self, nav: &mut AStarManager) {
        let Some(handle) = self.client else {
            return;
        };
        if nav.is_resolved(handle) {
            if let Some(path) = nav.take_path(handle) {
                self.waypoints = path.centers().collect();
            }
            self.client = None;
        } else if !nav.is_started(handle) {
            let cell = NodeKey::at(ground(self.position));
            nav.set_start(handle, cell);
        }
    }

    /// Steering force for the current route.
    ///
    /// Pursues a look-ahead point just past the agent's projection onto
    /// the first route segment; reaching it consumes the segment's first
    /// waypoint.
    fn path_following_force(&mut self, nav: &AStarManager) -> Vec3 {
        if self.waypoints.len() < 2 {
            return self.destination_force(nav);
        }

        let here = ground(self.position);
        let a = self.waypoints[0];
        let b = self.waypoints[1];

        let along = (b - a).normalize_or_zero();
        let t = (here - a).dot(along).clamp(0.0, a.distance(b));
        let pursued = a + along * (t + LOOK_AHEAD);

        let target = lift(pursued, self.position.y);
        if self.position.distance(target) < WAYPOINT_RADIUS {
            self.waypoints.pop_front();
        }

        Seek::new(target, SEEK_FORCE).force(self.position, self.velocity)
    }

    /// Best-effort pull toward the request's destination cell while the
    /// search is still resolving.
    fn destination_force(&self, nav: &AStarManager) -> Vec3 {
        let Some(handle) = self.client else {
            return Vec3::ZERO;
        };
        let Some(end) = nav.client(handle).map(|c| c.end()) else {
            return Vec3::ZERO;
        };
        let Some(node) = nav.graph().node(end) else {
            return Vec3::ZERO;
        };
        let target = lift(node.metadata.center(), self.position.y);
        Seek::new(target, SEEK_FORCE).force(self.position, self.velocity)
    }

    /// Scale the force by acceleration and dt, lock it to the ground
    /// plane, clamp force then velocity, then refresh facing.
    fn integrate(&mut self, force: Vec3, dt: f32) {
        let mut steering = force * self.params.acceleration * dt;
        steering.y = 0.0;
        steering = steering.clamp_length_max(self.params.max_steering_force);

        self.velocity += steering;
        self.velocity = self.velocity.clamp_length_max(self.params.max_speed);

        if let Some(dir) = self.velocity.try_normalize() {
            self.direction = dir;
        }
    }
}
