//! Route polylines and the receiver route engine
//!
//! A receiver walks its route at constant speed. Progress is cumulative
//! distance along the polyline; anything past the end holds the last waypoint.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::Receiver;

/// A polyline a receiver walks, starting at its line-up spot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    points: Vec<Vec3>,
    length: f32,
}

impl Route {
    pub fn new(start: Vec3, waypoints: impl IntoIterator<Item = Vec3>) -> Self {
        let points: Vec<Vec3> = std::iter::once(start).chain(waypoints).collect();
        let length = points.windows(2).map(|w| w[0].distance(w[1])).sum();
        Self { points, length }
    }

    /// Start spot followed by every waypoint
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Total polyline length
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Final waypoint (where the receiver sits down)
    pub fn end(&self) -> Vec3 {
        // `new` always stores at least the start spot
        self.points.last().copied().unwrap_or(Vec3::ZERO)
    }

    /// Point reached after walking `progress` along the route
    pub fn point_at(&self, progress: f32) -> Vec3 {
        if progress >= self.length {
            return self.end();
        }

        let mut remaining = progress.max(0.0);
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            let seg_len = a.distance(b);
            if seg_len <= 0.0 {
                continue;
            }
            if remaining <= seg_len {
                return a.lerp(b, remaining / seg_len);
            }
            remaining -= seg_len;
        }
        self.end()
    }
}

/// A receiver's route plus how far along it they are
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteFollower {
    pub route: Route,
    pub progress: f32,
}

impl RouteFollower {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            progress: 0.0,
        }
    }

    /// Advance along the route and return the new target point
    pub fn advance(&mut self, speed: f32, dt: f32) -> Vec3 {
        self.progress += speed * dt;
        self.route.point_at(self.progress)
    }

    pub fn reset(&mut self) {
        self.progress = 0.0;
    }
}

/// Move every receiver one tick along their route
///
/// The drawn position eases toward the route point by `smoothing` each tick
/// instead of snapping to it.
pub fn update_receivers(receivers: &mut [Receiver], smoothing: f32, dt: f32) {
    for r in receivers.iter_mut() {
        let target = r.follower.advance(r.agent.speed, dt);
        r.agent.pos = r.agent.pos.lerp(target, smoothing);
    }
}
