//! Overlap predicates
//!
//! Entities expose a `Shape` through the `Collider` capability; both
//! predicates accept any mix of box- and circle-shaped entities.

use glam::Vec2;

/// Collision shape in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle given by its top-left corner and size
    Box { min: Vec2, size: Vec2 },
    /// Circle given by its center and radius
    Circle { center: Vec2, radius: f32 },
}

impl Shape {
    /// Box centered on `center`
    pub fn centered_box(center: Vec2, size: Vec2) -> Self {
        Shape::Box {
            min: center - size * 0.5,
            size,
        }
    }

    pub fn circle(center: Vec2, radius: f32) -> Self {
        Shape::Circle { center, radius }
    }

    /// Axis-aligned bounds as (min, size). A circle yields its bounding square.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        match *self {
            Shape::Box { min, size } => (min, size),
            Shape::Circle { center, radius } => (center - Vec2::splat(radius), Vec2::splat(radius * 2.0)),
        }
    }

    pub fn center(&self) -> Vec2 {
        match *self {
            Shape::Box { min, size } => min + size * 0.5,
            Shape::Circle { center, .. } => center,
        }
    }

    /// Radius used for circle tests. A box uses half its longer side.
    pub fn radius(&self) -> f32 {
        match *self {
            Shape::Box { size, .. } => size.x.max(size.y) * 0.5,
            Shape::Circle { radius, .. } => radius,
        }
    }
}

/// Anything that can take part in an overlap test
pub trait Collider {
    fn shape(&self) -> Shape;
}

impl Collider for Shape {
    fn shape(&self) -> Shape {
        *self
    }
}

/// Points evenly spaced on a circle around `center`, starting at `angle`.
/// Used for sword orbits.
pub fn orbit_points(center: Vec2, count: u32, angle: f32, radius: f32) -> impl Iterator<Item = Vec2> {
    let step = if count > 0 { std::f32::consts::TAU / count as f32 } else { 0.0 };
    (0..count).map(move |i| center + crate::polar_to_cartesian(radius, angle + step * i as f32))
}

/// Separating-axis test on the two bounding boxes. Touching edges do not count.
pub fn box_overlap(a: &impl Collider, b: &impl Collider) -> bool {
    let (a_min, a_size) = a.shape().bounds();
    let (b_min, b_size) = b.shape().bounds();
    a_min.x < b_min.x + b_size.x
        && a_min.x + a_size.x > b_min.x
        && a_min.y < b_min.y + b_size.y
        && a_min.y + a_size.y > b_min.y
}

/// Center distance strictly less than the sum of radii
pub fn circle_overlap(a: &impl Collider, b: &impl Collider) -> bool {
    let a = a.shape();
    let b = b.shape();
    let reach = a.radius() + b.radius();
    a.center().distance_squared(b.center()) < reach * reach
}
