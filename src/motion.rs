//! Arena geometry and the single motion integrator every entity moves with.

/// Gameplay distances are authored against a square of this many units.
pub const REFERENCE_SIZE: f64 = 200.0;

/// The rectangular play area, in arena units.  Origin is the top-left corner,
/// `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
}

impl Arena {
    pub fn new(width: f64, height: f64) -> Self {
        Arena { width, height }
    }

    /// Normalises speeds and sizes to the arena so play feels the same at
    /// every resolution.
    pub fn scale_factor(&self) -> f64 {
        self.width.min(self.height) / REFERENCE_SIZE
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// True once a point has crossed any edge (edges themselves count as inside).
    pub fn is_outside(&self, x: f64, y: f64) -> bool {
        x < 0.0 || y < 0.0 || x > self.width || y > self.height
    }

    /// Like [`Arena::is_outside`] but with every edge pushed out by `margin`.
    pub fn is_outside_with_margin(&self, x: f64, y: f64, margin: f64) -> bool {
        x < -margin || y < -margin || x > self.width + margin || y > self.height + margin
    }
}

/// One constant-velocity step: `(x, y) + (cos θ, sin θ) · speed · scale`.
pub fn update_position(x: f64, y: f64, heading: f64, speed: f64, scale: f64) -> (f64, f64) {
    let vx = heading.cos() * speed * scale;
    let vy = heading.sin() * speed * scale;
    (x + vx, y + vy)
}
