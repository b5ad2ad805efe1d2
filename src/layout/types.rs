/// A circle in a local packing frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    pub fn distance_to(&self, other: &Circle) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Caller-supplied packing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackOptions {
    pub width: f64,
    pub height: f64,
    /// Gap between sibling circles and between a child and its parent's edge.
    pub padding: f64,
    /// Smallest radius a leaf may be drawn with.
    pub min_radius: f64,
    /// Margin kept between the root circle and the bounding box.
    pub inset: f64,
}

impl PackOptions {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self {
            width,
            height,
            padding,
            ..Self::default()
        }
    }
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 960.0,
            padding: 3.0,
            min_radius: 1.0,
            inset: 1.0,
        }
    }
}
