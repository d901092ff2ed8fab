use serde::{Deserialize, Serialize};

use flowkit_core::constants::{TEXT_CHAR_WIDTH, TEXT_LINE_HEIGHT};

use super::{Bounds, Point};

/// A free-floating text label on the diagram surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub id: u64,
    pub position: Point,
    pub label: String,
}

impl TextLabel {
    pub fn new(id: u64, label: &str, position: Point) -> Self {
        Self {
            id,
            position,
            label: label.to_string(),
        }
    }

    /// Approximate bounding box from character metrics, centered on the
    /// label position. Real text measuring lives in the external renderer;
    /// hit-testing only needs to be close.
    pub fn bounds(&self) -> Bounds {
        let width = (self.label.chars().count() as f64 * TEXT_CHAR_WIDTH).max(TEXT_CHAR_WIDTH);
        Bounds::centered(self.position, width, TEXT_LINE_HEIGHT)
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.bounds().contains_point(p)
    }
}
