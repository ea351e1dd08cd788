//! Visual tree interface
//!
//! One square element per dynamic body. Styling comes from class membership,
//! motion from a 2D transform written every physics step.

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod headless;

#[cfg(target_arch = "wasm32")]
pub use dom::DomTree;
pub use headless::HeadlessTree;

use serde::{Deserialize, Serialize};

use crate::StageError;

/// Stable handle to a proxy element owned by the visual tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProxyId(pub u32);

/// Styling shape of a proxy (circles still get a square bounding element)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyShape {
    Block,
    Circle,
}

/// Everything needed to create a proxy element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxySpec {
    /// Side length in px
    pub size: f32,
    pub shape: ProxyShape,
    /// Size multiplier over the tier unit
    pub multiplier: u32,
    /// Color class index
    pub color: u32,
}

impl ProxySpec {
    /// Space separated class list, e.g. `block block2 color1`
    pub fn class_list(&self) -> String {
        match self.shape {
            ProxyShape::Block => format!("block block{} color{}", self.multiplier, self.color),
            ProxyShape::Circle => format!("block circle color{}", self.color),
        }
    }

    /// CSS length for width/height
    pub fn size_css(&self) -> String {
        format!("{}px", self.size)
    }

    /// CSS length for the negative margins that center the element on its origin
    pub fn margin_css(&self) -> String {
        format!("-{}px", self.size / 2.0)
    }
}

/// The calls the stage needs from the visual element tree
pub trait VisualTree {
    /// Create a styled element and append it to the tree
    fn create_proxy(&mut self, spec: &ProxySpec) -> Result<ProxyId, StageError>;

    /// Replace the element's transform string
    fn set_transform(&mut self, proxy: ProxyId, transform: &str);

    /// Publish the tier's accent line width for stylesheet use
    fn set_accent_line_width(&mut self, px: u32) -> Result<(), StageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_for_blocks_and_circles() {
        let block = ProxySpec {
            size: 160.0,
            shape: ProxyShape::Block,
            multiplier: 2,
            color: 1,
        };
        assert_eq!(block.class_list(), "block block2 color1");

        let circle = ProxySpec {
            size: 80.0,
            shape: ProxyShape::Circle,
            multiplier: 1,
            color: 0,
        };
        assert_eq!(circle.class_list(), "block circle color0");
    }

    #[test]
    fn test_css_lengths() {
        let spec = ProxySpec {
            size: 60.0,
            shape: ProxyShape::Block,
            multiplier: 1,
            color: 2,
        };
        assert_eq!(spec.size_css(), "60px");
        assert_eq!(spec.margin_css(), "-30px");
    }
}
