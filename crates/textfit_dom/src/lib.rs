//! Host-agnostic document primitives shared across textfit subsystems.
//! This crate centralizes the types the rule store and the fitter both need:
//! stable node keys, element data, the selector matcher, the measurement and
//! style-mirroring traits, and an in-memory host document for tests and
//! embedders without a real layout engine.

use anyhow::Result;

pub mod selector;
pub use selector::{CompoundSelector, SimpleSelector};

mod sim;
pub use sim::SimDocument;

/// A 64-bit stable key for host document nodes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NodeKey(pub u64);

/// Data for an element node tracked by a host document.
#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag: String,
    pub id: Option<String>,
    pub classes: smallvec::SmallVec<[String; 4]>,
    /// Text content, measured as a single unbroken run.
    pub text: String,
    /// Visible (client) width of the element's box in px.
    pub width_px: f32,
    /// Font size before any rule applies, in px.
    pub base_font_px: f32,
    /// Inline `display: none`; wins over any rule in the mirror.
    pub display_none: bool,
}

impl ElementData {
    pub fn new(tag: &str, text: &str, width_px: f32, base_font_px: f32) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: smallvec::SmallVec::new(),
            text: text.to_string(),
            width_px,
            base_font_px,
            display_none: false,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.display_none = true;
        self
    }
}

/// Read access to a host document: selector queries, computed styles and
/// forced-layout measurements.
pub trait Document {
    /// All elements matching `selector`, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<NodeKey>;

    /// Effective font size of the node in px, `None` for unknown nodes.
    fn computed_font_size(&self, node: NodeKey) -> Option<f32>;

    /// Visible width of the node's box. Forces a layout read.
    fn client_width(&self, node: NodeKey) -> Option<f32>;

    /// Width the node's content would occupy if unclipped. Forces a layout read.
    fn scroll_width(&self, node: NodeKey) -> Option<f32>;
}

/// A mutation applied to the owned style container and mirrored into the host.
#[derive(Debug, Clone)]
pub enum StyleUpdate {
    /// Insert the style container that owns all subsequent rules.
    InstallContainer { id: String },
    InsertRule { index: usize, selector: String },
    SetProperty { index: usize, name: String, value: String },
    RemoveProperty { index: usize, name: String },
}

/// Receives style mutations from the rule store.
pub trait StyleHost {
    fn apply_style(&mut self, update: StyleUpdate) -> Result<()>;
}
