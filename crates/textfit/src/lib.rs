//! Auto-shrink text to its container.
//!
//! A [`Fitter`] tracks (element, selector) charges, and on every resize pass
//! finds the largest font size at which each element's content width fits its
//! visible width, never growing past the element's original size. Elements
//! matched by the same selector share one rule in an exclusively-owned
//! stylesheet, so shrinking a group costs O(1) stylesheet writes.
//!
//! ```
//! use textfit::{ElementData, FitConfig, Fitter, SimDocument};
//!
//! let mut doc = SimDocument::new();
//! doc.insert(ElementData::new("span", "a rather long headline", 80.0, 20.0).with_class("badge"));
//!
//! let mut fitter = Fitter::new(doc, FitConfig::default()).unwrap();
//! fitter.init(&[".badge"]).unwrap();
//! ```

mod config;
mod fitter;
pub mod solver;

pub use config::FitConfig;
pub use fitter::{Charge, Fitter};
pub use solver::FitOutcome;

pub use textfit_css::{Declaration, RuleStore, StyleRule, Stylesheet, CONTAINER_ID};
pub use textfit_dom::{Document, ElementData, NodeKey, SimDocument, StyleHost, StyleUpdate};
