//! In-memory host document with a deterministic measurement model.
//!
//! `SimDocument` stands in for a real DOM: it stores elements in document
//! order, mirrors the style rules pushed by the rule store, and answers
//! layout reads from a linear glyph-advance model (intrinsic text width =
//! character count x font size x advance ratio). Tests and embedders without
//! a layout engine drive the fitter against it.

use crate::selector::CompoundSelector;
use crate::{Document, ElementData, NodeKey, StyleHost, StyleUpdate};
use anyhow::{bail, Result};
use std::cell::Cell;
use std::collections::HashMap;

/// Default glyph advance as a fraction of the font size.
const DEFAULT_ADVANCE_RATIO: f32 = 0.5;

#[derive(Debug, Clone)]
struct SimRule {
    source: String,
    selector: Option<CompoundSelector>,
    props: Vec<(String, String)>,
}

/// An in-memory host document implementing [`Document`] and [`StyleHost`].
#[derive(Debug)]
pub struct SimDocument {
    next_id: u64,
    nodes: HashMap<NodeKey, ElementData>,
    order: Vec<NodeKey>,
    container: Option<String>,
    rules: Vec<SimRule>,
    advance_ratio: f32,
    layout_reads: Cell<u64>,
    refuse_container: bool,
}

impl SimDocument {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            nodes: HashMap::new(),
            order: Vec::new(),
            container: None,
            rules: Vec::new(),
            advance_ratio: DEFAULT_ADVANCE_RATIO,
            layout_reads: Cell::new(0),
            refuse_container: false,
        }
    }

    /// Append an element in document order.
    pub fn insert(&mut self, element: ElementData) -> NodeKey {
        let key = NodeKey(self.next_id);
        self.next_id += 1;
        self.nodes.insert(key, element);
        self.order.push(key);
        key
    }

    pub fn element(&self, node: NodeKey) -> Option<&ElementData> {
        self.nodes.get(&node)
    }

    pub fn set_text(&mut self, node: NodeKey, text: &str) {
        if let Some(element) = self.nodes.get_mut(&node) {
            element.text = text.to_string();
        }
    }

    pub fn set_width(&mut self, node: NodeKey, width_px: f32) {
        if let Some(element) = self.nodes.get_mut(&node) {
            element.width_px = width_px;
        }
    }

    /// Override the measurement model's glyph advance ratio.
    pub fn set_advance_ratio(&mut self, ratio: f32) {
        self.advance_ratio = ratio;
    }

    /// Make the next style container installation fail, for error-path tests.
    pub fn refuse_style_container(&mut self, refuse: bool) {
        self.refuse_container = refuse;
    }

    /// Id of the installed style container, if any.
    pub fn container_id(&self) -> Option<&str> {
        self.container.as_deref()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Selector source of a mirrored rule.
    pub fn rule_selector(&self, index: usize) -> Option<&str> {
        self.rules.get(index).map(|rule| rule.source.as_str())
    }

    /// Mirrored value of a property on a rule, if set.
    pub fn rule_property(&self, index: usize, name: &str) -> Option<&str> {
        self.rules.get(index).and_then(|rule| {
            rule.props
                .iter()
                .find(|(prop, _)| prop == name)
                .map(|(_, value)| value.as_str())
        })
    }

    /// Number of forced layout reads served so far.
    pub fn layout_reads(&self) -> u64 {
        self.layout_reads.get()
    }

    /// Font size the element renders at, with mirrored rules applied in
    /// source order (later rules win). Does not count as a layout read.
    pub fn effective_font_size(&self, node: NodeKey) -> Option<f32> {
        self.resolve(node).map(|style| style.font_px)
    }

    fn resolve(&self, node: NodeKey) -> Option<ResolvedStyle> {
        let element = self.nodes.get(&node)?;
        let mut style = ResolvedStyle {
            font_px: element.base_font_px,
            display_none: element.display_none,
        };
        for rule in &self.rules {
            let matches = rule
                .selector
                .as_ref()
                .is_some_and(|selector| selector.matches(element));
            if !matches {
                continue;
            }
            for (name, value) in &rule.props {
                match name.as_str() {
                    "font-size" => {
                        if let Some(px) = parse_px(value) {
                            style.font_px = px;
                        }
                    }
                    // Inline display:none on the element wins over rules.
                    "display" if !element.display_none => {
                        style.display_none = value == "none";
                    }
                    _ => {}
                }
            }
        }
        Some(style)
    }
}

impl Default for SimDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
struct ResolvedStyle {
    font_px: f32,
    display_none: bool,
}

fn parse_px(value: &str) -> Option<f32> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

impl Document for SimDocument {
    fn query_selector_all(&self, selector: &str) -> Vec<NodeKey> {
        let Some(parsed) = CompoundSelector::parse(selector) else {
            log::warn!("unsupported selector {selector:?}; matching nothing");
            return Vec::new();
        };
        self.order
            .iter()
            .copied()
            .filter(|key| {
                self.nodes
                    .get(key)
                    .is_some_and(|element| parsed.matches(element))
            })
            .collect()
    }

    fn computed_font_size(&self, node: NodeKey) -> Option<f32> {
        self.effective_font_size(node)
    }

    fn client_width(&self, node: NodeKey) -> Option<f32> {
        self.layout_reads.set(self.layout_reads.get() + 1);
        let style = self.resolve(node)?;
        if style.display_none {
            return Some(0.0);
        }
        self.nodes.get(&node).map(|element| element.width_px)
    }

    fn scroll_width(&self, node: NodeKey) -> Option<f32> {
        self.layout_reads.set(self.layout_reads.get() + 1);
        let style = self.resolve(node)?;
        if style.display_none {
            return Some(0.0);
        }
        let element = self.nodes.get(&node)?;
        let intrinsic = element.text.chars().count() as f32 * style.font_px * self.advance_ratio;
        Some(element.width_px.max(intrinsic))
    }
}

impl StyleHost for SimDocument {
    fn apply_style(&mut self, update: StyleUpdate) -> Result<()> {
        match update {
            StyleUpdate::InstallContainer { id } => {
                if self.refuse_container {
                    bail!("host refused style container {id:?}");
                }
                self.container = Some(id);
            }
            StyleUpdate::InsertRule { index, selector } => {
                if self.container.is_none() {
                    bail!("no style container installed");
                }
                if index != self.rules.len() {
                    bail!(
                        "rule inserted out of order: index {index}, have {}",
                        self.rules.len()
                    );
                }
                let parsed = CompoundSelector::parse(&selector);
                if parsed.is_none() {
                    log::warn!("unsupported rule selector {selector:?}; rule matches nothing");
                }
                self.rules.push(SimRule {
                    source: selector,
                    selector: parsed,
                    props: Vec::new(),
                });
            }
            StyleUpdate::SetProperty { index, name, value } => {
                let Some(rule) = self.rules.get_mut(index) else {
                    bail!("set on unknown rule index {index}");
                };
                if let Some(slot) = rule.props.iter_mut().find(|(prop, _)| *prop == name) {
                    slot.1 = value;
                } else {
                    rule.props.push((name, value));
                }
            }
            StyleUpdate::RemoveProperty { index, name } => {
                let Some(rule) = self.rules.get_mut(index) else {
                    bail!("remove on unknown rule index {index}");
                };
                rule.props.retain(|(prop, _)| *prop != name);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn install(doc: &mut SimDocument) {
        doc.apply_style(StyleUpdate::InstallContainer {
            id: "textfit-styles".into(),
        })
        .unwrap();
    }

    #[test]
    fn linear_measurement_model() {
        let mut doc = SimDocument::new();
        // 26 chars at 20px with 0.5 advance -> 260px intrinsic width.
        let node = doc.insert(ElementData::new("div", &"x".repeat(26), 100.0, 20.0));
        assert_eq!(doc.client_width(node), Some(100.0));
        assert_eq!(doc.scroll_width(node), Some(260.0));
        assert_eq!(doc.layout_reads(), 2);
    }

    #[test]
    fn scroll_width_clamps_to_client_when_text_fits() {
        let mut doc = SimDocument::new();
        let node = doc.insert(ElementData::new("div", "ab", 100.0, 20.0));
        assert_eq!(doc.scroll_width(node), Some(100.0));
    }

    #[test]
    fn display_none_measures_zero() {
        let mut doc = SimDocument::new();
        let node = doc.insert(ElementData::new("div", "hello", 100.0, 20.0).hidden());
        assert_eq!(doc.client_width(node), Some(0.0));
        assert_eq!(doc.scroll_width(node), Some(0.0));
    }

    #[test]
    fn rules_apply_in_source_order() {
        let mut doc = SimDocument::new();
        let node = doc.insert(ElementData::new("div", "hello", 100.0, 20.0).with_class("a"));
        install(&mut doc);
        doc.apply_style(StyleUpdate::InsertRule {
            index: 0,
            selector: ".a".into(),
        })
        .unwrap();
        doc.apply_style(StyleUpdate::SetProperty {
            index: 0,
            name: "font-size".into(),
            value: "12px".into(),
        })
        .unwrap();
        doc.apply_style(StyleUpdate::InsertRule {
            index: 1,
            selector: "div".into(),
        })
        .unwrap();
        doc.apply_style(StyleUpdate::SetProperty {
            index: 1,
            name: "font-size".into(),
            value: "9px".into(),
        })
        .unwrap();
        assert_eq!(doc.effective_font_size(node), Some(9.0));
    }

    #[test]
    fn inline_display_none_wins_over_rule_block() {
        let mut doc = SimDocument::new();
        let node = doc.insert(ElementData::new("div", "hello", 100.0, 20.0).hidden());
        install(&mut doc);
        doc.apply_style(StyleUpdate::InsertRule {
            index: 0,
            selector: "div".into(),
        })
        .unwrap();
        doc.apply_style(StyleUpdate::SetProperty {
            index: 0,
            name: "display".into(),
            value: "block".into(),
        })
        .unwrap();
        assert_eq!(doc.client_width(node), Some(0.0));
    }

    #[test]
    fn query_returns_document_order() {
        let mut doc = SimDocument::new();
        let first = doc.insert(ElementData::new("span", "a", 10.0, 16.0).with_class("x"));
        let _other = doc.insert(ElementData::new("div", "b", 10.0, 16.0));
        let second = doc.insert(ElementData::new("span", "c", 10.0, 16.0).with_class("x"));
        assert_eq!(doc.query_selector_all(".x"), vec![first, second]);
        assert_eq!(doc.query_selector_all("p"), Vec::new());
        // Combinators are unsupported and match nothing.
        assert_eq!(doc.query_selector_all("div span"), Vec::new());
    }

    #[test]
    fn refused_container_is_an_error() {
        let mut doc = SimDocument::new();
        doc.refuse_style_container(true);
        let result = doc.apply_style(StyleUpdate::InstallContainer {
            id: "textfit-styles".into(),
        });
        assert!(result.is_err());
        assert_eq!(doc.container_id(), None);
    }

    #[test]
    fn rules_require_a_container() {
        let mut doc = SimDocument::new();
        let result = doc.apply_style(StyleUpdate::InsertRule {
            index: 0,
            selector: "div".into(),
        });
        assert!(result.is_err());
    }
}
