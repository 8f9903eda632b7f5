//! The resize orchestrator.

use crate::config::FitConfig;
use crate::solver;
use anyhow::{Context as _, Result};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use textfit_css::{Declaration, RuleStore};
use textfit_dom::{Document, NodeKey, StyleHost};

/// A registered (element, group key) pair awaiting fitting.
#[derive(Debug, Clone)]
pub struct Charge {
    pub node: NodeKey,
    pub group: String,
}

/// Owns the charge registry, the original-font-size side table, the rule
/// store and the debounce deadline, and runs fitting passes over all charges
/// in registration order.
///
/// Instances are independent: each installs its own style container and can
/// be dropped for clean teardown. All state lives on the instance; nothing is
/// stored on host elements.
pub struct Fitter<D> {
    doc: D,
    config: FitConfig,
    rules: RuleStore,
    charges: Vec<Charge>,
    /// Original font size per node, cached at first sight and never
    /// recomputed. Upper bound for any committed size.
    original_px: HashMap<NodeKey, f32>,
    /// Font size already chosen this pass per group. Cleared every pass.
    group_px: HashMap<String, f32>,
    /// Deadline of the pending debounced pass, if any.
    pending: Option<Instant>,
    passes_completed: u64,
    total_measurements: u64,
}

impl<D: Document + StyleHost> Fitter<D> {
    /// Install the owned style container into `doc` and return the fitter.
    /// Fails if the host cannot take the container; no further operation is
    /// meaningful without it.
    pub fn new(mut doc: D, config: FitConfig) -> Result<Self> {
        let rules = RuleStore::install(&mut doc).context("initializing fitter")?;
        Ok(Self {
            doc,
            config,
            rules,
            charges: Vec::new(),
            original_px: HashMap::new(),
            group_px: HashMap::new(),
            pending: None,
            passes_completed: 0,
            total_measurements: 0,
        })
    }

    /// Register one charge per element matched by each selector, in selector
    /// order then document order, and run one immediate pass.
    ///
    /// Unmatched selectors register zero charges and are not an error. An
    /// element matched by two selectors carries two charges. Calling `init`
    /// again appends and so duplicates charges; use a fresh instance to
    /// re-initialize.
    pub fn init(&mut self, selectors: &[&str]) -> Result<()> {
        for selector in selectors {
            let matched = self.doc.query_selector_all(selector);
            log::info!("selector {selector:?} matched {} elements", matched.len());
            for node in matched {
                self.charges.push(Charge {
                    node,
                    group: (*selector).to_string(),
                });
            }
        }
        self.resize(Some(Duration::ZERO))
    }

    /// Trigger a fitting pass. `None` debounces with the configured default
    /// window; a zero delay runs the pass synchronously (cancelling any
    /// pending one); a positive delay schedules a deferred pass, replacing
    /// any still-pending deadline so only the last call in a burst executes.
    pub fn resize(&mut self, delay: Option<Duration>) -> Result<()> {
        let delay = delay.unwrap_or(self.config.debounce);
        if delay.is_zero() {
            self.pending = None;
            self.run_pass()
        } else {
            self.pending = Some(Instant::now() + delay);
            Ok(())
        }
    }

    /// Drive the debounce clock: runs the pending pass if its deadline has
    /// arrived. Embedders call this from their event loop. Returns whether a
    /// pass ran.
    pub fn pump(&mut self) -> Result<bool> {
        match self.pending {
            Some(deadline) if Instant::now() >= deadline => {
                self.pending = None;
                self.run_pass()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn run_pass(&mut self) -> Result<()> {
        self.group_px.clear();
        // Snapshot originals for unseen nodes before any rule is staged this
        // pass: computed style reflects the shared rules, so reading after a
        // groupmate committed would cache its shrunken size as the original.
        for charge in &self.charges {
            if self.original_px.contains_key(&charge.node) {
                continue;
            }
            if let Some(px) = self.doc.computed_font_size(charge.node) {
                self.original_px.insert(charge.node, px);
            }
        }
        for index in 0..self.charges.len() {
            let Charge { node, group } = self.charges[index].clone();
            let Some(original) = self.original_px.get(&node).copied() else {
                log::warn!("charge {index}: unknown node {node:?}; skipping");
                continue;
            };
            // Never above the original, never above what the group already
            // shrank to this pass: the group converges to the smallest size
            // any member needs.
            let start = self
                .group_px
                .get(&group)
                .copied()
                .map_or(original, |group_px| group_px.min(original));

            self.rules.set_declarations(
                &mut self.doc,
                &group,
                &[
                    Declaration::new("overflow", "hidden"),
                    Declaration::new("display", "block"),
                    Declaration::new("font-size", &px(start)),
                ],
            )?;
            let outcome = solver::shrink_to_fit(
                &mut self.doc,
                &mut self.rules,
                node,
                &group,
                start,
                self.config.min_font_px,
            )?;
            self.group_px.insert(group.clone(), outcome.font_px);
            self.rules.set_declarations(
                &mut self.doc,
                &group,
                &[Declaration::new("font-size", &px(outcome.font_px))],
            )?;
            self.rules
                .clear_declarations(&mut self.doc, &group, &["overflow", "display"])?;
            self.total_measurements += u64::from(outcome.measurements);
            log::debug!(
                "group {group:?}: committed {}px (fits: {}, {} measurements)",
                outcome.font_px,
                outcome.fits,
                outcome.measurements
            );
        }
        self.passes_completed += 1;
        log::debug!(
            "pass {} complete over {} charges",
            self.passes_completed,
            self.charges.len()
        );
        Ok(())
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    pub fn charges(&self) -> &[Charge] {
        &self.charges
    }

    pub fn charge_count(&self) -> usize {
        self.charges.len()
    }

    /// Cached original font size for a node, once it has been seen by a pass.
    pub fn original_font_size(&self, node: NodeKey) -> Option<f32> {
        self.original_px.get(&node).copied()
    }

    pub fn has_pending_resize(&self) -> bool {
        self.pending.is_some()
    }

    pub fn passes_completed(&self) -> u64 {
        self.passes_completed
    }

    /// Total forced-layout content width reads across all passes.
    pub fn total_measurements(&self) -> u64 {
        self.total_measurements
    }
}

fn px(value: f32) -> String {
    format!("{value}px")
}
