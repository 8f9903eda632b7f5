//! The font-size fitting loop.
//!
//! Starting from the probe size already staged on the group rule, shrink by
//! whole-pixel steps until content width fits visible width or the floor is
//! reached. Content width is non-increasing as the font shrinks and the
//! visible width is fixed for the pass, so the search is strictly monotonic
//! and terminates. Every step is a forced layout read; the step count is
//! surfaced so callers can track that cost.

use anyhow::{bail, Result};
use textfit_css::{Declaration, RuleStore};
use textfit_dom::{Document, NodeKey, StyleHost};

/// Result of one shrink run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOutcome {
    /// Font size the group should commit, in px.
    pub font_px: f32,
    /// Whether content width fits visible width at `font_px`.
    pub fits: bool,
    /// Forced-layout content width reads performed.
    pub measurements: u32,
}

/// Shrink `node`'s group font size from `start_px` until its content fits.
///
/// Expects the caller to have staged `start_px` (with the probe overflow and
/// display declarations) on the group's rule already. An element with no
/// visible width (e.g. `display: none`) is skipped: the starting size is
/// returned unchanged rather than looping toward the floor. The floor only
/// stops shrinking; a start already below it is measured once and returned
/// as is, since raising it would overshoot the original-size bound.
pub fn shrink_to_fit<D: Document + StyleHost>(
    doc: &mut D,
    rules: &mut RuleStore,
    node: NodeKey,
    group: &str,
    start_px: f32,
    floor_px: f32,
) -> Result<FitOutcome> {
    let Some(client) = doc.client_width(node) else {
        bail!("no layout box for node {node:?}");
    };
    if client <= 0.0 {
        log::warn!("node {node:?} has no visible width; skipping fit for group {group:?}");
        return Ok(FitOutcome {
            font_px: start_px,
            fits: false,
            measurements: 0,
        });
    }

    let mut size = start_px;
    let mut measurements = 0u32;
    loop {
        let Some(scroll) = doc.scroll_width(node) else {
            bail!("lost layout box for node {node:?}");
        };
        measurements += 1;
        if scroll <= client {
            return Ok(FitOutcome {
                font_px: size,
                fits: true,
                measurements,
            });
        }
        let next = next_candidate(size);
        if next < floor_px {
            return Ok(FitOutcome {
                font_px: size,
                fits: false,
                measurements,
            });
        }
        size = next;
        rules.set_declarations(
            &mut *doc,
            group,
            &[Declaration::new("font-size", &format!("{size}px"))],
        )?;
    }
}

/// Next candidate below `size`: fractional sizes first snap down to their
/// integer floor, then the search proceeds in whole-pixel steps.
fn next_candidate(size: f32) -> f32 {
    if size.fract() > 0.0 {
        size.floor()
    } else {
        size - 1.0
    }
}
