//! Rule store: at most one live rule per group key.
//!
//! The store owns the stylesheet truth and mirrors every mutation into the
//! host through [`StyleHost`], so N elements sharing a group cost one rule
//! write instead of N inline-style writes. Rule indices are stable for the
//! life of the store; a second write to a group updates its existing rule in
//! place.

use crate::{Declaration, StyleRule, Stylesheet};
use anyhow::{Context as _, Result};
use std::collections::HashMap;
use textfit_dom::{StyleHost, StyleUpdate};

/// Id of the style container the store installs into the host document.
pub const CONTAINER_ID: &str = "textfit-styles";

#[derive(Debug)]
pub struct RuleStore {
    sheet: Stylesheet,
    index_by_group: HashMap<String, usize>,
}

impl RuleStore {
    /// Install the owned style container into the host and return the store.
    /// A host that cannot take the container is a fatal initialization error.
    pub fn install(host: &mut dyn StyleHost) -> Result<Self> {
        host.apply_style(StyleUpdate::InstallContainer {
            id: CONTAINER_ID.to_string(),
        })
        .context("installing owned style container")?;
        log::info!("installed style container #{CONTAINER_ID}");
        Ok(Self {
            sheet: Stylesheet::default(),
            index_by_group: HashMap::new(),
        })
    }

    /// Create or update the rule for `group`. Only the named declarations are
    /// touched; other declarations on an existing rule are left as they are.
    pub fn set_declarations(
        &mut self,
        host: &mut dyn StyleHost,
        group: &str,
        declarations: &[Declaration],
    ) -> Result<()> {
        let index = match self.index_by_group.get(group) {
            Some(&index) => index,
            None => {
                let index = self.sheet.rules.len();
                self.sheet.rules.push(StyleRule {
                    selector: group.to_string(),
                    declarations: Vec::new(),
                });
                self.index_by_group.insert(group.to_string(), index);
                host.apply_style(StyleUpdate::InsertRule {
                    index,
                    selector: group.to_string(),
                })
                .with_context(|| format!("inserting rule for group {group:?}"))?;
                index
            }
        };
        let rule = &mut self.sheet.rules[index];
        for declaration in declarations {
            match rule
                .declarations
                .iter_mut()
                .find(|existing| existing.name == declaration.name)
            {
                Some(existing) => existing.value = declaration.value.clone(),
                None => rule.declarations.push(declaration.clone()),
            }
            host.apply_style(StyleUpdate::SetProperty {
                index,
                name: declaration.name.clone(),
                value: declaration.value.clone(),
            })
            .with_context(|| format!("setting {declaration} on group {group:?}"))?;
        }
        Ok(())
    }

    /// Remove the named declarations from the group's rule. A group without a
    /// rule is silently a no-op.
    pub fn clear_declarations(
        &mut self,
        host: &mut dyn StyleHost,
        group: &str,
        names: &[&str],
    ) -> Result<()> {
        let Some(&index) = self.index_by_group.get(group) else {
            log::debug!("clear on group {group:?} with no rule; ignoring");
            return Ok(());
        };
        let rule = &mut self.sheet.rules[index];
        for &name in names {
            rule.declarations.retain(|declaration| declaration.name != name);
            host.apply_style(StyleUpdate::RemoveProperty {
                index,
                name: name.to_string(),
            })
            .with_context(|| format!("removing {name:?} from group {group:?}"))?;
        }
        Ok(())
    }

    /// Index of the group's rule, if one has been created.
    pub fn rule_index(&self, group: &str) -> Option<usize> {
        self.index_by_group.get(group).copied()
    }

    pub fn rule_count(&self) -> usize {
        self.sheet.rules.len()
    }

    pub fn sheet(&self) -> &Stylesheet {
        &self.sheet
    }
}
