//! Ordered registry of open dialogs, bottom to top.
//!
//! # Invariants
//!
//! - A dialog element appears at most once.
//! - Entry count equals the number of open dialogs.
//! - Level `L` (1-based from the bottom) owns z-indices `base + 2L - 1`
//!   (backdrop) and `base + 2L` (dialog).

use std::rc::Weak;

use kuchiki::{Node, NodeRef};

use super::portal::Relocation;
use crate::page::style;

/// State that exists only while a dialog is open.
#[derive(Debug, Default)]
pub(crate) struct Session {
    pub backdrop: Option<NodeRef>,
    pub relocation: Option<Relocation>,
    pub opener: Option<Weak<Node>>,
    /// `None` means the panel had no `tabindex` before opening.
    pub saved_tabindex: Option<String>,
}

#[derive(Debug)]
pub(crate) struct OpenDialog {
    pub element: NodeRef,
    pub panel: NodeRef,
    pub session: Session,
}

#[derive(Debug, Default)]
pub struct DialogStack {
    entries: Vec<OpenDialog>,
}

impl DialogStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, element: &NodeRef) -> bool {
        self.position(element).is_some()
    }

    pub fn top(&self) -> Option<&NodeRef> {
        self.entries.last().map(|entry| &entry.element)
    }

    pub fn elements(&self) -> impl Iterator<Item = &NodeRef> {
        self.entries.iter().map(|entry| &entry.element)
    }

    fn position(&self, element: &NodeRef) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|entry| &entry.element == element)
    }

    pub(crate) fn top_entry(&self) -> Option<&OpenDialog> {
        self.entries.last()
    }

    pub(crate) fn get_mut(&mut self, element: &NodeRef) -> Option<&mut OpenDialog> {
        let index = self.position(element)?;
        self.entries.get_mut(index)
    }

    /// Pushes a new entry and returns its 1-based level. Refuses duplicates.
    pub(crate) fn push(&mut self, entry: OpenDialog) -> Option<usize> {
        if self.contains(&entry.element) {
            return None;
        }
        self.entries.push(entry);
        Some(self.entries.len())
    }

    /// Removes a dialog from any position.
    pub(crate) fn remove(&mut self, element: &NodeRef) -> Option<OpenDialog> {
        let index = self.position(element)?;
        Some(self.entries.remove(index))
    }

    /// Dialog whose session owns `backdrop`.
    pub fn owner_of_backdrop(&self, backdrop: &NodeRef) -> Option<&NodeRef> {
        self.entries
            .iter()
            .find(|entry| entry.session.backdrop.as_ref() == Some(backdrop))
            .map(|entry| &entry.element)
    }

    /// Rewrites z-indices so each entry matches its current level.
    pub(crate) fn restack(&self, base: u32) {
        for (index, entry) in self.entries.iter().enumerate() {
            apply_level(entry, index + 1, base);
        }
    }
}

/// `(backdrop, dialog)` z-indices for a 1-based level. Saturates at
/// `u32::MAX` with the backdrop still one below its dialog.
pub fn z_for_level(base: u32, level: usize) -> (u32, u32) {
    let level = u32::try_from(level).unwrap_or(u32::MAX);
    let dialog = base.saturating_add(level.saturating_mul(2));
    (dialog.saturating_sub(1), dialog)
}

pub(crate) fn apply_level(entry: &OpenDialog, level: usize, base: u32) {
    let (backdrop_z, dialog_z) = z_for_level(base, level);
    if let Some(backdrop) = entry.session.backdrop.as_ref() {
        style::set_property(backdrop, "z-index", &backdrop_z.to_string());
    }
    style::set_property(&entry.element, "z-index", &dialog_z.to_string());
}
