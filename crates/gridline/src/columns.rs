//! Column metadata derivation.
//!
//! Columns are derived from the field set of a single sample record. Which
//! columns are sortable, shown, or pinned is decided by an injected
//! [`ColumnPolicy`] rather than by field names baked into the code.
//!
//! The derived list keeps the sample's field order. That order is canonical
//! and is what exports use; [`display_order`] moves fixed columns to the
//! front for the rendered table only.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::record::{Dataset, Record};

/// Display metadata for one record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Record field this column shows.
    pub name: String,
    /// Whether the header offers a sort trigger.
    pub is_sortable: bool,
    /// Whether the column is rendered and exported.
    pub is_shown: bool,
    /// Whether the column is pinned before non-fixed columns.
    pub is_fixed: bool,
}

impl ColumnDescriptor {
    /// A sortable, shown, non-fixed column.
    pub fn new(name: impl Into<String>) -> Self {
        ColumnDescriptor {
            name: name.into(),
            is_sortable: true,
            is_shown: true,
            is_fixed: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.is_shown = false;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.is_fixed = true;
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.is_sortable = false;
        self
    }

    /// Header text for this column.
    pub fn header(&self) -> String {
        humanize(&self.name)
    }
}

/// Field-name sets that decide column flags.
///
/// ```
/// use gridline::ColumnPolicy;
///
/// let policy = ColumnPolicy::new()
///     .exclude_sort("body")
///     .hide("email")
///     .fix("id")
///     .fix("postId");
/// assert!(policy.hidden_fields.contains("email"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnPolicy {
    /// Fields whose columns cannot be sorted.
    pub sortable_excludes: BTreeSet<String>,
    /// Fields whose columns are hidden.
    pub hidden_fields: BTreeSet<String>,
    /// Fields whose columns are pinned first.
    pub fixed_fields: BTreeSet<String>,
}

impl ColumnPolicy {
    /// A policy where every column is sortable, shown, and unpinned.
    pub fn new() -> Self {
        ColumnPolicy::default()
    }

    pub fn exclude_sort(mut self, field: impl Into<String>) -> Self {
        self.sortable_excludes.insert(field.into());
        self
    }

    pub fn hide(mut self, field: impl Into<String>) -> Self {
        self.hidden_fields.insert(field.into());
        self
    }

    pub fn fix(mut self, field: impl Into<String>) -> Self {
        self.fixed_fields.insert(field.into());
        self
    }

    /// Builds one descriptor per field of `sample`, in field order.
    pub fn derive_columns(&self, sample: &Record) -> Vec<ColumnDescriptor> {
        sample
            .field_names()
            .map(|name| ColumnDescriptor {
                name: name.to_string(),
                is_sortable: !self.sortable_excludes.contains(name),
                is_shown: !self.hidden_fields.contains(name),
                is_fixed: self.fixed_fields.contains(name),
            })
            .collect()
    }

    /// Derives columns from the first record. An empty dataset has none.
    pub fn derive_for(&self, dataset: &Dataset) -> Vec<ColumnDescriptor> {
        dataset
            .sample()
            .map(|sample| self.derive_columns(sample))
            .unwrap_or_default()
    }
}

/// Shown columns in display order: fixed columns first, stable otherwise.
pub fn display_order(columns: &[ColumnDescriptor]) -> Vec<&ColumnDescriptor> {
    let mut shown = shown_columns(columns);
    shown.sort_by_key(|c| !c.is_fixed);
    shown
}

/// Shown columns in canonical order.
pub fn shown_columns(columns: &[ColumnDescriptor]) -> Vec<&ColumnDescriptor> {
    columns.iter().filter(|c| c.is_shown).collect()
}

/// Turns a camelCase field name into header text.
///
/// A space goes before every uppercase ASCII letter after the first
/// character, and the first character is uppercased.
///
/// ```
/// use gridline::humanize;
///
/// assert_eq!(humanize("postId"), "Post Id");
/// assert_eq!(humanize("email"), "Email");
/// ```
pub fn humanize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
            continue;
        }
        if ch.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}
