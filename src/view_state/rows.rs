//! Row generation for the ref list.
//!
//! [`generate_rows`] is a pure function of the groups, their expanded flags
//! and a [`RowSource`] snapshot of repository data. The row list is always
//! rebuilt wholesale; nothing patches it in place.

use crate::model::{detached_head_display_value, Branch, Head, Oid, Tag};
use crate::repo::Loadable;

/// Text shown in place of a group's members while they load.
pub const LOADING_TEXT: &str = "   Loading...";

const HEADER_INDENT: &str = "  ";
const MEMBER_INDENT: &str = "   ";

/// Which kind of reference a group holds. Selects the member rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Branch,
    Tag,
}

/// A named, independently collapsible collection of references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefGroup {
    pub name: &'static str,
    pub expanded: bool,
    pub kind: GroupKind,
}

impl RefGroup {
    pub fn expand_glyph(&self) -> char {
        if self.expanded {
            '-'
        } else {
            '+'
        }
    }
}

/// The fixed startup groups: Branches (expanded) then Tags (collapsed).
pub fn default_groups() -> Vec<RefGroup> {
    vec![
        RefGroup {
            name: "Branches",
            expanded: true,
            kind: GroupKind::Branch,
        },
        RefGroup {
            name: "Tags",
            expanded: false,
            kind: GroupKind::Tag,
        },
    ]
}

/// One line of the flattened ref list.
///
/// `group` fields are indices into the group slice the rows were generated
/// from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    GroupHeader {
        group: usize,
        kind: GroupKind,
        text: String,
    },
    Leaf {
        group: usize,
        kind: GroupKind,
        text: String,
        oid: Oid,
        /// 1-based position within the group.
        ordinal: usize,
    },
    Loading {
        group: usize,
    },
    Spacer,
}

/// Presentation category of a row, used for theming and footers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    BranchGroup,
    Branch,
    TagGroup,
    Tag,
    Loading,
    Spacer,
}

impl Row {
    pub fn text(&self) -> &str {
        match self {
            Row::GroupHeader { text, .. } | Row::Leaf { text, .. } => text,
            Row::Loading { .. } => LOADING_TEXT,
            Row::Spacer => "",
        }
    }

    /// The cursor may rest only on headers and leaves.
    pub fn is_selectable(&self) -> bool {
        matches!(self, Row::GroupHeader { .. } | Row::Leaf { .. })
    }

    pub fn kind(&self) -> RowKind {
        match self {
            Row::GroupHeader {
                kind: GroupKind::Branch,
                ..
            } => RowKind::BranchGroup,
            Row::GroupHeader {
                kind: GroupKind::Tag,
                ..
            } => RowKind::TagGroup,
            Row::Leaf {
                kind: GroupKind::Branch,
                ..
            } => RowKind::Branch,
            Row::Leaf {
                kind: GroupKind::Tag,
                ..
            } => RowKind::Tag,
            Row::Loading { .. } => RowKind::Loading,
            Row::Spacer => RowKind::Spacer,
        }
    }

    /// Leaf name with the indentation stripped, as handed to listeners.
    pub fn display_name(&self) -> &str {
        self.text().trim_start_matches(' ')
    }
}

/// Snapshot of the repository data rows are generated from.
#[derive(Debug, Clone, Copy)]
pub struct RowSource<'a> {
    pub head: Option<&'a Head>,
    pub branches: &'a Loadable<Vec<Branch>>,
    pub tags: &'a Loadable<Vec<Tag>>,
}

/// Flatten groups into rows.
///
/// Every group yields a header; expanded groups yield their members; every
/// group but the last is followed by a spacer.
pub fn generate_rows(groups: &[RefGroup], source: &RowSource<'_>) -> Vec<Row> {
    let mut rows = Vec::new();

    for (index, group) in groups.iter().enumerate() {
        rows.push(Row::GroupHeader {
            group: index,
            kind: group.kind,
            text: format!("{HEADER_INDENT}[{}] {}", group.expand_glyph(), group.name),
        });

        if group.expanded {
            match group.kind {
                GroupKind::Branch => push_branch_rows(index, source, &mut rows),
                GroupKind::Tag => push_tag_rows(index, source, &mut rows),
            }
        }

        if index + 1 != groups.len() {
            rows.push(Row::Spacer);
        }
    }

    rows
}

fn push_branch_rows(group: usize, source: &RowSource<'_>, rows: &mut Vec<Row>) {
    if source.branches.loading {
        rows.push(Row::Loading { group });
        return;
    }

    let mut ordinal = 1;

    if let Some(head) = source.head.filter(|head| head.is_detached()) {
        rows.push(Row::Leaf {
            group,
            kind: GroupKind::Branch,
            text: format!("{MEMBER_INDENT}{}", detached_head_display_value(&head.oid)),
            oid: head.oid.clone(),
            ordinal,
        });
        ordinal += 1;
    }

    for branch in &source.branches.value {
        rows.push(Row::Leaf {
            group,
            kind: GroupKind::Branch,
            text: format!("{MEMBER_INDENT}{}", branch.name),
            oid: branch.oid.clone(),
            ordinal,
        });
        ordinal += 1;
    }
}

fn push_tag_rows(group: usize, source: &RowSource<'_>, rows: &mut Vec<Row>) {
    if source.tags.loading {
        rows.push(Row::Loading { group });
        return;
    }

    rows.extend(source.tags.value.iter().enumerate().map(|(position, tag)| Row::Leaf {
        group,
        kind: GroupKind::Tag,
        text: format!("{MEMBER_INDENT}{}", tag.name),
        oid: tag.oid.clone(),
        ordinal: position + 1,
    }));
}

/// Number of leaf rows the branch group shows when expanded, counting the
/// detached HEAD row.
pub fn branch_row_count(head: Option<&Head>, branches: &[Branch]) -> usize {
    let detached = head.is_some_and(Head::is_detached);
    branches.len() + usize::from(detached)
}

/// Row index of the checked out branch (or the detached HEAD row).
///
/// Counted from the branch group's header: header index + 1 + position in
/// the branch list. `None` if the branch group is collapsed or still
/// loading, or if HEAD's branch is not among the loaded branches.
pub fn head_row_index(rows: &[Row], head: Option<&Head>, branches: &[Branch]) -> Option<usize> {
    let header = rows.iter().position(|row| {
        matches!(
            row,
            Row::GroupHeader {
                kind: GroupKind::Branch,
                ..
            }
        )
    })?;
    let first_member = header + 1;
    if !matches!(rows.get(first_member), Some(Row::Leaf { .. })) {
        return None;
    }

    let position = match head.and_then(|head| head.branch.as_ref()) {
        Some(current) => branches
            .iter()
            .position(|branch| branch.name == current.name)?,
        // Detached HEAD is the synthetic first row; unknown HEAD defaults
        // to the first member as well.
        None => 0,
    };

    let index = first_member + position;
    rows.get(index).filter(|row| row.is_selectable())?;
    Some(index)
}

#[cfg(test)]
#[path = "rows_tests.rs"]
mod tests;
