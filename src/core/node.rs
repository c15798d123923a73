use slotmap::new_key_type;

new_key_type! {
    /// Handle into the tree's node arena.
    pub struct NodeId;
}

/// Marker prefix flagging a folder (or path segment) as carrying a warning.
pub const WARNING_PREFIX: char = '!';

/// Tri-state checkbox used by select mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Checked,
    Unchecked,
    Partial,
}

impl CheckState {
    #[must_use]
    pub const fn from_visible(visible: bool) -> Self {
        if visible { Self::Checked } else { Self::Unchecked }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Synthetic invisible root owning every top-level entry.
    Root,
    Folder {
        fave_root: bool,
        fave_subfolder: bool,
    },
    Filter {
        hash: String,
        warning: bool,
        fave: bool,
    },
    /// Sentinel keeping an otherwise empty fave subfolder non-empty.
    FaveNull,
}

/// One entry of the arena. `parent` is a lookup-only back reference; the
/// parent owns its `children`.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub expanded: bool,
    pub warning: bool,
    pub editable: bool,
    pub check: Option<CheckState>,
}

impl Node {
    pub(crate) fn root() -> Self {
        Self::with_kind(String::new(), NodeKind::Root)
    }

    pub(crate) fn folder(raw_name: &str) -> Self {
        let (name, warning) = split_warning_prefix(raw_name);
        let mut node = Self::with_kind(
            name.to_string(),
            NodeKind::Folder {
                fave_root: false,
                fave_subfolder: false,
            },
        );
        node.warning = warning;
        node
    }

    pub(crate) fn filter(name: &str, hash: &str, warning: bool, fave: bool) -> Self {
        let mut node = Self::with_kind(
            name.to_string(),
            NodeKind::Filter {
                hash: hash.to_string(),
                warning,
                fave,
            },
        );
        node.warning = warning;
        node.editable = fave;
        node
    }

    pub(crate) fn fave_null() -> Self {
        Self::with_kind(String::new(), NodeKind::FaveNull)
    }

    fn with_kind(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            kind,
            parent: None,
            children: Vec::new(),
            expanded: false,
            warning: false,
            editable: false,
            check: None,
        }
    }

    /// True for the root and for every folder; both can hold children.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Root | NodeKind::Folder { .. })
    }

    #[must_use]
    pub const fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    #[must_use]
    pub const fn is_filter(&self) -> bool {
        matches!(self.kind, NodeKind::Filter { .. })
    }

    #[must_use]
    pub const fn is_fave_null(&self) -> bool {
        matches!(self.kind, NodeKind::FaveNull)
    }

    #[must_use]
    pub const fn is_fave_root(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { fave_root: true, .. })
    }

    #[must_use]
    pub const fn is_fave_subfolder(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Folder {
                fave_subfolder: true,
                ..
            }
        )
    }

    #[must_use]
    pub const fn is_fave(&self) -> bool {
        matches!(self.kind, NodeKind::Filter { fave: true, .. })
    }

    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Filter { hash, .. } => Some(hash),
            _ => None,
        }
    }

    /// Text shown in the label column.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.kind {
            NodeKind::FaveNull => "<empty>",
            _ => &self.name,
        }
    }
}

/// Strips a leading [`WARNING_PREFIX`] and reports whether it was present.
#[must_use]
pub fn split_warning_prefix(text: &str) -> (&str, bool) {
    match text.strip_prefix(WARNING_PREFIX) {
        Some(rest) => (rest, true),
        None => (text, false),
    }
}

#[must_use]
pub fn remove_warning_prefix(text: &str) -> &str {
    split_warning_prefix(text).0
}
