use std::{cmp::Ordering, sync::mpsc};

use slotmap::SlotMap;

use crate::core::{
    events::TreeEvent,
    node::{CheckState, Node, NodeId, NodeKind, remove_warning_prefix},
    options::TreeOptions,
    selection::Cell,
    store::VisibilityStore,
};

/// In-memory filter tree: a main hierarchy of folders and filters plus an
/// optional "Faves" folder, with an optional checkbox column in select mode.
pub struct FilterTree {
    pub(super) nodes: SlotMap<NodeId, Node>,
    pub(super) root: NodeId,
    pub(super) fave_root: Option<NodeId>,
    /// Last main-tree path resolved by `folder_from_path`.
    pub(super) cached_folder: Option<(Vec<String>, NodeId)>,
    pub(super) selection_mode: bool,
    pub(super) model_enabled: bool,
    pub(super) header: String,
    pub(super) current: Option<Cell>,
    /// Node being edited in place and its text before editing.
    pub(super) editing: Option<(NodeId, String)>,
    pub(super) expanded_folder_paths: Vec<String>,
    pub(super) visibility: Box<dyn VisibilityStore>,
    pub(super) events: mpsc::Sender<TreeEvent>,
    pub(super) options: TreeOptions,
}

impl std::fmt::Debug for FilterTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterTree")
            .field("nodes", &self.nodes.len())
            .field("fave_root", &self.fave_root)
            .field("selection_mode", &self.selection_mode)
            .field("model_enabled", &self.model_enabled)
            .finish_non_exhaustive()
    }
}

impl FilterTree {
    pub fn new(visibility: Box<dyn VisibilityStore>, events: mpsc::Sender<TreeEvent>) -> Self {
        Self::with_options(visibility, events, TreeOptions::default())
    }

    pub fn with_options(
        visibility: Box<dyn VisibilityStore>,
        events: mpsc::Sender<TreeEvent>,
        options: TreeOptions,
    ) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::root());
        Self {
            nodes,
            root,
            fave_root: None,
            cached_folder: None,
            selection_mode: false,
            model_enabled: false,
            header: String::new(),
            current: None,
            editing: None,
            expanded_folder_paths: Vec::new(),
            visibility,
            events,
            options,
        }
    }

    /* ============================== Accessors ============================== */

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn fave_root(&self) -> Option<NodeId> {
        self.fave_root
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Children of `id`; empty for dead handles and leaves.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Number of live nodes, the synthetic root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.get(self.root).children.is_empty()
    }

    #[must_use]
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: TreeOptions) {
        self.options = options;
    }

    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn set_header(&mut self, header: &str) {
        self.header = header.to_string();
    }

    /// Column titles: the label column, plus the checkbox column in select mode.
    #[must_use]
    pub fn headers(&self) -> Vec<&str> {
        let mut out = vec![self.header.as_str()];
        if self.selection_mode {
            out.push(self.options.visibility_header.as_str());
        }
        out
    }

    #[must_use]
    pub fn visibility_store(&self) -> &dyn VisibilityStore {
        self.visibility.as_ref()
    }

    pub fn visibility_store_mut(&mut self) -> &mut dyn VisibilityStore {
        self.visibility.as_mut()
    }

    /// Folder names from the top level down to `id` (inclusive). Fave
    /// subfolders start with the fave root's name.
    #[must_use]
    pub fn path_of(&self, id: NodeId) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let Some(node) = self.nodes.get(cur) else {
                break;
            };
            if matches!(node.kind, NodeKind::Root) {
                break;
            }
            segments.push(node.name.clone());
            current = node.parent;
        }
        segments.reverse();
        segments
    }

    /// Path of `id` relative to the fave root, or `None` outside the faves.
    #[must_use]
    pub fn fave_path_of(&self, id: NodeId) -> Option<Vec<String>> {
        let fave_root = self.fave_root?;
        let mut segments = Vec::new();
        let mut current = id;
        while current != fave_root {
            let node = self.nodes.get(current)?;
            segments.push(node.name.clone());
            current = node.parent?;
        }
        segments.reverse();
        Some(segments)
    }

    /// First filter leaf with `hash` in the main tree (faves excluded).
    #[must_use]
    pub fn find_filter(&self, hash: &str) -> Option<NodeId> {
        self.find_filter_in(self.root, hash, true)
    }

    /// Hashes of every filter leaf below `id`, in tree order.
    #[must_use]
    pub fn descendant_hashes(&self, id: NodeId) -> Vec<String> {
        let mut out = Vec::new();
        self.walk(id, &mut |_, node| {
            if let Some(hash) = node.hash() {
                out.push(hash.to_string());
            }
        });
        out
    }

    /* =========================== Arena plumbing ============================ */

    /// Panics on dead handles: passing one is a caller bug.
    pub(super) fn get(&self, id: NodeId) -> &Node {
        self.nodes
            .get(id)
            .unwrap_or_else(|| panic!("FilterTree: dead node handle {id:?}"))
    }

    pub(super) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes
            .get_mut(id)
            .unwrap_or_else(|| panic!("FilterTree: dead node handle {id:?}"))
    }

    pub(super) fn append_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        assert!(
            self.get(parent).is_container(),
            "FilterTree: append into non-folder parent"
        );
        node.parent = Some(parent);
        let id = self.nodes.insert(node);
        self.get_mut(parent).children.push(id);
        id
    }

    /// Detaches `id` from its parent and frees its whole subtree.
    pub(super) fn remove_subtree(&mut self, id: NodeId) {
        if let Some(parent) = self.get(id).parent {
            self.get_mut(parent).children.retain(|c| *c != id);
        }
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes.remove(cur) {
                stack.extend(node.children);
            }
        }
        if self.current.is_some_and(|c| !self.nodes.contains_key(c.node)) {
            self.current = None;
        }
        if self.editing.as_ref().is_some_and(|(e, _)| !self.nodes.contains_key(*e)) {
            self.editing = None;
        }
    }

    /// Pre-order walk below `id` (excluding `id`).
    pub(super) fn walk<F: FnMut(NodeId, &Node)>(&self, id: NodeId, f: &mut F) {
        for &child in &self.get(id).children {
            f(child, self.get(child));
            self.walk(child, f);
        }
    }

    pub(super) fn emit(&self, event: TreeEvent) {
        if let Err(e) = self.events.send(event) {
            log::warn!("tree event dropped, no receiver: {:?}", e.0);
        }
    }

    fn find_filter_in(&self, id: NodeId, hash: &str, skip_faves: bool) -> Option<NodeId> {
        for &child in &self.get(id).children {
            let node = self.get(child);
            if skip_faves && node.is_fave_root() {
                continue;
            }
            if node.hash() == Some(hash) {
                return Some(child);
            }
            if node.is_folder()
                && let Some(found) = self.find_filter_in(child, hash, skip_faves)
            {
                return Some(found);
            }
        }
        None
    }

    /* =========================== Path resolution =========================== */

    fn child_folder_named(&self, parent: NodeId, segment: &str) -> Option<NodeId> {
        let wanted = remove_warning_prefix(segment);
        self.get(parent)
            .children
            .iter()
            .copied()
            .find(|&c| {
                let node = self.get(c);
                node.is_folder() && node.name == wanted
            })
    }

    /// Walks `path` from `root`, creating missing folders. An empty path
    /// yields `root`.
    pub fn resolve_or_create_folder<S: AsRef<str>>(&mut self, root: NodeId, path: &[S]) -> NodeId {
        assert!(
            self.get(root).is_container(),
            "FilterTree: create folder path in non-folder parent"
        );
        let mut current = root;
        for segment in path {
            let segment = segment.as_ref();
            current = match self.child_folder_named(current, segment) {
                Some(existing) => existing,
                None => self.append_folder(current, segment),
            };
        }
        current
    }

    /// Read-only variant of [`Self::resolve_or_create_folder`].
    #[must_use]
    pub fn resolve_folder<S: AsRef<str>>(&self, root: NodeId, path: &[S]) -> Option<NodeId> {
        assert!(
            self.get(root).is_container(),
            "FilterTree: get folder path from non-folder parent"
        );
        let mut current = root;
        for segment in path {
            current = self.child_folder_named(current, segment.as_ref())?;
        }
        Some(current)
    }

    /// Main-tree lookup memoized on the last path asked for.
    pub fn folder_from_path<S: AsRef<str>>(&mut self, path: &[S]) -> Option<NodeId> {
        if let Some((cached_path, id)) = &self.cached_folder
            && same_path(cached_path, path)
        {
            if self.nodes.contains_key(*id) {
                return Some(*id);
            }
            log::debug!("folder cache held a removed node, recomputing");
        }
        let found = self.resolve_folder(self.root, path);
        self.cached_folder = found.map(|id| (owned_path(path), id));
        found
    }

    fn append_folder(&mut self, parent: NodeId, raw_name: &str) -> NodeId {
        let parent_node = self.get(parent);
        let in_faves = parent_node.is_fave_root() || parent_node.is_fave_subfolder();
        let mut folder = Node::folder(raw_name);
        if in_faves {
            folder.kind = NodeKind::Folder {
                fave_root: false,
                fave_subfolder: true,
            };
            folder.editable = true;
        }
        if self.selection_mode {
            folder.check = Some(CheckState::Checked);
        }
        log::debug!("creating folder {raw_name:?}");
        let id = self.append_child(parent, folder);
        if in_faves {
            self.update_null_item(parent);
        }
        if self.selection_mode {
            self.refresh_ancestor_checks(Some(parent));
        }
        id
    }

    /* =============================== Insertion ============================= */

    pub fn create_folder<S: AsRef<str>>(&mut self, path: &[S]) -> NodeId {
        self.resolve_or_create_folder(self.root, path)
    }

    /// Adds a filter under `path`. Browse mode skips hidden filters; select
    /// mode adds everything with a checkbox mirroring the stored visibility.
    pub fn add_filter<S: AsRef<str>>(
        &mut self,
        name: &str,
        hash: &str,
        path: &[S],
        warning: bool,
    ) -> Option<NodeId> {
        let visible = self.visibility.is_visible(hash);
        if !self.selection_mode && !visible {
            return None;
        }
        let folder = match self.folder_from_path(path) {
            Some(f) => f,
            None => {
                let created = self.resolve_or_create_folder(self.root, path);
                self.cached_folder = Some((owned_path(path), created));
                created
            }
        };
        let leaf = Node::filter(name, hash, warning, false);
        Some(self.append_leaf(folder, leaf, visible))
    }

    pub(super) fn append_leaf(&mut self, folder: NodeId, mut leaf: Node, visible: bool) -> NodeId {
        if self.selection_mode {
            leaf.check = Some(CheckState::from_visible(visible));
        }
        let id = self.append_child(folder, leaf);
        if self.selection_mode {
            self.refresh_ancestor_checks(Some(folder));
        }
        id
    }

    /// Drops every entry, faves included. Mode flags and header are kept.
    pub fn clear(&mut self) {
        self.remove_fave_folder();
        let children = std::mem::take(&mut self.get_mut(self.root).children);
        for child in children {
            self.remove_subtree(child);
        }
        self.cached_folder = None;
        self.current = None;
        self.editing = None;
    }

    /* ================================ Sorting ============================== */

    /// Recursively sorts the whole tree. The fave folder stays first.
    pub fn sort(&mut self) {
        self.sort_children(self.root);
    }

    pub fn sort_faves(&mut self) {
        if let Some(fave_root) = self.fave_root {
            self.sort_children(fave_root);
        }
    }

    fn sort_children(&mut self, id: NodeId) {
        let mut children = std::mem::take(&mut self.get_mut(id).children);
        children.sort_by(|a, b| compare_nodes(self.get(*a), self.get(*b)));
        for &child in &children {
            if self.get(child).is_folder() {
                self.sort_children(child);
            }
        }
        self.get_mut(id).children = children;
    }
}

fn sort_rank(node: &Node) -> u8 {
    if node.is_fave_root() {
        0
    } else if node.is_fave_null() {
        2
    } else {
        1
    }
}

fn compare_nodes(a: &Node, b: &Node) -> Ordering {
    sort_rank(a)
        .cmp(&sort_rank(b))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

fn same_path<S: AsRef<str>>(cached: &[String], path: &[S]) -> bool {
    cached.len() == path.len() && cached.iter().zip(path).all(|(a, b)| a == b.as_ref())
}

fn owned_path<S: AsRef<str>>(path: &[S]) -> Vec<String> {
    path.iter().map(|s| s.as_ref().to_string()).collect()
}
