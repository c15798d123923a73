use crate::core::{
    events::{TreeEvent, UserPrompt},
    node::NodeId,
    tree::FilterTree,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Label,
    /// Checkbox cell, only present in select mode.
    Visibility,
}

/// An addressable position in the view: a row (node) and a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub node: NodeId,
    pub column: Column,
}

impl Cell {
    #[must_use]
    pub const fn label(node: NodeId) -> Self {
        Self {
            node,
            column: Column::Label,
        }
    }

    #[must_use]
    pub const fn checkbox(node: NodeId) -> Self {
        Self {
            node,
            column: Column::Visibility,
        }
    }
}

/// Which context menu a right click opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMenu {
    /// Rename / remove / clone fave.
    Fave,
    /// Add fave.
    Filter,
    /// Create subfolder / rename folder, acting on the given folder.
    FaveFolder(NodeId),
}

impl FilterTree {
    /* =============================== Cursor ================================ */

    #[must_use]
    pub fn current(&self) -> Option<Cell> {
        self.current
    }

    pub fn set_current(&mut self, cell: Cell) {
        self.current = self.cell_node(cell).map(|_| cell);
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Row node behind a cell, whichever column it is. `None` for dead nodes
    /// and for checkbox cells of rows without a checkbox.
    #[must_use]
    pub fn cell_node(&self, cell: Cell) -> Option<NodeId> {
        let node = self.nodes.get(cell.node)?;
        match cell.column {
            Column::Label => Some(cell.node),
            Column::Visibility => node.check.map(|_| cell.node),
        }
    }

    fn item_at(&self, cell: Cell) -> Option<NodeId> {
        self.cell_node(cell).filter(|id| self.get(*id).is_filter())
    }

    fn folder_at(&self, cell: Cell) -> Option<NodeId> {
        self.cell_node(cell).filter(|id| self.get(*id).is_folder())
    }

    /* =============================== Queries =============================== */

    /// Selected filter or fave leaf.
    #[must_use]
    pub fn selected_item(&self) -> Option<NodeId> {
        self.current.and_then(|c| self.item_at(c))
    }

    #[must_use]
    pub fn selected_folder(&self) -> Option<NodeId> {
        self.current.and_then(|c| self.folder_at(c))
    }

    #[must_use]
    pub fn selected_filter_hash(&self) -> Option<String> {
        self.selected_item()
            .and_then(|id| self.get(id).hash().map(str::to_string))
    }

    #[must_use]
    pub fn a_fave_is_selected(&self) -> bool {
        self.selected_item().is_some_and(|id| self.get(id).is_fave())
    }

    /// Puts the cursor on the fave with `hash` and opens its folders. Does
    /// nothing while the model is disabled.
    pub fn select_fave(&mut self, hash: &str) -> bool {
        if !self.model_enabled {
            return false;
        }
        let Some(fave) = self.find_fave(hash) else {
            return false;
        };
        self.expand_ancestors(fave);
        self.current = Some(Cell::label(fave));
        true
    }

    pub fn select_actual_filter<S: AsRef<str>>(&mut self, hash: &str, path: &[S]) -> bool {
        let Some(folder) = self.folder_from_path(path) else {
            return false;
        };
        let found = self
            .get(folder)
            .children
            .iter()
            .copied()
            .find(|c| self.get(*c).is_filter() && self.get(*c).hash() == Some(hash));
        match found {
            Some(id) => {
                self.expand_ancestors(id);
                self.current = Some(Cell::label(id));
                true
            }
            None => false,
        }
    }

    /* ============================ Event translation ======================== */

    /// A click selects a leaf's hash; anything else clears the selection.
    pub fn on_item_clicked(&mut self, cell: Cell) {
        self.set_current(cell);
        let hash = self
            .item_at(cell)
            .and_then(|id| self.get(id).hash().map(str::to_string))
            .unwrap_or_default();
        self.emit(TreeEvent::FilterSelected(hash));
    }

    /// Return on a leaf selects it; on a folder label it toggles expansion.
    pub fn on_return_key_pressed(&mut self) {
        if let Some(hash) = self.selected_filter_hash() {
            self.emit(TreeEvent::FilterSelected(hash));
            return;
        }
        if let Some(cell) = self.current
            && cell.column == Column::Label
            && self.folder_at(cell).is_some()
        {
            self.toggle_expanded(cell.node);
        }
        self.emit(TreeEvent::FilterSelected(String::new()));
    }

    /// Delete on a selected fave asks first; a yes requests its removal.
    pub fn on_key_delete(&mut self, prompt: &mut dyn UserPrompt) -> bool {
        let Some(id) = self.selected_item() else {
            return false;
        };
        let node = self.get(id);
        if !node.is_fave() {
            return false;
        }
        let text = format!(
            "Do you really want to remove the following fave?\n\n{}\n",
            node.name
        );
        let hash = node.hash().unwrap_or_default().to_string();
        if !prompt.confirm("Remove fave", &text) {
            return false;
        }
        self.emit(TreeEvent::FaveRemovalRequested(hash));
        true
    }

    /// Menu for a right click on `cell`. Leaves also get selected.
    pub fn context_menu_at(&mut self, cell: Cell) -> Option<ContextMenu> {
        if let Some(item) = self.item_at(cell) {
            self.on_item_clicked(cell);
            return Some(if self.get(item).is_fave() {
                ContextMenu::Fave
            } else {
                ContextMenu::Filter
            });
        }
        let folder = self.folder_at(cell)?;
        let node = self.get(folder);
        (node.is_fave_root() || node.is_fave_subfolder()).then_some(ContextMenu::FaveFolder(folder))
    }

    pub fn request_fave_removal(&mut self) -> bool {
        match self.selected_filter_hash() {
            Some(hash) => {
                self.emit(TreeEvent::FaveRemovalRequested(hash));
                true
            }
            None => false,
        }
    }

    /// "Add fave" on a filter, "Clone fave" on a fave.
    pub fn request_fave_addition(&mut self) -> bool {
        match self.selected_filter_hash() {
            Some(hash) => {
                self.emit(TreeEvent::FaveAdditionRequested(hash));
                true
            }
            None => false,
        }
    }

    pub fn edit_selected_fave_name(&mut self) -> bool {
        match self.selected_item() {
            Some(id) if self.get(id).is_fave() => self.begin_edit(id),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::core::{events::drain_events, store::MemoryVisibilityStore};

    #[test]
    fn checkbox_cell_without_checkbox_is_not_addressable() {
        let (tx, _rx) = mpsc::channel();
        let mut t = FilterTree::new(Box::new(MemoryVisibilityStore::default()), tx);
        let leaf = t.add_filter("Blur", "h1", &["E"], false).expect("leaf");
        assert_eq!(t.cell_node(Cell::checkbox(leaf)), None);
        t.set_current(Cell::checkbox(leaf));
        assert_eq!(t.current(), None);
    }

    #[test]
    fn folder_click_clears_selection() {
        let (tx, rx) = mpsc::channel();
        let mut t = FilterTree::new(Box::new(MemoryVisibilityStore::default()), tx);
        t.add_filter("Blur", "h1", &["E"], false);
        let folder = t.resolve_folder(t.root(), &["E"]).expect("folder");
        t.on_item_clicked(Cell::label(folder));
        assert_eq!(drain_events(&rx), [TreeEvent::FilterSelected(String::new())]);
    }
}
