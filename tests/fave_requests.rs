use std::sync::mpsc;

use filtertree::core::*;
use pretty_assertions::assert_eq;

fn tree_with_events() -> (FilterTree, mpsc::Receiver<TreeEvent>) {
    let (tx, rx) = mpsc::channel();
    (
        FilterTree::new(Box::new(MemoryVisibilityStore::default()), tx),
        rx,
    )
}

const NO_PATH: &[&str] = &[];

#[test]
fn create_subfolder_request_uses_unique_name_and_does_not_mutate() {
    let (mut t, rx) = tree_with_events();
    t.create_fave_subfolder(&["New folder"]);
    let fave_root = t.fave_root().expect("root");
    let before = t.len();

    let requested = t.request_fave_subfolder_creation(fave_root);
    assert_eq!(requested.as_deref(), Some("New folder (2)"));
    assert_eq!(t.len(), before);
    assert_eq!(
        drain_events(&rx),
        [TreeEvent::FaveSubfolderCreationRequested("New folder (2)".into())]
    );

    t.add_fave("", "", &split_fave_path("New folder (2)"));
    assert!(t.fave_subfolder_from_path(&["New folder (2)"]).is_some());
}

#[test]
fn create_subfolder_request_inside_subfolder_carries_full_path() {
    let (mut t, rx) = tree_with_events();
    let outer = t.create_fave_subfolder(&["Outer"]);
    assert_eq!(
        t.request_fave_subfolder_creation(outer).as_deref(),
        Some("Outer/New folder")
    );
    assert_eq!(
        drain_events(&rx),
        [TreeEvent::FaveSubfolderCreationRequested("Outer/New folder".into())]
    );
}

#[test]
fn create_subfolder_request_rejects_regular_folders() {
    let (mut t, rx) = tree_with_events();
    t.add_filter("Blur", "h1", &["Effects"], false);
    let effects = t.resolve_folder(t.root(), &["Effects"]).expect("Effects");
    assert_eq!(t.request_fave_subfolder_creation(effects), None);
    assert!(drain_events(&rx).is_empty());
}

#[test]
fn subfolder_rename_carries_old_and_new_names() {
    let (mut t, rx) = tree_with_events();
    let inner = t.create_fave_subfolder(&["Outer", "Inner"]);

    assert!(t.begin_edit(inner));
    assert_eq!(t.text_before_editing(), Some("Inner"));
    assert!(t.finish_rename("Renamed"));
    assert_eq!(
        drain_events(&rx),
        [TreeEvent::FaveSubfolderRenamed {
            path: "Outer/Inner".into(),
            old_name: "Inner".into(),
            new_name: "Renamed".into(),
        }]
    );
    assert_eq!(t.node(inner).map(|n| n.name.as_str()), Some("Inner"));

    assert!(t.rename_fave_subfolder(&["Outer", "Inner"], "Renamed"));
    assert_eq!(t.fave_subfolder_from_path(&["Outer", "Renamed"]), Some(inner));
}

#[test]
fn applied_rename_stays_unique_among_siblings() {
    let (mut t, _rx) = tree_with_events();
    t.create_fave_subfolder(&["A"]);
    let b = t.create_fave_subfolder(&["B"]);
    assert!(t.rename_fave_subfolder(&["B"], "A"));
    assert_eq!(t.node(b).map(|n| n.name.as_str()), Some("A (2)"));
    assert!(!t.rename_fave_subfolder(&["missing"], "x"));
    assert!(!t.rename_fave_subfolder(NO_PATH, "x"), "fave root is not renamable");
}

#[test]
fn fave_rename_emits_hash_and_new_name() {
    let (mut t, rx) = tree_with_events();
    let fave = t.add_fave("Retouch", "f1", NO_PATH).expect("fave");
    t.set_current(Cell::label(fave));
    assert!(t.edit_selected_fave_name());
    assert!(t.finish_rename("Retouch HD"));
    assert_eq!(
        drain_events(&rx),
        [TreeEvent::FaveRenamed {
            hash: "f1".into(),
            new_name: "Retouch HD".into(),
        }]
    );
    t.update_fave_item("f1", "f1", "Retouch HD");
    assert_eq!(t.node(fave).map(|n| n.name.as_str()), Some("Retouch HD"));
}

#[test]
fn unchanged_or_non_editable_edits_emit_nothing() {
    let (mut t, rx) = tree_with_events();
    let leaf = t.add_filter("Blur", "h1", &["Effects"], false).expect("leaf");
    assert!(!t.begin_edit(leaf));
    let fave = t.add_fave("Retouch", "f1", NO_PATH).expect("fave");
    assert!(t.begin_edit(fave));
    assert!(!t.finish_rename("Retouch"));
    assert!(!t.finish_rename("Other"), "edit already finished");
    assert!(drain_events(&rx).is_empty());
}

#[test]
fn delete_key_asks_before_requesting_removal() {
    let (mut t, rx) = tree_with_events();
    let fave = t.add_fave("Retouch", "f1", NO_PATH).expect("fave");
    t.set_current(Cell::label(fave));

    assert!(!t.on_key_delete(&mut FixedAnswer(false)));
    assert!(drain_events(&rx).is_empty());

    assert!(t.on_key_delete(&mut FixedAnswer(true)));
    assert_eq!(
        drain_events(&rx),
        [TreeEvent::FaveRemovalRequested("f1".into())]
    );
    assert!(t.find_fave("f1").is_some(), "removal is driven by the controller");
}

#[test]
fn delete_key_ignores_plain_filters() {
    let (mut t, rx) = tree_with_events();
    let leaf = t.add_filter("Blur", "h1", &["Effects"], false).expect("leaf");
    t.set_current(Cell::label(leaf));
    assert!(!t.on_key_delete(&mut FixedAnswer(true)));
    assert!(drain_events(&rx).is_empty());
}

#[test]
fn context_menus_match_the_clicked_entry() {
    let (mut t, rx) = tree_with_events();
    let leaf = t.add_filter("Blur", "h1", &["Effects"], false).expect("leaf");
    let fave = t.add_fave("Retouch", "f1", &["P"]).expect("fave");
    let effects = t.resolve_folder(t.root(), &["Effects"]).expect("Effects");
    let p = t.fave_subfolder_from_path(&["P"]).expect("P");
    let fave_root = t.fave_root().expect("root");

    assert_eq!(t.context_menu_at(Cell::label(leaf)), Some(ContextMenu::Filter));
    assert!(t.request_fave_addition());
    assert_eq!(t.context_menu_at(Cell::label(fave)), Some(ContextMenu::Fave));
    assert!(t.request_fave_removal());
    assert_eq!(t.context_menu_at(Cell::label(effects)), None);
    assert_eq!(
        t.context_menu_at(Cell::label(p)),
        Some(ContextMenu::FaveFolder(p))
    );
    assert_eq!(
        t.context_menu_at(Cell::label(fave_root)),
        Some(ContextMenu::FaveFolder(fave_root))
    );

    assert_eq!(
        drain_events(&rx),
        [
            TreeEvent::FilterSelected("h1".into()),
            TreeEvent::FaveAdditionRequested("h1".into()),
            TreeEvent::FilterSelected("f1".into()),
            TreeEvent::FaveRemovalRequested("f1".into()),
        ]
    );
}

#[test]
fn checkbox_cell_and_label_cell_resolve_to_same_entry() {
    let (mut t, rx) = tree_with_events();
    t.enable_selection_mode();
    let leaf = t.add_filter("Blur", "h1", &["Effects"], false).expect("leaf");
    let effects = t.resolve_folder(t.root(), &["Effects"]).expect("Effects");

    t.set_current(Cell::checkbox(leaf));
    assert_eq!(t.selected_item(), Some(leaf));
    assert_eq!(t.selected_filter_hash().as_deref(), Some("h1"));
    assert!(!t.a_fave_is_selected());

    t.set_current(Cell::checkbox(effects));
    assert_eq!(t.selected_folder(), Some(effects));
    assert_eq!(t.selected_item(), None);

    t.on_item_clicked(Cell::checkbox(leaf));
    assert_eq!(drain_events(&rx), [TreeEvent::FilterSelected("h1".into())]);
}

#[test]
fn select_fave_needs_an_enabled_model_and_opens_folders() {
    let (mut t, _rx) = tree_with_events();
    let fave = t.add_fave("Retouch", "f1", &["P", "Q"]).expect("fave");
    assert!(!t.select_fave("f1"));
    t.enable_model();
    assert!(t.select_fave("f1"));
    assert_eq!(t.selected_item(), Some(fave));
    assert!(t.a_fave_is_selected());
    let q = t.fave_subfolder_from_path(&["P", "Q"]).expect("Q");
    assert!(t.is_expanded(q));
    assert!(t.is_expanded(t.fave_root().expect("root")));
}

#[test]
fn select_actual_filter_finds_leaf_by_path_and_hash() {
    let (mut t, _rx) = tree_with_events();
    t.add_filter("Blur", "h1", &["Effects"], false);
    let sharpen = t.add_filter("Sharpen", "h2", &["Effects"], false).expect("leaf");
    let effects = t.resolve_folder(t.root(), &["Effects"]).expect("Effects");
    assert!(!t.is_expanded(effects));
    assert!(t.select_actual_filter("h2", &["Effects"]));
    assert_eq!(t.selected_item(), Some(sharpen));
    assert!(t.is_expanded(effects));
    assert!(!t.select_actual_filter("h2", &["Other"]));
}

#[test]
fn removal_of_selected_fave_clears_cursor() {
    let (mut t, _rx) = tree_with_events();
    let fave = t.add_fave("Retouch", "f1", NO_PATH).expect("fave");
    t.set_current(Cell::label(fave));
    t.remove_fave("f1");
    assert_eq!(t.current(), None);
}

#[test]
fn renamed_subfolder_with_warning_marker_stays_addressable() {
    let (mut t, _rx) = tree_with_events();
    let folder = t.create_fave_subfolder(&["Old"]);
    assert!(t.rename_fave_subfolder(&["Old"], "!New"));
    let node = t.node(folder).expect("live");
    assert_eq!(node.name, "New");
    assert!(node.warning);

    assert_eq!(t.fave_subfolder_from_path(&["!New"]), Some(folder));
    assert_eq!(t.fave_subfolder_from_path(&["New"]), Some(folder));
    t.add_fave("x", "f1", &["!New"]).expect("fave");
    let fave_root = t.fave_root().expect("root");
    assert_eq!(t.children(fave_root), [folder]);
    assert!(!t.rename_fave_subfolder(&["New"], "!"), "marker alone is no name");
}

#[test]
fn warning_marker_does_not_dodge_sibling_uniqueness() {
    let (mut t, _rx) = tree_with_events();
    t.create_fave_subfolder(&["New"]);
    let b = t.create_fave_subfolder(&["B"]);
    assert!(t.rename_fave_subfolder(&["B"], "!New"));
    assert_eq!(t.node(b).map(|n| n.name.as_str()), Some("New (2)"));
}
