use std::{path::PathBuf, sync::mpsc};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;

use filtertree::core::{
    Catalog, FilterTree, JsonSettingsStore, JsonVisibilityStore, SettingsStore, VisibilityStore,
    drain_events, render_tree,
};

/// Builds a filter tree from a JSON catalog and prints it.
#[derive(Debug, Parser)]
#[command(name = "filtertree", version)]
struct Args {
    /// Catalog JSON (header, filters, faves).
    catalog: PathBuf,

    /// Show every entry with a visibility checkbox.
    #[arg(long)]
    select: bool,

    /// Visibility file (hidden filter hashes).
    #[arg(long, default_value = ".filtertree/visibility.json")]
    visibility: PathBuf,

    /// Settings file (expanded folders).
    #[arg(long, default_value = ".filtertree/settings.json")]
    settings: PathBuf,

    /// Hide the filter or fave with this hash. Repeatable.
    #[arg(long = "hide", value_name = "HASH")]
    hide: Vec<String>,

    /// Expand the folder at this '/'-separated path. Repeatable.
    #[arg(long = "expand", value_name = "PATH")]
    expand: Vec<String>,

    /// Print folder contents even when collapsed.
    #[arg(long)]
    all: bool,

    /// Write settings and visibility back.
    #[arg(long)]
    save: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();

    let catalog = Catalog::load(&args.catalog)
        .with_context(|| format!("reading catalog {}", args.catalog.display()))?;

    let mut settings = JsonSettingsStore::new(&args.settings);
    settings
        .load()
        .with_context(|| format!("reading settings {}", args.settings.display()))?;

    let (tx, rx) = mpsc::channel();
    let mut tree = FilterTree::new(Box::new(JsonVisibilityStore::new(&args.visibility)), tx);
    tree.load_settings(&settings)
        .with_context(|| format!("reading visibility {}", args.visibility.display()))?;

    if args.select {
        tree.enable_selection_mode();
    } else {
        for hash in &args.hide {
            tree.visibility_store_mut().set_visibility(hash, false);
        }
    }

    catalog.populate(&mut tree);

    if args.select {
        for hash in &args.hide {
            match tree.find_filter(hash).or_else(|| tree.find_fave(hash)) {
                Some(id) => tree.set_visibility(id, false),
                None => log::warn!("no filter with hash {hash}"),
            }
        }
    }

    tree.enable_model();
    tree.restore_expanded_folders();
    for raw in &args.expand {
        let segments: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();
        match tree.resolve_folder(tree.root(), &segments) {
            Some(id) => tree.expand(id),
            None => log::warn!("no folder at {raw}"),
        }
    }

    print!("{}", render_tree(&tree, !args.all));

    if args.save {
        tree.save_settings(&mut settings)
            .context("saving visibility")?;
        settings
            .save()
            .with_context(|| format!("writing settings {}", args.settings.display()))?;
        log::info!("settings saved");
    }

    for event in drain_events(&rx) {
        log::debug!("unhandled event {event:?}");
    }
    Ok(())
}
