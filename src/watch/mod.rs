//! File watching shared by `generate --watch` and the dev server
//!
//! Events are debounced on the trailing edge: a burst of writes is reported
//! once, after the files have been quiet for the debounce window, so the last
//! write of a burst is always the one that gets loaded.

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::ContentStore;
use crate::content::Collections;
use crate::Site;

const DEBOUNCE: Duration = Duration::from_millis(500);

/// Watch the content directories and config file of the store's site.
///
/// Each debounced batch of changes reloads the store (re-reading
/// `_config.yml` first when it is part of the batch) and hands the new
/// collections to `on_reload`. A failed reload is logged and the previous
/// content stays in place. Blocks until the watcher shuts down.
pub fn watch_content<F>(mut store: ContentStore, mut on_reload: F) -> Result<()>
where
    F: FnMut(&Site, Arc<Collections>),
{
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(DEBOUNCE, tx)?;

    for dir in store.site().content_dirs() {
        if dir.exists() {
            debouncer.watcher().watch(&dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }

    let config_path = store.site().config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let paths: Vec<PathBuf> = events
                    .into_iter()
                    .map(|e| e.path)
                    .filter(|p| is_relevant(p))
                    .collect();

                if paths.is_empty() {
                    continue;
                }

                for path in &paths {
                    tracing::info!("File changed: {}", path.display());
                }

                match apply_changes(&mut store, &paths) {
                    Ok(collections) => on_reload(store.site(), collections),
                    Err(e) => {
                        tracing::error!("Reload failed, keeping previous content: {}", e);
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Filter out editor and VCS noise
pub fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git") && !path_str.contains(".DS_Store") && !path_str.ends_with('~')
}

/// Reload the store after `paths` changed, picking up a new site
/// configuration first if the config file is among them
pub fn apply_changes(store: &mut ContentStore, paths: &[PathBuf]) -> Result<Arc<Collections>> {
    let config_path = store.site().config_path();
    if paths.iter().any(|p| is_same_file(p, &config_path)) {
        let site = Site::new(&store.site().base_dir)?;
        tracing::info!("Reloaded {:?}", config_path);
        store.set_site(site);
    }

    Ok(store.get()?)
}

/// Watchers may report canonical paths, so compare both forms
fn is_same_file(changed: &Path, expected: &Path) -> bool {
    changed == expected
        || std::fs::canonicalize(expected)
            .map(|canonical| canonical == changed)
            .unwrap_or(false)
}
