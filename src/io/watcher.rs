use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from a directory watcher to its owner.
#[derive(Debug, PartialEq, Eq)]
pub enum DirEvent {
    /// One or more entries directly inside the directory were created, changed or removed.
    Changed(Vec<PathBuf>),
}

/// Watches the immediate entries of one directory. Dropping it stops the watch.
pub struct DirWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<DirEvent>,
}

impl DirWatcher {
    pub fn start(dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let dir_owned = dir.to_path_buf();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else {
                    return;
                };
                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                let relevant: Vec<PathBuf> = event
                    .paths
                    .into_iter()
                    .filter(|p| p.parent() == Some(dir_owned.as_path()))
                    .filter(|p| {
                        // Our own bookkeeping files churn on every save
                        !p.file_name()
                            .and_then(|n| n.to_str())
                            .is_some_and(|n| n.starts_with(".tmp"))
                    })
                    .collect();

                if !relevant.is_empty() {
                    let _ = tx.send(DirEvent::Changed(relevant));
                }
            },
            Config::default(),
        )?;

        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(DirWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll for pending events.
    pub fn poll(&self) -> Vec<DirEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            events.push(evt);
        }
        events
    }
}
