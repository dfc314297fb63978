use crate::config::{SettingsError, get_config_path};
use crate::events::AppEvent;
use async_channel::Sender;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Editors save in several steps; events this close together are one reload.
const SETTLE: Duration = Duration::from_millis(150);

/// Sends [`AppEvent::ConfigReload`] whenever `config.toml` or an image in
/// `assets_dir` changes. Returns once the UI side of `tx` is gone.
pub async fn watch_settings(
    tx: Sender<AppEvent>,
    assets_dir: Option<PathBuf>,
) -> Result<(), SettingsError> {
    let config_path = get_config_path()?;
    let config_dir = config_path
        .parent()
        .ok_or(SettingsError::ConfigDirNotFound)?
        .to_path_buf();
    fs_err::create_dir_all(&config_dir).map_err(|e| SettingsError::Notify(e.into()))?;

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(&config_dir, RecursiveMode::NonRecursive)?;

    // assets/ under the config dir only shows up as a directory event there
    let assets_dir = assets_dir.filter(|dir| dir.is_dir());
    if let Some(dir) = &assets_dir {
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        log::debug!("Watching {} for image changes", dir.display());
    }

    while let Ok(res) = bridge_rx.recv().await {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Watch error: {}", e);
                continue;
            }
        };
        if !triggers_reload(&event, &config_path, assets_dir.as_deref()) {
            continue;
        }

        tokio::time::sleep(SETTLE).await;
        while bridge_rx.try_recv().is_ok() {}

        log::debug!("{:?} changed, reloading", event.paths);
        if tx.send(AppEvent::ConfigReload).await.is_err() {
            break;
        }
    }
    Ok(())
}

fn triggers_reload(event: &Event, config_path: &Path, assets_dir: Option<&Path>) -> bool {
    let changed = matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    );
    changed
        && event.paths.iter().any(|path| {
            path == config_path || assets_dir.is_some_and(|dir| path.parent() == Some(dir))
        })
}
