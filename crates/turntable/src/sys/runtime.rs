use crate::events::AppEvent;
use crate::sys::{server, watcher};
use async_channel::Sender;
use std::path::PathBuf;
use std::thread;

/// Runs the command socket and the settings watcher on their own thread.
/// Both only talk to the UI through `tx`.
pub fn start_background_services(tx: Sender<AppEvent>, assets_dir: Option<PathBuf>) {
    let spawned = thread::Builder::new()
        .name("turntable-services".into())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create Tokio runtime: {}", e);
                    return;
                }
            };

            rt.block_on(async {
                let watch = async {
                    if let Err(e) = watcher::watch_settings(tx.clone(), assets_dir).await {
                        log::error!("Settings are not watched: {}", e);
                    }
                };
                tokio::join!(server::run_server(tx.clone()), watch);
            });
        });

    if let Err(e) = spawned {
        log::error!("Failed to start background services: {}", e);
    }
}
