//! Ctrl-C handling
//!
//! The first interrupt stops the render loop so the regular exit path
//! (project save, snapshot, final autosave) still runs.

use std::thread;

use dfifty_render::StopHandle;
use tracing::{error, info};

/// Stop `handle` when the process receives Ctrl-C
pub fn stop_on_interrupt(handle: StopHandle) {
    let spawned = thread::Builder::new()
        .name("dfifty-interrupt".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create interrupt runtime: {}", e);
                    return;
                }
            };

            rt.block_on(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        info!("Interrupt received, shutting down");
                        handle.stop();
                    }
                    Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
                }
            });
        });

    if let Err(e) = spawned {
        error!("Failed to spawn interrupt thread: {}", e);
    }
}
