use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use tracing::debug;

use crate::config::AppConfig;
use crate::fetch::SourceFetcher;
use crate::loader::{Origin, load_roster};
use crate::pool_cache::PoolCache;
use crate::state::{Delta, ProviderCommand};

pub struct LoadContext {
    pub cache: PoolCache,
    pub fetcher: SourceFetcher,
}

impl LoadContext {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cache: PoolCache::new(config.pool_cache_path(), config.cache_ttl),
            fetcher: SourceFetcher::from_config(config),
        }
    }
}

/// Background worker: every `LoadLibrary` runs on its own thread so a slow
/// source never blocks a later switch. Results carry the request token; the
/// UI side drops the ones that were superseded.
pub fn spawn_provider(
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
    ctx: LoadContext,
) -> thread::JoinHandle<()> {
    let ctx = Arc::new(ctx);
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::LoadLibrary { library, token } => {
                    let tx = tx.clone();
                    let ctx = Arc::clone(&ctx);
                    thread::spawn(move || {
                        debug!(library = %library.id, token, "loading library");
                        let result = load_roster(&library, &ctx.cache, &ctx.fetcher);
                        if let Origin::Remote { source } = &result.origin {
                            let _ = tx.send(Delta::Log(format!("[INFO] Fetched {source}")));
                        }
                        let _ = tx.send(Delta::PoolLoaded {
                            token,
                            library_id: library.id.clone(),
                            result,
                        });
                    });
                }
            }
        }
    })
}
