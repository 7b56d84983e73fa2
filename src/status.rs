use log::{ debug, info, warn };
use std::sync::Arc;
use std::sync::atomic::{ AtomicBool, Ordering };
use std::time::Duration;
use tokio::task::JoinHandle;

/// Shared online flag. Written by the network probe (or the API), read once
/// per send.
#[derive(Clone, Debug)]
pub struct OnlineStatus {
    online: Arc<AtomicBool>,
}

impl OnlineStatus {
    pub fn new(initial: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(initial)),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Returns the previous value.
    pub fn set(&self, online: bool) -> bool {
        self.online.swap(online, Ordering::SeqCst)
    }
}

impl Default for OnlineStatus {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Any HTTP response counts as online; only transport failures count as offline.
pub async fn probe_once(http: &reqwest::Client, url: &str) -> bool {
    match http.head(url).send().await {
        Ok(resp) => {
            debug!("Online probe {} answered {}", url, resp.status());
            true
        }
        Err(e) => {
            debug!("Online probe {} failed: {}", url, e);
            false
        }
    }
}

pub fn spawn_online_probe(
    status: OnlineStatus,
    url: String,
    interval: Duration
) -> Result<JoinHandle<()>, reqwest::Error> {
    let http = reqwest::Client::builder().timeout(interval.min(Duration::from_secs(10))).build()?;
    info!("Starting online probe against {} every {:?}", url, interval);

    Ok(
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let online = probe_once(&http, &url).await;
                let previous = status.set(online);
                if previous != online {
                    if online {
                        info!("Network is back online");
                    } else {
                        warn!("Network appears offline, hosted AI calls will be skipped");
                    }
                }
            }
        })
    )
}
