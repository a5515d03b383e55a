//! Network-aware lifecycle sink

use super::bridge::{BridgeError, SdkBridge};
use super::network::{AdNetwork, GlobalProbe, detect_network};
use super::LifecycleSink;

/// Routes lifecycle calls to whichever ad SDK the page was loaded in
pub struct AdAdapter {
    network: AdNetwork,
    bridge: Box<dyn SdkBridge>,
    store_url: String,
}

impl AdAdapter {
    /// Detect the network once and bind the bridge
    pub fn new(probe: &dyn GlobalProbe, bridge: Box<dyn SdkBridge>, store_url: String) -> Self {
        let network = detect_network(probe);
        log::info!("AdAdapter initialized. Network: {}", network);
        Self::with_network(network, bridge, store_url)
    }

    pub fn with_network(network: AdNetwork, bridge: Box<dyn SdkBridge>, store_url: String) -> Self {
        Self {
            network,
            bridge,
            store_url,
        }
    }

    pub fn network(&self) -> AdNetwork {
        self.network
    }

    fn open_store(&self) -> Result<(), BridgeError> {
        let url = self.store_url.as_str();
        match self.network {
            AdNetwork::Mraid => self.bridge.invoke("mraid", "open", &[url]).map(drop),
            AdNetwork::Facebook => self.bridge.invoke("FbPlayableAd", "onCTAClick", &[]).map(drop),
            AdNetwork::IronSource => self.bridge.invoke("dapi", "openStoreUrl", &[]).map(drop),
            AdNetwork::Browser => self.bridge.open_url(url),
        }
    }
}

impl LifecycleSink for AdAdapter {
    fn game_ready(&mut self) {
        log::info!("Game ready");
        if self.network != AdNetwork::Mraid {
            return;
        }
        match self.bridge.invoke("mraid", "getState", &[]) {
            Ok(Some(state)) if state == "loading" => {
                let subscribed = self.bridge.subscribe(
                    "mraid",
                    "ready",
                    Box::new(|| log::info!("MRAID ready")),
                );
                if let Err(e) = subscribed {
                    log::warn!("MRAID ready subscription failed: {}", e);
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("MRAID getState failed: {}", e),
        }
    }

    fn game_started(&mut self) {
        log::info!("Game started");
    }

    fn game_ended(&mut self) {
        log::info!("Game ended");
    }

    fn install_requested(&mut self) {
        log::info!("Install clicked");
        if let Err(e) = self.open_store() {
            log::error!("Install action failed: {}", e);
            if let Err(e) = self.bridge.open_url(&self.store_url) {
                log::error!("Store fallback failed: {}", e);
            }
        }
    }
}
