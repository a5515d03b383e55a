//! Ad network detection
//!
//! Each playable-ad network injects its SDK as a page global. Detection runs
//! once at startup and the result is fixed for the page's lifetime.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::bridge::BridgeError;

/// Supported ad networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdNetwork {
    /// MRAID containers (`window.mraid`)
    Mraid,
    /// Facebook playable ads (`window.FbPlayableAd`)
    Facebook,
    /// ironSource DAPI (`window.dapi`)
    IronSource,
    /// Plain browser, no SDK present
    #[default]
    Browser,
}

impl AdNetwork {
    /// Networks probed in priority order, with their SDK global
    pub const PROBE_ORDER: [(AdNetwork, &'static str); 3] = [
        (AdNetwork::Mraid, "mraid"),
        (AdNetwork::Facebook, "FbPlayableAd"),
        (AdNetwork::IronSource, "dapi"),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdNetwork::Mraid => "mraid",
            AdNetwork::Facebook => "facebook",
            AdNetwork::IronSource => "ironsource",
            AdNetwork::Browser => "browser",
        }
    }
}

impl fmt::Display for AdNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answers whether a page global is defined
pub trait GlobalProbe {
    fn has_global(&self, name: &str) -> Result<bool, BridgeError>;
}

/// Probe for hosts without any SDK globals (native, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGlobals;

impl GlobalProbe for NoGlobals {
    fn has_global(&self, _name: &str) -> Result<bool, BridgeError> {
        Ok(false)
    }
}

/// Pick the first network whose SDK global is present
///
/// A failing probe ends detection with [`AdNetwork::Browser`].
pub fn detect_network(probe: &dyn GlobalProbe) -> AdNetwork {
    for (network, global) in AdNetwork::PROBE_ORDER {
        match probe.has_global(global) {
            Ok(true) => return network,
            Ok(false) => {}
            Err(e) => {
                log::warn!("AdAdapter detect failed: {}", e);
                return AdNetwork::Browser;
            }
        }
    }
    AdNetwork::Browser
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Globals(&'static [&'static str]);

    impl GlobalProbe for Globals {
        fn has_global(&self, name: &str) -> Result<bool, BridgeError> {
            Ok(self.0.contains(&name))
        }
    }

    struct Broken;

    impl GlobalProbe for Broken {
        fn has_global(&self, name: &str) -> Result<bool, BridgeError> {
            Err(BridgeError::Js(format!("cannot read {name}")))
        }
    }

    #[test]
    fn test_detects_each_network() {
        assert_eq!(detect_network(&Globals(&["mraid"])), AdNetwork::Mraid);
        assert_eq!(detect_network(&Globals(&["FbPlayableAd"])), AdNetwork::Facebook);
        assert_eq!(detect_network(&Globals(&["dapi"])), AdNetwork::IronSource);
        assert_eq!(detect_network(&NoGlobals), AdNetwork::Browser);
    }

    #[test]
    fn test_mraid_wins_over_others() {
        let probe = Globals(&["dapi", "FbPlayableAd", "mraid"]);
        assert_eq!(detect_network(&probe), AdNetwork::Mraid);
        let probe = Globals(&["dapi", "FbPlayableAd"]);
        assert_eq!(detect_network(&probe), AdNetwork::Facebook);
    }

    #[test]
    fn test_probe_error_falls_back_to_browser() {
        assert_eq!(detect_network(&Broken), AdNetwork::Browser);
    }
}
