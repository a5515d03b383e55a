//! Seam between the adapter and the host page's SDK objects

use thiserror::Error;

/// Errors raised while talking to an ad SDK
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("global `{0}` is not defined")]
    MissingGlobal(String),

    #[error("`{global}.{method}` is not a function")]
    MissingMethod { global: String, method: String },

    #[error("javascript error: {0}")]
    Js(String),
}

/// Calls into page globals on behalf of the adapter
pub trait SdkBridge {
    /// Call `global.method(args...)`, returning the result if it is a string
    fn invoke(&self, global: &str, method: &str, args: &[&str])
    -> Result<Option<String>, BridgeError>;

    /// Register `callback` for `global.addEventListener(event, ...)`
    fn subscribe(
        &self,
        global: &str,
        event: &str,
        callback: Box<dyn FnMut()>,
    ) -> Result<(), BridgeError>;

    /// Open `url` in a new tab
    fn open_url(&self, url: &str) -> Result<(), BridgeError>;
}

/// Bridge that only logs; used by the native runner
#[derive(Debug, Clone, Copy, Default)]
pub struct LogBridge;

impl SdkBridge for LogBridge {
    fn invoke(
        &self,
        global: &str,
        method: &str,
        args: &[&str],
    ) -> Result<Option<String>, BridgeError> {
        log::info!("SDK call {}.{}({})", global, method, args.join(", "));
        Ok(None)
    }

    fn subscribe(
        &self,
        global: &str,
        event: &str,
        _callback: Box<dyn FnMut()>,
    ) -> Result<(), BridgeError> {
        log::info!("SDK subscribe {}.{}", global, event);
        Ok(())
    }

    fn open_url(&self, url: &str) -> Result<(), BridgeError> {
        log::info!("Open URL {}", url);
        Ok(())
    }
}
