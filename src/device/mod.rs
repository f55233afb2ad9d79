//! Device snapshot captured alongside the navigation metrics

/// Device classification constants
pub mod constants;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::device::constants::MOBILE_TOKENS;
use crate::host::{ConnectionInfo, HostEnvironment, VisibilityState};

static MOBILE_USER_AGENT: Lazy<Regex> = Lazy::new(|| {
    let pattern = MOBILE_TOKENS.iter().map(|token| regex::escape(token)).collect::<Vec<_>>().join("|");
    Regex::new(&format!("(?i){pattern}")).expect("mobile user-agent pattern is valid")
});

/// Returns true if the user agent names a mobile platform
pub fn is_mobile(user_agent: &str) -> bool {
    MOBILE_USER_AGENT.is_match(user_agent)
}

/// Viewport, visibility and network state of the device at navigation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceMetrics {
    pub width: u32,
    pub height: u32,
    pub visibility_state: VisibilityState,
    /// Whether the page was restored from the back-forward cache
    pub bfcache: bool,
    pub mobile: bool,
    pub user_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionInfo>,
}

impl DeviceMetrics {
    /// Read the current device state from the host
    pub fn capture(host: &dyn HostEnvironment, bfcache: bool) -> Self {
        let viewport = host.viewport();
        let user_agent = host.user_agent();

        Self {
            width: viewport.width,
            height: viewport.height,
            visibility_state: host.visibility_state(),
            bfcache,
            mobile: is_mobile(&user_agent),
            user_agent,
            connection: host.connection(),
        }
    }
}
