//! `[site]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[site]` section - where the build pipeline left the rendered site.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Rendered site directory (relative to the project root).
    #[serde(default = "defaults::site::output")]
    #[educe(Default = defaults::site::output())]
    pub output: PathBuf,
}
