//! GitHub Pages publishing sources.

use serde::{Deserialize, Serialize};

/// Where GitHub Pages serves the site from.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum PagesSource {
    /// Root of the `master` branch
    #[default]
    Master,
    /// `/docs` folder of the `master` branch
    MasterDocs,
    /// Dedicated `gh-pages` branch
    GhPages,
}

/// Branch, optional subfolder and settings label of a [`PagesSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceTarget {
    pub branch: &'static str,
    pub subfolder: Option<&'static str>,
    /// Name of the source as shown in the repository settings.
    pub label: &'static str,
}

static TARGETS: [SourceTarget; 3] = [
    SourceTarget {
        branch: "master",
        subfolder: None,
        label: "master branch",
    },
    SourceTarget {
        branch: "master",
        subfolder: Some("docs"),
        label: "master branch /docs folder",
    },
    SourceTarget {
        branch: "gh-pages",
        subfolder: None,
        label: "gh-pages branch",
    },
];

impl PagesSource {
    pub fn target(self) -> &'static SourceTarget {
        match self {
            Self::Master => &TARGETS[0],
            Self::MasterDocs => &TARGETS[1],
            Self::GhPages => &TARGETS[2],
        }
    }
}
