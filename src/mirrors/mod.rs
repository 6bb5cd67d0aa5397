//! Mirror registry module
//!
//! Static, ordered set of content mirrors and the per-class preferred-mirror state.

mod preferred;
mod registry;

pub use preferred::PreferredMirrors;
pub use registry::{Mirror, MirrorRegistry, RepoRef, Sources};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Independent content domains, each with its own source repository and preferred mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceClass {
    GameContent,
    CoverImage,
}

impl ResourceClass {
    pub const ALL: [ResourceClass; 2] = [ResourceClass::GameContent, ResourceClass::CoverImage];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceClass::GameContent => "content",
            ResourceClass::CoverImage => "covers",
        }
    }
}

impl fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
