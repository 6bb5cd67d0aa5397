//! Mirror definitions and candidate URL construction

use serde::Serialize;

use super::ResourceClass;
use crate::log_warn;

const MODULE: &str = "mirrors";

/// A source repository at a specific branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl RepoRef {
    pub fn new(owner: &str, repo: &str, branch: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
        }
    }
}

/// Repositories and probe files bound to each resource class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub content: RepoRef,
    pub covers: RepoRef,
    pub backgrounds: RepoRef,
    /// Known-to-exist file probed for content mirrors
    pub content_probe: String,
    /// Known-to-exist file probed for cover mirrors
    pub cover_probe: String,
}

/// One interchangeable raw-content delivery host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mirror {
    name: String,
    priority: u32,
    template: String,
}

impl Mirror {
    /// Create a mirror from a template using `{owner}`, `{repo}` and `{branch}` placeholders
    pub fn new(name: &str, priority: u32, template: &str) -> Self {
        Self {
            name: name.to_string(),
            priority,
            template: template.trim_end_matches('/').to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Base URL of a repository on this mirror
    pub fn base_url(&self, repo: &RepoRef) -> String {
        self.template
            .replace("{owner}", &repo.owner)
            .replace("{repo}", &repo.repo)
            .replace("{branch}", &repo.branch)
    }

    /// Absolute URL of `path` inside `repo` on this mirror
    pub fn url(&self, repo: &RepoRef, path: &str) -> String {
        format!("{}/{}", self.base_url(repo), path.trim_start_matches('/'))
    }

    /// Host name of the mirror, used in remediation messages
    pub fn host(&self) -> &str {
        let rest = self
            .template
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.template);
        rest.split(['/', ':']).next().unwrap_or(rest)
    }
}

/// Immutable, priority-ordered set of mirrors
#[derive(Debug, Clone)]
pub struct MirrorRegistry {
    mirrors: Vec<Mirror>,
    sources: Sources,
}

impl MirrorRegistry {
    /// Build a registry, ordering mirrors by priority and dropping duplicate names
    pub fn new(mut mirrors: Vec<Mirror>, sources: Sources) -> Self {
        mirrors.sort_by_key(|m| m.priority);

        let mut unique: Vec<Mirror> = Vec::with_capacity(mirrors.len());
        for mirror in mirrors {
            if unique.iter().any(|m| m.name == mirror.name) {
                log_warn!(MODULE, "Ignoring duplicate mirror: {}", mirror.name);
                continue;
            }
            unique.push(mirror);
        }

        Self {
            mirrors: unique,
            sources,
        }
    }

    pub fn mirrors(&self) -> &[Mirror] {
        &self.mirrors
    }

    pub fn sources(&self) -> &Sources {
        &self.sources
    }

    /// Highest-priority mirror, if any
    pub fn primary(&self) -> Option<&Mirror> {
        self.mirrors.first()
    }

    /// Repository backing a resource class
    pub fn repo_for(&self, class: ResourceClass) -> &RepoRef {
        match class {
            ResourceClass::GameContent => &self.sources.content,
            ResourceClass::CoverImage => &self.sources.covers,
        }
    }

    /// Probe file for a resource class
    pub fn probe_path(&self, class: ResourceClass) -> &str {
        match class {
            ResourceClass::GameContent => &self.sources.content_probe,
            ResourceClass::CoverImage => &self.sources.cover_probe,
        }
    }

    /// Ordered candidate URLs for a resource
    ///
    /// The preferred mirror (when it belongs to this registry) comes first, followed by
    /// the remaining mirrors in priority order. Every mirror appears exactly once.
    pub fn candidate_urls(
        &self,
        class: ResourceClass,
        path: &str,
        preferred: Option<&Mirror>,
    ) -> Vec<String> {
        let repo = self.repo_for(class);
        self.ordered(preferred)
            .map(|mirror| mirror.url(repo, path))
            .collect()
    }

    /// Every mirror URL for `path` in an arbitrary repository, in priority order
    pub fn urls_for(&self, repo: &RepoRef, path: &str) -> Vec<String> {
        self.mirrors.iter().map(|m| m.url(repo, path)).collect()
    }

    fn ordered<'a>(&'a self, preferred: Option<&'a Mirror>) -> impl Iterator<Item = &'a Mirror> {
        let head = preferred.and_then(|p| self.mirrors.iter().find(|m| m.name == p.name));
        let head_name = head.map(|m| m.name.as_str());

        head.into_iter().chain(
            self.mirrors
                .iter()
                .filter(move |m| Some(m.name.as_str()) != head_name),
        )
    }
}
