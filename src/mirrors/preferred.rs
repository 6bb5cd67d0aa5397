//! Preferred mirror state
//!
//! One slot per resource class holding the mirror that most recently passed the
//! reachability probe. Written by the prober, read by every fetch.

use std::sync::{PoisonError, RwLock};

use super::{Mirror, ResourceClass};

/// Known-good mirror per resource class
///
/// A hint, not a guarantee: fetches still fall back through the whole registry.
#[derive(Debug, Default)]
pub struct PreferredMirrors {
    content: RwLock<Option<Mirror>>,
    covers: RwLock<Option<Mirror>>,
}

impl PreferredMirrors {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, class: ResourceClass) -> &RwLock<Option<Mirror>> {
        match class {
            ResourceClass::GameContent => &self.content,
            ResourceClass::CoverImage => &self.covers,
        }
    }

    /// Current preferred mirror for a class, if any probe has succeeded
    pub fn get(&self, class: ResourceClass) -> Option<Mirror> {
        self.slot(class)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record a mirror as preferred for a class
    pub fn set(&self, class: ResourceClass, mirror: Mirror) {
        *self
            .slot(class)
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(mirror);
    }

    /// Forget the preferred mirror for a class
    pub fn clear(&self, class: ResourceClass) {
        *self
            .slot(class)
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_independent() {
        let preferred = PreferredMirrors::new();
        let mirror = Mirror::new("a", 1, "https://a.test/{repo}");

        preferred.set(ResourceClass::CoverImage, mirror.clone());

        assert_eq!(preferred.get(ResourceClass::CoverImage), Some(mirror));
        assert_eq!(preferred.get(ResourceClass::GameContent), None);

        preferred.clear(ResourceClass::CoverImage);
        assert_eq!(preferred.get(ResourceClass::CoverImage), None);
    }
}
