//! Reachability prober
//!
//! Finds the first mirror that serves a known probe file for a resource class and
//! records it as preferred. First success wins; latency is not compared.

use std::sync::Arc;
use std::time::Duration;

use crate::mirrors::{Mirror, MirrorRegistry, PreferredMirrors, ResourceClass};
use crate::transport::{Transport, TransportError};
use crate::{log_info, log_warn};

const MODULE: &str = "probe";

pub struct Prober {
    transport: Arc<dyn Transport>,
    registry: Arc<MirrorRegistry>,
    preferred: Arc<PreferredMirrors>,
    timeout: Duration,
}

impl Prober {
    pub fn new(
        transport: Arc<dyn Transport>,
        registry: Arc<MirrorRegistry>,
        preferred: Arc<PreferredMirrors>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            registry,
            preferred,
            timeout,
        }
    }

    /// Probe mirrors in priority order and record the first reachable one
    ///
    /// Returns `None` when every mirror fails; the preferred slot is then left as it was.
    pub async fn probe(&self, class: ResourceClass) -> Option<Mirror> {
        let repo = self.registry.repo_for(class);
        let probe_path = self.registry.probe_path(class);

        log_info!(MODULE, "Testing {} mirror accessibility...", class);

        for mirror in self.registry.mirrors() {
            let url = mirror.url(repo, probe_path);
            log_info!(MODULE, "  Testing {}: {}", mirror.name(), url);

            match self.check(&url).await {
                Ok(()) => {
                    log_info!(MODULE, "  {} is accessible for {}", mirror.name(), class);
                    self.preferred.set(class, mirror.clone());
                    return Some(mirror.clone());
                }
                Err(e) => {
                    log_info!(MODULE, "  {} blocked or unavailable: {}", mirror.name(), e);
                }
            }
        }

        log_warn!(
            MODULE,
            "All {} mirrors appear blocked; fetches will try every mirror",
            class
        );
        None
    }

    async fn check(&self, url: &str) -> Result<(), TransportError> {
        match tokio::time::timeout(self.timeout, self.transport.check(url, self.timeout)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{content_url, cover_url, test_registry, MockTransport};

    fn prober(transport: Arc<MockTransport>) -> (Prober, Arc<PreferredMirrors>) {
        let preferred = Arc::new(PreferredMirrors::new());
        let prober = Prober::new(
            transport,
            Arc::new(test_registry()),
            preferred.clone(),
            Duration::from_secs(5),
        );
        (prober, preferred)
    }

    #[tokio::test]
    async fn test_first_success_wins_and_stops() {
        for n in 1..=4u32 {
            let transport = MockTransport::new();
            for i in n..=4 {
                transport.ok(&content_url(i, "probe.html"), "text/html", "ok");
            }
            let (prober, preferred) = prober(transport.clone());

            let chosen = prober.probe(ResourceClass::GameContent).await;

            let expected = format!("m{}", n);
            assert_eq!(chosen.as_ref().map(|m| m.name()), Some(expected.as_str()));
            assert_eq!(
                preferred.get(ResourceClass::GameContent).map(|m| m.name().to_string()),
                Some(expected)
            );
            assert_eq!(transport.check_urls().len(), n as usize);
            assert!(transport.get_urls().is_empty());
        }
    }

    #[tokio::test]
    async fn test_all_failing_leaves_preference_unset() {
        let transport = MockTransport::new();
        let (prober, preferred) = prober(transport.clone());

        assert!(prober.probe(ResourceClass::CoverImage).await.is_none());
        assert!(preferred.get(ResourceClass::CoverImage).is_none());
        assert_eq!(transport.check_urls().len(), 4);
    }

    #[tokio::test]
    async fn test_classes_probe_their_own_repository() {
        let transport = MockTransport::new();
        transport.ok(&cover_url(3, "probe.png"), "image/png", "png");
        let (prober, preferred) = prober(transport.clone());

        assert!(prober.probe(ResourceClass::GameContent).await.is_none());
        let chosen = prober.probe(ResourceClass::CoverImage).await;

        assert_eq!(chosen.map(|m| m.name().to_string()), Some("m3".to_string()));
        assert!(preferred.get(ResourceClass::GameContent).is_none());
        assert_eq!(transport.check_urls()[0], content_url(1, "probe.html"));
        assert_eq!(transport.check_urls()[4], cover_url(1, "probe.png"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_mirror_times_out() {
        let transport = MockTransport::new();
        transport.hang(&content_url(1, "probe.html"));
        transport.ok(&content_url(2, "probe.html"), "text/html", "ok");
        let (prober, _) = prober(transport.clone());

        let started = tokio::time::Instant::now();
        let chosen = prober.probe(ResourceClass::GameContent).await;

        assert_eq!(chosen.map(|m| m.name().to_string()), Some("m2".to_string()));
        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_failed_reprobe_keeps_last_success() {
        let transport = MockTransport::new();
        transport.ok(&content_url(2, "probe.html"), "text/html", "ok");
        let (prober, preferred) = prober(transport.clone());

        prober.probe(ResourceClass::GameContent).await;
        transport.fail(&content_url(2, "probe.html"), 503);
        assert!(prober.probe(ResourceClass::GameContent).await.is_none());

        assert_eq!(
            preferred.get(ResourceClass::GameContent).map(|m| m.name().to_string()),
            Some("m2".to_string())
        );
    }
}
