use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::{
    config::{ResolverConfig, ResolverOpts},
    system_conf::read_system_conf,
    TokioAsyncResolver,
};
use tracing::{debug, warn};

/// Answers whether a domain can receive mail.
#[async_trait]
pub trait MailDomainVerifier: Send + Sync {
    /// Never errors: unreachable resolvers and timeouts answer `false`.
    async fn has_mail_exchange(&self, domain: &str) -> bool;
}

/// MX lookups through the system resolver configuration.
pub struct DnsMailVerifier {
    resolver: Option<TokioAsyncResolver>,
    timeout: Duration,
}

impl DnsMailVerifier {
    pub fn new(timeout: Duration) -> Self {
        let (config, mut opts) = read_system_conf().unwrap_or_else(|e| {
            warn!("Falling back to default DNS resolver configuration: {}", e);
            (ResolverConfig::default(), ResolverOpts::default())
        });
        opts.timeout = timeout;
        opts.attempts = 1;

        DnsMailVerifier {
            resolver: Some(TokioAsyncResolver::tokio(config, opts)),
            timeout,
        }
    }

    /// A verifier that accepts every domain, for offline development.
    pub fn disabled() -> Self {
        DnsMailVerifier {
            resolver: None,
            timeout: Duration::ZERO,
        }
    }
}

#[async_trait]
impl MailDomainVerifier for DnsMailVerifier {
    async fn has_mail_exchange(&self, domain: &str) -> bool {
        let Some(resolver) = &self.resolver else {
            return true;
        };

        // The resolver has its own timeout per attempt; this bounds the whole lookup
        let lookup = tokio::time::timeout(self.timeout * 2, resolver.mx_lookup(domain)).await;

        match lookup {
            // A single "." exchange is a null MX: the domain explicitly refuses mail
            Ok(Ok(records)) => records.iter().any(|mx| !mx.exchange().is_root()),
            Ok(Err(e)) => {
                debug!(domain, error = %e, "MX lookup failed");
                false
            }
            Err(_) => {
                warn!(domain, "MX lookup timed out");
                false
            }
        }
    }
}
