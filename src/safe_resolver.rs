//! DNS resolver that refuses to hand private addresses to the HTTP client.
//!
//! [`crate::url_validator`] can only range-check literal IPs. This resolver
//! runs the same checks on every address a hostname resolves to, so a public
//! looking name pointing at `10.0.0.5` never gets a socket.

use crate::url_validator::{check_ipv4, check_ipv6};
use once_cell::sync::Lazy;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Caps concurrent lookups so a batch scan cannot exhaust the system resolver.
static DNS_SEMAPHORE: Lazy<Arc<Semaphore>> = Lazy::new(|| Arc::new(Semaphore::new(32)));

#[derive(Debug, Clone, Default)]
pub struct SafeResolver;

impl Resolve for SafeResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let _permit = DNS_SEMAPHORE
                .acquire()
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> { Box::new(e) })?;

            let host = format!("{}:0", name.as_str());
            let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&host)
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> { Box::new(e) })?
                .collect();

            let public: Vec<SocketAddr> = addrs
                .into_iter()
                .filter(|addr| is_public_ip(addr.ip()))
                .collect();

            if public.is_empty() {
                tracing::warn!(host = %name.as_str(), "Blocked hostname resolving only to private addresses");
                return Err(Box::new(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!(
                        "'{}' resolves only to private or reserved addresses",
                        name.as_str()
                    ),
                )) as Box<dyn std::error::Error + Send + Sync>);
            }

            let addrs: Addrs = Box::new(public.into_iter());
            Ok(addrs)
        })
    }
}

fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => check_ipv4(v4).is_ok(),
        IpAddr::V6(v6) => check_ipv6(v6).is_ok(),
    }
}
