//! Bounded connectivity probes used by the network demo.
//!
//! Every probe makes exactly one attempt. There are no retries: the caller
//! only wants to know whether the dependency answered within the bound.

use dockyard_shared::{NetworkInfo, ProbeResult};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, lookup_host};

pub const TIMEOUT_REASON: &str = "Timeout";
pub const UNRESOLVED: &str = "unresolved";
pub const LOOKUP_FAILED: &str = "error";
pub const DOCKER_DNS_SERVER: &str = "127.0.0.11 (Docker embedded DNS)";

const REPLY_BUFFER: usize = 512;

/// Await `attempt` for at most `limit`, flattening both failure modes into a
/// reason string.
pub async fn bounded<T, F>(limit: Duration, attempt: F) -> Result<T, String>
where
    F: Future<Output = io::Result<T>>,
{
    match tokio::time::timeout(limit, attempt).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(TIMEOUT_REASON.to_string()),
    }
}

pub async fn probe_tcp(host: &str, port: u16, timeout: Duration) -> ProbeResult {
    match bounded(timeout, TcpStream::connect((host, port))).await {
        Ok(_stream) => {
            log::debug!("TCP probe {}:{} reachable", host, port);
            ProbeResult::reachable(host, port)
        }
        Err(reason) => {
            log::warn!("TCP probe {}:{} failed: {}", host, port, reason);
            ProbeResult::unreachable(host, port, reason)
        }
    }
}

/// Connect, send an inline `PING` and report the first reply line.
///
/// Connect, write and read all share the one timeout.
pub async fn probe_redis_ping(host: &str, port: u16, timeout: Duration) -> ProbeResult {
    let exchange = async {
        let mut stream = TcpStream::connect((host, port)).await?;
        stream.write_all(b"PING\r\n").await?;

        let mut buf = [0u8; REPLY_BUFFER];
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed before reply",
            ));
        }
        Ok(String::from_utf8_lossy(&buf[..n]).trim().to_string())
    };

    match bounded(timeout, exchange).await {
        Ok(reply) => ProbeResult::reachable(host, port).with_response(reply),
        Err(reason) => {
            log::warn!("Redis probe {}:{} failed: {}", host, port, reason);
            ProbeResult::unreachable(host, port, reason)
        }
    }
}

/// Resolve `host` through the system resolver.
///
/// Yields the distinct addresses in resolver order, `["unresolved"]` when the
/// name does not resolve and `["error"]` when the lookup overruns `timeout`.
pub async fn resolve_host(host: &str, timeout: Duration) -> Vec<String> {
    match tokio::time::timeout(timeout, lookup_host((host, 0))).await {
        Ok(Ok(addrs)) => {
            let mut ips: Vec<String> = Vec::new();
            for addr in addrs {
                let ip = addr.ip().to_string();
                if !ips.contains(&ip) {
                    ips.push(ip);
                }
            }
            if ips.is_empty() {
                vec![UNRESOLVED.to_string()]
            } else {
                ips
            }
        }
        Ok(Err(e)) => {
            log::debug!("DNS lookup for {} failed: {}", host, e);
            vec![UNRESOLVED.to_string()]
        }
        Err(_) => {
            log::warn!("DNS lookup for {} timed out", host);
            vec![LOOKUP_FAILED.to_string()]
        }
    }
}

/// Resolve every `(label, host)` pair concurrently.
pub async fn network_info(targets: &[(String, String)], timeout: Duration, note: &str) -> NetworkInfo {
    let lookups = targets.iter().map(|(label, host)| async move {
        (label.clone(), resolve_host(host, timeout).await)
    });

    let resolutions: BTreeMap<String, Vec<String>> = join_all(lookups).await.into_iter().collect();

    NetworkInfo {
        dns_server: DOCKER_DNS_SERVER.to_string(),
        resolutions,
        note: note.to_string(),
    }
}
