//! Resolve which isolated container network a scan must join to reach its
//! target, if any.
//!
//! Targets addressed by `localhost`, a loopback IP or a fully-qualified
//! domain are reachable over default networking. A bare short hostname is
//! assumed to be a container name on an isolated network; the running
//! container inventory is consulted first, then a compose-style default
//! network derived from the working directory. Detection failure is never
//! fatal: the scan proceeds on default networking with a warning.

use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};
use url::Url;

/// Suffix docker-compose appends to project network names.
const DEFAULT_NETWORK_SUFFIX: &str = "_default";

/// Read access to the container runtime's inventory.
pub trait ContainerInventory {
    /// Network joined by a running container whose name matches `name`.
    fn container_network(&self, name: &str) -> Option<String>;
    /// Whether a network with exactly this name exists.
    fn network_exists(&self, name: &str) -> bool;
}

/// Inventory backed by the docker CLI.
pub struct DockerCli;

impl ContainerInventory for DockerCli {
    fn container_network(&self, name: &str) -> Option<String> {
        let output = Command::new("docker")
            .args([
                "ps",
                "--filter",
                &format!("name={name}"),
                "--format",
                "{{.Networks}}",
            ])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        // A container can join several networks; take the first.
        stdout
            .lines()
            .next()
            .and_then(|l| l.split(',').next())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    }

    fn network_exists(&self, name: &str) -> bool {
        let output = Command::new("docker")
            .args(["network", "ls", "--format", "{{.Name}}"])
            .output();
        match output {
            Ok(out) if out.status.success() => String::from_utf8_lossy(&out.stdout)
                .lines()
                .any(|l| l.trim() == name),
            _ => false,
        }
    }
}

/// True when the target host needs no isolated network: loopback addresses
/// and dotted (fully-qualified) names are reachable as-is.
pub fn host_is_external(host: &str) -> bool {
    host == "localhost" || host == "127.0.0.1" || host.contains('.')
}

/// Resolve the network for `target_url` against the live docker inventory.
pub fn resolve_network(target_url: &str) -> Option<String> {
    resolve_network_with(target_url, &DockerCli)
}

/// Resolve the network using the given inventory. Returns `None` when the
/// target is reachable over default networking or when detection fails.
pub fn resolve_network_with(
    target_url: &str,
    inventory: &dyn ContainerInventory,
) -> Option<String> {
    let host = match Url::parse(target_url).ok().and_then(|u| {
        u.host_str().map(str::to_string)
    }) {
        Some(h) => h,
        None => {
            warn!(target = target_url, "cannot extract hostname; using default networking");
            return None;
        }
    };

    if host_is_external(&host) {
        debug!(%host, "external or loopback target; no isolated network");
        return None;
    }

    if let Some(network) = inventory.container_network(&host) {
        debug!(%host, %network, "matched running container network");
        return Some(network);
    }

    let fallback = default_network_name(std::env::current_dir().ok().as_deref());
    if let Some(name) = fallback {
        if inventory.network_exists(&name) {
            debug!(%host, network = %name, "using project default network");
            return Some(name);
        }
    }

    warn!(%host, "no isolated network found; scan runs on default networking");
    None
}

/// Compose-style default network name derived from a directory's base name.
pub fn default_network_name(dir: Option<&Path>) -> Option<String> {
    let dir = dir?;
    let base = dir.file_name()?.to_str()?;
    Some(format!("{base}{DEFAULT_NETWORK_SUFFIX}"))
}
