use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque worker identity, usually the hardware address of the machine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A machine able to scan its local directories on request.
///
/// Field names on the wire match the registration body sent by workers and
/// the registry snapshot file, so older snapshots keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkerNode {
    #[serde(rename = "slave_name")]
    pub id: NodeId,

    /// Scheme and host, e.g. `http://192.168.1.20`.
    #[serde(rename = "slave_url")]
    pub url: String,

    #[serde(rename = "slave_port")]
    pub port: u16,

    /// Relative path of the scan endpoint, e.g. `/scan`.
    #[serde(rename = "slave_action")]
    pub scan_path: String,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl WorkerNode {
    pub fn new(id: impl Into<String>, url: impl Into<String>, port: u16, scan_path: impl Into<String>) -> Self {
        Self {
            id: NodeId(id.into()),
            url: url.into(),
            port,
            scan_path: scan_path.into(),
            active: true,
        }
    }

    /// `url:port`, the root every worker endpoint hangs off.
    pub fn base_url(&self) -> String {
        format!("{}:{}", self.url.trim_end_matches('/'), self.port)
    }

    /// Full URL of the scan endpoint for one directory.
    pub fn scan_url(&self) -> String {
        let path = if self.scan_path.starts_with('/') {
            self.scan_path.clone()
        } else {
            format!("/{}", self.scan_path)
        };
        format!("{}{}", self.base_url(), path)
    }
}

/// On-disk shape of the registry snapshot.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    #[serde(default)]
    pub slaves: BTreeMap<NodeId, WorkerNode>,
}
