use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw probe result: container format plus one entry per elementary stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeOutput {
    /// `None` when the prober produced no stream list at all
    #[serde(default)]
    pub streams: Option<Vec<ProbeStream>>,
    #[serde(default)]
    pub format: Option<ProbeFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeStream {
    pub index: Option<usize>,
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub disposition: Disposition,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Disposition {
    #[serde(default)]
    pub default: i64,
    #[serde(default)]
    pub forced: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeFormat {
    pub format_name: Option<String>,
    pub duration: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl ProbeOutput {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Container duration in seconds
    pub fn duration_secs(&self) -> Option<f64> {
        self.format
            .as_ref()
            .and_then(|f| f.duration.as_deref())
            .and_then(|d| d.trim().parse::<f64>().ok())
            .filter(|d| *d > 0.0)
    }

    /// First non-empty container-level tag among `keys`
    pub fn format_tag(&self, keys: &[&str]) -> Option<&str> {
        self.format.as_ref().and_then(|f| lookup_tag(&f.tags, keys))
    }
}

impl ProbeStream {
    /// First non-empty stream tag among `keys`
    pub fn tag(&self, keys: &[&str]) -> Option<&str> {
        lookup_tag(&self.tags, keys)
    }

    pub fn is_default(&self) -> bool {
        self.disposition.default != 0
    }

    pub fn is_forced(&self) -> bool {
        self.disposition.forced != 0
    }
}

fn lookup_tag<'a>(tags: &'a HashMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| tags.get(*key))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
}
