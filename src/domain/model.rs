use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Participant → assigned task, in the order the draws happened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawResults(IndexMap<String, String>);

impl DrawResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, participant: &str) -> Option<&str> {
        self.0.get(participant).map(String::as_str)
    }

    pub fn contains(&self, participant: &str) -> bool {
        self.0.contains_key(participant)
    }

    pub fn insert(&mut self, participant: String, task: String) -> Option<String> {
        self.0.insert(participant, task)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 每個任務已被抽中的次數
    pub fn used_counts(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for task in self.0.values() {
            *counts.entry(task.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

impl FromIterator<(String, String)> for DrawResults {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DrawRequest {
    #[serde(default)]
    pub name: Option<String>,
}

impl DrawRequest {
    /// 去除前後空白後的姓名，空字串視為未填
    pub fn participant(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResponse {
    pub task: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
