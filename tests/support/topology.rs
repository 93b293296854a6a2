// ABOUTME: Simulated OESS topology answering shortest-path queries by breadth-first search.
// ABOUTME: Honours `link=` exclusions the way the real NRM does.

use super::{CONTROL_URL, WORKGROUP, action_of, query_values};
use async_trait::async_trait;
use bytes::Bytes;
use oess_cm::nrm::{NrmClient, NrmError, Session, Transport};
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

/// Undirected multigraph of named links between switches.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    links: Vec<(String, String, String)>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link(mut self, name: &str, a: &str, b: &str) -> Self {
        self.links
            .push((name.to_string(), a.to_string(), b.to_string()));
        self
    }

    pub fn link_names(&self) -> Vec<String> {
        self.links.iter().map(|(n, _, _)| n.clone()).collect()
    }

    /// Fewest-hop path from `from` to `to` avoiding `excluded`, as link names.
    pub fn shortest_path(&self, from: &str, to: &str, excluded: &HashSet<String>) -> Vec<String> {
        if from == to {
            return Vec::new();
        }
        let mut previous: HashMap<String, (String, String)> = HashMap::new();
        let mut seen: HashSet<String> = HashSet::from([from.to_string()]);
        let mut queue = VecDeque::from([from.to_string()]);

        while let Some(node) = queue.pop_front() {
            for (name, a, b) in &self.links {
                if excluded.contains(name) {
                    continue;
                }
                let next = if *a == node {
                    b
                } else if *b == node {
                    a
                } else {
                    continue;
                };
                if seen.insert(next.clone()) {
                    previous.insert(next.clone(), (node.clone(), name.clone()));
                    queue.push_back(next.clone());
                }
            }
        }

        let mut path = Vec::new();
        let mut cursor = to.to_string();
        while let Some((prev, link)) = previous.get(&cursor) {
            path.push(link.clone());
            cursor = prev.clone();
        }
        if cursor != from {
            return Vec::new();
        }
        path.reverse();
        path
    }

    pub async fn session(&self) -> Session<Topology> {
        let client = NrmClient::new(self.clone()).with_timeout(Duration::from_secs(5));
        Session::establish_with(CONTROL_URL, client, WORKGROUP)
            .await
            .unwrap()
    }
}

#[async_trait]
impl Transport for Topology {
    async fn get(&self, path_and_query: &str) -> oess_cm::nrm::Result<Bytes> {
        let body = match action_of(path_and_query).as_str() {
            "handshake" => "{}".to_string(),
            "get_workgroups" => format!(
                r#"{{"results":[{{"name":"{}","workgroup_id":7}}]}}"#,
                WORKGROUP
            ),
            "get_shortest_path" => {
                let nodes = query_values(path_and_query, "node");
                let excluded: HashSet<String> =
                    query_values(path_and_query, "link").into_iter().collect();
                let path = self.shortest_path(&nodes[0], &nodes[1], &excluded);
                let entries: Vec<String> = path
                    .iter()
                    .map(|l| format!(r#"{{"link":"{}"}}"#, l))
                    .collect();
                format!(r#"{{"results":[{}]}}"#, entries.join(","))
            }
            other => {
                return Err(NrmError::Status {
                    status: 404,
                    body: format!("topology does not answer {}", other),
                });
            }
        };
        Ok(Bytes::from(body))
    }
}
