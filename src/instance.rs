//! Module for parsing and representing chain layout instances.
//!
//! An instance is a set of machines plus a sparse, symmetric table of the
//! pairs that can be cabled together and the cable length each pair needs.
//! Pairs absent from the table cannot be connected at all.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::trace;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::solution::Cost;

/// A machine to be placed somewhere in the chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    /// Machine identifier (0-indexed internally)
    pub id: usize,
    /// Human-readable label from the instance file (e.g. "C7")
    pub label: String,
}

impl Machine {
    pub fn new(id: usize, label: &str) -> Self {
        Machine { id, label: label.to_string() }
    }
}

/// A complete chain layout instance: machines plus the connection table.
///
/// The table is built once and never mutated afterwards; lookups are
/// symmetric (`connection(u, v) == connection(v, u)`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainInstance {
    /// Name of the instance
    pub name: String,
    /// Number of machines
    pub dimension: usize,
    /// List of all machines
    pub machines: Vec<Machine>,
    /// Symmetric matrix of cable lengths; `None` = pair cannot be cabled
    #[serde(skip)]
    connections: Vec<Vec<Option<f64>>>,
}

impl ChainInstance {
    /// Build an instance from machine labels and an explicit edge list.
    ///
    /// Rejects duplicate labels, unknown endpoints, self-loops, non-positive
    /// lengths and conflicting duplicate edges.
    pub fn from_edges(name: &str, labels: &[&str], edges: &[(&str, &str, f64)]) -> Result<Self, String> {
        let mut machines = Vec::with_capacity(labels.len());
        for (id, label) in labels.iter().enumerate() {
            if machines.iter().any(|m: &Machine| m.label == *label) {
                return Err(format!("Duplicate machine label: {}", label));
            }
            machines.push(Machine::new(id, label));
        }

        let n = machines.len();
        let mut connections: Vec<Vec<Option<f64>>> = vec![vec![None; n]; n];

        for (a, b, length) in edges {
            let u = machines.iter().position(|m| m.label == *a)
                .ok_or_else(|| format!("Unknown machine in edge list: {}", a))?;
            let v = machines.iter().position(|m| m.label == *b)
                .ok_or_else(|| format!("Unknown machine in edge list: {}", b))?;

            if u == v {
                return Err(format!("Self-connection on machine {}", a));
            }
            if *length <= 0.0 {
                return Err(format!("Non-positive cable length for {}-{}: {}", a, b, length));
            }
            if let Some(existing) = connections[u][v] {
                if (existing - length).abs() > 1e-9 {
                    return Err(format!("Conflicting lengths for {}-{}: {} vs {}", a, b, existing, length));
                }
            }

            connections[u][v] = Some(*length);
            connections[v][u] = Some(*length);
        }

        Ok(ChainInstance {
            name: name.to_string(),
            dimension: n,
            machines,
            connections,
        })
    }

    /// Parse an instance from a plain text file.
    ///
    /// Format: an optional `NAME:` line, a `MACHINES:` line listing all
    /// labels, then one `A B length` line per possible connection. Blank
    /// lines and lines starting with `#` are ignored.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let file = File::open(&path)
            .map_err(|e| format!("Cannot open file: {}", e))?;
        let reader = BufReader::new(file);

        let mut name = String::new();
        let mut labels: Vec<String> = Vec::new();
        let mut edges: Vec<(String, String, f64)> = Vec::new();

        for line in reader.lines() {
            let line = line.map_err(|e| format!("Read error: {}", e))?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with("NAME:") {
                name = line.replace("NAME:", "").trim().to_string();
                continue;
            }
            if line.starts_with("MACHINES:") {
                labels = line.replace("MACHINES:", "")
                    .split_whitespace()
                    .map(|s| s.to_string())
                    .collect();
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 3 {
                return Err(format!("Malformed connection line: {}", line));
            }
            let length: f64 = parts[2].parse()
                .map_err(|_| format!("Invalid cable length: {}", parts[2]))?;
            edges.push((parts[0].to_string(), parts[1].to_string(), length));
        }

        if labels.is_empty() {
            return Err("Missing MACHINES: line".to_string());
        }

        let label_refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
        let edge_refs: Vec<(&str, &str, f64)> = edges.iter()
            .map(|(a, b, w)| (a.as_str(), b.as_str(), *w))
            .collect();

        Self::from_edges(&name, &label_refs, &edge_refs)
    }

    /// The 12-machine instance from the original wiring problem statement.
    pub fn reference() -> Self {
        let labels = [
            "C1", "C2", "C3", "C4", "C5", "C6",
            "C7", "C8", "C9", "C10", "C11", "C12",
        ];
        let edges = [
            ("C1", "C2", 30.0), ("C1", "C3", 84.0), ("C1", "C4", 56.0),
            ("C1", "C6", 70.0), ("C1", "C8", 75.0), ("C1", "C10", 40.0),
            ("C1", "C12", 10.0), ("C2", "C3", 65.0), ("C2", "C7", 70.0),
            ("C2", "C10", 40.0), ("C3", "C4", 60.0), ("C3", "C5", 52.0),
            ("C3", "C6", 55.0), ("C3", "C8", 135.0), ("C3", "C9", 143.0),
            ("C3", "C10", 48.0), ("C3", "C11", 25.0), ("C4", "C5", 135.0),
            ("C4", "C8", 20.0), ("C4", "C11", 58.0), ("C5", "C6", 70.0),
            ("C5", "C8", 122.0), ("C5", "C9", 98.0), ("C5", "C10", 80.0),
            ("C6", "C7", 68.0), ("C6", "C9", 82.0), ("C6", "C10", 35.0),
            ("C6", "C12", 130.0), ("C7", "C8", 40.0), ("C7", "C9", 120.0),
            ("C7", "C10", 57.0), ("C8", "C9", 89.0), ("C8", "C11", 45.0),
            ("C9", "C10", 23.0), ("C9", "C12", 68.0), ("C10", "C11", 10.0),
            ("C11", "C12", 14.0),
        ];
        Self::from_edges("machines12", &labels, &edges)
            .expect("reference instance is well-formed")
    }

    /// Cable length between two machines, if they can be connected.
    /// Symmetric in its arguments; ids outside the instance have no
    /// connections.
    #[inline]
    pub fn connection(&self, u: usize, v: usize) -> Option<f64> {
        self.connections.get(u)
            .and_then(|row| row.get(v))
            .copied()
            .flatten()
    }

    /// Whether two machines can be cabled together
    #[inline]
    pub fn can_connect(&self, u: usize, v: usize) -> bool {
        self.connection(u, v).is_some()
    }

    /// Number of machines a given machine can be cabled to
    pub fn degree(&self, u: usize) -> usize {
        self.connections[u].iter().filter(|c| c.is_some()).count()
    }

    /// Look up a machine id by its label
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.machines.iter().position(|m| m.label == label)
    }

    /// Total cable length of a chain ordering.
    ///
    /// Walks consecutive pairs and sums their cable lengths. The moment a
    /// pair has no possible connection the whole ordering is infeasible and
    /// evaluation stops; no partial sum ever escapes.
    pub fn chain_cost(&self, sequence: &[usize]) -> Cost {
        let mut total = 0.0;

        for pair in sequence.windows(2) {
            match self.connection(pair[0], pair[1]) {
                Some(length) => total += length,
                None => {
                    trace!(
                        "no possible connection between machines {} and {}",
                        pair[0], pair[1]
                    );
                    return Cost::Infeasible;
                }
            }
        }

        Cost::Feasible(total)
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let mut lengths: Vec<f64> = Vec::new();
        for u in 0..self.dimension {
            for v in u + 1..self.dimension {
                if let Some(length) = self.connection(u, v) {
                    lengths.push(length);
                }
            }
        }
        lengths.sort_by_key(|&l| OrderedFloat(l));

        let num_connections = lengths.len();
        let avg_length = if num_connections > 0 {
            lengths.iter().sum::<f64>() / num_connections as f64
        } else {
            0.0
        };
        let min_length = lengths.first().copied().unwrap_or(0.0);
        let max_length = lengths.last().copied().unwrap_or(0.0);

        let degrees: Vec<usize> = (0..self.dimension).map(|u| self.degree(u)).collect();
        let min_degree = degrees.iter().min().copied().unwrap_or(0);
        let max_degree = degrees.iter().max().copied().unwrap_or(0);

        InstanceStatistics {
            name: self.name.clone(),
            dimension: self.dimension,
            num_connections,
            avg_length,
            min_length,
            max_length,
            min_degree,
            max_degree,
        }
    }
}

/// Statistics about a chain layout instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub num_connections: usize,
    pub avg_length: f64,
    pub min_length: f64,
    pub max_length: f64,
    pub min_degree: usize,
    pub max_degree: usize,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Machines: {}", self.dimension)?;
        writeln!(f, "  Possible connections: {}", self.num_connections)?;
        writeln!(f, "  Avg cable length: {:.2}", self.avg_length)?;
        writeln!(f, "  Min cable length: {:.2}", self.min_length)?;
        writeln!(f, "  Max cable length: {:.2}", self.max_length)?;
        writeln!(f, "  Degree range: {}..{}", self.min_degree, self.max_degree)
    }
}
