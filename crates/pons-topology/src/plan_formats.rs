//! Contact-plan file format loaders.
//!
//! Every loader returns a flat `Vec<Contact>`, handed to
//! [`crate::CoreContactPlan::new`] regardless of source format — parsing and
//! in-memory representation are deliberately decoupled, per
//! `ContactPlan`'s doc comment.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use pons_core::NodeId;

use crate::contact::Contact;
use crate::error::{TopologyError, TopologyResult};

/// Parses `NNNmbit`/`NNNkbit`/`NNNgbit` (case-insensitive) or a bare integer
/// bits-per-second value.
pub fn parse_bandwidth(raw: &str) -> TopologyResult<u64> {
    let lower = raw.to_ascii_lowercase();
    let (digits, multiplier) = if let Some(d) = lower.strip_suffix("gbit") {
        (d, 1_000_000_000)
    } else if let Some(d) = lower.strip_suffix("mbit") {
        (d, 1_000_000)
    } else if let Some(d) = lower.strip_suffix("kbit") {
        (d, 1_000)
    } else {
        (lower.as_str(), 1)
    };
    digits
        .trim()
        .parse::<u64>()
        .map(|n| n * multiplier)
        .map_err(|_| TopologyError::Parse(format!("invalid bandwidth value: {raw:?}")))
}

fn lookup_node(token: &str, mapping: &HashMap<String, u32>) -> TopologyResult<NodeId> {
    if let Some(id) = mapping.get(token) {
        return Ok(NodeId(*id));
    }
    token
        .parse::<u32>()
        .map(NodeId)
        .map_err(|_| TopologyError::Parse(format!("unknown node identifier: {token:?}")))
}

// ── Core line format ──────────────────────────────────────────────────────────

/// Parses the native core contact-plan line format:
///
/// ```text
/// s loop 1
/// a contact 0 100 1 2 10mbit 0.0 0.1 0.01
/// a fixed 1 2 10mbit 0.0 0.1 0.01
/// # a comment
/// // also a comment
/// ```
///
/// Returns `(contacts, loop_mode)`. When `symmetric` is set, every parsed
/// contact also gets an explicit reverse-node duplicate appended.
pub fn load_core_reader<R: Read>(
    reader: R,
    mapping: &HashMap<String, u32>,
    symmetric: bool,
) -> TopologyResult<(Vec<Contact>, bool)> {
    use std::io::{BufRead, BufReader};

    let mut contacts = Vec::new();
    let mut loop_mode = false;

    for line in BufReader::new(reader).lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() == 3 && fields[0] == "s" && fields[1] == "loop" {
            loop_mode = fields[2] == "1";
            continue;
        }
        if fields.len() >= 2 && fields[0] == "a" && fields[1] == "contact" {
            if fields.len() != 10 {
                return Err(TopologyError::Parse(format!("invalid contact line: {line}")));
            }
            let start: f64 = fields[2]
                .parse()
                .map_err(|_| TopologyError::Parse(format!("invalid start time: {line}")))?;
            let end: f64 = fields[3]
                .parse()
                .map_err(|_| TopologyError::Parse(format!("invalid end time: {line}")))?;
            let n1 = lookup_node(fields[4], mapping)?;
            let n2 = lookup_node(fields[5], mapping)?;
            let bw = parse_bandwidth(fields[6])?;
            let loss: f64 = fields[7]
                .parse()
                .map_err(|_| TopologyError::Parse(format!("invalid loss: {line}")))?;
            let delay: f64 = fields[8]
                .parse()
                .map_err(|_| TopologyError::Parse(format!("invalid delay: {line}")))?;
            let jitter: f64 = fields[9]
                .parse()
                .map_err(|_| TopologyError::Parse(format!("invalid jitter: {line}")))?;
            let contact = Contact::scheduled((start, end), (n1, n2), bw, loss, delay, jitter);
            if symmetric {
                let mut rev = contact;
                rev.nodes = (n2, n1);
                contacts.push(rev);
            }
            contacts.push(contact);
            continue;
        }
        if fields.len() >= 2 && fields[0] == "a" && fields[1] == "fixed" {
            if fields.len() != 8 {
                return Err(TopologyError::Parse(format!("invalid fixed line: {line}")));
            }
            let n1 = lookup_node(fields[2], mapping)?;
            let n2 = lookup_node(fields[3], mapping)?;
            let bw = parse_bandwidth(fields[4])?;
            let loss: f64 = fields[5]
                .parse()
                .map_err(|_| TopologyError::Parse(format!("invalid loss: {line}")))?;
            let delay: f64 = fields[6]
                .parse()
                .map_err(|_| TopologyError::Parse(format!("invalid delay: {line}")))?;
            let jitter: f64 = fields[7]
                .parse()
                .map_err(|_| TopologyError::Parse(format!("invalid jitter: {line}")))?;
            let contact = Contact::fixed((n1, n2), bw, loss, delay, jitter);
            if symmetric {
                let mut rev = contact;
                rev.nodes = (n2, n1);
                contacts.push(rev);
            }
            contacts.push(contact);
        }
    }

    Ok((contacts, loop_mode))
}

pub fn load_core_file(
    path: &Path,
    mapping: &HashMap<String, u32>,
    symmetric: bool,
) -> TopologyResult<(Vec<Contact>, bool)> {
    load_core_reader(std::fs::File::open(path)?, mapping, symmetric)
}

// ── ION format ────────────────────────────────────────────────────────────────

/// Speed of light, metres per second — converts ION `range` lines
/// (light-seconds) to an informational `range_m` field.
pub const LIGHT_SPEED_MPS: f64 = 299_792_458.0;

/// Parses `a contact|range {start} {end} {n1} {n2} {bw_or_range}` lines.
/// `range` rows carry a light-seconds distance, stored as `range_m` and
/// otherwise ignored by routing.
pub fn load_ion_reader<R: Read>(
    reader: R,
    mapping: &HashMap<String, u32>,
) -> TopologyResult<Vec<Contact>> {
    use std::io::{BufRead, BufReader};

    let mut contacts = Vec::new();

    for line in BufReader::new(reader).lines() {
        let line = line?;
        let line = line.trim().to_ascii_lowercase();
        if line.is_empty() || line.starts_with('#') || !line.starts_with('a') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 7 {
            continue;
        }
        let kind = fields[1];
        let start: f64 = fields[2]
            .parse()
            .map_err(|_| TopologyError::Parse(format!("invalid start time: {line}")))?;
        let end: f64 = fields[3]
            .parse()
            .map_err(|_| TopologyError::Parse(format!("invalid end time: {line}")))?;
        let n1 = lookup_node(fields[4], mapping)?;
        let n2 = lookup_node(fields[5], mapping)?;
        let value: f64 = fields[6]
            .parse()
            .map_err(|_| TopologyError::Parse(format!("invalid bandwidth/range value: {line}")))?;

        let mut contact = Contact::scheduled((start, end), (n1, n2), 0, 0.0, 0.0, 0.0);
        if kind == "range" {
            contact.range_m = Some(value * LIGHT_SPEED_MPS);
        } else {
            contact.bandwidth_bps = value as u64;
        }
        contacts.push(contact);
    }

    Ok(contacts)
}

// ── CSV format ────────────────────────────────────────────────────────────────

const START_ALIASES: &[&str] = &["start_time", "start"];
const END_ALIASES: &[&str] = &["end_time", "end"];
const NODE1_ALIASES: &[&str] = &["node1", "src"];
const NODE2_ALIASES: &[&str] = &["node2", "dst"];
const BW_ALIASES: &[&str] = &["bandwidth", "bw"];

fn resolve_column(headers: &csv::StringRecord, aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|h| aliases.contains(&h))
}

pub fn load_csv_reader<R: Read>(
    reader: R,
    mapping: &HashMap<String, u32>,
) -> TopologyResult<Vec<Contact>> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let start_idx = resolve_column(&headers, START_ALIASES)
        .ok_or_else(|| TopologyError::Parse("no start_time/start column in CSV".into()))?;
    let end_idx = resolve_column(&headers, END_ALIASES)
        .ok_or_else(|| TopologyError::Parse("no end_time/end column in CSV".into()))?;
    let node1_idx = resolve_column(&headers, NODE1_ALIASES)
        .ok_or_else(|| TopologyError::Parse("no node1/src column in CSV".into()))?;
    let node2_idx = resolve_column(&headers, NODE2_ALIASES)
        .ok_or_else(|| TopologyError::Parse("no node2/dst column in CSV".into()))?;
    let bw_idx = resolve_column(&headers, BW_ALIASES);
    let loss_idx = headers.iter().position(|h| h == "loss");
    let delay_idx = headers.iter().position(|h| h == "delay");
    let jitter_idx = headers.iter().position(|h| h == "jitter");

    let field = |row: &csv::StringRecord, idx: usize, name: &str| -> TopologyResult<String> {
        row.get(idx)
            .map(str::to_string)
            .ok_or_else(|| TopologyError::Parse(format!("missing {name} field")))
    };
    let float_field = |row: &csv::StringRecord, idx: Option<usize>, default: f64| -> f64 {
        idx.and_then(|i| row.get(i)).and_then(|s| s.parse().ok()).unwrap_or(default)
    };

    let mut contacts = Vec::new();
    for record in csv_reader.records() {
        let row = record?;
        let start: f64 = field(&row, start_idx, "start_time")?
            .parse()
            .map_err(|_| TopologyError::Parse("invalid start_time value".into()))?;
        let end: f64 = field(&row, end_idx, "end_time")?
            .parse()
            .map_err(|_| TopologyError::Parse("invalid end_time value".into()))?;
        let n1 = lookup_node(&field(&row, node1_idx, "node1")?, mapping)?;
        let n2 = lookup_node(&field(&row, node2_idx, "node2")?, mapping)?;
        let bw = match bw_idx.and_then(|i| row.get(i)) {
            Some(s) if !s.is_empty() => parse_bandwidth(s)?,
            _ => 0,
        };
        let loss = float_field(&row, loss_idx, 0.0);
        let delay = float_field(&row, delay_idx, 0.0);
        let jitter = float_field(&row, jitter_idx, 0.0);

        if end < 0.0 {
            contacts.push(Contact::fixed((n1, n2), bw, loss, delay, jitter));
        } else {
            contacts.push(Contact::scheduled((start, end), (n1, n2), bw, loss, delay, jitter));
        }
    }

    Ok(contacts)
}

// ── JSON format ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct JsonContact {
    #[serde(alias = "start")]
    start_time: Option<f64>,
    #[serde(alias = "end")]
    end_time: Option<f64>,
    #[serde(alias = "src")]
    node1: serde_json::Value,
    #[serde(alias = "dst")]
    node2: serde_json::Value,
    #[serde(alias = "bw")]
    bandwidth: Option<serde_json::Value>,
    #[serde(default)]
    loss: f64,
    #[serde(default)]
    delay: f64,
    #[serde(default)]
    jitter: f64,
    #[serde(default)]
    fixed: bool,
    #[serde(default)]
    symmetric: bool,
}

fn json_node(value: &serde_json::Value, mapping: &HashMap<String, u32>) -> TopologyResult<NodeId> {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(|n| NodeId(n as u32))
            .ok_or_else(|| TopologyError::Parse(format!("invalid node id: {value}"))),
        serde_json::Value::String(s) => lookup_node(s, mapping),
        other => Err(TopologyError::Parse(format!("invalid node identifier: {other}"))),
    }
}

pub fn load_json_str(json: &str, mapping: &HashMap<String, u32>) -> TopologyResult<Vec<Contact>> {
    let records: Vec<JsonContact> = serde_json::from_str(json)?;
    let mut contacts = Vec::new();

    for item in records {
        let n1 = json_node(&item.node1, mapping)?;
        let n2 = json_node(&item.node2, mapping)?;
        let bw = match &item.bandwidth {
            Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
            Some(serde_json::Value::String(s)) => parse_bandwidth(s)?,
            _ => 0,
        };

        let start = item.start_time.unwrap_or(0.0);
        let end = item.end_time.unwrap_or(-1.0);
        let is_fixed = item.fixed || (end < 0.0 && start == 0.0);

        let mut contact = if is_fixed {
            Contact::fixed((n1, n2), bw, item.loss, item.delay, item.jitter)
        } else {
            Contact::scheduled((start, end), (n1, n2), bw, item.loss, item.delay, item.jitter)
        };
        contacts.push(contact);

        if item.symmetric {
            contact.nodes = (n2, n1);
            contacts.push(contact);
        }
    }

    Ok(contacts)
}

pub fn load_json_file(path: &Path, mapping: &HashMap<String, u32>) -> TopologyResult<Vec<Contact>> {
    let text = std::fs::read_to_string(path)?;
    load_json_str(&text, mapping)
}
