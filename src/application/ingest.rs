//! Loading attack trees from JSON, YAML and XML files into nested records.
//!
//! JSON and YAML map one-to-one onto [`NodeRecord`]. In XML every element is a node:
//! `name` and `value` are attributes and child elements are children, e.g.
//!
//! ```xml
//! <node name="Root">
//!     <node name="Phishing" value="0.3"/>
//! </node>
//! ```

use std::fmt;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::{debug, instrument};

use crate::application::error_ext::IoResultExt;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::NodeRecord;
use crate::infrastructure::traits::FileSystem;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    Json,
    Yaml,
    Xml,
}

impl TreeFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> ApplicationResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(TreeFormat::Json),
            Some("yaml") | Some("yml") => Ok(TreeFormat::Yaml),
            Some("xml") => Ok(TreeFormat::Xml),
            _ => Err(ApplicationError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl fmt::Display for TreeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeFormat::Json => write!(f, "JSON"),
            TreeFormat::Yaml => write!(f, "YAML"),
            TreeFormat::Xml => write!(f, "XML"),
        }
    }
}

/// Read and parse the attack tree stored at `path`.
#[instrument(level = "debug", skip(fs))]
pub fn load_attack_tree(fs: &dyn FileSystem, path: &Path) -> ApplicationResult<NodeRecord> {
    let format = TreeFormat::from_path(path)?;
    let content = fs
        .read_to_string(path)
        .with_path_context("read attack tree", path)?;
    let record = parse_tree(&content, format)?;
    debug!("loaded {} tree '{}'", format, record.name);
    Ok(record)
}

/// Parse file content of the given format into the root record.
pub fn parse_tree(content: &str, format: TreeFormat) -> ApplicationResult<NodeRecord> {
    let parsed = match format {
        TreeFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        TreeFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        TreeFormat::Xml => parse_xml(content),
    };
    parsed.map_err(|message| ApplicationError::Parse { format, message })
}

fn parse_xml(content: &str) -> Result<NodeRecord, String> {
    let mut reader = Reader::from_str(content);
    // Elements opened but not yet closed, innermost last
    let mut open: Vec<NodeRecord> = Vec::new();
    let mut root: Option<NodeRecord> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => open.push(record_from_element(&e)?),
            Ok(Event::Empty(e)) => {
                let record = record_from_element(&e)?;
                attach(&mut open, &mut root, record)?;
            }
            Ok(Event::End(_)) => {
                let record = open.pop().ok_or("unexpected closing tag")?;
                attach(&mut open, &mut root, record)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            }
        }
    }

    if !open.is_empty() {
        return Err(format!("unclosed element '{}'", open[open.len() - 1].name));
    }
    root.ok_or_else(|| "document contains no element".to_string())
}

/// Hang a finished record onto its enclosing element, or make it the document root.
fn attach(
    open: &mut [NodeRecord],
    root: &mut Option<NodeRecord>,
    record: NodeRecord,
) -> Result<(), String> {
    match open.last_mut() {
        Some(parent) => parent.children.push(record),
        None if root.is_none() => *root = Some(record),
        None => return Err("more than one root element".to_string()),
    }
    Ok(())
}

fn record_from_element(element: &BytesStart) -> Result<NodeRecord, String> {
    let mut name = None;
    let mut value = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let text = attr.unescape_value().map_err(|e| e.to_string())?;
        match attr.key.as_ref() {
            b"name" => name = Some(text.into_owned()),
            // An empty value attribute counts as absent
            b"value" if !text.trim().is_empty() => {
                let parsed = text
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| format!("invalid value '{}'", text))?;
                value = Some(parsed);
            }
            _ => {}
        }
    }

    let tag = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    let name = name.ok_or_else(|| format!("<{}> element without 'name' attribute", tag))?;
    Ok(NodeRecord {
        name,
        value,
        children: Vec::new(),
    })
}
