//! Structured parsing of command output with TextFSM templates.

mod index;

pub use index::{INDEX_FILE, TemplateIndex};

use log::{debug, warn};
use serde::Serialize;
use serde_json::{Map, Value};
use textfsm_rust::Template;

use crate::error::{ParseError, Result};

/// One parsed row, keyed by lowercased template value names.
pub type Record = Map<String, Value>;

/// Command output as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    /// Parsed records (possibly empty when a template matched nothing).
    Records(Vec<Record>),
    /// Raw, normalized device output.
    Text(String),
}

impl CommandOutput {
    /// Records, if the output was parsed.
    pub fn records_mut(&mut self) -> Option<&mut Vec<Record>> {
        match self {
            CommandOutput::Records(records) => Some(records),
            CommandOutput::Text(_) => None,
        }
    }
}

/// Parse `output` using the templates the index maps to
/// `platform`/`command`.
///
/// `Ok(None)` means no template applies and the caller keeps the raw text.
pub fn parse_with_index(
    index: &TemplateIndex,
    platform: &str,
    command: &str,
    output: &str,
) -> Result<Option<Vec<Record>>> {
    let Some(templates) = index.find(platform, command) else {
        let origin = if index.is_builtin() { "built-in" } else { "configured" };
        debug!("no template for {} / {:?} in the {} index", platform, command, origin);
        return Ok(None);
    };

    let mut merged: Vec<Record> = Vec::new();
    for name in templates {
        let source = index.read_template(name)?;
        let records = parse_text(name, &source, output)?;
        debug!("template {} produced {} records", name, records.len());

        if merged.is_empty() {
            merged = records;
            continue;
        }
        for (target, extra) in merged.iter_mut().zip(records) {
            target.extend(extra);
        }
    }
    Ok(Some(merged))
}

/// Parse `output` with a single template given as text.
pub fn parse_text(template_name: &str, template: &str, output: &str) -> Result<Vec<Record>> {
    let fail = |message: String| ParseError::Template {
        template: template_name.to_string(),
        message,
    };

    let template = Template::parse_str(template).map_err(|e| fail(e.to_string()))?;
    let mut parser = template.parser();
    let rows = parser
        .parse_text_to_dicts(output)
        .map_err(|e| fail(e.to_string()))?;

    Ok(rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(key, value)| (key.to_lowercase(), Value::String(value)))
                .collect()
        })
        .collect())
}

/// Decide the output shape for one command.
///
/// Parsing problems are logged and fall back to the raw text.
pub fn structure_output(
    index: &TemplateIndex,
    platform: &str,
    command: &str,
    output: String,
) -> CommandOutput {
    match parse_with_index(index, platform, command, &output) {
        Ok(Some(records)) => CommandOutput::Records(records),
        Ok(None) => CommandOutput::Text(output),
        Err(e) => {
            warn!("structured parsing of {:?} failed: {}", command, e);
            CommandOutput::Text(output)
        }
    }
}
