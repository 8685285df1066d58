//! ntc-templates style template index.
//!
//! The index is a comma separated table with a header row naming at least
//! `Template`, `Platform` and `Command`. Command cells use the
//! `sh[[ow]]` completion shorthand; rows are tried top to bottom.
//!
//! ```text
//! Template, Hostname, Platform, Command
//!
//! cisco_ios_show_interfaces.textfsm, .*, cisco_ios, sh[[ow]] int[[erfaces]]
//! ```
//!
//! A built-in index covering `show interface` on Cisco IOS and NX-OS ships
//! with the crate and is used when no directory is configured.

use std::fs;
use std::io;
use std::path::PathBuf;

use log::{debug, error};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ParseError, Result};

static COMPLETION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[(.+?)\]\]").unwrap());

/// File name of the index inside a template directory.
pub const INDEX_FILE: &str = "index";

const BUILTIN_INDEX: &str = include_str!("../../templates/index");

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "cisco_ios_show_interfaces.textfsm",
        include_str!("../../templates/cisco_ios_show_interfaces.textfsm"),
    ),
    (
        "cisco_nxos_show_interface.textfsm",
        include_str!("../../templates/cisco_nxos_show_interface.textfsm"),
    ),
];

#[derive(Debug)]
enum TemplateSource {
    Directory(PathBuf),
    Builtin,
}

#[derive(Debug)]
struct IndexEntry {
    templates: Vec<String>,
    platform: Regex,
    command: Regex,
}

/// A loaded template index and where its templates are read from.
#[derive(Debug)]
pub struct TemplateIndex {
    source: TemplateSource,
    entries: Vec<IndexEntry>,
}

impl Default for TemplateIndex {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateIndex {
    /// Load `<dir>/index`.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let path = dir.join(INDEX_FILE);
        let contents = fs::read_to_string(&path).map_err(|e| ParseError::Index {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(dir, &contents)
    }

    /// Build an index from its text; templates resolve relative to `dir`.
    pub fn parse(dir: impl Into<PathBuf>, contents: &str) -> Result<Self> {
        let dir = dir.into();
        let label = dir.join(INDEX_FILE).display().to_string();
        let entries = parse_entries(&label, contents)?;
        debug!("loaded {} template index rows from {}", entries.len(), label);
        Ok(Self {
            source: TemplateSource::Directory(dir),
            entries,
        })
    }

    /// The index compiled into the binary.
    pub fn builtin() -> Self {
        let entries = parse_entries("<builtin>/index", BUILTIN_INDEX).unwrap_or_else(|e| {
            error!("built-in template index is unusable: {}", e);
            Vec::new()
        });
        Self {
            source: TemplateSource::Builtin,
            entries,
        }
    }

    /// Templates for the first row matching `platform` and `command`.
    pub fn find(&self, platform: &str, command: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|entry| entry.platform.is_match(platform) && entry.command.is_match(command))
            .map(|entry| entry.templates.as_slice())
    }

    /// Text of a template named in the index.
    pub fn read_template(&self, template: &str) -> Result<String> {
        match &self.source {
            TemplateSource::Directory(dir) => {
                let path = dir.join(template);
                fs::read_to_string(&path).map_err(|source| {
                    ParseError::TemplateIo {
                        path: path.display().to_string(),
                        source,
                    }
                    .into()
                })
            }
            TemplateSource::Builtin => BUILTIN_TEMPLATES
                .iter()
                .find(|(name, _)| *name == template)
                .map(|(_, text)| text.to_string())
                .ok_or_else(|| {
                    ParseError::TemplateIo {
                        path: format!("<builtin>/{}", template),
                        source: io::ErrorKind::NotFound.into(),
                    }
                    .into()
                }),
        }
    }

    /// Whether templates come from the compiled-in set.
    pub fn is_builtin(&self) -> bool {
        matches!(self.source, TemplateSource::Builtin)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no rows.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entries(index_path: &str, contents: &str) -> Result<Vec<IndexEntry>> {
    let fail = |line: usize, message: String| ParseError::Index {
        path: index_path.to_string(),
        message: format!("line {}: {}", line, message),
    };

    let mut rows = contents
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    let (header_line, header) = rows
        .next()
        .ok_or_else(|| fail(0, "missing header row".to_string()))?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let column = |name: &str| {
        columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .ok_or_else(|| fail(header_line, format!("missing '{}' column", name)))
    };
    let template_col = column("Template")?;
    let platform_col = column("Platform")?;
    let command_col = column("Command")?;

    let mut entries = Vec::new();
    for (line_no, line) in rows {
        // The last column may itself contain commas
        let cells: Vec<&str> = line.splitn(columns.len(), ',').map(str::trim).collect();
        if cells.len() != columns.len() {
            return Err(fail(line_no, format!("expected {} columns", columns.len())).into());
        }

        let platform = anchored(cells[platform_col])
            .map_err(|e| fail(line_no, e.to_string()))?;
        let command = anchored(&expand_completions(cells[command_col]))
            .map_err(|e| fail(line_no, e.to_string()))?;
        let templates = cells[template_col]
            .split(':')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect::<Vec<_>>();
        if templates.is_empty() {
            return Err(fail(line_no, "empty Template cell".to_string()).into());
        }

        entries.push(IndexEntry {
            templates,
            platform,
            command,
        });
    }

    Ok(entries)
}

/// Expand `[[abc]]` into nested optional groups: `(a(b(c)?)?)?`.
fn expand_completions(pattern: &str) -> String {
    COMPLETION
        .replace_all(pattern, |caps: &regex::Captures<'_>| {
            let word: Vec<String> = caps[1].chars().map(String::from).collect();
            format!("({}{}", word.join("("), ")?".repeat(word.len()))
        })
        .into_owned()
}

fn anchored(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})", pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = "\
# First line is the header fields for columns and is mandatory.
Template, Hostname, Platform, Command

cisco_ios_show_interfaces_status.textfsm, .*, cisco_ios, sh[[ow]] int[[erfaces]] st[[atus]]
cisco_ios_show_interfaces.textfsm, .*, cisco_ios, sh[[ow]] int[[erfaces]]
cisco_nxos_show_interface.textfsm, .*, cisco_nxos, sh[[ow]] int[[erface]]
cisco_ios_show_version.textfsm:cisco_ios_show_version_extra.textfsm, .*, cisco_(ios|xe), sh[[ow]] ver[[sion]]
";

    fn index() -> TemplateIndex {
        TemplateIndex::parse("/templates", INDEX).unwrap()
    }

    #[test]
    fn test_expand_completions() {
        assert_eq!(expand_completions("sh[[ow]]"), "sh(o(w)?)?");
        assert_eq!(expand_completions("sh[[ow]] ip"), "sh(o(w)?)? ip");
    }

    #[test]
    fn test_find_abbreviated_and_full_commands() {
        let index = index();
        assert_eq!(index.len(), 4);
        assert_eq!(
            index.find("cisco_ios", "show interface").unwrap(),
            ["cisco_ios_show_interfaces.textfsm"]
        );
        assert_eq!(
            index.find("cisco_ios", "sh int").unwrap(),
            ["cisco_ios_show_interfaces.textfsm"]
        );
        assert_eq!(
            index.find("cisco_ios", "show interfaces status").unwrap(),
            ["cisco_ios_show_interfaces_status.textfsm"]
        );
        assert_eq!(
            index.find("cisco_nxos", "show interface").unwrap(),
            ["cisco_nxos_show_interface.textfsm"]
        );
    }

    #[test]
    fn test_multiple_templates_and_platform_regex() {
        let index = index();
        assert_eq!(
            index.find("cisco_xe", "show version").unwrap(),
            [
                "cisco_ios_show_version.textfsm",
                "cisco_ios_show_version_extra.textfsm"
            ]
        );
    }

    #[test]
    fn test_no_match() {
        let index = index();
        assert!(index.find("arista_eos", "show interface").is_none());
        assert!(index.find("cisco_ios", "show clock").is_none());
    }

    #[test]
    fn test_read_template_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.textfsm"), "Value A (\\S+)\n").unwrap();
        let index = TemplateIndex::parse(dir.path(), INDEX).unwrap();
        assert!(!index.is_builtin());
        assert_eq!(index.read_template("a.textfsm").unwrap(), "Value A (\\S+)\n");

        let err = index.read_template("gone.textfsm").unwrap_err();
        assert!(err.to_string().contains("gone.textfsm"));
    }

    #[test]
    fn test_builtin_index_covers_show_interface() {
        let index = TemplateIndex::default();
        assert!(index.is_builtin());
        assert_eq!(index.len(), 2);

        for platform in ["cisco_ios", "cisco_xe"] {
            assert_eq!(
                index.find(platform, "show interfaces").unwrap(),
                ["cisco_ios_show_interfaces.textfsm"]
            );
        }
        assert_eq!(
            index.find("cisco_nxos", "sh int").unwrap(),
            ["cisco_nxos_show_interface.textfsm"]
        );

        assert!(index.find("cisco_ios", "show interface description").is_none());
        assert!(index.find("cisco_ios", "show version").is_none());
        assert!(index.find("arista_eos", "show interface").is_none());
    }

    #[test]
    fn test_builtin_templates_are_readable() {
        let index = TemplateIndex::builtin();
        for (name, _) in BUILTIN_TEMPLATES {
            assert!(index.read_template(name).unwrap().starts_with("Value Required INTERFACE"));
        }
        assert!(index.read_template("cisco_ios_show_version.textfsm").is_err());
    }

    #[test]
    fn test_bad_index() {
        assert!(TemplateIndex::parse("/t", "# only comments\n").is_err());
        assert!(TemplateIndex::parse("/t", "Template, Command\nx.textfsm, show\n").is_err());
        assert!(TemplateIndex::parse("/t", "Template, Platform, Command\nx.textfsm, ([, show\n").is_err());
    }
}
