//! Dotted-path configuration store
//!
//! An in-memory, line-preserving model of `conan.conf`. The text format is
//! INI-like:
//!
//! ```text
//! # comment
//! [log]
//! level = critical    # environment CONAN_LOGGING_LEVEL
//!
//! [proxies]
//! http = http://10.10.1.10:3128
//!     special.com = http://other:8080
//!
//! [hooks]
//! attribute_checker
//! ```
//!
//! Untouched entries, comments and blank lines are written back exactly as
//! they were read. Entries changed through [`ConfigStore::set`] are rendered
//! as `key = value`, with `%` escaped as `%%` (and unescaped on read).

use crate::config::error::{ConfigError, Result};
use crate::config::path::ConfigPath;

/// Section whose whole-section listing is a comma-separated list of key names
const HOOKS_SECTION: &str = "hooks";

/// Indentation used for continuation lines of multi-line values
const CONTINUATION_INDENT: &str = "\t";

/// A single `key` or `key = value` entry
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: String,
    /// `None` for a no-value key
    value: Option<String>,
    /// Original source lines; `None` once the entry has been modified
    raw: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    /// Comment or blank line
    Trivia(String),
    Entry(Entry),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    name: String,
    /// Original header line; `None` for sections created in memory
    header: Option<String>,
    items: Vec<Item>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self { name: name.to_string(), header: None, items: Vec::new() }
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.items.iter().filter_map(|item| match item {
            Item::Entry(entry) => Some(entry),
            Item::Trivia(_) => None,
        })
    }

    fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries().find(|entry| entry.key == key)
    }

    fn entry_index(&self, key: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| matches!(item, Item::Entry(entry) if entry.key == key))
    }
}

/// In-memory representation of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigStore {
    /// Trivia lines before the first section header
    preamble: Vec<String>,
    sections: Vec<Section>,
    ends_with_newline: bool,
    /// Lines written by `set` end in `\r\n` when the parsed text did
    crlf: bool,
}

/// Parser state for the entry currently accepting continuation lines
struct OpenEntry {
    section: usize,
    item: usize,
    indent: usize,
}

impl ConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self { ends_with_newline: true, ..Self::default() }
    }

    /// Parse the text of a configuration file
    pub fn parse(text: &str) -> Result<Self> {
        let mut store = Self::new();
        store.ends_with_newline = text.is_empty() || text.ends_with('\n');
        store.crlf = text.split('\n').next().is_some_and(|line| line.ends_with('\r'));

        let body = text.strip_suffix('\n').unwrap_or(text);
        if text.is_empty() {
            return Ok(store);
        }

        let mut pending: Vec<String> = Vec::new();
        let mut open: Option<OpenEntry> = None;

        for (index, line) in body.split('\n').enumerate() {
            let number = index + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                pending.push(line.to_string());
                continue;
            }

            let indent = line.len() - line.trim_start().len();

            if let Some(current) = open.as_ref().filter(|current| indent > current.indent) {
                let item = &mut store.sections[current.section].items[current.item];
                let Item::Entry(entry) = item else {
                    unreachable!("open entry always points at an entry");
                };
                let Some(value) = entry.value.as_mut() else {
                    return Err(ConfigError::format(
                        number,
                        format!("continuation line for no-value key '{}'", entry.key),
                    ));
                };
                value.push('\n');
                value.push_str(&unescape(trimmed));
                if let Some(raw) = entry.raw.as_mut() {
                    raw.append(&mut pending);
                    raw.push(line.to_string());
                }
                continue;
            }

            if trimmed.starts_with('[') {
                let name = parse_header(trimmed)
                    .ok_or_else(|| ConfigError::format(number, format!("malformed section header '{}'", trimmed)))?;
                if store.section_index(name).is_some() {
                    return Err(ConfigError::format(number, format!("section '{}' already exists", name)));
                }
                store.flush_trivia(&mut pending);
                store.sections.push(Section {
                    name: name.to_string(),
                    header: Some(line.to_string()),
                    items: Vec::new(),
                });
                open = None;
                continue;
            }

            let Some(section_index) = store.sections.len().checked_sub(1) else {
                return Err(ConfigError::format(number, format!("'{}' is outside of any section", trimmed)));
            };

            let (key, value) = match trimmed.split_once('=') {
                Some((key, value)) => (key.trim(), Some(unescape(value.trim()))),
                None => (trimmed, None),
            };
            if key.is_empty() {
                return Err(ConfigError::format(number, "entry has an empty key"));
            }

            store.flush_trivia(&mut pending);
            let section = &mut store.sections[section_index];
            if section.entry(key).is_some() {
                return Err(ConfigError::format(
                    number,
                    format!("key '{}' already exists in [{}]", key, section.name),
                ));
            }
            section.items.push(Item::Entry(Entry {
                key: key.to_string(),
                value,
                raw: Some(vec![line.to_string()]),
            }));
            open = Some(OpenEntry {
                section: section_index,
                item: section.items.len() - 1,
                indent,
            });
        }

        store.flush_trivia(&mut pending);
        Ok(store)
    }

    /// Render the whole document back to text
    pub fn render(&self) -> String {
        let mut out = String::new();

        for line in &self.preamble {
            push_line(&mut out, line);
        }

        let cr = if self.crlf { "\r" } else { "" };
        for section in &self.sections {
            match &section.header {
                Some(header) => push_line(&mut out, header),
                None => {
                    if !out.is_empty() && !out.ends_with("\n\n") && !out.ends_with("\n\r\n") {
                        push_line(&mut out, cr);
                    }
                    push_line(&mut out, &format!("[{}]{}", section.name, cr));
                }
            }

            for item in &section.items {
                match item {
                    Item::Trivia(line) => push_line(&mut out, line),
                    Item::Entry(Entry { raw: Some(lines), .. }) => {
                        for line in lines {
                            push_line(&mut out, line);
                        }
                    }
                    Item::Entry(entry) => render_entry(&mut out, entry, self.crlf),
                }
            }
        }

        if !self.ends_with_newline && out.ends_with('\n') {
            out.pop();
        }
        out
    }

    /// Names of all sections, in file order
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|section| section.name.as_str())
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.section_index(section).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Raw `(key, value)` pairs of a section, in declaration order
    pub fn entries(&self, section: &str) -> Result<Vec<(&str, Option<&str>)>> {
        let section = self.find_section(section)?;
        Ok(section
            .entries()
            .map(|entry| (entry.key.as_str(), entry.value.as_deref()))
            .collect())
    }

    /// Raw value of a key, keeping no-value keys distinct from empty values
    pub fn value(&self, section: &str, key: &str) -> Result<Option<&str>> {
        let found = self.find_section(section)?;
        found
            .entry(key)
            .map(|entry| entry.value.as_deref())
            .ok_or_else(|| missing_key(section, key))
    }

    /// Look up a path.
    ///
    /// A section path yields a listing of the section. A key path yields the
    /// value with any trailing `" #comment"` removed.
    pub fn get(&self, path: &ConfigPath) -> Result<String> {
        let section = self.find_section(path.section_name())?;

        let Some(key) = path.key_name() else {
            return Ok(list_section(section));
        };

        let entry = section
            .entry(key)
            .ok_or_else(|| missing_key(path.section_name(), key))?;
        Ok(entry.value.as_deref().map(strip_comment).unwrap_or_default())
    }

    /// Store a value, creating the section when needed
    pub fn set(&mut self, path: &ConfigPath, value: &str) -> Result<()> {
        let key = path.require_key()?;
        path.validate()?;
        check_value(path, value)?;
        let section_name = path.section_name();

        let index = match self.section_index(section_name) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(section_name));
                self.sections.len() - 1
            }
        };
        let section = &mut self.sections[index];

        let entry = Entry {
            key: key.to_string(),
            value: Some(value.to_string()),
            raw: None,
        };

        match section.entry_index(key) {
            Some(position) => section.items[position] = Item::Entry(entry),
            None => {
                let position = section
                    .items
                    .iter()
                    .rposition(|item| matches!(item, Item::Entry(_)))
                    .map_or(0, |last| last + 1);
                section.items.insert(position, Item::Entry(entry));
            }
        }

        self.ends_with_newline = true;
        Ok(())
    }

    /// Remove a whole section or a single key
    pub fn remove(&mut self, path: &ConfigPath) -> Result<()> {
        let section_name = path.section_name();
        let index = self
            .section_index(section_name)
            .ok_or_else(|| ConfigError::MissingSection(section_name.to_string()))?;

        match path.key_name() {
            None => {
                self.sections.remove(index);
            }
            Some(key) => {
                let section = &mut self.sections[index];
                let position = section
                    .entry_index(key)
                    .ok_or_else(|| missing_key(section_name, key))?;
                section.items.remove(position);
            }
        }

        Ok(())
    }

    fn section_index(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|section| section.name == name)
    }

    fn find_section(&self, name: &str) -> Result<&Section> {
        self.sections
            .iter()
            .find(|section| section.name == name)
            .ok_or_else(|| ConfigError::MissingSection(name.to_string()))
    }

    /// Attach pending comment/blank lines to the innermost open container
    fn flush_trivia(&mut self, pending: &mut Vec<String>) {
        match self.sections.last_mut() {
            Some(section) => section.items.extend(pending.drain(..).map(Item::Trivia)),
            None => self.preamble.append(pending),
        }
    }
}

fn missing_key(section: &str, key: &str) -> ConfigError {
    ConfigError::MissingKey {
        section: section.to_string(),
        key: key.to_string(),
    }
}

/// Section header name, or `None` when the header is malformed
fn parse_header(trimmed: &str) -> Option<&str> {
    let inner = trimmed.strip_prefix('[')?;
    let end = inner.find(']')?;
    let (name, rest) = (&inner[..end], inner[end + 1..].trim());
    if name.is_empty() || !(rest.is_empty() || rest.starts_with('#') || rest.starts_with(';')) {
        return None;
    }
    Some(name)
}

fn list_section(section: &Section) -> String {
    if section.name == HOOKS_SECTION {
        return section
            .entries()
            .map(|entry| entry.key.as_str())
            .collect::<Vec<_>>()
            .join(",");
    }

    section
        .entries()
        .map(|entry| match &entry.value {
            Some(value) => format!("{} = {}", entry.key, value),
            None => entry.key.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_comment(value: &str) -> String {
    match value.find(" #") {
        Some(start) => value[..start].trim().to_string(),
        None => value.trim().to_string(),
    }
}

fn render_entry(out: &mut String, entry: &Entry, crlf: bool) {
    let cr = if crlf { "\r" } else { "" };
    let Some(value) = &entry.value else {
        push_line(out, &format!("{}{}", entry.key, cr));
        return;
    };

    let escaped = escape(value);
    let mut lines = escaped.split('\n');
    let first = lines.next().unwrap_or_default();
    push_line(out, &format!("{} = {}{}", entry.key, first, cr));
    for line in lines {
        push_line(out, &format!("{}{}{}", CONTINUATION_INDENT, line, cr));
    }
}

/// Reject values whose continuation lines would read back as blank or comment lines
fn check_value(path: &ConfigPath, value: &str) -> Result<()> {
    let hidden = value.split('\n').skip(1).find(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line.starts_with(';')
    });
    match hidden {
        Some(line) => Err(ConfigError::InvalidConfig(format!(
            "{} can't be stored: continuation line '{}' would be read back as a blank or comment line",
            path,
            line.trim()
        ))),
        None if value.contains('\r') => Err(ConfigError::InvalidConfig(format!(
            "{} can't be stored: carriage returns are not allowed in values",
            path
        ))),
        None => Ok(()),
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn escape(value: &str) -> String {
    value.replace('%', "%%")
}

fn unescape(value: &str) -> String {
    value.replace("%%", "%")
}
