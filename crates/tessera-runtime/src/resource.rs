//! Stylesheet resource types and the `<link>` tag writer.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A stylesheet shape renders as a `<link>` reference written into the page
//! output. The ambient display value a binding receives is the typed
//! [`StyleResource`]: the resource definition, an optional conditional-comment
//! expression, and any extra tag attributes.

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

/// A registered stylesheet resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Logical resource name (the shape-name fragment).
    pub name: String,
    /// Fallback URL used when the binding carries no virtual path.
    pub url: String,
}

impl ResourceDefinition {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// The display value handed to a stylesheet shape's renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleResource {
    /// The resource being rendered. Absent when the host failed to attach
    /// one; renderers report that as a defined error rather than panicking.
    pub resource: Option<ResourceDefinition>,
    /// Conditional-comment expression (e.g. `lt IE 9`), if any.
    pub condition: Option<String>,
    /// Extra attributes for the emitted tag.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl StyleResource {
    pub fn new(resource: ResourceDefinition) -> Self {
        Self {
            resource: Some(resource),
            condition: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Write a stylesheet reference to the output stream.
///
/// Emits a `<link rel="stylesheet">` tag for `href` (falling back to the
/// resource's own URL when `href` is empty), with any extra attributes in
/// key order, wrapped in a downlevel conditional comment when `condition`
/// is present.
pub fn write_resource<W: Write + ?Sized>(
    out: &mut W,
    resource: &ResourceDefinition,
    href: &str,
    condition: Option<&str>,
    attributes: &BTreeMap<String, String>,
) -> io::Result<()> {
    let url = if href.is_empty() { &resource.url } else { href };

    if let Some(condition) = condition {
        writeln!(out, "<!--[if {}]>", condition)?;
    }

    write!(
        out,
        "<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\"",
        escape_html(url)
    )?;
    for (name, value) in attributes {
        write!(out, " {}=\"{}\"", name, escape_html(value))?;
    }
    write!(out, " />")?;

    if condition.is_some() {
        write!(out, "\n<![endif]-->")?;
    }
    writeln!(out)?;

    Ok(())
}
