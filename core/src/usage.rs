//! Usage documents for commands.
//!
//! [`Command::describe`] captures a command's declared parameters as a
//! serializable [`CommandDoc`]; [`format_doc`] renders it as plain usage
//! text, JSON or YAML. [`Command::doc`] is the plain text form, which is
//! also what gets written to stderr when binding fails.
//!
//! # Example
//!
//! ```
//! use star_core::*;
//!
//! let cmd = Command::new(|_| Ok(()))
//!     .with_positional(Param::string("src"))
//!     .with_positional(Param::optional("dst", parse_path))
//!     .with_flag(Param::repeated("exclude", parse_string));
//!
//! let doc = cmd.describe("copy");
//! assert_eq!(doc.synopsis, "copy <src> [dst]");
//! assert_eq!(doc.flags[0].name, "exclude");
//! assert!(format_doc(&doc, DocFormat::Json).unwrap().contains("\"exclude\""));
//! ```

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::param::{AnyParam, Arity};

/// Width of the flag name column in usage text.
const FLAG_COLUMN: usize = 20;

/// Supported renderings of a [`CommandDoc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Text,
    Json,
    Yaml,
}

/// A declared parameter as shown in usage documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDoc {
    pub name: String,
    pub arity: Arity,
    pub min_count: usize,
    /// `None` when unbounded.
    pub max_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_doc: Option<String>,
}

/// A directory child as shown in usage documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildDoc {
    pub name: String,
    pub short: String,
}

/// Everything usage text is generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDoc {
    pub called_as: String,
    pub short: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// One-line synopsis, e.g. `crud read <id>`.
    pub synopsis: String,
    pub positionals: Vec<ParamDoc>,
    pub flags: Vec<ParamDoc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChildDoc>,
}

impl ParamDoc {
    fn from_param(param: &dyn AnyParam) -> Self {
        let arity = param.arity();
        let short_doc = Some(param.short_doc().trim())
            .filter(|doc| !doc.is_empty())
            .map(String::from);
        Self {
            name: param.name().to_string(),
            arity,
            min_count: arity.min_count(),
            max_count: arity.max_count(),
            default: param.default_string().map(String::from),
            short_doc,
        }
    }

    /// Synopsis form: `<name>` when it must be given, `[name]` when it may
    /// be omitted, `[name ...]` or `<name> ...` when repeated.
    pub fn positional_marker(&self) -> String {
        match self.arity {
            Arity::Repeated { min: 0 } => format!("[{} ...]", self.name),
            Arity::Repeated { .. } => format!("<{}> ...", self.name),
            Arity::Required if self.default.is_none() => format!("<{}>", self.name),
            Arity::Required | Arity::Optional => format!("[{}]", self.name),
        }
    }

    /// Markers shown after a flag name, e.g. `(required)`.
    pub fn flag_markers(&self) -> Vec<String> {
        let mut markers = Vec::new();
        if self.arity.is_repeated() {
            markers.push("(repeated)".to_string());
        } else if self.min_count > 0 && self.default.is_none() {
            markers.push("(required)".to_string());
        }
        if let Some(default) = &self.default {
            markers.push(format!("(default={default:?})"));
        }
        markers
    }
}

impl Command {
    /// Describes this command as invoked under `called_as`.
    pub fn describe(&self, called_as: &str) -> CommandDoc {
        let positionals: Vec<ParamDoc> = self
            .positionals()
            .iter()
            .map(|p| ParamDoc::from_param(p.as_ref()))
            .collect();
        let flags = self
            .flags()
            .iter()
            .map(|f| ParamDoc::from_param(f.as_ref()))
            .collect();
        let children = self
            .children()
            .map(|(name, child)| ChildDoc {
                name: name.clone(),
                short: child.short().to_string(),
            })
            .collect();

        let mut synopsis = vec![called_as.to_string()];
        synopsis.extend(positionals.iter().map(ParamDoc::positional_marker));
        if self.is_directory() {
            synopsis.push("<command>".to_string());
        }

        CommandDoc {
            called_as: called_as.to_string(),
            short: self.short().to_string(),
            tags: self.metadata().tags.clone(),
            synopsis: synopsis.join(" "),
            positionals,
            flags,
            children,
        }
    }

    /// Plain usage text for this command as invoked under `called_as`.
    pub fn doc(&self, called_as: &str) -> String {
        render_text(&self.describe(called_as))
    }
}

/// Formats a command document in the requested format.
pub fn format_doc(doc: &CommandDoc, format: DocFormat) -> Result<String, String> {
    match format {
        DocFormat::Text => Ok(render_text(doc)),
        DocFormat::Json => {
            serde_json::to_string_pretty(doc).map_err(|e| format!("JSON serialization failed: {e}"))
        }
        DocFormat::Yaml => {
            serde_yaml::to_string(doc).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

fn render_text(doc: &CommandDoc) -> String {
    let mut out = String::new();
    out.push_str(&doc.synopsis);
    out.push('\n');

    let documented: Vec<&ParamDoc> = doc
        .positionals
        .iter()
        .filter(|p| p.short_doc.is_some())
        .collect();
    if !documented.is_empty() {
        out.push_str("\nARGS:\n");
        for pos in documented {
            let text = pos.short_doc.as_deref().unwrap_or_default();
            out.push_str(&format!("  {:<width$}  {text}\n", pos.name, width = FLAG_COLUMN + 2));
        }
    }

    if !doc.flags.is_empty() {
        out.push_str("\nFLAGS:\n");
        for flag in &doc.flags {
            let mut line = format!("  --{:<width$}", flag.name, width = FLAG_COLUMN);
            for marker in flag.flag_markers() {
                line.push_str("  ");
                line.push_str(&marker);
            }
            if let Some(text) = &flag.short_doc {
                line.push_str("  ");
                line.push_str(text);
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }

    if !doc.children.is_empty() {
        let width = doc.children.iter().map(|c| c.name.len()).max().unwrap_or(0);
        out.push_str("\nCOMMANDS:\n");
        for child in &doc.children {
            let line = format!("  {:<width$}  {}", child.name, child.short);
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Param;
    use crate::parsers::{parse_from_str, parse_string};

    fn sample() -> Command {
        Command::new(|_| Ok(()))
            .with_short("copies files")
            .with_positional(Param::string("arg1").with_short_doc("first argument"))
            .with_positional(Param::optional("arg2", parse_string))
            .with_positional(Param::repeated("rest", parse_string))
            .with_flag(Param::string("mode"))
            .with_flag(Param::repeated("exclude", parse_string).with_short_doc("skip these"))
            .with_flag(Param::required("jobs", parse_from_str::<u8>).with_default("4"))
    }

    #[test]
    fn test_usage_snapshot() {
        let expected = "\
cp <arg1> [arg2] [rest ...]

ARGS:
  arg1                    first argument

FLAGS:
  --mode                  (required)
  --exclude               (repeated)  skip these
  --jobs                  (default=\"4\")
";
        assert_eq!(sample().doc("cp"), expected);
    }

    #[test]
    fn test_usage_is_stable() {
        let cmd = sample();
        assert_eq!(cmd.doc("cp"), cmd.doc("cp"));
    }

    #[test]
    fn test_directory_usage_lists_children() {
        let dir = Command::directory("entities")
            .with_child("read", Command::new(|_| Ok(())).with_short("reads one"))
            .with_child("create", Command::new(|_| Ok(())).with_short("makes one"));

        assert_eq!(
            dir.doc("crud"),
            "crud <command>\n\nCOMMANDS:\n  create  makes one\n  read    reads one\n"
        );
    }

    #[test]
    fn test_positional_markers() {
        let doc = Command::new(|_| Ok(()))
            .with_positional(Param::string("a").with_default("x"))
            .with_positional(Param::repeated("b", parse_string).with_min(1))
            .describe("t");
        assert_eq!(doc.synopsis, "t [a] <b> ...");
    }

    #[test]
    fn test_format_doc_yaml_and_json() {
        let doc = sample().describe("cp");

        let yaml = format_doc(&doc, DocFormat::Yaml).unwrap();
        assert!(yaml.contains("synopsis:"));
        assert!(yaml.contains("cp <arg1> [arg2] [rest ...]"));

        let json = format_doc(&doc, DocFormat::Json).unwrap();
        let back: CommandDoc = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);

        assert_eq!(format_doc(&doc, DocFormat::Text).unwrap(), sample().doc("cp"));
    }
}
