//! Command declarations.
//!
//! A [`Command`] is either a leaf, with positionals, flags and a body, or a
//! directory that owns named children and dispatches to one of them. Both
//! are built with chained `with_*` methods that check the declaration as it
//! grows and panic on construction bugs.
//!
//! # Example
//!
//! ```
//! use star_core::*;
//!
//! let id = Param::string("id").with_short_doc("entity id");
//! let delete = Command::new({
//!     let id = id.clone();
//!     move |ctx| {
//!         let id = id.load(ctx);
//!         writeln!(ctx.stdout(), "DELETE {id}")?;
//!         Ok(())
//!     }
//! })
//! .with_short("delete an entity by id")
//! .with_positional(id);
//!
//! let root = Command::directory("an example CLI app").with_child("delete", delete);
//!
//! assert!(root.is_directory());
//! assert_eq!(root.child_names(), vec!["delete"]);
//! assert!(root.child("delete").unwrap().has_param("id"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::error::BoxError;
use crate::param::AnyParam;
use crate::validate::{
    DeclarationError, check_child_name, check_flag, check_positional, check_shared_name,
};

/// The function run once a command's arguments are bound.
pub type Body = Arc<dyn Fn(&mut Context<'_>) -> Result<(), BoxError> + Send + Sync>;

/// Descriptive data shown in listings and usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// One-line description.
    pub short: String,
    /// Free-form tags for grouping by category.
    pub tags: Vec<String>,
}

/// A titled section in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub title: String,
    pub members: Vec<String>,
}

/// A command: declared parameters plus a body, or a directory of children.
#[derive(Clone)]
pub struct Command {
    flags: Vec<Arc<dyn AnyParam>>,
    positionals: Vec<Arc<dyn AnyParam>>,
    body: Option<Body>,
    metadata: Metadata,
    children: BTreeMap<String, Command>,
    groups: Vec<Group>,
    directory: bool,
}

impl Command {
    /// Creates a leaf command with `body`.
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self {
            body: Some(Arc::new(body)),
            ..Self::empty()
        }
    }

    /// Creates a leaf command that binds its arguments and does nothing.
    pub fn empty() -> Self {
        Self {
            flags: Vec::new(),
            positionals: Vec::new(),
            body: None,
            metadata: Metadata::default(),
            children: BTreeMap::new(),
            groups: Vec::new(),
            directory: false,
        }
    }

    /// Creates a directory command with the given short description.
    ///
    /// Add children with [`with_child`](Self::with_child). The first bare
    /// token of the invocation selects a child; without one, the children
    /// are listed.
    pub fn directory(short: impl Into<String>) -> Self {
        Self {
            body: Some(Arc::new(crate::dir::dispatch)),
            directory: true,
            ..Self::empty()
        }
        .with_short(short)
    }

    /// Sets the one-line description.
    pub fn with_short(mut self, short: impl Into<String>) -> Self {
        self.metadata.short = short.into();
        self
    }

    /// Adds a grouping tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.metadata.tags.push(tag.into());
        self
    }

    /// Replaces the metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Declares a flag.
    ///
    /// # Panics
    ///
    /// Panics if the name is empty, malformed, or already used by a flag or
    /// positional. [`try_with_flag`](Self::try_with_flag) returns the error
    /// instead.
    pub fn with_flag<P: AnyParam + 'static>(self, flag: P) -> Self {
        self.try_with_flag(flag)
            .unwrap_or_else(|e| panic!("invalid flag declaration: {e}"))
    }

    /// Declares a flag, or reports why it cannot be declared.
    pub fn try_with_flag<P: AnyParam + 'static>(
        mut self,
        flag: P,
    ) -> Result<Self, DeclarationError> {
        check_flag(&self.flags, &flag)?;
        check_shared_name(&self.positionals, &flag)?;
        self.flags.push(Arc::new(flag));
        Ok(self)
    }

    /// Appends a positional.
    ///
    /// # Panics
    ///
    /// Panics if the name is empty or already used by a flag or positional,
    /// or if a repeated positional was already declared.
    pub fn with_positional<P: AnyParam + 'static>(self, positional: P) -> Self {
        self.try_with_positional(positional)
            .unwrap_or_else(|e| panic!("invalid positional declaration: {e}"))
    }

    /// Appends a positional, or reports why it cannot be appended.
    pub fn try_with_positional<P: AnyParam + 'static>(
        mut self,
        positional: P,
    ) -> Result<Self, DeclarationError> {
        check_positional(&self.positionals, &positional)?;
        check_shared_name(&self.flags, &positional)?;
        self.positionals.push(Arc::new(positional));
        Ok(self)
    }

    /// Adds a child to a directory command.
    ///
    /// # Panics
    ///
    /// Panics if this is not a directory, or the name is invalid or taken.
    pub fn with_child(self, name: impl Into<String>, child: Command) -> Self {
        self.try_with_child(name, child)
            .unwrap_or_else(|e| panic!("invalid child declaration: {e}"))
    }

    /// Adds a child, or reports why it cannot be added.
    ///
    /// # Panics
    ///
    /// Panics if this is not a directory.
    pub fn try_with_child(
        mut self,
        name: impl Into<String>,
        child: Command,
    ) -> Result<Self, DeclarationError> {
        let name = name.into();
        if !self.directory {
            panic!("with_child({name:?}) on a command that is not a directory");
        }
        check_child_name(&name)?;
        if self.children.contains_key(&name) {
            return Err(DeclarationError::DuplicateChild(name));
        }
        self.children.insert(name, child);
        Ok(self)
    }

    /// Declares a titled section for the directory listing.
    ///
    /// Members are listed in name order under `title`; groups appear in
    /// declaration order, followed by the ungrouped children.
    ///
    /// # Panics
    ///
    /// Panics if a member is not an existing child.
    pub fn with_group<I, S>(self, title: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.try_with_group(title, members)
            .unwrap_or_else(|e| panic!("invalid group declaration: {e}"))
    }

    /// Declares a display group, or reports the first unknown member.
    pub fn try_with_group<I, S>(
        mut self,
        title: impl Into<String>,
        members: I,
    ) -> Result<Self, DeclarationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let group = Group {
            title: title.into(),
            members: members.into_iter().map(Into::into).collect(),
        };
        if let Some(member) = group
            .members
            .iter()
            .find(|m| !self.children.contains_key(m.as_str()))
        {
            return Err(DeclarationError::UnknownGroupMember {
                group: group.title.clone(),
                child: member.clone(),
            });
        }
        self.groups.push(group);
        Ok(self)
    }

    pub fn flags(&self) -> &[Arc<dyn AnyParam>] {
        &self.flags
    }

    pub fn positionals(&self) -> &[Arc<dyn AnyParam>] {
        &self.positionals
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn short(&self) -> &str {
        &self.metadata.short
    }

    pub(crate) fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Returns `true` for commands built with [`directory`](Self::directory).
    pub fn is_directory(&self) -> bool {
        self.directory
    }

    /// Looks up a child by exact name.
    pub fn child(&self, name: &str) -> Option<&Command> {
        self.children.get(name)
    }

    /// Children in name order.
    pub fn children(&self) -> impl Iterator<Item = (&String, &Command)> {
        self.children.iter()
    }

    /// Child names, sorted.
    pub fn child_names(&self) -> Vec<&str> {
        self.children.keys().map(String::as_str).collect()
    }

    /// Display groups in declaration order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Returns `true` if `name` is one of this command's flags or positionals.
    pub fn has_param(&self, name: &str) -> bool {
        self.positionals
            .iter()
            .chain(&self.flags)
            .any(|p| p.name() == name)
    }
}

impl Default for Command {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |params: &[Arc<dyn AnyParam>]| -> Vec<String> {
            params.iter().map(|p| p.name().to_string()).collect()
        };
        f.debug_struct("Command")
            .field("short", &self.metadata.short)
            .field("flags", &names(&self.flags))
            .field("positionals", &names(&self.positionals))
            .field("children", &self.child_names())
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}
