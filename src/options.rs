//! Per-document resolvers.
//!
//! Every value that varies between documents is produced by a resolver: a
//! plain function of the [`Document`] (and, for text, its [`HtmlQuery`]).
//!
//! | Resolver | Required | Fallback |
//! |---|---|---|
//! | `directory` | yes | none, [`ConfigError::Missing`] |
//! | `base` | yes | none, [`ConfigError::Missing`] |
//! | `name` | no | [`default_name`]: the document's file stem |
//! | `title` | no | [`default_title`]: `<title>` text |
//! | `description` | no | [`default_description`]: meta description |
//! | `background_image` | no | no background |
//!
//! Missing required resolvers are reported by [`RenderOptionsBuilder::build`],
//! before any document is touched.

use std::fmt;
use std::path::PathBuf;

use crate::config::ConfigError;
use crate::metadata::{HtmlQuery, extract_description, extract_title};
use crate::types::{CardRef, Document};

pub type PathResolver = Box<dyn Fn(&Document) -> PathBuf>;
pub type StringResolver = Box<dyn Fn(&Document) -> String>;
pub type TextResolver = Box<dyn Fn(&Document, &HtmlQuery) -> String>;

pub fn default_name(doc: &Document) -> String {
    doc.base_name()
}

pub fn default_title(_doc: &Document, query: &HtmlQuery) -> String {
    extract_title(query)
}

pub fn default_description(_doc: &Document, query: &HtmlQuery) -> String {
    extract_description(query).unwrap_or_default()
}

/// Validated resolver bundle. Construct through [`RenderOptions::builder`].
pub struct RenderOptions {
    directory: PathResolver,
    base: StringResolver,
    name: StringResolver,
    title: TextResolver,
    description: TextResolver,
    background_image: Option<PathResolver>,
}

impl RenderOptions {
    pub fn builder() -> RenderOptionsBuilder {
        RenderOptionsBuilder::default()
    }

    pub fn directory(&self, doc: &Document) -> PathBuf {
        (self.directory)(doc)
    }

    pub fn base(&self, doc: &Document) -> String {
        (self.base)(doc)
    }

    pub fn name(&self, doc: &Document) -> String {
        (self.name)(doc)
    }

    pub fn title(&self, doc: &Document, query: &HtmlQuery) -> String {
        (self.title)(doc, query)
    }

    pub fn description(&self, doc: &Document, query: &HtmlQuery) -> String {
        (self.description)(doc, query)
    }

    /// `None` when no background resolver is configured.
    pub fn background_image(&self, doc: &Document) -> Option<PathBuf> {
        self.background_image.as_ref().map(|resolve| resolve(doc))
    }

    /// Physical path and public URL of the document's card.
    pub fn card_ref(&self, doc: &Document) -> CardRef {
        CardRef::new(&self.directory(doc), &self.base(doc), &self.name(doc))
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("background_image", &self.background_image.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct RenderOptionsBuilder {
    directory: Option<PathResolver>,
    base: Option<StringResolver>,
    name: Option<StringResolver>,
    title: Option<TextResolver>,
    description: Option<TextResolver>,
    background_image: Option<PathResolver>,
}

impl RenderOptionsBuilder {
    pub fn directory(mut self, f: impl Fn(&Document) -> PathBuf + 'static) -> Self {
        self.directory = Some(Box::new(f));
        self
    }

    pub fn base(mut self, f: impl Fn(&Document) -> String + 'static) -> Self {
        self.base = Some(Box::new(f));
        self
    }

    pub fn name(mut self, f: impl Fn(&Document) -> String + 'static) -> Self {
        self.name = Some(Box::new(f));
        self
    }

    pub fn title(mut self, f: impl Fn(&Document, &HtmlQuery) -> String + 'static) -> Self {
        self.title = Some(Box::new(f));
        self
    }

    pub fn description(mut self, f: impl Fn(&Document, &HtmlQuery) -> String + 'static) -> Self {
        self.description = Some(Box::new(f));
        self
    }

    pub fn background_image(mut self, f: impl Fn(&Document) -> PathBuf + 'static) -> Self {
        self.background_image = Some(Box::new(f));
        self
    }

    /// Fill in fallbacks and check that `directory` and `base` are present.
    pub fn build(self) -> Result<RenderOptions, ConfigError> {
        let directory = self.directory.ok_or(ConfigError::Missing("directory"))?;
        let base = self.base.ok_or(ConfigError::Missing("base"))?;
        Ok(RenderOptions {
            directory,
            base,
            name: self.name.unwrap_or_else(|| Box::new(default_name)),
            title: self.title.unwrap_or_else(|| Box::new(default_title)),
            description: self
                .description
                .unwrap_or_else(|| Box::new(default_description)),
            background_image: self.background_image,
        })
    }
}
