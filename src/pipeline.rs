//! Per-document card pipeline.
//!
//! ```text
//! Extract → Sanitize → EnsureDir → LoadBackground → ComposeAndWrite → RewriteDocument
//! ```
//!
//! Stages run strictly in order. The first failing stage ends the document:
//! later stages do not run and nothing already written is rolled back (a card
//! that failed mid-write may be left truncated on disk). There are no retries.
//!
//! [`CardPipeline::process`] takes `&mut self`, so a pipeline handles one
//! document at a time. The background cache it owns relies on that.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::cache::{BackgroundCache, CacheStats, DecodeError};
use crate::imaging::{CanvasBackend, CanvasError, CardLayout, CardText, compose_card};
use crate::metadata::HtmlQuery;
use crate::options::RenderOptions;
use crate::rewrite::rewrite_card_url;
use crate::sanitize::sanitize;
use crate::types::{CardRef, Document};
use crate::writer::{OutputError, ensure_directory, write_stream};

/// Pipeline states, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extract,
    Sanitize,
    EnsureDir,
    LoadBackground,
    ComposeAndWrite,
    RewriteDocument,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extract => "extract",
            Stage::Sanitize => "sanitize",
            Stage::EnsureDir => "ensure directory",
            Stage::LoadBackground => "load background",
            Stage::ComposeAndWrite => "compose and write",
            Stage::RewriteDocument => "rewrite document",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

impl PipelineError {
    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Output(OutputError::Directory { .. }) => Stage::EnsureDir,
            PipelineError::Output(OutputError::Write { .. }) => Stage::ComposeAndWrite,
            PipelineError::Decode(_) => Stage::LoadBackground,
            PipelineError::Canvas(_) => Stage::ComposeAndWrite,
        }
    }
}

/// Title and description after resolvers and sanitization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedText {
    pub title: String,
    pub description: String,
}

/// Run the extract and sanitize stages for one document.
pub fn resolve_text(options: &RenderOptions, doc: &Document, query: &HtmlQuery) -> ResolvedText {
    let title = options.title(doc, query);
    let description = options.description(doc, query);
    tracing::trace!(stage = %Stage::Sanitize, %title, %description, "raw card text");
    ResolvedText {
        title: sanitize(&title),
        description: sanitize(&description),
    }
}

/// Result of processing one document.
#[derive(Debug, Clone, PartialEq)]
pub struct CardOutput {
    /// The document with its social-image tags rewritten.
    pub document: Document,
    /// `None` for documents that passed through without a card.
    pub card: Option<CardRef>,
    pub text: ResolvedText,
}

impl CardOutput {
    fn passthrough(document: &Document) -> Self {
        Self {
            document: document.clone(),
            card: None,
            text: ResolvedText::default(),
        }
    }
}

/// Renders cards for documents, one at a time.
pub struct CardPipeline<B: CanvasBackend> {
    options: RenderOptions,
    backend: B,
    layout: CardLayout,
    cache: BackgroundCache,
}

impl<B: CanvasBackend> CardPipeline<B> {
    pub fn new(options: RenderOptions, backend: B) -> Self {
        Self {
            options,
            backend,
            layout: CardLayout::default(),
            cache: BackgroundCache::new(),
        }
    }

    pub fn with_layout(mut self, layout: CardLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Replace the background cache, e.g. to share decodes across pipelines
    /// run one after another.
    pub fn with_cache(mut self, cache: BackgroundCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    pub fn into_cache(self) -> BackgroundCache {
        self.cache
    }

    /// Generate the card for `doc` and rewrite its social-image tags.
    ///
    /// Null documents are returned unchanged without a card.
    pub fn process(&mut self, doc: &Document) -> Result<CardOutput, PipelineError> {
        if doc.is_null() {
            tracing::debug!(path = %doc.path.display(), "null document, passing through");
            return Ok(CardOutput::passthrough(doc));
        }

        tracing::debug!(stage = %Stage::Extract, path = %doc.path.display());
        let html = doc.text();
        let query = HtmlQuery::parse(&html);
        let text = resolve_text(&self.options, doc, &query);

        let directory = self.options.directory(doc);
        tracing::debug!(stage = %Stage::EnsureDir, directory = %directory.display());
        ensure_directory(&directory)?;
        let card = CardRef::new(&directory, &self.options.base(doc), &self.options.name(doc));

        tracing::debug!(stage = %Stage::LoadBackground);
        let background_path = self.options.background_image(doc);
        let background = self.cache.resolve(background_path.as_deref())?;

        tracing::debug!(stage = %Stage::ComposeAndWrite, card = %card.path.display());
        let png = compose_card(
            &self.backend,
            &self.layout,
            CardText {
                title: &text.title,
                description: &text.description,
            },
            background.as_ref(),
        )?;
        write_stream(&card.path, png.as_slice())?;

        tracing::debug!(stage = %Stage::RewriteDocument, url = %card.url);
        let rewritten = rewrite_card_url(&html, &card.url);
        let document = if rewritten == html {
            doc.clone()
        } else {
            doc.with_contents(rewritten)
        };

        Ok(CardOutput {
            document,
            card: Some(card),
            text,
        })
    }
}
