//! # og-card
//!
//! Open Graph social cards for static sites. For each HTML document a build
//! step hands over, og-card renders a 1200×620 PNG from the page's title and
//! description, writes it next to the other cards, and points the document's
//! `og:image` / `twitter:image:src` tags at its public URL.
//!
//! # Architecture: One Document, Six Stages
//!
//! ```text
//! Extract → Sanitize → EnsureDir → LoadBackground → ComposeAndWrite → RewriteDocument
//!   <title>   emoji      mkdir -p     decode once     wrap + draw       og:image
//!   <meta>    stripped                (cached)        PNG to disk       rewritten
//! ```
//!
//! Stages run in order and the first failure ends the document. Documents are
//! processed one at a time; the next one starts only after the current one is
//! done or failed.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | Stage sequencing, per-stage errors, [`pipeline::CardPipeline`] |
//! | [`options`] | Per-document resolvers: directory, base, name, title, description, background |
//! | [`config`] | `og-card.toml` loading, layering and validation; builds the resolvers |
//! | [`metadata`] | HTML query view and default title/description extraction |
//! | [`sanitize`] | Emoji removal and trimming |
//! | [`layout`] | Greedy word wrapping |
//! | [`imaging`] | Canvas capability, tiny-skia raster backend, card composition |
//! | [`cache`] | Decoded background images, kept for the life of a pipeline |
//! | [`writer`] | Directory creation and streamed PNG writes |
//! | [`rewrite`] | `og:image` / `twitter:image:src` URL replacement |
//! | [`report`] | Per-document results and the JSON manifest |
//! | [`output`] | CLI output formatting |
//! | [`types`] | [`types::Document`] and [`types::CardRef`] |
//!
//! # Design Decisions
//!
//! ## Resolvers Instead of Settings
//!
//! Everything that can differ between documents (where the card goes, what it
//! is called, what text it shows) is a function of the document. The config
//! file covers the common cases; library users can pass any closure.
//!
//! ## Literal Tag Matching
//!
//! Tags are rewritten with two fixed patterns, not by re-serializing the parsed
//! document, so the rest of the markup stays byte-identical. The price is a
//! narrow match: attribute order is fixed and the current URL may only use
//! letters, digits and `; : / ? .`. A tag outside that shape is left as is.
//!
//! ## Fixed Card Geometry
//!
//! Every card has the same size, fonts and text positions
//! ([`imaging::CardLayout`]). A background image is drawn at its natural size
//! from the top-left corner without scaling.

pub mod cache;
pub mod config;
pub mod imaging;
pub mod layout;
pub mod metadata;
pub mod options;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod rewrite;
pub mod sanitize;
pub mod types;
pub mod writer;
