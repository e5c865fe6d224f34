//! Rendering pipeline.
//!
//! [`RenderingEngine`] resolves the input and output syntaxes against the live
//! registry, parses with the input syntax's parser, runs the macro
//! transformation and renders with the output syntax's renderer.
//!
//! # Example
//!
//! ```
//! use quill_config::Config;
//! use quill_engine::RenderingEngine;
//!
//! let engine = RenderingEngine::from_config(&Config::default()).unwrap();
//! let html = engine.convert("Hello world", "plain/1.0", "xhtml/1.0").unwrap();
//! assert_eq!(html, "<p>Hello world</p>");
//! ```

mod engine;
mod error;

pub use engine::{RenderResult, RenderingEngine};
pub use error::EngineError;
