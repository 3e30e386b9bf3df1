//! Core pipeline orchestration for wikihtml.
//!
//! This crate ties together URL translation, Markdown retrieval, remote
//! rendering, and document writing into a single `convert_page` run.

pub mod pipeline;
