//! Navigable summaries for layered design documents.
//!
//! A summary lists every page of a document with its top-level regions and
//! their direct sub-regions, each entry deep-linking back to its region. The
//! summary is built as an in-memory layout tree, then materialized on a host
//! through [`Canvas`]. An existing summary can be regenerated in place,
//! keeping its position and scope.
//!
//! [`MemoryHost`] implements every host trait over a plain document value.

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

mod command;
mod composer;
mod config;
mod document;
mod error;
mod fonts;
mod grouper;
mod host;
mod layout;
mod memory;
mod updater;

pub use command::{run_command, Command, CommandReport, CommandState, UPDATE_COMMAND};
pub use composer::{
    build_summary, centered_position, compose_summary, materialize, summary_title, PlacedSummary,
    Scope, SummaryTree,
};
pub use config::{BlockMetrics, ConfigError, FontConfig, Palette, SummaryConfig, TextSizes};
pub use document::{regions, DocNode, NodeKind, RegionRole};
pub use error::{HostError, SummaryError, TraversalFailure};
pub use fonts::{resolve_fonts, FontPair, FontRef};
pub use grouper::{build_page_block, group_regions, PageOutcome, RegionGroup};
pub use host::{
    Canvas, DeepLink, DocumentSource, FontLoader, Host, NodeId, Notice, NoticeKind, PageId,
    PageRef, Point, RegionId, Session, Size,
};
pub use layout::{
    make_label, ContainerNode, ContainerProps, DividerNode, DividerWeight, LabelNode, LayoutNode,
    OutlineEntry, Rgb,
};
pub use memory::{MemoryDocument, MemoryHost, MemoryPage, SessionLog};
pub use updater::{infer_scope, locate_summary, refresh_summary, regenerate_summary, LocatedSummary};
