//! Section-addressable document synchronization core.
//!
//! One flat text document, edited through multiple independent frames, each
//! bound to a named level-1 section. This crate owns the segmentation scan,
//! the grid placement validator and the synchronization engine that keeps
//! frames and document consistent without feedback loops. Rendering, file
//! identity and change notifications belong to the host.

pub mod layout;
pub mod logging;
pub mod model;
pub mod parse;
pub mod service;
pub mod store;
pub mod sync;

pub use layout::validator::{validate_model, BlockIssue, ModelReport};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::layout::{
    GridDimensions, LayoutBlock, LayoutModel, DEFAULT_GRID_ROWS, GRID_COLUMNS,
};
pub use model::section::{Section, SectionRegistry};
pub use parse::sections::{
    generate_section_markdown, insert_missing_sections, parse, section_exists,
    validate_required_sections, validate_title, MissingSections, TitleError,
};
pub use service::board_service::{
    resolve_board, BoardCatalog, BoardError, Placement, ResolvedBoard,
};
pub use store::fs_store::FsStore;
pub use store::memory::MemoryStore;
pub use store::{DocumentId, DocumentStore, StoreError, StoreResult};
pub use sync::engine::{FrameId, FrameView, SyncEngine, SyncError, SyncEvent, SyncTiming};
pub use sync::guard::SyncGuard;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
