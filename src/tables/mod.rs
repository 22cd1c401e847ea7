//! Tables: definition, per-request session, projection and view

pub mod projector;
pub mod session;
pub mod table;
pub mod view;

pub use projector::{ProjectedRecord, ProjectedValue, RecordProjector};
pub use session::TableSession;
pub use table::Table;
pub use view::TableView;
