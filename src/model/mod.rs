//! Model layer
//!
//! - Table data: `CellValue`, `Column`, `Row`, `RowForest`
//! - Pipeline stages: filter, sort, pagination, expansion
//! - `DrillTable` - memoized view over one dataset
//! - UI state: `View`, `ModalStack`, `EventLog`

pub mod column;
pub mod event_log;
pub mod events;
pub mod expansion;
pub mod filter;
pub mod format;
pub mod modal;
pub mod pagination;
pub mod row;
pub mod sort;
pub mod table;
pub mod ui;
pub mod value;
