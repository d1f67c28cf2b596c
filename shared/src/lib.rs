pub mod assignment;
pub mod draw;
pub mod game;
pub mod ingest;
pub mod label;
pub mod log;
pub mod region;
pub mod render;
pub mod storage;

pub use assignment::Assignments;
pub use draw::{DrawOutcome, DrawPool, TOTAL};
pub use game::{Game, GameState};
pub use ingest::*;
pub use label::{Label, LabelCounts};
pub use log::{DrawLog, LogEntry};
pub use region::{NormalizeRules, RegionCode, SWISS_CANTONS};
pub use render::RegionPaint;
pub use storage::{KeyValueStore, MemoryStore};
