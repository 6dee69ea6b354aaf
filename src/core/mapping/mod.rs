pub mod engine;

pub use engine::{
    manual_checks, map_target, ChangedEntry, ManualCheckEntry, MappingResult, MappingStats,
};
