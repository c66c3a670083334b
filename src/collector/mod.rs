pub mod offset_collector;

pub use offset_collector::OffsetCollector;
