// Domain layer - Entities and value types, no I/O
pub mod equipment;
pub mod records;
pub mod selection;
pub mod telemetry;
