// Application Layer - argument building, parsing, deadlines

pub mod arguments;
pub mod constants;
pub mod deadline;
pub mod executable;
pub mod line_assembler;
pub mod parser;
pub mod planner;

// Re-exports
pub use deadline::probe_with_deadline;
pub use line_assembler::LineAssembler;
pub use parser::ParserFactory;
pub use planner::SystemSpawnPlanner;
