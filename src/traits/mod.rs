mod driver;
mod events;
mod grammar;
mod processor;

pub use driver::DatabaseDriver;
pub use events::{EventDispatcher, QueryExecuted};
pub use grammar::{DefaultGrammar, Grammar};
pub use processor::{DefaultProcessor, Processor};
