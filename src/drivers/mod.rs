mod in_memory_test;
mod tokio_postgres;

pub use self::in_memory_test::{
    DriverCall, DriverCallKind, InMemoryTestDriver, InMemoryTestResponseBuilder, InjectedFailure,
};
pub use self::tokio_postgres::TokioPostgresDriver;
