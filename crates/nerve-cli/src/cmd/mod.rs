pub mod console;
pub mod schema;
pub mod serve;
