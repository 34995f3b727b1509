pub mod db;
pub mod logging;
pub mod schema;
