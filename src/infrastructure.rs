pub mod db;
pub mod email;
pub mod limiter;
pub mod utils;
