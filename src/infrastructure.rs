pub mod db;
pub mod dns;
pub mod limiter;
pub mod utils;
pub mod web;
