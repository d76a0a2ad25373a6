pub mod api;
pub mod checker;
pub mod config;
pub mod db;
pub mod import;
pub mod model;
pub mod report;
pub mod youtube;
