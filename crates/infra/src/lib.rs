pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod password;
pub mod repositories;
