//! HRMS Lite: employee profiles and daily attendance behind a JSON API.

pub mod api;
pub mod config;
pub mod db;
pub mod docs;
pub mod errors;
pub mod model;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;
