//! Livestock feed predictor: an HTML form for seven feed-composition inputs,
//! backed by a remote prediction service that returns DMD, OMD, ME and CH4.

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod render;
pub mod routes;
