//! # Kochliste
//!
//! HTTP backend for a personal cooking workflow: a recipe catalog, a to-cook
//! list and a to-buy list merged from the ingredients of the selected recipes.

pub mod config;
pub mod ingredient_merge;
pub mod ingredient_parser;
pub mod kitchen;
pub mod kitchen_model;
pub mod reconcile;
pub mod server;
pub mod storage;
