//! Space Concierge - Conversational space search and registration
//!
//! This crate routes free-text messages to an intent and, for space
//! registration, drives a resumable step-by-step dialogue that ends in a
//! stored space record.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
