//! Access Request Bot - Conversational Data Access Interviews
//!
//! This crate runs a guided chat interview that collects a data access
//! request, validates each answer against directory and catalog lookups, and
//! files the finished request with the ticketing and approval backends.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
