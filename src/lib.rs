//! Luma door - unattended QR check-in terminal
//!
//! Scans Luma check-in QR codes from a camera, extracts the event id and
//! guest proxy key, and checks the guest in through the Luma admin API,
//! re-authenticating with the stored account when the session goes stale.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod app;
pub mod auth;
pub mod checkin;
pub mod cli;
pub mod error;
pub mod models;
pub mod scanner;
pub mod startup;
pub mod traits;
