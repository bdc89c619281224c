//! Waypoint - Journey-Driven Conversational Orchestration
//!
//! This crate drives multi-turn, intent-scoped conversations: a declarative
//! journey of dialogue stages governs what data each conversation must
//! collect, an external extractor turns free text into structured fields,
//! and a per-session state machine decides what to ask next.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
