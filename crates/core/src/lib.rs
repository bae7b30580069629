//! # Clinscore Core
//!
//! Deterministic clinical risk and classification scoring.
//!
//! This crate contains the calculators and the pieces they are built from:
//! - Threshold tables and a points accumulator shared by every score
//! - Framingham, CHA2DS2-VASc, HAS-BLED, QTc, cardiac output, BMI/BSA and vital signs
//! - Audit records written through an injected [`AuditSink`]
//!
//! **No I/O during a calculation**: configuration is resolved by the caller at startup and
//! audit sinks own whatever storage they write to.

pub mod accumulator;
pub mod audit;
pub mod calculators;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod status;
pub mod threshold;
pub mod units;
pub mod validation;

pub use audit::{
    AuditAction, AuditContext, AuditRecord, AuditSink, JsonLinesAuditSink, MemoryAuditSink,
    NoopAuditSink, TracingAuditSink,
};
pub use config::{EngineConfig, OptionPolicy};
pub use engine::ScoringEngine;
pub use error::{AuditError, CalcError, CalcResult};
pub use status::{Classification, Status};
