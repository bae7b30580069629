//! Audit records for completed calculations.
//!
//! The engine builds one [`AuditRecord`] per successful calculation and hands it to the
//! injected [`AuditSink`]. Sinks decide where records go; the engine never fails a calculation
//! because a sink did.

use crate::AuditError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

pub const EVENT_TYPE: &str = "MEDICAL_CALCULATION";

/// The calculation an audit record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "FRAMINGHAM_RISK_CALCULATION")]
    Framingham,
    #[serde(rename = "CHADS2VASC_CALCULATION")]
    Cha2ds2Vasc,
    #[serde(rename = "HASBLED_CALCULATION")]
    HasBled,
    #[serde(rename = "QTC_CALCULATION")]
    Qtc,
    #[serde(rename = "CARDIAC_OUTPUT_CALCULATION")]
    CardiacOutput,
    #[serde(rename = "BMI_CALCULATION")]
    Bmi,
    #[serde(rename = "BSA_CALCULATION")]
    Bsa,
    #[serde(rename = "VITAL_SIGNS_ASSESSMENT")]
    VitalSigns,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Framingham => "FRAMINGHAM_RISK_CALCULATION",
            AuditAction::Cha2ds2Vasc => "CHADS2VASC_CALCULATION",
            AuditAction::HasBled => "HASBLED_CALCULATION",
            AuditAction::Qtc => "QTC_CALCULATION",
            AuditAction::CardiacOutput => "CARDIAC_OUTPUT_CALCULATION",
            AuditAction::Bmi => "BMI_CALCULATION",
            AuditAction::Bsa => "BSA_CALCULATION",
            AuditAction::VitalSigns => "VITAL_SIGNS_ASSESSMENT",
        }
    }
}

/// Who asked for a calculation. Every field is optional and copied verbatim onto the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditContext {
    pub hospital_id: Option<String>,
    pub user_id: Option<String>,
    pub patient_id: Option<String>,
}

impl AuditContext {
    pub fn new(
        hospital_id: Option<String>,
        user_id: Option<String>,
        patient_id: Option<String>,
    ) -> Self {
        Self {
            hospital_id,
            user_id,
            patient_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hospital_id.is_none() && self.user_id.is_none() && self.patient_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub action: AuditAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    pub details: serde_json::Value,
    pub policy_version: String,
}

impl AuditRecord {
    /// Stamp a new record with a fresh id and the current UTC time.
    pub fn new(
        action: AuditAction,
        context: &AuditContext,
        details: serde_json::Value,
        policy_version: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event_type: EVENT_TYPE.to_string(),
            action,
            hospital_id: context.hospital_id.clone(),
            user_id: context.user_id.clone(),
            patient_id: context.patient_id.clone(),
            details,
            policy_version: policy_version.to_string(),
        }
    }
}

/// Destination for audit records.
pub trait AuditSink: Send + Sync {
    fn record(&self, record: AuditRecord) -> Result<(), AuditError>;
}

// ============================================================================
// Sinks
// ============================================================================

/// Emits each record as a structured `info` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: AuditRecord) -> Result<(), AuditError> {
        let details = serde_json::to_string(&record.details)?;
        tracing::info!(
            audit_id = %record.id,
            action = record.action.as_str(),
            hospital_id = record.hospital_id.as_deref(),
            user_id = record.user_id.as_deref(),
            patient_id = record.patient_id.as_deref(),
            policy_version = %record.policy_version,
            details = %details,
            "medical audit"
        );
        Ok(())
    }
}

/// Appends one JSON object per line to a file.
#[derive(Debug)]
pub struct JsonLinesAuditSink {
    file: Mutex<File>,
}

impl JsonLinesAuditSink {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .map_err(AuditError::Open)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for JsonLinesAuditSink {
    fn record(&self, record: AuditRecord) -> Result<(), AuditError> {
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        let mut file = self.file.lock().map_err(|_| AuditError::Poisoned)?;
        file.write_all(&line)?;
        file.flush()?;
        Ok(())
    }
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, oldest first.
    pub fn records(&self) -> Vec<AuditRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, record: AuditRecord) -> Result<(), AuditError> {
        self.records
            .lock()
            .map_err(|_| AuditError::Poisoned)?
            .push(record);
        Ok(())
    }
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _record: AuditRecord) -> Result<(), AuditError> {
        Ok(())
    }
}
