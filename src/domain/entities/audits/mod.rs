//! Audit Trail Entity Module

pub mod audit_trail;

pub use audit_trail::{AuditAction, AuditTrail, AuditTrailBuilder};
