//! Compilation of validated records into downstream artifacts.
//!
//! This module provides:
//! - Webhook payloads for the document-rendering service
//! - Fixed-shape automation blueprints for the workflow runner

mod blueprint;
mod payload;

pub use blueprint::{
    blueprint_for, Blueprint, BlueprintCompiler, Stage, StageKind, GENERATED_STATUS,
};
pub use payload::{bind_variables, PayloadCompiler, WebhookPayload};
