//! Loading catalogs and engine configuration from disk.

use std::io::Write;

use anyhow::Result;
use contractflow::config::EngineConfig;
use contractflow::errors::ConfigurationError;
use contractflow::orchestrator::{Orchestrator, ProcessOptions};
use contractflow::registry::{catalog, catalog::ids, RegistryBuilder, RegistryHandle};
use contractflow::testing::{assert_has_error, assert_valid, RecordBuilder};
use contractflow::validation::DurationPolicy;
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn write_json(value: &impl serde::Serialize) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(serde_json::to_string_pretty(value)?.as_bytes())?;
    Ok(file)
}

#[test]
fn builtin_catalog_round_trips_through_a_file() -> Result<()> {
    let file = write_json(&catalog::builtin())?;
    let registry = RegistryBuilder::from_catalog_path(file.path())?
        .strict_rule_coverage(true)
        .build()?;

    assert_eq!(registry.types().len(), 7);
    assert_eq!(registry.templates().len(), 5);
    assert_eq!(
        registry.linked_template(ids::OMAN_PART_TIME)?.name,
        "Oman Employment Contract (Part Time)"
    );
    Ok(())
}

#[test]
fn missing_catalog_file_names_the_path() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("absent.json");

    let err = RegistryBuilder::from_catalog_path(&path).unwrap_err();
    match err {
        ConfigurationError::Catalog { source_name, .. } => {
            assert_eq!(source_name, path.display().to_string());
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn misspelled_catalog_file_fails_to_load() -> Result<()> {
    let mut document = serde_json::to_value(catalog::builtin())?;
    let types = document
        .as_object_mut()
        .and_then(|root| root.remove("contract_types"))
        .unwrap_or_default();
    document["contract_type"] = types;
    let file = write_json(&document)?;

    let err = RegistryBuilder::from_catalog_path(file.path()).unwrap_err();
    assert!(matches!(err, ConfigurationError::Catalog { .. }));
    assert!(err.to_string().contains("contract_type"), "{err}");
    Ok(())
}

#[test]
fn engine_config_file_selects_calendar_months() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(
        br#"{"duration_policy": "calendar_months", "blueprint_name_suffix": "flow"}"#,
    )?;

    let config = EngineConfig::from_path(file.path())?;
    assert_eq!(config.duration_policy, DurationPolicy::CalendarMonths);
    assert!(config.apply_defaults);

    let orchestrator = Orchestrator::builtin(config)?;
    let record = RecordBuilder::fixed_term()
        .with("contract_end_date", "2026-01-21")
        .build();
    let outcome = orchestrator.process(
        ids::OMAN_FIXED_TERM,
        &record,
        ProcessOptions::with_blueprint(),
    );

    assert_valid(&outcome.validation);
    assert_eq!(
        outcome.blueprint.map(|b| b.name),
        Some("Oman Employment Contract (Fixed Term) flow".to_string())
    );
    Ok(())
}

#[test]
fn reloaded_catalog_applies_to_later_calls() -> Result<()> {
    let handle = RegistryHandle::new(RegistryBuilder::builtin().build()?);
    let orchestrator = Orchestrator::new(handle.clone());
    let record = RecordBuilder::fixed_term().build();

    let before = orchestrator.process(ids::OMAN_FIXED_TERM, &record, ProcessOptions::default());
    assert_valid(&before.validation);

    let mut document = catalog::builtin();
    for config in &mut document.contract_types {
        if config.id == ids::OMAN_FIXED_TERM {
            config.constraints.max_duration_months = Some(6);
        }
    }
    let file = write_json(&document)?;
    let previous = handle.replace(RegistryBuilder::from_catalog_path(file.path())?.build()?);

    let outcome = orchestrator.process(ids::OMAN_FIXED_TERM, &record, ProcessOptions::default());
    assert_has_error(
        &outcome.validation,
        "Contract duration of 12 months exceeds the maximum of 6 months",
    );
    assert_eq!(
        previous
            .contract_type(ids::OMAN_FIXED_TERM)?
            .constraints
            .max_duration_months,
        Some(24)
    );
    Ok(())
}
