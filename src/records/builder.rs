//! Clause-to-record conversion.

use tracing::debug;

use crate::error::{ProvisoError, Result};
use crate::header::{normalize_clauses, parse_header, Clause};
use crate::types::TypedValue;
use crate::version::Version;

use super::models::{Capability, Requirement};
use super::{IDENTITY_NAMESPACE, TYPE_ATTRIBUTE, VERSION_ATTRIBUTE, WIRING_NAMESPACE_PREFIX};

/// Parse a provide-style header into capabilities: one per `(clause, path)`
/// pair, with attributes coerced to their declared types.
pub fn capabilities_from_header(header: &str) -> Result<Vec<Capability>> {
    let clauses = normalize_clauses(parse_header(header)?)?;
    clauses_to_capabilities(&clauses)
}

/// Parse a require-style header into requirements.
pub fn requirements_from_header(header: &str) -> Result<Vec<Requirement>> {
    let clauses = normalize_clauses(parse_header(header)?)?;
    clauses_to_requirements(&clauses)
}

/// Convert normalized clauses into capabilities. A clause with several paths
/// yields one capability per path, sharing the clause's attributes and
/// directives.
pub fn clauses_to_capabilities(clauses: &[Clause]) -> Result<Vec<Capability>> {
    let mut capabilities = Vec::new();
    for clause in clauses {
        for path in &clause.paths {
            ensure_declarable_namespace(path)?;
            capabilities.push(Capability {
                namespace: path.clone(),
                attributes: clause.attributes.clone(),
                directives: clause.directives.clone(),
            });
        }
    }
    debug!(count = capabilities.len(), "built capabilities");
    Ok(capabilities)
}

/// Convert normalized clauses into requirements, one per `(clause, path)`
/// pair.
pub fn clauses_to_requirements(clauses: &[Clause]) -> Result<Vec<Requirement>> {
    let mut requirements = Vec::new();
    for clause in clauses {
        for path in &clause.paths {
            ensure_declarable_namespace(path)?;
            requirements.push(Requirement {
                namespace: path.clone(),
                attributes: clause.attributes.clone(),
                directives: clause.directives.clone(),
            });
        }
    }
    debug!(count = requirements.len(), "built requirements");
    Ok(requirements)
}

/// The identity and wiring namespaces are synthesized internally; a header
/// declaring them explicitly is rejected.
fn ensure_declarable_namespace(namespace: &str) -> Result<()> {
    if namespace.is_empty() {
        return Err(ProvisoError::EmptyNamespace);
    }
    if namespace == IDENTITY_NAMESPACE || namespace.starts_with(WIRING_NAMESPACE_PREFIX) {
        return Err(ProvisoError::ReservedNamespace {
            namespace: namespace.to_string(),
        });
    }
    Ok(())
}

/// Build the synthesized identity capability for a component: its name under
/// the identity namespace, plus version and type attributes.
pub fn identity_capability(name: &str, version: &Version) -> Capability {
    Capability::new(IDENTITY_NAMESPACE)
        .with_attribute(IDENTITY_NAMESPACE, name)
        .with_attribute(VERSION_ATTRIBUTE, version.clone())
        .with_attribute(TYPE_ATTRIBUTE, "component")
}

const UNMARSHAL_PATH: &str = "param";

/// Parse a single `key=value` attribute through the full header pipeline,
/// returning the (possibly typed) result. The key may carry a type tag
/// (`count:Long`).
pub fn unmarshal_attribute(key: &str, value: &str) -> Result<(String, TypedValue)> {
    let header = format!("{UNMARSHAL_PATH};{key}={value}");
    let capabilities = capabilities_from_header(&header)?;
    capabilities
        .into_iter()
        .flat_map(|c| c.attributes.into_iter())
        .next()
        .ok_or_else(|| ProvisoError::truncated_header(header))
}

/// Parse a single `key:=value` directive through the full header pipeline.
pub fn unmarshal_directive(key: &str, value: &str) -> Result<(String, String)> {
    let header = format!("{UNMARSHAL_PATH};{key}:={value}");
    let capabilities = capabilities_from_header(&header)?;
    capabilities
        .into_iter()
        .flat_map(|c| c.directives.into_iter())
        .next()
        .ok_or_else(|| ProvisoError::truncated_header(header))
}
