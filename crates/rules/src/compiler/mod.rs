//! Compilation Pipeline: document set in, saved-search and macro text out.
//!
//! Ordering contract:
//! 1. structured detections, sorted by source id
//! 2. flat saved-search files, sorted by source id, stanzas in file order
//!
//! Macros are emitted flat files first (sorted by source id, file order),
//! then inline declarations (detections sorted by source id, declaration
//! order). The first declaration of each identity fixes its position.
//!
//! Detection names must be unique across the run, as must stanza headers.
//!
//! Any error aborts the run and no artifact is produced, except that
//! [`FailurePolicy::SkipInvalid`] drops detections that fail on their own
//! (parse, schema, domain, placeholder) and reports them instead.

use std::collections::HashMap;

use detforge_core::{parse_conf, render, Stanza};
use tracing::{debug, info, warn};

use crate::error::{CompileError, Result};
use crate::loader::{DocumentSet, SourceDocument, SourceKind};
use crate::macros::{FragmentDecl, FragmentSet, Provenance};
use crate::normalize::normalize;
use crate::schema::{DetectionSpec, Fragment};
use crate::validation::validate_detection;

/// What to do with a detection that fails on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the run on the first failure.
    #[default]
    FailFast,
    /// Leave the detection out, log it and keep going. Header collisions
    /// and macro conflicts still abort.
    SkipInvalid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub failure_policy: FailurePolicy,
    /// Treat unknown `%placeholder%` tokens in templated fields as errors.
    pub strict_placeholders: bool,
}

/// A detection left out under [`FailurePolicy::SkipInvalid`].
#[derive(Debug)]
pub struct SkippedDocument {
    pub source_id: String,
    pub error: CompileError,
}

/// Both text artifacts of a successful run.
#[derive(Debug)]
pub struct Artifacts {
    /// Saved-search stanzas, rendered.
    pub savedsearches: String,
    /// Macro stanzas, rendered.
    pub macros: String,
    pub stanzas: Vec<Stanza>,
    pub fragments: Vec<Fragment>,
    pub skipped: Vec<SkippedDocument>,
}

/// Compile a document set into the saved-search and macro artifacts.
pub fn compile(set: &DocumentSet, options: &CompileOptions) -> Result<Artifacts> {
    let mut stanzas: Vec<(Stanza, String)> = Vec::new();
    let mut inline: Vec<FragmentDecl> = Vec::new();
    let mut skipped = Vec::new();
    let mut names: HashMap<String, String> = HashMap::new();

    for doc in set.of_kind(SourceKind::Detection) {
        match compile_detection(doc, options) {
            Ok((name, stanza, fragments)) => {
                if let Some(first) = names.insert(name.clone(), doc.id.clone()) {
                    return Err(CompileError::DuplicateName {
                        name,
                        first,
                        second: doc.id.clone(),
                    });
                }
                stanzas.push((stanza, doc.id.clone()));
                inline.extend(fragments.into_iter().map(|fragment| FragmentDecl {
                    fragment,
                    provenance: Provenance::Inline(doc.id.clone()),
                }));
            }
            Err(e) if options.failure_policy == FailurePolicy::SkipInvalid && e.is_document_local() => {
                warn!(source = %doc.id, error = %e, "skipping invalid detection");
                skipped.push(SkippedDocument {
                    source_id: doc.id.clone(),
                    error: e,
                });
            }
            Err(e) => return Err(e),
        }
    }

    for doc in set.of_kind(SourceKind::FlatDetection) {
        for stanza in parse_flat(doc)? {
            debug!(source = %doc.id, header = %stanza.header(), "passing through flat stanza");
            stanzas.push((stanza, doc.id.clone()));
        }
    }

    check_headers(&stanzas)?;

    let mut decls = Vec::new();
    for doc in set.of_kind(SourceKind::FlatMacros) {
        for stanza in parse_flat(doc)? {
            decls.push(FragmentDecl {
                fragment: Fragment::from_stanza(&stanza),
                provenance: Provenance::File(doc.id.clone()),
            });
        }
    }
    decls.extend(inline);
    let fragments = FragmentSet::merge(decls)?.into_fragments();

    let stanzas: Vec<Stanza> = stanzas.into_iter().map(|(s, _)| s).collect();
    let fragment_stanzas = fragments
        .iter()
        .map(|f| {
            f.to_stanza().map_err(|source| CompileError::Conf {
                source_id: f.key.to_string(),
                source,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        stanzas = stanzas.len(),
        macros = fragments.len(),
        skipped = skipped.len(),
        "compilation finished"
    );

    Ok(Artifacts {
        savedsearches: render(&stanzas),
        macros: render(&fragment_stanzas),
        stanzas,
        fragments,
        skipped,
    })
}

/// Parse, validate and normalize one structured detection.
fn compile_detection(
    doc: &SourceDocument,
    options: &CompileOptions,
) -> Result<(String, Stanza, Vec<Fragment>)> {
    let spec: DetectionSpec = serde_yaml::from_str(&doc.text).map_err(|source| CompileError::Yaml {
        source_id: doc.id.clone(),
        source,
    })?;
    let detection = validate_detection(spec, &doc.id)?;
    let normalized = normalize(&detection, &doc.id, options.strict_placeholders)?;
    Ok((detection.name, normalized.stanza, normalized.fragments))
}

/// Pass-Through Adapter: flat stanzas are taken exactly as written.
fn parse_flat(doc: &SourceDocument) -> Result<Vec<Stanza>> {
    parse_conf(&doc.text).map_err(|source| CompileError::Conf {
        source_id: doc.id.clone(),
        source,
    })
}

/// Every stanza header must be unique across the whole run.
fn check_headers(stanzas: &[(Stanza, String)]) -> Result<()> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for (stanza, source) in stanzas {
        if let Some(first) = seen.insert(stanza.header(), source.as_str()) {
            return Err(CompileError::HeaderCollision {
                header: stanza.header().to_string(),
                first: first.to_string(),
                second: source.clone(),
            });
        }
    }
    Ok(())
}
