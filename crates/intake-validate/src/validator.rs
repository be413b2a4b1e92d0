//! Two-stage document validation.
//!
//! Schema first; business rules only for schema-accepted documents. Each
//! stage collects everything it finds before the verdict is made.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use intake_model::{
    FailureKind, FailureSubject, ProviderDocument, ProviderId, ProviderIndex, SourceRef,
    ValidationFailure, ValidationStage,
};

use crate::issue::Issue;
use crate::options::{RuleOptions, SchemaOptions};
use crate::rules::{RuleContext, run_all};
use crate::schema::validate_schema;

/// Where a document came from and when it was checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    /// 0-based position in the input.
    pub position: usize,
    pub source: Option<SourceRef>,
    pub recorded_at: DateTime<Utc>,
}

impl DocumentContext {
    pub fn new(position: usize, recorded_at: DateTime<Utc>) -> Self {
        Self {
            position,
            source: None,
            recorded_at,
        }
    }

    pub fn with_source(mut self, source: SourceRef) -> Self {
        self.source = Some(source);
        self
    }
}

/// Validation result for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub subject: FailureSubject,
    /// Present only when no rejecting failure was found.
    pub document: Option<ProviderDocument>,
    /// Rejecting failures and soft warnings, in detection order.
    pub failures: Vec<ValidationFailure>,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        self.document.is_some()
    }

    pub fn is_contradiction(&self) -> bool {
        self.failures
            .iter()
            .any(|f| f.kind == FailureKind::Contradiction)
    }

    pub fn has_soft_warnings(&self) -> bool {
        self.failures.iter().any(|f| !f.is_hard())
    }

    pub fn hard_failures(&self) -> impl Iterator<Item = &ValidationFailure> {
        self.failures.iter().filter(|f| f.is_hard())
    }

    /// Stage that rejected the document, if any.
    pub fn rejected_at(&self) -> Option<ValidationStage> {
        self.hard_failures().map(|f| f.stage).next()
    }
}

/// Validates raw documents against a fixed snapshot of known providers.
#[derive(Debug, Clone)]
pub struct Validator<I> {
    schema: SchemaOptions,
    rules: RuleOptions,
    index: I,
}

impl<I: ProviderIndex> Validator<I> {
    pub fn new(index: I) -> Self {
        Self {
            schema: SchemaOptions::default(),
            rules: RuleOptions::default(),
            index,
        }
    }

    pub fn with_schema_options(mut self, options: SchemaOptions) -> Self {
        self.schema = options;
        self
    }

    pub fn with_rule_options(mut self, options: RuleOptions) -> Self {
        self.rules = options;
        self
    }

    pub fn schema_options(&self) -> &SchemaOptions {
        &self.schema
    }

    pub fn rule_options(&self) -> &RuleOptions {
        &self.rules
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Mutable snapshot access, for callers that register accepted providers
    /// between documents.
    pub fn index_mut(&mut self) -> &mut I {
        &mut self.index
    }

    pub fn validate(&self, raw: &Value, ctx: &DocumentContext) -> Verdict {
        let subject = subject_of(raw, ctx.position);
        let provider_name = raw
            .get("provider_name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let record = |issues: Vec<Issue>| -> Vec<ValidationFailure> {
            issues
                .into_iter()
                .map(|issue| ValidationFailure {
                    subject: subject.clone(),
                    provider_name: provider_name.clone(),
                    stage: issue.stage(),
                    field: issue.field().to_string(),
                    rule: issue.rule_id().to_string(),
                    kind: issue.kind(&self.rules),
                    message: issue.message(),
                    recorded_at: ctx.recorded_at,
                    source: ctx.source.clone(),
                })
                .collect()
        };

        let schema = validate_schema(raw, &self.schema);
        let mut failures = record(schema.issues);
        let Some(document) = schema.document else {
            debug!(
                subject = %subject,
                stage = "schema",
                failures = failures.len(),
                "document rejected"
            );
            return Verdict {
                subject,
                document: None,
                failures,
            };
        };

        let issues = run_all(&document, &RuleContext::new(&self.rules, &self.index));
        let rule_failures = record(issues);
        let rejected = rule_failures.iter().any(ValidationFailure::is_hard);
        failures.extend(rule_failures);

        if rejected {
            debug!(
                subject = %subject,
                stage = "business_rules",
                failures = failures.len(),
                "document rejected"
            );
            return Verdict {
                subject,
                document: None,
                failures,
            };
        }

        Verdict {
            subject,
            document: Some(document),
            failures,
        }
    }
}

/// Provider id when the raw document carries a usable one, else its position.
fn subject_of(raw: &Value, position: usize) -> FailureSubject {
    raw.get("provider_id")
        .and_then(Value::as_str)
        .and_then(|id| ProviderId::new(id).ok())
        .map(|id| FailureSubject::ProviderId(id.to_string()))
        .unwrap_or(FailureSubject::Index(position))
}
