//! Immutable tagged result values.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::status::{ExportedStatus, StatusId};

/// Opaque payload carried by a result. `Value::Null` is the absent payload.
pub type Payload = Value;

/// A status tag paired with an arbitrary payload.
///
/// Every comparison derives from the status alone; the payload is never
/// inspected. Compare with [`equals`] or [`matches`]; there is no `PartialEq`.
///
/// [`equals`]: ResultValue::equals
/// [`matches`]: ResultValue::matches
#[derive(Clone, Debug)]
pub struct ResultValue {
    status: StatusId,
    value: Payload,
}

impl ResultValue {
    /// Build a result with an absent payload.
    pub fn new(status: impl Into<StatusId>) -> Self {
        Self::with_value(status, Payload::Null)
    }

    /// Build a result carrying `value` unchanged.
    pub fn with_value(status: impl Into<StatusId>, value: impl Into<Payload>) -> Self {
        Self {
            status: status.into(),
            value: value.into(),
        }
    }

    pub fn status(&self) -> &StatusId {
        &self.status
    }

    pub fn value(&self) -> &Payload {
        &self.value
    }

    pub fn into_value(self) -> Payload {
        self.value
    }

    /// True iff `candidate` normalizes to this result's status.
    pub fn status_is(&self, candidate: impl Into<StatusId>) -> bool {
        self.status == candidate.into()
    }

    /// True iff any candidate matches; an empty candidate list yields false.
    pub fn any<I>(&self, candidates: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<StatusId>,
    {
        candidates.into_iter().any(|c| self.status_is(c))
    }

    /// The payload when the status matches, `None` otherwise.
    ///
    /// `None` is the no-match sentinel: a matching result with a `null` or
    /// `false` payload still yields `Some`.
    pub fn assert_then(&self, candidate: impl Into<StatusId>) -> Option<&Payload> {
        self.status_is(candidate).then_some(&self.value)
    }

    /// Run `continuation` on the payload only when the status matches.
    pub fn assert_then_with<R>(
        &self,
        candidate: impl Into<StatusId>,
        continuation: impl FnOnce(&Payload) -> R,
    ) -> Option<R> {
        self.assert_then(candidate).map(continuation)
    }

    /// Like [`assert_then`](Self::assert_then) against a set of candidates.
    pub fn any_then<I>(&self, candidates: I) -> Option<&Payload>
    where
        I: IntoIterator,
        I::Item: Into<StatusId>,
    {
        self.any(candidates).then_some(&self.value)
    }

    pub fn any_then_with<I, R>(
        &self,
        candidates: I,
        continuation: impl FnOnce(&Payload) -> R,
    ) -> Option<R>
    where
        I: IntoIterator,
        I::Item: Into<StatusId>,
    {
        self.any_then(candidates).map(continuation)
    }

    /// Flat variant of [`any_then`](Self::any_then) returning `false` on no match.
    ///
    /// This sentinel cannot be told apart from a matching result whose
    /// payload is itself `false`. Prefer `any_then` when that matters.
    pub fn any_then_or_false<I>(&self, candidates: I) -> Payload
    where
        I: IntoIterator,
        I::Item: Into<StatusId>,
    {
        self.any_then(candidates)
            .cloned()
            .unwrap_or(Payload::Bool(false))
    }

    /// Status as exported: boolean literal for `true`/`false`, token otherwise.
    pub fn export_status(&self) -> ExportedStatus {
        self.status.export()
    }

    pub fn to_pair(&self) -> (ExportedStatus, Payload) {
        (self.export_status(), self.value.clone())
    }

    pub fn to_mapping(&self) -> ResultMapping {
        ResultMapping {
            status: self.export_status(),
            value: self.value.clone(),
        }
    }

    /// The mapping export as a JSON object `{"status": .., "value": ..}`.
    pub fn to_json(&self) -> Payload {
        serde_json::json!({
            "status": self.export_status(),
            "value": self.value,
        })
    }

    /// Status-only comparison with another result; payloads are ignored.
    pub fn equals(&self, other: &ResultValue) -> bool {
        self.status == other.status
    }

    /// Status-only comparison with a raw status-like token.
    pub fn matches(&self, token: impl Into<StatusId>) -> bool {
        self.status_is(token)
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.status, self.value)
    }
}

impl From<ResultMapping> for ResultValue {
    fn from(mapping: ResultMapping) -> Self {
        Self {
            status: mapping.status.status(),
            value: mapping.value,
        }
    }
}

/// Two-field export of a [`ResultValue`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultMapping {
    pub status: ExportedStatus,
    pub value: Payload,
}
