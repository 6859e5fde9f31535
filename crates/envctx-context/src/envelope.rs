//! Snapshot and delta envelope construction.

use envctx_core::{
    ContextEnvelope, ENVELOPE_VERSION, EnvelopeKind, EnvelopePayload, EnvironmentContext,
};

use crate::hash::compute_hash;

/// Wrap `context` in a `context-snapshot` envelope carrying its hash.
pub fn snapshot(context: EnvironmentContext, produced_at: String) -> ContextEnvelope {
    let hash = compute_hash(&context);
    ContextEnvelope {
        kind: EnvelopeKind::Snapshot,
        version: ENVELOPE_VERSION.to_string(),
        produced_at,
        hash,
        data: EnvelopePayload::Full(Box::new(context)),
    }
}

/// Turn a fresh snapshot into a `context-delta` envelope.
///
/// An absent, blank or matching `since` hash yields the empty marker. Any
/// other value yields the full context. The hash is always the snapshot's.
pub fn delta(snapshot: ContextEnvelope, since: Option<&str>) -> ContextEnvelope {
    let since = since.map(str::trim).filter(|s| !s.is_empty());
    let up_to_date = since.is_none_or(|since| snapshot.hash.matches(since));

    ContextEnvelope {
        kind: EnvelopeKind::Delta,
        data: if up_to_date {
            EnvelopePayload::Empty
        } else {
            snapshot.data
        },
        ..snapshot
    }
}
