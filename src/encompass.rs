//! Backward-compatibility (subtyping) checks between patterns
//!
//! `a.encompasses(b)` answers: can a consumer expecting `a` accept every
//! value shaped like `b`? The wrapper cases below (exact values, deferred
//! references, unions, row lookups) are handled here once so that every
//! variant treats them the same way.

use std::collections::BTreeSet;
use std::mem::discriminant;

use tracing::trace;

use crate::pattern::{Pattern, PatternOps};
use crate::resolver::Resolver;
use crate::result::{Failure, MatchResult};

/// Pairs of named types already under comparison on the current path.
///
/// Recursive schemas revisit the same pair; a revisit is treated as success
/// so the check terminates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeStack {
    pairs: BTreeSet<(String, String)>,
}

impl TypeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, this: &str, other: &str) -> bool {
        self.pairs.contains(&(this.to_string(), other.to_string()))
    }

    /// A copy of this stack with one more pair on it
    pub fn push(&self, this: &str, other: &str) -> TypeStack {
        let mut pairs = self.pairs.clone();
        pairs.insert((this.to_string(), other.to_string()));
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Handle `other` shapes that every variant unwraps the same way.
///
/// Returns `None` when `other` is a plain pattern and the caller must apply
/// its own rule.
pub fn encompasses_wrapped(
    this: &Pattern,
    other: &Pattern,
    this_resolver: &Resolver,
    other_resolver: &Resolver,
    type_stack: &TypeStack,
) -> Option<MatchResult> {
    if this == other {
        return Some(MatchResult::Success);
    }

    let result = match other {
        Pattern::ExactValue(exact) => this.matches(&exact.value, this_resolver),
        Pattern::Deferred(deferred) => {
            let resolved = match deferred.resolve(other_resolver) {
                Ok(resolved) => resolved,
                Err(e) => return Some(MatchResult::Failure(e.to_failure())),
            };
            // An unnamed `this` shrinks on every step, so only named pairs can recur.
            match type_identity(this) {
                Some(this_name) if type_stack.contains(&this_name, &deferred.pattern_name) => {
                    trace!(this = %this_name, other = %deferred.pattern_name, "Type pair already under comparison");
                    MatchResult::Success
                }
                Some(this_name) => {
                    let type_stack = type_stack.push(&this_name, &deferred.pattern_name);
                    this.encompasses(&resolved, this_resolver, other_resolver, &type_stack)
                }
                None => this.encompasses(&resolved, this_resolver, other_resolver, type_stack),
            }
        }
        Pattern::Any(any) => MatchResult::all(
            any.patterns
                .iter()
                .map(|member| this.encompasses(member, this_resolver, other_resolver, type_stack)),
        ),
        Pattern::OptionalBody(optional) => MatchResult::all(
            optional
                .pattern
                .patterns
                .iter()
                .map(|member| this.encompasses(member, this_resolver, other_resolver, type_stack)),
        ),
        Pattern::LookupRow(lookup) => this.encompasses(&lookup.pattern, this_resolver, other_resolver, type_stack),
        _ => return None,
    };
    Some(result)
}

/// Name identifying `this` on the type stack: a by-name reference or a
/// declared alias. Anonymous structures have none.
fn type_identity(this: &Pattern) -> Option<String> {
    match this {
        Pattern::Deferred(deferred) => Some(deferred.pattern_name.clone()),
        other => other.type_alias().map(str::to_string),
    }
}

/// Default rule: same kind of pattern, after unwrapping
pub fn encompasses(
    this: &Pattern,
    other: &Pattern,
    this_resolver: &Resolver,
    other_resolver: &Resolver,
    type_stack: &TypeStack,
) -> MatchResult {
    if let Some(result) = encompasses_wrapped(this, other, this_resolver, other_resolver, type_stack) {
        return result;
    }

    let same_kind = match (this, other) {
        (Pattern::Custom(a), Pattern::Custom(b)) => a.type_name() == b.type_name(),
        (a, b) => discriminant(a) == discriminant(b),
    };

    if same_kind {
        MatchResult::Success
    } else {
        type_mismatch(this, other)
    }
}

/// "Expected X, got Y" failure between two patterns
pub fn type_mismatch(this: &Pattern, other: &Pattern) -> MatchResult {
    MatchResult::Failure(Failure::new(format!(
        "Expected {}, got {}",
        this.type_name(),
        other.type_name()
    )))
}
