//! Secret satisfaction resolver.
//!
//! Decides, for each secret requirement of a profile, whether a value is
//! available and which source provides it. Pure and synchronous: the output
//! depends only on [`ResolveInput`].
//!
//! Sources are tried in a fixed order, first match wins:
//!
//! | # | rule            | outcome                                        |
//! |---|-----------------|------------------------------------------------|
//! | 1 | session-only    | non-empty session value → `SessionOnly`        |
//! | 2 | selected-saved  | override id that still exists → `SelectedSaved`|
//! | 3 | prefer-machine  | override `''` → jump to rule 5                 |
//! | 4 | default-binding | binding that still exists → `DefaultSaved` or `RememberedSaved` |
//! | 5 | machine-env     | probe says present → `MachineEnv`              |
//!
//! Nothing matched → unsatisfied. References to deleted credentials fall
//! through to the next rule.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::core::bindings::{DefaultBindings, Selection, Selections, SessionValues};
use crate::core::domain::{
    CredentialRequirement, SatisfactionItem, SatisfactionResult, SatisfiedBy, SavedCredential,
};
use crate::core::requirements::secret_requirements;
use crate::core::types::{CredentialId, EnvVarName};

/// Presence of variables in a machine's own environment.
///
/// A missing key means "not present".
pub type PresenceMap = HashMap<EnvVarName, bool>;

/// Everything the resolver reads, as one consistent snapshot
#[derive(Debug, Clone, Copy)]
pub struct ResolveInput<'a> {
    pub profile_id: &'a str,
    pub requirements: &'a [CredentialRequirement],
    pub credentials: &'a [SavedCredential],
    pub bindings: &'a DefaultBindings,
    pub selections: &'a Selections,
    pub session_values: &'a SessionValues,
    pub machine_env: &'a PresenceMap,
}

/// Identifies a rule in [`RULES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleId {
    SessionOnly,
    SelectedSaved,
    PreferMachine,
    DefaultBinding,
    MachineEnv,
}

/// Outcome of evaluating one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Requirement satisfied by this source
    Match(SatisfiedBy, Option<CredentialId>),
    /// Try the next rule
    Continue,
    /// Skip ahead to a later rule
    SkipTo(RuleId),
}

/// What a rule sees for one requirement
struct RuleContext<'a> {
    input: &'a ResolveInput<'a>,
    env_var: &'a str,
}

impl RuleContext<'_> {
    fn credential_exists(&self, id: &str) -> bool {
        self.input.credentials.iter().any(|c| c.id() == id)
    }
}

type Rule = fn(&RuleContext<'_>) -> Step;

/// Precedence table, evaluated top to bottom.
const RULES: &[(RuleId, Rule)] = &[
    (RuleId::SessionOnly, session_only),
    (RuleId::SelectedSaved, selected_saved),
    (RuleId::PreferMachine, prefer_machine),
    (RuleId::DefaultBinding, default_binding),
    (RuleId::MachineEnv, machine_env),
];

fn session_only(ctx: &RuleContext<'_>) -> Step {
    match ctx.input.session_values.get(ctx.input.profile_id, ctx.env_var) {
        Some(_) => Step::Match(SatisfiedBy::SessionOnly, None),
        None => Step::Continue,
    }
}

fn selected_saved(ctx: &RuleContext<'_>) -> Step {
    match ctx.input.selections.get(ctx.input.profile_id, ctx.env_var) {
        Some(Selection::Saved(id)) if ctx.credential_exists(id) => {
            Step::Match(SatisfiedBy::SelectedSaved, Some(id.clone()))
        }
        Some(Selection::Saved(id)) => {
            debug!(env_var = %ctx.env_var, credential = %id, "selected credential no longer exists");
            Step::Continue
        }
        _ => Step::Continue,
    }
}

fn prefer_machine(ctx: &RuleContext<'_>) -> Step {
    match ctx.input.selections.get(ctx.input.profile_id, ctx.env_var) {
        Some(Selection::PreferMachine) => Step::SkipTo(RuleId::MachineEnv),
        _ => Step::Continue,
    }
}

fn default_binding(ctx: &RuleContext<'_>) -> Step {
    // A live selection matched in rule 2 and "prefer machine" jumped past
    // this rule, so any selection seen here is dangling: no explicit choice.
    match ctx.input.bindings.get(ctx.input.profile_id, ctx.env_var) {
        Some(binding) if ctx.credential_exists(binding.credential_id) => {
            let source = if binding.remembered {
                SatisfiedBy::RememberedSaved
            } else {
                SatisfiedBy::DefaultSaved
            };
            Step::Match(source, Some(binding.credential_id.to_string()))
        }
        Some(binding) => {
            debug!(
                env_var = %ctx.env_var,
                credential = %binding.credential_id,
                "default binding points at a deleted credential"
            );
            Step::Continue
        }
        None => Step::Continue,
    }
}

fn machine_env(ctx: &RuleContext<'_>) -> Step {
    if ctx.input.machine_env.get(ctx.env_var).copied().unwrap_or(false) {
        Step::Match(SatisfiedBy::MachineEnv, None)
    } else {
        Step::Continue
    }
}

/// Resolve one requirement against the rule table.
fn resolve_requirement(input: &ResolveInput<'_>, req: &CredentialRequirement) -> SatisfactionItem {
    let ctx = RuleContext {
        input,
        env_var: &req.env_var_name,
    };
    let mut skip_to: Option<RuleId> = None;

    for (id, rule) in RULES {
        if let Some(target) = skip_to {
            if *id != target {
                continue;
            }
            skip_to = None;
        }

        match rule(&ctx) {
            Step::Match(source, saved_id) => {
                trace!(env_var = %req.env_var_name, rule = ?id, "requirement satisfied");
                return SatisfactionItem::satisfied(
                    &req.env_var_name,
                    req.required,
                    source,
                    saved_id,
                );
            }
            Step::Continue => {}
            Step::SkipTo(target) => skip_to = Some(target),
        }
    }

    SatisfactionItem::unsatisfied(&req.env_var_name, req.required)
}

/// Resolve every secret requirement in `input`.
///
/// Plain requirements are ignored. Duplicate names collapse to the last
/// declaration. An empty requirement list is trivially satisfied.
pub fn resolve(input: &ResolveInput<'_>) -> SatisfactionResult {
    let secrets = secret_requirements(input.requirements);

    let items: Vec<SatisfactionItem> = secrets
        .iter()
        .map(|req| resolve_requirement(input, req))
        .collect();

    let result = SatisfactionResult::from_items(items);
    debug!(
        profile = %input.profile_id,
        requirements = result.items.len(),
        satisfied = result.is_satisfied,
        "resolved secret requirements"
    );
    result
}
