//! # Rule Predicates
//!
//! The [`RulePredicate`] trait decides whether one rule passes against a
//! snapshot. The evaluator owns the surrounding contract (partitioning,
//! percentage, status); predicates only answer pass/fail.
//!
//! ## Provided predicates
//!
//! - [`SnapshotFlagPredicate`]: reads the rule's id as a snapshot key.
//!   The default for hosts that publish per-rule flags.
//! - [`FnPredicate`]: wraps a closure, for hosts with real instrumentation.
//! - [`ConstantPredicate`]: every rule passes or every rule fails.
//! - [`SimulatedPredicate`]: seeded weighted pass/fail for demonstrations
//!   and drills. Deterministic for a given seed and call order.

use std::fmt;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use dpc_core::Severity;

use crate::profile::ComplianceRule;
use crate::snapshot::StateSnapshot;

/// Decides whether a single rule is satisfied by a snapshot.
///
/// Implementations must be `Send + Sync` so one evaluator can serve
/// concurrent audits.
pub trait RulePredicate: Send + Sync + fmt::Debug {
    /// Return `true` if `rule` is satisfied by `snapshot`.
    fn is_compliant(&self, rule: &ComplianceRule, snapshot: &StateSnapshot) -> bool;
}

// ---------------------------------------------------------------------------
// SnapshotFlagPredicate
// ---------------------------------------------------------------------------

/// Reads the snapshot value stored under the rule's id.
///
/// | Value | Result |
/// |---|---|
/// | `true` / `false` | as is |
/// | number | non-zero passes |
/// | `"compliant"`, `"ok"`, `"pass"`, `"yes"`, `"true"` | passes (case-insensitive) |
/// | other string | fails |
/// | `{"compliant": bool}` | the inner flag |
/// | missing or `null` | `missing_is_compliant` |
#[derive(Debug, Clone, Default)]
pub struct SnapshotFlagPredicate {
    missing_is_compliant: bool,
}

impl SnapshotFlagPredicate {
    /// Missing keys fail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: decide how rules without a snapshot key are treated.
    pub fn with_missing_is_compliant(mut self, missing_is_compliant: bool) -> Self {
        self.missing_is_compliant = missing_is_compliant;
        self
    }

    fn interpret(&self, value: Option<&Value>) -> bool {
        match value {
            None | Some(Value::Null) => self.missing_is_compliant,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "compliant" | "ok" | "pass" | "yes" | "true"
            ),
            Some(Value::Object(map)) => self.interpret(map.get("compliant")),
            Some(Value::Array(_)) => false,
        }
    }
}

impl RulePredicate for SnapshotFlagPredicate {
    fn is_compliant(&self, rule: &ComplianceRule, snapshot: &StateSnapshot) -> bool {
        self.interpret(snapshot.get(&rule.id))
    }
}

// ---------------------------------------------------------------------------
// FnPredicate
// ---------------------------------------------------------------------------

/// Adapts a closure into a [`RulePredicate`].
pub struct FnPredicate<F>(F);

impl<F> FnPredicate<F>
where
    F: Fn(&ComplianceRule, &StateSnapshot) -> bool + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> fmt::Debug for FnPredicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPredicate").finish_non_exhaustive()
    }
}

impl<F> RulePredicate for FnPredicate<F>
where
    F: Fn(&ComplianceRule, &StateSnapshot) -> bool + Send + Sync,
{
    fn is_compliant(&self, rule: &ComplianceRule, snapshot: &StateSnapshot) -> bool {
        (self.0)(rule, snapshot)
    }
}

// ---------------------------------------------------------------------------
// ConstantPredicate
// ---------------------------------------------------------------------------

/// Every rule gets the same answer.
#[derive(Debug, Clone, Copy)]
pub struct ConstantPredicate(pub bool);

impl RulePredicate for ConstantPredicate {
    fn is_compliant(&self, _rule: &ComplianceRule, _snapshot: &StateSnapshot) -> bool {
        self.0
    }
}

// ---------------------------------------------------------------------------
// SimulatedPredicate
// ---------------------------------------------------------------------------

/// Seeded weighted pass/fail, standing in for instrumentation in drills.
///
/// Each severity tier has its own pass rate; critical rules are the most
/// likely to be kept in order, matching what crews actually prioritise.
#[derive(Debug)]
pub struct SimulatedPredicate {
    rng: Mutex<StdRng>,
    pass_rates: [f64; 4],
}

impl SimulatedPredicate {
    /// Default pass rates: critical 0.95, high 0.90, medium 0.85, low 0.80.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            pass_rates: [0.95, 0.90, 0.85, 0.80],
        }
    }

    /// Builder: override the pass rate for one tier. Clamped to `[0, 1]`;
    /// a NaN or infinite rate leaves the tier unchanged.
    pub fn with_pass_rate(mut self, severity: Severity, rate: f64) -> Self {
        let slot = &mut self.pass_rates[usize::from(severity.ordinal())];
        if rate.is_finite() {
            *slot = rate.clamp(0.0, 1.0);
        } else {
            tracing::warn!(%severity, rate, kept = *slot, "ignoring non-finite pass rate");
        }
        self
    }

    /// The pass rate applied to a tier.
    pub fn pass_rate(&self, severity: Severity) -> f64 {
        self.pass_rates[usize::from(severity.ordinal())]
    }
}

impl RulePredicate for SimulatedPredicate {
    fn is_compliant(&self, rule: &ComplianceRule, _snapshot: &StateSnapshot) -> bool {
        let p = self.pass_rate(rule.severity);
        self.rng.lock().gen_bool(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(id: &str, severity: Severity) -> ComplianceRule {
        ComplianceRule::new(id, "General", "text", severity, "act")
    }

    #[test]
    fn flag_predicate_interprets_values() {
        let p = SnapshotFlagPredicate::new();
        let snap = StateSnapshot::new()
            .with("b_true", true)
            .with("b_false", false)
            .with("n_zero", 0)
            .with("n_one", 1.5)
            .with("s_ok", "OK")
            .with("s_bad", "degraded")
            .with("obj", json!({"compliant": true}))
            .with("arr", json!([true]))
            .with("null", Value::Null);
        let check = |id: &str| p.is_compliant(&rule(id, Severity::Low), &snap);
        assert!(check("b_true"));
        assert!(!check("b_false"));
        assert!(!check("n_zero"));
        assert!(check("n_one"));
        assert!(check("s_ok"));
        assert!(!check("s_bad"));
        assert!(check("obj"));
        assert!(!check("arr"));
        assert!(!check("null"));
        assert!(!check("absent"));
    }

    #[test]
    fn flag_predicate_missing_policy() {
        let p = SnapshotFlagPredicate::new().with_missing_is_compliant(true);
        assert!(p.is_compliant(&rule("absent", Severity::High), &StateSnapshot::new()));
    }

    #[test]
    fn fn_predicate_delegates() {
        let p = FnPredicate::new(|rule: &ComplianceRule, _: &StateSnapshot| {
            rule.severity != Severity::Critical
        });
        assert!(!p.is_compliant(&rule("a", Severity::Critical), &StateSnapshot::new()));
        assert!(p.is_compliant(&rule("b", Severity::Low), &StateSnapshot::new()));
        assert!(format!("{p:?}").contains("FnPredicate"));
    }

    #[test]
    fn constant_predicate() {
        let snap = StateSnapshot::new();
        assert!(ConstantPredicate(true).is_compliant(&rule("a", Severity::Low), &snap));
        assert!(!ConstantPredicate(false).is_compliant(&rule("a", Severity::Low), &snap));
    }

    #[test]
    fn simulated_predicate_is_deterministic_per_seed() {
        let rules: Vec<_> = (0..50).map(|i| rule(&format!("R{i}"), Severity::Medium)).collect();
        let run = |seed| {
            let p = SimulatedPredicate::new(seed);
            rules
                .iter()
                .map(|r| p.is_compliant(r, &StateSnapshot::new()))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn simulated_predicate_extreme_rates() {
        let p = SimulatedPredicate::new(1)
            .with_pass_rate(Severity::Critical, 2.0)
            .with_pass_rate(Severity::Low, -1.0);
        assert_eq!(p.pass_rate(Severity::Critical), 1.0);
        assert_eq!(p.pass_rate(Severity::Low), 0.0);
        for _ in 0..20 {
            assert!(p.is_compliant(&rule("c", Severity::Critical), &StateSnapshot::new()));
            assert!(!p.is_compliant(&rule("l", Severity::Low), &StateSnapshot::new()));
        }
    }

    #[test]
    fn simulated_predicate_ignores_non_finite_rates() {
        let p = SimulatedPredicate::new(3)
            .with_pass_rate(Severity::High, f64::NAN)
            .with_pass_rate(Severity::Low, f64::INFINITY);
        assert_eq!(p.pass_rate(Severity::High), 0.90);
        assert_eq!(p.pass_rate(Severity::Low), 0.80);
        for _ in 0..20 {
            p.is_compliant(&rule("h", Severity::High), &StateSnapshot::new());
        }
    }
}
