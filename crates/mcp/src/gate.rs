//! Tier gate: decides whether a caller's subscription tier may use a tool.
//!
//! The gate is a pure lookup over a table built at startup. It never talks
//! to the access service itself; the caller's tier is resolved by the
//! invoker and passed in.

use crate::tools::ToolRegistry;
use coursegate_backend::Tier;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Outcome of a gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Deny(Denial),
}

/// Why a gated tool was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// Advanced features are switched off platform-wide.
    FeatureDisabled { tool: String },
    /// The caller's tier is below the tool's minimum.
    TierTooLow {
        tool: String,
        required: Tier,
        actual: Tier,
        upgrade_url: String,
    },
}

impl Denial {
    /// Payload returned to the host as ordinary tool output.
    pub fn to_payload(&self) -> Value {
        match self {
            Denial::FeatureDisabled { tool } => json!({
                "error": format!("{} is not enabled on this platform yet", tool),
                "phase_2_enabled": false,
            }),
            Denial::TierTooLow {
                tool,
                required,
                actual,
                upgrade_url,
            } => json!({
                "error": format!(
                    "{} requires a {} subscription (current tier: {})",
                    tool, required, actual
                ),
                "required_tier": required,
                "current_tier": actual,
                "upgrade_url": upgrade_url,
            }),
        }
    }
}

/// Static table of gated tools and their minimum tier.
#[derive(Debug, Clone)]
pub struct TierGate {
    requirements: HashMap<String, Tier>,
    advanced_enabled: bool,
    upgrade_url: String,
}

impl TierGate {
    pub fn new(advanced_enabled: bool, upgrade_url: impl Into<String>) -> Self {
        Self {
            requirements: HashMap::new(),
            advanced_enabled,
            upgrade_url: upgrade_url.into(),
        }
    }

    /// Build the table from the tiers the registered tools declare.
    pub fn from_registry(
        registry: &ToolRegistry,
        advanced_enabled: bool,
        upgrade_url: impl Into<String>,
    ) -> Self {
        registry
            .tier_requirements()
            .fold(Self::new(advanced_enabled, upgrade_url), |gate, (tool, tier)| {
                gate.with_requirement(tool, tier)
            })
    }

    pub fn with_requirement(mut self, tool: impl Into<String>, tier: Tier) -> Self {
        self.requirements.insert(tool.into(), tier);
        self
    }

    pub fn required_tier(&self, tool: &str) -> Option<Tier> {
        self.requirements.get(tool).copied()
    }

    pub fn is_gated(&self, tool: &str) -> bool {
        self.requirements.contains_key(tool)
    }

    pub fn upgrade_url(&self) -> &str {
        &self.upgrade_url
    }

    /// Tier-independent part of the check. Runs before the caller's tier is
    /// looked up so a disabled feature costs no backend round-trip.
    pub fn precheck(&self, tool: &str) -> GateDecision {
        if self.is_gated(tool) && !self.advanced_enabled {
            return GateDecision::Deny(Denial::FeatureDisabled {
                tool: tool.to_string(),
            });
        }
        GateDecision::Allow
    }

    /// Full check for a caller of the given tier.
    pub fn evaluate(&self, tool: &str, tier: Tier) -> GateDecision {
        let Some(required) = self.required_tier(tool) else {
            return GateDecision::Allow;
        };

        if let GateDecision::Deny(denial) = self.precheck(tool) {
            return GateDecision::Deny(denial);
        }

        if tier >= required {
            GateDecision::Allow
        } else {
            GateDecision::Deny(Denial::TierTooLow {
                tool: tool.to_string(),
                required,
                actual: tier,
                upgrade_url: self.upgrade_url.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::course_registry;

    const UPGRADE: &str = "https://example.com/upgrade";

    fn gate(enabled: bool) -> TierGate {
        TierGate::from_registry(&course_registry(), enabled, UPGRADE)
    }

    #[test]
    fn test_ungated_tool_always_allowed() {
        let gate = gate(false);
        assert_eq!(gate.precheck("get_quiz"), GateDecision::Allow);
        assert_eq!(gate.evaluate("get_quiz", Tier::Free), GateDecision::Allow);
    }

    #[test]
    fn test_free_caller_denied_with_upgrade_url() {
        let gate = gate(true);
        let decision = gate.evaluate("get_adaptive_recommendations", Tier::Free);

        let GateDecision::Deny(denial) = decision else {
            panic!("expected denial");
        };
        let payload = denial.to_payload();
        assert_eq!(payload["upgrade_url"], UPGRADE);
        assert_eq!(payload["required_tier"], "premium");
        assert_eq!(payload["current_tier"], "free");
    }

    #[test]
    fn test_tier_at_or_above_minimum_allowed() {
        let gate = gate(true);
        assert_eq!(
            gate.evaluate("get_adaptive_recommendations", Tier::Premium),
            GateDecision::Allow
        );
        assert_eq!(
            gate.evaluate("get_adaptive_recommendations", Tier::Pro),
            GateDecision::Allow
        );
    }

    #[test]
    fn test_pro_only_tool() {
        let gate = gate(true);
        assert!(matches!(
            gate.evaluate("grade_open_answer", Tier::Premium),
            GateDecision::Deny(Denial::TierTooLow { required: Tier::Pro, .. })
        ));
        assert_eq!(gate.evaluate("grade_open_answer", Tier::Pro), GateDecision::Allow);
    }

    #[test]
    fn test_disabled_flag_denies_every_tier() {
        let gate = gate(false);
        for tier in [Tier::Free, Tier::Premium, Tier::Pro] {
            let decision = gate.evaluate("analyze_knowledge_gaps", tier);
            assert!(matches!(
                decision,
                GateDecision::Deny(Denial::FeatureDisabled { .. })
            ));
        }
    }

    #[test]
    fn test_disabled_payload() {
        let GateDecision::Deny(denial) = gate(false).precheck("get_adaptive_recommendations") else {
            panic!("expected denial");
        };
        let payload = denial.to_payload();

        assert_eq!(payload["phase_2_enabled"], false);
        assert!(payload["error"].as_str().unwrap().contains("not enabled"));
        assert!(payload.get("upgrade_url").is_none());
    }
}
