// ==========================================
// PipeTrak Progress Engine - budget distribution engine
// ==========================================
// Responsibility: the pure planning half of budget distribution. Given the
// project's components and a total effort, compute every component's weight
// and budgeted share plus the warning list. No SQL here; persistence is one
// transaction in repository::budget_repo::apply_distribution.
// ==========================================
// Preconditions fail fast, before anything is written:
// - InvalidBudget: total effort not a positive finite number
// - NoComponents: no eligible (non-retired, non-post-baseline) component
// - ZeroWeight: eligible weights sum to zero
// ==========================================

use crate::domain::budget::AllocationWarning;
use crate::domain::component::{Component, ParsedSize};
use crate::engine::size_parser;
use crate::engine::weight::WeightCalculator;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==========================================
// DistributionError - precondition failures
// ==========================================
// All recoverable: the user corrects the input and retries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    #[error("invalid budget: total effort must be a positive number (got {total_effort})")]
    InvalidBudget { total_effort: f64 },

    #[error("no eligible components: every component is retired or created after {effective_date}")]
    NoComponents { effective_date: NaiveDate },

    #[error("zero total weight: eligible components sum to weight 0, nothing to distribute")]
    ZeroWeight,
}

// ==========================================
// ComponentAllocation - one component's planned share
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentAllocation {
    pub component_id: String,
    pub effort_weight: f64,
    pub budgeted_effort: f64, // 0 for post-baseline additions
    pub post_baseline: bool,
}

// ==========================================
// DistributionPlan - full planned outcome
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionPlan {
    pub allocations: Vec<ComponentAllocation>,
    pub eligible_count: usize,
    pub post_baseline_count: usize,
    pub total_weight: f64, // over eligible components only
    pub warnings: Vec<AllocationWarning>,
}

// ==========================================
// DistributionEngine - stateless planner
// ==========================================
pub struct DistributionEngine {
    weights: WeightCalculator,
}

impl DistributionEngine {
    pub fn new(weights: WeightCalculator) -> Self {
        Self { weights }
    }

    pub fn weight_calculator(&self) -> &WeightCalculator {
        &self.weights
    }

    /// Plan a distribution of `total_effort` over `components`
    ///
    /// Retired components are skipped entirely. Non-retired components all
    /// receive a (re)computed effort_weight; components created after
    /// `effective_date` are post-baseline and receive budgeted_effort = 0
    /// plus a warning. Eligible components share the total proportionally
    /// to weight.
    pub fn plan(
        &self,
        components: &[Component],
        total_effort: f64,
        effective_date: NaiveDate,
    ) -> Result<DistributionPlan, DistributionError> {
        if !total_effort.is_finite() || total_effort <= 0.0 {
            return Err(DistributionError::InvalidBudget { total_effort });
        }

        let mut warnings: Vec<AllocationWarning> = Vec::new();
        let mut parsed: Vec<(usize, f64, bool)> = Vec::new(); // (index, weight, post_baseline)
        let mut total_weight = 0.0;
        let mut eligible_count = 0usize;
        let mut post_baseline_count = 0usize;

        for (idx, component) in components.iter().enumerate() {
            if component.retired {
                continue;
            }

            let size = size_parser::parse(component.size_text_or_empty());
            if let ParsedSize::Unparseable { raw } = &size {
                warnings.push(AllocationWarning::UnparseableSize {
                    component_id: component.component_id.clone(),
                    raw: raw.clone(),
                });
            }

            let weight =
                self.weights
                    .weight(&size, component.component_type, component.linear_feet);

            let post_baseline = component.created_at.date() > effective_date;
            if post_baseline {
                post_baseline_count += 1;
                warnings.push(AllocationWarning::PostBaseline {
                    component_id: component.component_id.clone(),
                });
            } else {
                eligible_count += 1;
                total_weight += weight;
            }

            parsed.push((idx, weight, post_baseline));
        }

        if eligible_count == 0 {
            return Err(DistributionError::NoComponents { effective_date });
        }
        if total_weight <= 0.0 {
            return Err(DistributionError::ZeroWeight);
        }

        let allocations = parsed
            .into_iter()
            .map(|(idx, weight, post_baseline)| {
                let budgeted = if post_baseline {
                    0.0
                } else {
                    weight / total_weight * total_effort
                };
                ComponentAllocation {
                    component_id: components[idx].component_id.clone(),
                    effort_weight: weight,
                    budgeted_effort: budgeted,
                    post_baseline,
                }
            })
            .collect();

        Ok(DistributionPlan {
            allocations,
            eligible_count,
            post_baseline_count,
            total_weight,
            warnings,
        })
    }
}

impl Default for DistributionEngine {
    fn default() -> Self {
        Self::new(WeightCalculator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ComponentType;
    use chrono::NaiveDate;

    fn component(id: &str, size: &str, created: NaiveDate) -> Component {
        Component {
            component_id: id.to_string(),
            project_id: "P1".to_string(),
            component_type: ComponentType::Spool,
            size_text: Some(size.to_string()),
            linear_feet: None,
            area: None,
            system_code: None,
            test_package: None,
            drawing: None,
            welder: None,
            budgeted_effort: 0.0,
            effort_weight: 0.0,
            percent_complete: 0.0,
            retired: false,
            created_at: created.and_hms_opt(8, 0, 0).unwrap(),
        }
    }

    fn baseline() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_invalid_budget_rejected_before_anything_else() {
        let engine = DistributionEngine::default();
        for bad in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let err = engine.plan(&[], bad, baseline()).unwrap_err();
            assert!(matches!(err, DistributionError::InvalidBudget { .. }));
        }
    }

    #[test]
    fn test_no_components() {
        let engine = DistributionEngine::default();
        let err = engine.plan(&[], 1000.0, baseline()).unwrap_err();
        assert!(matches!(err, DistributionError::NoComponents { .. }));

        // retired-only is also empty
        let mut c = component("C1", "2", baseline());
        c.retired = true;
        let err = engine.plan(&[c], 1000.0, baseline()).unwrap_err();
        assert!(matches!(err, DistributionError::NoComponents { .. }));
    }

    #[test]
    fn test_distribution_conservation() {
        // weights 2^1.5≈2.83 and 4^1.5=8.00 sharing 1000h
        let engine = DistributionEngine::default();
        let components = vec![
            component("C1", "2", baseline()),
            component("C2", "4", baseline()),
        ];
        let plan = engine.plan(&components, 1000.0, baseline()).unwrap();

        let total: f64 = plan.allocations.iter().map(|a| a.budgeted_effort).sum();
        assert!((total - 1000.0).abs() <= 0.01);

        let c1 = &plan.allocations[0];
        let c2 = &plan.allocations[1];
        assert!((c1.budgeted_effort - 261.2).abs() < 1.0); // ≈ 261.3
        assert!((c2.budgeted_effort - 738.7).abs() < 1.0);
        assert!(c2.budgeted_effort > c1.budgeted_effort);
    }

    #[test]
    fn test_post_baseline_isolation() {
        let engine = DistributionEngine::default();
        let after = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let components = vec![
            component("C1", "2", baseline()),
            component("C2", "4", after), // added after effective date
        ];
        let plan = engine.plan(&components, 500.0, baseline()).unwrap();

        let c2 = plan
            .allocations
            .iter()
            .find(|a| a.component_id == "C2")
            .unwrap();
        assert!(c2.post_baseline);
        assert_eq!(c2.budgeted_effort, 0.0);
        assert!(c2.effort_weight > 0.0); // weight still recorded for traceability

        // the whole budget lands on the eligible component
        let c1 = plan
            .allocations
            .iter()
            .find(|a| a.component_id == "C1")
            .unwrap();
        assert!((c1.budgeted_effort - 500.0).abs() <= 0.01);

        assert!(plan
            .warnings
            .iter()
            .any(|w| matches!(w, AllocationWarning::PostBaseline { component_id } if component_id == "C2")));
    }

    #[test]
    fn test_component_created_on_effective_date_is_in_scope() {
        let engine = DistributionEngine::default();
        let components = vec![component("C1", "2", baseline())];
        let plan = engine.plan(&components, 100.0, baseline()).unwrap();
        assert!(!plan.allocations[0].post_baseline);
    }

    #[test]
    fn test_unparseable_size_warns_but_does_not_block() {
        let engine = DistributionEngine::default();
        let components = vec![
            component("C1", "2", baseline()),
            component("C2", "???", baseline()),
        ];
        let plan = engine.plan(&components, 100.0, baseline()).unwrap();

        assert_eq!(plan.eligible_count, 2);
        assert!(plan
            .warnings
            .iter()
            .any(|w| matches!(w, AllocationWarning::UnparseableSize { component_id, raw }
                if component_id == "C2" && raw == "???")));

        // fallback weight still earns a share
        let c2 = plan
            .allocations
            .iter()
            .find(|a| a.component_id == "C2")
            .unwrap();
        assert_eq!(c2.effort_weight, 0.5);
        assert!(c2.budgeted_effort > 0.0);
    }

    #[test]
    fn test_no_size_sentinel_does_not_warn() {
        let engine = DistributionEngine::default();
        let mut c = component("C1", "NOSIZE", baseline());
        c.component_type = ComponentType::Instrument;
        let plan = engine
            .plan(&[c, component("C2", "2", baseline())], 100.0, baseline())
            .unwrap();
        assert!(plan.warnings.is_empty());
    }
}
