//! Salary plan configuration models.
//!
//! A salary plan is an ordered list of typed blocks. Plans arrive as JSON
//! from the `salary_plans.config` column or as YAML from a local catalog, and
//! parsing is deliberately lenient: unknown block types are preserved as
//! [`SalaryPlanBlock::Unknown`] and malformed payloads degrade to zeros.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::EngineResult;

/// A single tier of the sales-target bonus ladder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Sales figure that must be met or exceeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_target: Option<Decimal>,
    /// Bonus paid when this is the highest tier reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus: Option<Decimal>,
}

/// Payload of a `basic_salary` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicSalaryConfig {
    /// Monthly base salary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_salary: Option<Decimal>,
    /// Sales-target bonus ladder, in any order.
    #[serde(default)]
    pub tiered_bonus: Vec<TierConfig>,
}

/// Payload of a `commission` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionConfig {
    /// Sales must strictly exceed this before commission accrues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Decimal>,
    /// Commission rate applied to the excess, `0..=1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
}

/// Payload of a `fixed_amount` block.
///
/// Older plans store the amount under `basicSalary`; that key takes precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedAmountConfig {
    /// Fixed monthly amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// Legacy alias for `amount`.
    #[serde(
        default,
        rename = "basicSalary",
        skip_serializing_if = "Option::is_none"
    )]
    pub basic_salary: Option<Decimal>,
}

/// A typed unit of a salary plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBlock", into = "RawBlock")]
pub enum SalaryPlanBlock {
    /// Base salary plus tiered sales bonus.
    BasicSalary(BasicSalaryConfig),
    /// Commission on sales above a threshold.
    Commission(CommissionConfig),
    /// Flat amount that replaces the basic salary.
    FixedAmount(FixedAmountConfig),
    /// A block type this engine does not know; kept verbatim and skipped.
    Unknown {
        /// The unrecognized `type` discriminant.
        kind: String,
        /// The untouched payload.
        config: serde_json::Value,
    },
}

impl SalaryPlanBlock {
    /// The `type` discriminant as stored in configuration.
    pub fn kind(&self) -> &str {
        match self {
            SalaryPlanBlock::BasicSalary(_) => "basic_salary",
            SalaryPlanBlock::Commission(_) => "commission",
            SalaryPlanBlock::FixedAmount(_) => "fixed_amount",
            SalaryPlanBlock::Unknown { kind, .. } => kind,
        }
    }
}

/// Wire shape of a block: `{ "type": ..., "config": {...} }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    config: serde_json::Value,
}

fn lenient<T>(kind: &str, config: serde_json::Value) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    if config.is_null() {
        return T::default();
    }
    serde_json::from_value(config).unwrap_or_else(|e| {
        warn!(block_type = kind, error = %e, "Malformed salary block config, using zeros");
        T::default()
    })
}

impl From<RawBlock> for SalaryPlanBlock {
    fn from(raw: RawBlock) -> Self {
        match raw.kind.as_str() {
            "basic_salary" => SalaryPlanBlock::BasicSalary(lenient(&raw.kind, raw.config)),
            "commission" => SalaryPlanBlock::Commission(lenient(&raw.kind, raw.config)),
            "fixed_amount" => SalaryPlanBlock::FixedAmount(lenient(&raw.kind, raw.config)),
            _ => SalaryPlanBlock::Unknown {
                kind: raw.kind,
                config: raw.config,
            },
        }
    }
}

impl From<SalaryPlanBlock> for RawBlock {
    fn from(block: SalaryPlanBlock) -> Self {
        let kind = block.kind().to_string();
        let config = match block {
            SalaryPlanBlock::BasicSalary(c) => serde_json::to_value(c),
            SalaryPlanBlock::Commission(c) => serde_json::to_value(c),
            SalaryPlanBlock::FixedAmount(c) => serde_json::to_value(c),
            SalaryPlanBlock::Unknown { config, .. } => Ok(config),
        }
        .unwrap_or_default();
        RawBlock { kind, config }
    }
}

/// A declarative salary plan.
///
/// # Example
///
/// ```
/// use barbershop_engine::models::{SalaryPlanBlock, SalaryPlanConfig};
///
/// let plan = SalaryPlanConfig::from_json(r#"{
///     "name": "Standard",
///     "description": "Base plus commission",
///     "blocks": [
///         { "type": "basic_salary", "config": { "base_salary": 2000, "tiered_bonus": [] } },
///         { "type": "commission", "config": { "threshold": 4000, "rate": 0.2 } }
///     ]
/// }"#).unwrap();
///
/// assert_eq!(plan.blocks.len(), 2);
/// assert!(matches!(plan.blocks[1], SalaryPlanBlock::Commission(_)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryPlanConfig {
    /// Display label.
    #[serde(default)]
    pub name: String,
    /// Display description.
    #[serde(default)]
    pub description: String,
    /// Blocks, processed in order.
    #[serde(default)]
    pub blocks: Vec<SalaryPlanBlock>,
}

impl SalaryPlanConfig {
    /// Parses a plan from its persisted JSON form.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A bonus or deduction line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicField {
    /// Label shown on the payslip.
    #[serde(default)]
    pub name: String,
    /// Monetary contribution.
    #[serde(default)]
    pub amount: Decimal,
}

impl DynamicField {
    /// Creates a line item.
    pub fn new(name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// The salary plan record assigned to an employee.
///
/// Employees without a configured plan fall back to the legacy default plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryPlan {
    /// Database identifier, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Plan name.
    #[serde(default)]
    pub name: String,
    /// The block configuration, if one has been assigned.
    #[serde(default)]
    pub config: Option<SalaryPlanConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_all_block_types() {
        let plan = SalaryPlanConfig::from_json(
            r#"{
                "name": "Mixed",
                "description": "",
                "blocks": [
                    { "type": "basic_salary", "config": {
                        "base_salary": 2000,
                        "tiered_bonus": [ { "sales_target": 7000, "bonus": 200 } ]
                    } },
                    { "type": "commission", "config": { "threshold": 4000, "rate": 0.2 } },
                    { "type": "fixed_amount", "config": { "amount": 3750 } }
                ]
            }"#,
        )
        .unwrap();

        match &plan.blocks[0] {
            SalaryPlanBlock::BasicSalary(c) => {
                assert_eq!(c.base_salary, Some(dec("2000")));
                assert_eq!(c.tiered_bonus[0].sales_target, Some(dec("7000")));
                assert_eq!(c.tiered_bonus[0].bonus, Some(dec("200")));
            }
            other => panic!("Expected basic salary block, got {:?}", other),
        }
        match &plan.blocks[1] {
            SalaryPlanBlock::Commission(c) => {
                assert_eq!(c.threshold, Some(dec("4000")));
                assert_eq!(c.rate, Some(dec("0.2")));
            }
            other => panic!("Expected commission block, got {:?}", other),
        }
        match &plan.blocks[2] {
            SalaryPlanBlock::FixedAmount(c) => assert_eq!(c.amount, Some(dec("3750"))),
            other => panic!("Expected fixed amount block, got {:?}", other),
        }
    }

    #[test]
    fn test_fixed_amount_reads_legacy_alias() {
        let plan = SalaryPlanConfig::from_json(
            r#"{ "blocks": [ { "type": "fixed_amount", "config": { "basicSalary": 3000 } } ] }"#,
        )
        .unwrap();

        match &plan.blocks[0] {
            SalaryPlanBlock::FixedAmount(c) => {
                assert_eq!(c.basic_salary, Some(dec("3000")));
                assert_eq!(c.amount, None);
            }
            other => panic!("Expected fixed amount block, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_block_type_is_preserved() {
        let plan = SalaryPlanConfig::from_json(
            r#"{ "blocks": [ { "type": "overtime", "config": { "rate": 1.5 } } ] }"#,
        )
        .unwrap();

        assert_eq!(plan.blocks[0].kind(), "overtime");
        assert!(matches!(plan.blocks[0], SalaryPlanBlock::Unknown { .. }));
    }

    #[test]
    fn test_missing_config_defaults_to_zeros() {
        let plan =
            SalaryPlanConfig::from_json(r#"{ "blocks": [ { "type": "commission" } ] }"#).unwrap();
        assert_eq!(
            plan.blocks[0],
            SalaryPlanBlock::Commission(CommissionConfig::default())
        );
    }

    #[test]
    fn test_malformed_config_degrades_to_zeros() {
        let plan = SalaryPlanConfig::from_json(
            r#"{ "blocks": [ { "type": "basic_salary", "config": { "base_salary": [1, 2] } } ] }"#,
        )
        .unwrap();
        assert_eq!(
            plan.blocks[0],
            SalaryPlanBlock::BasicSalary(BasicSalaryConfig::default())
        );
    }

    #[test]
    fn test_block_serializes_back_to_type_and_config() {
        let block = SalaryPlanBlock::Commission(CommissionConfig {
            threshold: Some(dec("4000")),
            rate: Some(dec("0.2")),
        });
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "commission");
        assert!(json["config"].get("threshold").is_some());

        let back: SalaryPlanBlock = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn test_dynamic_field_amount_defaults_to_zero() {
        let field: DynamicField = serde_json::from_str(r#"{ "name": "Eid bonus" }"#).unwrap();
        assert_eq!(field.amount, Decimal::ZERO);
    }

    #[test]
    fn test_salary_plan_without_config() {
        let plan: SalaryPlan = serde_json::from_str(r#"{ "name": "legacy" }"#).unwrap();
        assert!(plan.config.is_none());
    }
}
