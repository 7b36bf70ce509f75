use std::io::Write;

use propsim::{FinancingKind, Scenario, ScenarioError, StrategyKind, TrackingFrequency};
use tempfile::NamedTempFile;

const SCENARIO: &str = r#"{
    "investment": {
        "acquisition": {
            "purchase_price": 1650000,
            "transfer_duty": 13200,
            "conveyancing_fees": 32000,
            "bond_registration": 22000,
            "furnishing_cost": 80000
        },
        "financing": {
            "ltv_ratio": 0.5,
            "financing_kind": "leveraged",
            "appreciation_rate": 0.06,
            "interest_rate": 0.105,
            "loan_term_months": 240
        },
        "operating": {
            "monthly_rental_income": 15000,
            "vacancy_rate": 0.05,
            "monthly_levies": 2500,
            "management_fee_rate": 0.08,
            "monthly_insurance": 800,
            "monthly_maintenance_reserve": 1000,
            "monthly_furnishing_repair_costs": 500
        }
    },
    "strategies": [
        {
            "name": "cash",
            "strategy": {
                "kind": {"type": "cash_only"},
                "initial_capital": 2000000,
                "horizon_months": 120
            }
        },
        {
            "name": "mixed",
            "strategy": {
                "kind": {
                    "type": "mixed",
                    "leveraged_ratio": 0.7,
                    "cash_ratio": 0.3,
                    "first_property_kind": "leveraged"
                },
                "initial_capital": 2000000,
                "horizon_months": 120,
                "reinvest_cashflow": false,
                "refinancing": {"frequency": "annually", "target_ltv": 0.6},
                "injections": [
                    {"amount": 50000, "frequency": "monthly", "end_period": 60},
                    {"amount": 500000, "frequency": "one_time", "specific_periods": [24]}
                ],
                "tracking": "yearly"
            }
        }
    ]
}"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_scenario_from_file() {
    let file = write_temp(SCENARIO);
    let scenario = Scenario::load(file.path()).unwrap();

    assert_eq!(scenario.strategies.len(), 2);
    assert_eq!(
        scenario.investment.financing.financing_kind,
        FinancingKind::Leveraged
    );
    assert_eq!(
        scenario.investment.operating.rent_escalation_rate,
        propsim::Decimal::zero()
    );

    let cash = &scenario.strategies[0].strategy;
    assert_eq!(cash.kind, StrategyKind::CashOnly);
    assert!(cash.reinvest_cashflow);
    assert_eq!(cash.tracking, TrackingFrequency::Monthly);
    assert!(cash.refinancing.is_none());

    let mixed = &scenario.strategies[1].strategy;
    assert!(matches!(mixed.kind, StrategyKind::Mixed { .. }));
    assert!(!mixed.reinvest_cashflow);
    assert_eq!(mixed.injections.len(), 2);
    assert_eq!(mixed.tracking, TrackingFrequency::Yearly);
    assert_eq!(
        mixed.refinancing.unwrap().frequency.interval_months(),
        12
    );
}

#[test]
fn test_loaded_scenario_runs() {
    let scenario = Scenario::from_json(SCENARIO).unwrap();
    for named in &scenario.strategies {
        let result = propsim::simulate(&scenario.investment, &named.strategy).unwrap();
        assert!(!result.snapshots.is_empty(), "{} produced no snapshots", named.name);
    }
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Scenario::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ScenarioError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn test_malformed_json() {
    let file = write_temp("{\"investment\": ");
    assert!(matches!(
        Scenario::load(file.path()),
        Err(ScenarioError::Parse(_))
    ));
}

#[test]
fn test_structural_checks() {
    let mut value: serde_json::Value = serde_json::from_str(SCENARIO).unwrap();

    value["strategies"][1]["name"] = "cash".into();
    let err = Scenario::from_json(&value.to_string()).unwrap_err();
    assert!(matches!(err, ScenarioError::DuplicateName(ref name) if name == "cash"));

    value["strategies"] = serde_json::Value::Array(Vec::new());
    let err = Scenario::from_json(&value.to_string()).unwrap_err();
    assert!(matches!(err, ScenarioError::NoStrategies));
}
