//! Contract and determinism tests for emitted simulation output.
//!
//! - Determinism: the same inputs produce byte-identical JSON and fingerprints
//! - Contract: field names and shapes of snapshots, events and reports

use propsim::domain::{AcquisitionCosts, FinancingTerms, OperatingTerms};
use propsim::orchestration::run_fingerprint;
use propsim::{
    simulate, BatchReport, CapitalInjectionRule, Decimal, FinancingKind, InjectionFrequency,
    InvestmentDefinition, NamedStrategy, Period, RefinanceFrequency, RefinancePolicy,
    StrategyBatch, StrategyConfig,
};

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn investment() -> InvestmentDefinition {
    InvestmentDefinition::new(
        AcquisitionCosts {
            purchase_price: d("1650000"),
            transfer_duty: d("13200"),
            conveyancing_fees: d("32000"),
            bond_registration: d("22000"),
            furnishing_cost: d("80000"),
        },
        FinancingTerms::leveraged(d("0.5"), d("0.06"), d("0.105"), 20),
        OperatingTerms {
            monthly_rental_income: d("15000"),
            vacancy_rate: d("0.05"),
            monthly_levies: d("2500"),
            management_fee_rate: d("0.08"),
            monthly_insurance: d("800"),
            monthly_maintenance_reserve: d("1000"),
            monthly_furnishing_repair_costs: d("500"),
            rent_escalation_rate: d("0.05"),
        },
    )
}

fn strategy() -> StrategyConfig {
    StrategyConfig::mixed(
        d("5000000"),
        60,
        d("0.6"),
        d("0.4"),
        FinancingKind::Leveraged,
    )
    .with_refinancing(RefinancePolicy::new(RefinanceFrequency::Biennially, d("0.55")))
    .with_injection(CapitalInjectionRule::recurring(
        d("25000"),
        InjectionFrequency::Monthly,
        Period::new(1),
        Some(Period::new(36)),
    ))
}

#[test]
fn test_identical_inputs_identical_json() {
    let inv = investment();
    let strategy = strategy();

    let first = serde_json::to_string(&simulate(&inv, &strategy).unwrap()).unwrap();
    let second = serde_json::to_string(&simulate(&inv, &strategy).unwrap()).unwrap();
    assert_eq!(first, second);

    assert_eq!(
        run_fingerprint(&inv, &strategy).unwrap(),
        run_fingerprint(&investment(), &self::strategy()).unwrap()
    );
}

#[test]
fn test_snapshot_contract() {
    let result = simulate(&investment(), &strategy()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["state"]["status"], "completed");

    let snapshot = &json["snapshots"][0];
    for field in [
        "period",
        "total_property_value",
        "total_debt",
        "total_equity",
        "monthly_cashflow",
        "annual_cashflow",
        "cash_available",
        "property_count",
        "total_cash_invested",
        "total_capital_injected",
        "net_worth",
        "cash_shortfall",
        "properties",
        "yields",
        "simulation_ended",
    ] {
        assert!(snapshot.get(field).is_some(), "missing field {}", field);
    }
    assert!(snapshot.get("end_reason").is_none());
    assert!(snapshot["total_property_value"].is_number());

    let property = &snapshot["properties"][0];
    assert_eq!(property["kind"], "leveraged");
    assert_eq!(property["property_id"], 0);
    for field in ["rental_yield", "net_rental_yield", "cash_on_cash_return", "capital_growth", "total_return"] {
        assert!(property["yields"].get(field).is_some());
        assert!(snapshot["yields"].get(field).is_some());
    }

    let event_types: Vec<&str> = json["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["event_type"].as_str().unwrap())
        .collect();
    assert_eq!(event_types[0], "injection");
    assert!(event_types.contains(&"purchase"));
    assert!(event_types.contains(&"refinance"));
}

#[tokio::test]
async fn test_batch_report_is_deterministic() {
    let named = || {
        vec![
            NamedStrategy::new("mixed", strategy()),
            NamedStrategy::new("cash", StrategyConfig::cash_only(d("5000000"), 60)),
        ]
    };

    let first = StrategyBatch::new(investment()).run(named()).await;
    let second = StrategyBatch::new(investment()).run(named()).await;

    let first_json = serde_json::to_string(&BatchReport::new(&first, true)).unwrap();
    let second_json = serde_json::to_string(&BatchReport::new(&second, true)).unwrap();
    assert_eq!(first_json, second_json);

    let report: serde_json::Value = serde_json::from_str(&first_json).unwrap();
    assert_eq!(report["strategies"][0]["name"], "mixed");
    assert_eq!(report["strategies"][0]["outcome"], "completed");
    assert!(report["strategies"][0]["fingerprint"]
        .as_str()
        .unwrap()
        .starts_with("run:"));
    assert_eq!(report["comparison"].as_array().unwrap().len(), 2);
}
