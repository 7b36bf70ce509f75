use std::time::Duration;

use propsim::domain::{AcquisitionCosts, FinancingTerms, OperatingTerms};
use propsim::orchestration::{compare_runs, DEFAULT_STRATEGY_TIMEOUT};
use propsim::{
    Decimal, FinancingKind, InvestmentDefinition, NamedStrategy, RefinanceFrequency,
    RefinancePolicy, StrategyBatch, StrategyConfig, StrategyOutcome,
};

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn investment() -> InvestmentDefinition {
    InvestmentDefinition::new(
        AcquisitionCosts {
            purchase_price: d("1000000"),
            transfer_duty: d("10000"),
            conveyancing_fees: d("20000"),
            bond_registration: d("15000"),
            furnishing_cost: Decimal::zero(),
        },
        FinancingTerms::leveraged(d("0.5"), d("0.06"), d("0.10"), 20),
        OperatingTerms {
            monthly_rental_income: d("12000"),
            vacancy_rate: d("0.05"),
            monthly_levies: d("1500"),
            management_fee_rate: d("0.08"),
            monthly_insurance: d("600"),
            monthly_maintenance_reserve: d("800"),
            monthly_furnishing_repair_costs: Decimal::zero(),
            rent_escalation_rate: Decimal::zero(),
        },
    )
}

fn strategies() -> Vec<NamedStrategy> {
    vec![
        NamedStrategy::new("cash", StrategyConfig::cash_only(d("3000000"), 60)),
        NamedStrategy::new(
            "leveraged",
            StrategyConfig::leveraged(d("3000000"), 60)
                .with_refinancing(RefinancePolicy::new(RefinanceFrequency::Annually, d("0.5"))),
        ),
        NamedStrategy::new(
            "mixed",
            StrategyConfig::mixed(
                d("3000000"),
                60,
                d("0.5"),
                d("0.5"),
                FinancingKind::Leveraged,
            ),
        ),
        NamedStrategy::new("broken", StrategyConfig::cash_only(d("3000000"), 0)),
    ]
}

#[tokio::test]
async fn test_batch_keeps_input_order_and_reports_rejections() {
    let batch = StrategyBatch::new(investment());
    assert_eq!(batch.timeout(), DEFAULT_STRATEGY_TIMEOUT);

    let runs = batch.run(strategies()).await;
    let names: Vec<&str> = runs.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["cash", "leveraged", "mixed", "broken"]);

    for run in &runs[..3] {
        match &run.outcome {
            StrategyOutcome::Completed { summary, result } => {
                assert!(result.is_completed());
                assert_eq!(summary.final_period, 60);
                assert_eq!(
                    summary.net_worth,
                    result.final_snapshot().unwrap().net_worth
                );
            }
            other => panic!("{} did not complete: {:?}", run.name, other),
        }
    }

    match &runs[3].outcome {
        StrategyOutcome::Rejected { error } => assert!(error.contains("horizon")),
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_comparison_ranks_completed_runs_by_net_worth() {
    let runs = StrategyBatch::new(investment()).run(strategies()).await;
    let table = compare_runs(&runs);

    assert_eq!(table.len(), 3);
    assert!(table.iter().all(|row| row.name != "broken"));
    for pair in table.windows(2) {
        assert!(pair[0].net_worth >= pair[1].net_worth);
        assert_eq!(pair[0].rank + 1, pair[1].rank);
    }
}

#[tokio::test]
async fn test_fingerprints_identify_inputs() {
    let same = vec![
        NamedStrategy::new("a", StrategyConfig::cash_only(d("3000000"), 24)),
        NamedStrategy::new("b", StrategyConfig::cash_only(d("3000000"), 24)),
        NamedStrategy::new("c", StrategyConfig::cash_only(d("3000001"), 24)),
    ];
    let runs = StrategyBatch::new(investment()).run(same).await;
    assert_eq!(runs[0].fingerprint, runs[1].fingerprint);
    assert_ne!(runs[0].fingerprint, runs[2].fingerprint);
}

#[tokio::test]
async fn test_slow_strategy_times_out() {
    let mut inv = investment();
    inv.financing.appreciation_rate = Decimal::zero();
    let slow = StrategyConfig::cash_only(d("1100000"), 5_000_000).with_reinvestment(false);

    let batch = StrategyBatch::new(inv).with_timeout(Duration::from_millis(50));
    let runs = batch
        .run(vec![
            NamedStrategy::new("slow", slow),
            NamedStrategy::new("quick", StrategyConfig::cash_only(d("1100000"), 3)),
        ])
        .await;

    assert_eq!(
        runs[0].outcome,
        StrategyOutcome::TimedOut { timeout_ms: 50 }
    );
    assert!(runs[0].outcome.summary().is_none());
    assert!(runs[1].outcome.result().is_some());
}

#[test]
fn test_batch_runs_on_a_plain_runtime() {
    let batch = StrategyBatch::new(investment());
    let runs = tokio_test::block_on(batch.run(vec![NamedStrategy::new(
        "cash",
        StrategyConfig::cash_only(d("1100000"), 12),
    )]));
    assert_eq!(runs.len(), 1);
    assert_eq!(
        runs[0].outcome.summary().map(|s| s.final_property_count),
        Some(1)
    );
}
