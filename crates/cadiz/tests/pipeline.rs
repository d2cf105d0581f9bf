//! End-to-end scenarios across the ranking, combination and allocation
//! stages.

use approx::assert_relative_eq;
use cadiz::combine::{Combiner, EqualWeightCombiner, FamilyRanks, WeightedRankCombiner, select_top_n};
use cadiz::factors::{
    FinancialSnapshot, MomentumFactor, PriceHistory, QualityFactor, ValueFactor, ValueObservation,
    rank_factor,
};
use cadiz::portfolio::{Objective, optimize, to_returns};
use cadiz::{
    CadizError, Date, FactorFamily, FactorWeights, FamilyTables, MetricSpec, MetricTable,
    Pipeline, PipelineConfig, PriceTable, ScoreTable,
};
use ndarray::{Array2, array};

fn dates(n: usize) -> Vec<Date> {
    (0..n).map(|i| Date::from_num_days_from_ce_opt(738_000 + i as i32).unwrap()).collect()
}

/// Deterministic price paths with distinct drifts and a shared cycle.
fn price_table(symbols: &[&str], n: usize) -> PriceTable {
    let data = Array2::from_shape_fn((n, symbols.len()), |(i, j)| {
        let drift = 1.0 + 0.0005 * (j + 1) as f64;
        let cycle = [1.0, 1.012, 0.991, 1.004, 0.997][(i + 2 * j) % 5];
        50.0 * (j + 1) as f64 * drift.powi(i as i32) * cycle
    });
    PriceTable::new(dates(n), symbols.iter().map(|s| s.to_string()).collect(), data).unwrap()
}

fn assert_on_simplex(weights: &[f64]) {
    assert!(weights.iter().all(|w| *w >= 0.0));
    assert_relative_eq!(weights.iter().sum::<f64>(), 1.0, epsilon = 1e-6);
}

#[test]
fn test_ranking_properties() {
    let mut builder = MetricTable::builder();
    for (symbol, x) in [("A", 1.0), ("B", 2.0), ("C", 3.0)] {
        builder.record(symbol, "x", Some(x)).unwrap();
    }
    let table = builder.build();

    let asc = rank_factor(&table, &[MetricSpec::ascending("x")]).unwrap();
    assert_eq!(asc.composite.values(), &[1.0, 2.0, 3.0]);

    let desc = rank_factor(&table, &[MetricSpec::descending("x")]).unwrap();
    assert_eq!(desc.composite.values(), &[3.0, 2.0, 1.0]);

    let mut builder = MetricTable::builder();
    for symbol in ["A", "B", "C"] {
        builder.record(symbol, "x", Some(5.0)).unwrap();
    }
    builder.record("D", "x", Some(-1.0)).unwrap();
    let ties = rank_factor(&builder.build(), &[MetricSpec::ascending("x")]).unwrap();
    assert_eq!(ties.composite.values(), &[2.0, 2.0, 2.0]);
    assert!(!ties.composite.contains("D"));
    assert_eq!(ties.dropped, vec!["D"]);
}

#[test]
fn test_combination_properties() {
    let mut ranks = FamilyRanks::new();
    ranks.insert(FactorFamily::Value, ScoreTable::from_pairs([("A", 1.0), ("B", 2.0), ("C", 3.0)]).unwrap());
    ranks.insert(FactorFamily::Momentum, ScoreTable::from_pairs([("A", 3.0), ("B", 1.0)]).unwrap());

    // {2, 2} behaves like {0.5, 0.5}
    let doubled = FactorWeights::new().with(FactorFamily::Value, 2.0).with(FactorFamily::Momentum, 2.0);
    let combined = WeightedRankCombiner::new(doubled).combine(&ranks).unwrap();
    let equal = EqualWeightCombiner::new().combine(&ranks).unwrap();
    assert_eq!(combined, equal);

    // C takes the momentum median (2.0): 0.5 * 3 + 0.5 * 2
    assert_relative_eq!(combined.get("C").unwrap(), 2.5);
    assert_relative_eq!(combined.get("A").unwrap(), 2.0);
    assert_relative_eq!(combined.get("B").unwrap(), 1.5);

    let zero = FactorWeights::new().with(FactorFamily::Value, 0.0).with(FactorFamily::Momentum, 0.0);
    assert!(matches!(WeightedRankCombiner::new(zero).combine(&ranks), Err(CadizError::Configuration(_))));

    let ties = ScoreTable::from_pairs([("A", 1.0), ("B", 2.0), ("C", 1.0)]).unwrap();
    assert_eq!(select_top_n(&ties, 2).unwrap(), vec!["A", "C"]);
}

#[test]
fn test_returns_and_single_asset() {
    let prices = PriceTable::new(dates(3), vec!["A".into()], array![[100.0], [110.0], [99.0]]).unwrap();
    let returns = to_returns(&prices).unwrap();
    assert_relative_eq!(returns.returns()[[0, 0]], 0.10, epsilon = 1e-12);
    assert_relative_eq!(returns.returns()[[1, 0]], -0.10, epsilon = 1e-12);

    let flat = PriceTable::new(dates(4), vec!["A".into()], array![[10.0], [10.0], [10.0], [10.0]]).unwrap();
    let portfolio = optimize(&to_returns(&flat).unwrap(), Objective::MaximizeSharpe, 252).unwrap();
    assert_eq!(portfolio.weights, vec![1.0]);
    assert!(!portfolio.is_fallback);
}

#[test]
fn test_every_objective_stays_on_simplex() {
    let returns = to_returns(&price_table(&["A", "B", "C", "D"], 60)).unwrap();
    for objective in [Objective::MaximizeSharpe, Objective::MinimizeVolatility, Objective::MaximizeReturn] {
        let portfolio = optimize(&returns, objective, 252).unwrap();
        assert_on_simplex(&portfolio.weights);
        assert_eq!(portfolio.objective, objective);
    }
}

#[test]
fn test_composites_to_portfolio() {
    let mut composites = FamilyRanks::new();
    composites.insert(FactorFamily::Value, ScoreTable::from_pairs([("A", 2.0), ("B", 1.5), ("C", 2.5)]).unwrap());

    let config = PipelineConfig { factor_weights: None, top_n: 2, ..Default::default() };
    let output = Pipeline::new(config)
        .run_with_composites(&composites, &price_table(&["A", "B", "C"], 40))
        .unwrap();

    assert_eq!(output.candidates, vec!["B", "A"]);
    assert_eq!(output.portfolio.assets, vec!["B", "A"]);
    assert_on_simplex(&output.portfolio.weights);
}

#[test]
fn test_full_pipeline_from_raw_observations() {
    let symbols = ["AAA", "BBB", "CCC", "DDD"];
    let prices = price_table(&symbols, 260);

    let value = ValueFactor::default()
        .build_table(&[
            ValueObservation { symbol: "AAA".into(), trailing_pe: Some(12.0), price_to_book: Some(1.5), ..Default::default() },
            ValueObservation { symbol: "BBB".into(), trailing_pe: Some(30.0), price_to_book: Some(6.0), ..Default::default() },
            ValueObservation { symbol: "CCC".into(), trailing_pe: Some(18.0), price_to_book: Some(2.5), ..Default::default() },
            ValueObservation { symbol: "DDD".into(), trailing_pe: Some(-4.0), price_to_book: None, ..Default::default() },
        ])
        .unwrap();

    let histories: Vec<PriceHistory> = symbols
        .iter()
        .enumerate()
        .map(|(j, symbol)| PriceHistory {
            symbol: symbol.to_string(),
            closes: prices.prices().column(j).to_vec(),
        })
        .collect();
    let momentum = MomentumFactor::default().build_table(&histories).unwrap();

    let snapshot = |symbol: &str, net_income: f64| FinancialSnapshot {
        symbol: symbol.into(),
        net_income: Some(net_income),
        total_equity: Some(100.0),
        total_assets: Some(400.0),
        ..Default::default()
    };
    let quality = QualityFactor::default()
        .build_table(&[snapshot("AAA", 20.0), snapshot("BBB", 5.0), snapshot("CCC", 12.0), snapshot("DDD", 8.0)])
        .unwrap();

    let mut tables = FamilyTables::new();
    tables.insert(FactorFamily::Value, value);
    tables.insert(FactorFamily::Momentum, momentum);
    tables.insert(FactorFamily::Quality, quality);

    let config = PipelineConfig { top_n: 3, objective: Objective::MinimizeVolatility, ..Default::default() };
    let output = Pipeline::new(config).run(&tables, &prices).unwrap();

    assert_eq!(output.rankings.len(), 3);
    assert_eq!(output.rankings[&FactorFamily::Value].dropped, vec!["DDD"]);
    assert_eq!(output.combined.len(), 4);
    assert_eq!(output.candidates.len(), 3);
    assert_eq!(output.candidates[0], output.combined.symbols()[0]);
    assert_eq!(output.portfolio.assets, output.candidates);
    assert_on_simplex(&output.portfolio.weights);

    let json = serde_json::to_value(&output).unwrap();
    assert!(json["portfolio"]["statistics"]["return"].is_number());
    assert!(json["rankings"]["value"]["composite"].is_array());
}

#[test]
fn test_default_weights_need_their_families() {
    let mut composites = FamilyRanks::new();
    composites.insert(FactorFamily::Growth, ScoreTable::from_pairs([("A", 1.0)]).unwrap());
    let err = Pipeline::default()
        .run_with_composites(&composites, &price_table(&["A"], 10))
        .unwrap_err();
    assert!(matches!(err, CadizError::Configuration(_)));
}
