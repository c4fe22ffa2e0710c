use crate::infra::{InMemoryPortfolioRepository, StaticSubscriberDirectory};
use clap::{Args, ValueEnum};
use serde_json::json;
use std::sync::Arc;
use signal_core::advisor::planning::Scenario;
use signal_core::advisor::portfolio::{
    AdvisorService, PlanRequest, PlanReview, PortfolioReview, UserId,
};
use signal_core::advisor::regime::{RegimeSnapshot, StaticRegimeSource};
use signal_core::error::AppError;

#[derive(ValueEnum, Clone, Copy, Debug)]
pub(crate) enum ScenarioArg {
    Conservative,
    Base,
    Ambitious,
}

impl From<ScenarioArg> for Scenario {
    fn from(value: ScenarioArg) -> Self {
        match value {
            ScenarioArg::Conservative => Scenario::Conservative,
            ScenarioArg::Base => Scenario::Base,
            ScenarioArg::Ambitious => Scenario::Ambitious,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct PlanScoreArgs {
    /// Savings goal in account currency units
    #[arg(long)]
    pub(crate) goal: f64,
    /// Horizon in years; fractional values are allowed
    #[arg(long)]
    pub(crate) horizon_years: f64,
    /// Monthly contribution; omit to use the suggested baseline
    #[arg(long)]
    pub(crate) contribution: Option<f64>,
    /// Scenario; defaults to the regime's suggestion
    #[arg(long, value_enum)]
    pub(crate) scenario: Option<ScenarioArg>,
    /// How many times the plan has been edited this session
    #[arg(long, default_value_t = 0)]
    pub(crate) edit_count: u32,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the planning portion of the demo
    #[arg(long)]
    pub(crate) skip_plan: bool,
}

fn demo_service(
    directory: StaticSubscriberDirectory,
) -> AdvisorService<InMemoryPortfolioRepository, StaticRegimeSource, StaticSubscriberDirectory> {
    AdvisorService::new(
        Arc::new(InMemoryPortfolioRepository::default()),
        Arc::new(StaticRegimeSource::weekly()),
        Arc::new(directory),
    )
}

pub(crate) fn run_plan_score(args: PlanScoreArgs) -> Result<(), AppError> {
    let PlanScoreArgs {
        goal,
        horizon_years,
        contribution,
        scenario,
        edit_count,
    } = args;

    let service = demo_service(StaticSubscriberDirectory::default());
    let review = service.plan_review(PlanRequest {
        goal,
        horizon_years,
        contribution,
        scenario: scenario.map(Scenario::from),
        edit_count,
    })?;

    render_regime(&review.regime);
    render_plan_review(&review);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("SignalCore advisor demo");

    let user = UserId("demo-user".to_string());
    let service = demo_service(StaticSubscriberDirectory::with_members(["demo-user"]));
    service.save_portfolio(
        &user,
        json!({
            "holdings": [
                { "id": "h-1", "name": "Apple", "ticker": "AAPL", "type": "stock", "horizon": "medium", "size": "medium" },
                { "id": "h-2", "name": "S&P 500 ETF", "ticker": "VOO", "type": "etf", "horizon": "long", "size": "large" },
                { "id": "h-3", "name": "Bitcoin", "type": "crypto", "horizon": "short", "size": "small" }
            ]
        }),
    )?;

    let review = service.portfolio_review(&user)?;
    render_regime(&review.regime);
    render_portfolio_review(&review);

    if args.skip_plan {
        return Ok(());
    }

    let plan = service.plan_review(PlanRequest {
        goal: 5_000.0,
        horizon_years: 3.0,
        contribution: None,
        scenario: None,
        edit_count: 0,
    })?;
    render_plan_review(&plan);

    Ok(())
}

fn render_regime(snapshot: &RegimeSnapshot) {
    match &snapshot.week {
        Some(week) => println!(
            "\nWeekly regime ({week}): {} | confidence {}",
            snapshot.market_regime, snapshot.confidence
        ),
        None => println!(
            "\nWeekly regime: {} | confidence {}",
            snapshot.market_regime, snapshot.confidence
        ),
    }
    println!("{}", snapshot.summary);

    println!("Key risks:");
    for risk in &snapshot.key_risks {
        println!("- {risk}");
    }
    println!("What would change this view:");
    for trigger in &snapshot.regime_change_triggers {
        println!("- {trigger}");
    }
}

fn render_portfolio_review(review: &PortfolioReview) {
    println!("\nHoldings");
    for row in &review.holdings {
        println!(
            "- {} [{} | {} horizon | {} position] -> fit {} | risk {}",
            row.holding.name,
            row.holding.asset_type.label(),
            row.holding.horizon.label(),
            row.holding.importance.label(),
            row.assessment.fit.label(),
            row.assessment.risk.label()
        );
        if !row.assessment.flags.is_empty() {
            println!("  Flags: {:?}", row.assessment.flags);
        }
        println!("  {}", row.assessment.rationale);
    }

    println!(
        "\nOverall fit: {} | exposure posture: {}",
        review.overall_fit.label(),
        review.posture.label()
    );
}

fn render_plan_review(review: &PlanReview) {
    println!("\nPlan coherence review");
    println!(
        "Scenario: {} | horizon {} months",
        review.scenario.label(),
        review.horizon_months
    );
    println!(
        "Contribution: {:.0}/month (suggested baseline {:.0})",
        review.effective_contribution, review.suggested_contribution
    );
    println!(
        "Score: {} ({})",
        review.result.score,
        review.result.label.label()
    );

    let breakdown = &review.result.breakdown;
    println!("  Temporal sufficiency: {} ({:?})", breakdown.temporal, review.drivers.temporal);
    println!("  Market dependence: {} ({:?})", breakdown.market, review.drivers.market);
    println!("  Regime alignment: {} ({:?})", breakdown.regime, review.drivers.regime);
    println!("  Simplicity: {}", breakdown.simplicity);
    println!("  Consistency: {}", breakdown.consistency);
    println!("Anchor: {}", review.anchor.label());
}
