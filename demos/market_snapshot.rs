use blocklens_sdk::{
    widgets::{market_rows, CurrencyConverter, PortfolioOverview, PriceChart},
    MarketDashboard, TimeRange,
};
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize the dashboard
    // The first call to global() builds the gateway from the environment and
    // loads the market list and the chart coin list.
    let start = Instant::now();
    let dashboard = MarketDashboard::global().await?;
    let state = dashboard.state().await;

    println!(
        "Market snapshot ({}, sorted by {}, gateway: {})",
        state.currency,
        state.sort_by.label(),
        dashboard.gateway().gateway_name()
    );
    println!("-------------------------------------------");

    // 2. Market table
    let coins = dashboard.coins().await;
    if let Some(e) = coins.error() {
        eprintln!("   Warning: market list unavailable: {}", e);
    }
    for row in market_rows(coins.data().map(Vec::as_slice).unwrap_or(&[]), state.currency) {
        println!(
            "{:>4}  {:<6} {:>16} {:>9}  cap {:>10}",
            row.rank, row.symbol, row.price, row.change_24h, row.market_cap
        );
    }
    if let Some(pages) = dashboard.pagination_view().await {
        let items: Vec<String> = pages.items().iter().map(ToString::to_string).collect();
        println!("   {}  [{}]", pages.caption(), items.join(" "));
    }
    println!("   Loaded in {:?}", start.elapsed());
    println!();

    // 3. Chart for the default coin
    let mut chart = PriceChart::new(dashboard.gateway());
    chart.sync_with(&state);
    chart.set_range(TimeRange::OneWeek);
    chart.load().await;
    println!("{} ({} points)", chart.title(), chart.points().len());
    if let (Some(first), Some(last)) = (chart.points().first(), chart.points().last()) {
        println!("   {} -> {}: {:.2} -> {:.2}", first.label, last.label, first.price, last.price);
    }
    println!();

    // 4. Market-cap breakdown
    let mut portfolio = PortfolioOverview::new(dashboard.gateway());
    portfolio.load().await;
    println!("Top coins total: {}", portfolio.formatted_total());
    for slice in portfolio.slices() {
        println!("   {}", portfolio.tooltip(&slice));
    }
    println!();

    // 5. Converter
    let mut converter = CurrencyConverter::new(dashboard.gateway());
    converter.refresh_rates().await;
    converter.set_amount(1.0);
    match converter.convert() {
        Ok(_) => println!("1 BTC = {}", converter.result_label()),
        Err(e) => eprintln!("   Warning: conversion failed: {}", e),
    }

    println!("-------------------------------------------");
    let health = dashboard.health_check().await;
    println!("Health: {:?} ({})", health.status, health.message.unwrap_or_default());
    for endpoint in dashboard.gateway_metrics().await.endpoints {
        println!(
            "- {}: {} requests, {} failed, p50 {:.0}ms",
            endpoint.endpoint,
            endpoint.total_requests,
            endpoint.failed_requests,
            endpoint.latency_p50_ms
        );
    }

    Ok(())
}
