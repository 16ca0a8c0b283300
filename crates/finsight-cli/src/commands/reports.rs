//! Report command implementations (trend, categories, insights, dashboard)

use anyhow::Result;
use finsight_core::{
    BlobStore, CategoryDataPoint, Dashboard, Insights, Summarizer, TransactionStore,
    TrendDataPoint,
};

use super::{rupees, truncate};

pub fn cmd_trend<B: BlobStore>(store: &TransactionStore<B>, json: bool) -> Result<()> {
    let trend = store.spending_trend();

    if json {
        println!("{}", serde_json::to_string_pretty(&trend)?);
        return Ok(());
    }

    println!();
    println!("📈 Spending Trend");
    println!("   ─────────────────────────────────────────────────────────────");
    print_trend(&trend);

    Ok(())
}

pub fn print_trend(trend: &[TrendDataPoint]) {
    if trend.is_empty() {
        println!("   No spending recorded yet.");
        return;
    }

    println!("   {:10} │ {:>7} │ {:>12}", "Date", "Label", "Amount");
    println!("   ───────────┼─────────┼─────────────");
    for point in trend {
        println!(
            "   {:10} │ {:>7} │ {:>12}",
            point.full_date,
            point.date,
            rupees(point.amount)
        );
    }
}

pub fn cmd_categories<B: BlobStore>(
    store: &TransactionStore<B>,
    expand: bool,
    json: bool,
) -> Result<()> {
    let distribution = store.category_distribution();

    if json {
        println!("{}", serde_json::to_string_pretty(&distribution)?);
        return Ok(());
    }

    println!();
    println!("📊 Spending by Category");
    println!("   ─────────────────────────────────────────────────────────────");
    print_distribution(&distribution, expand);

    Ok(())
}

pub fn print_distribution(distribution: &[CategoryDataPoint], expand: bool) {
    if distribution.is_empty() {
        println!("   No spending recorded yet.");
        return;
    }

    let total: f64 = distribution.iter().map(|g| g.value).sum();

    println!(
        "   {:15} │ {:>12} │ {:>6} │ {:>5}",
        "Category", "Amount", "%", "Count"
    );
    println!("   ────────────────┼──────────────┼────────┼───────");

    for group in distribution {
        let percentage = if total > 0.0 {
            group.value / total * 100.0
        } else {
            0.0
        };
        println!(
            "   {:15} │ {:>12} │ {:>5.1}% │ {:>5}",
            group.name.as_str(),
            rupees(group.value),
            percentage,
            group.transactions.len()
        );

        if expand {
            for tx in &group.transactions {
                println!(
                    "   \x1b[2m  {} {:>12}  {}\x1b[0m",
                    tx.date,
                    rupees(tx.amount),
                    truncate(&tx.description, 30)
                );
            }
        }
    }
}

pub async fn cmd_insights<B: BlobStore>(
    store: &TransactionStore<B>,
    summarizer: &Summarizer,
    json: bool,
) -> Result<()> {
    let insights = summarizer.summarize(&store.list()).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    print_insights(&insights);
    Ok(())
}

pub fn print_insights(insights: &Insights) {
    println!();
    println!("💡 Insights");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {}", insights.summary);
    println!();
    for tip in &insights.tips {
        println!("   • {}", tip);
    }
    println!(
        "   \x1b[2mUpdated {}\x1b[0m",
        insights.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

pub async fn cmd_dashboard<B: BlobStore>(
    store: &TransactionStore<B>,
    summarizer: &Summarizer,
) -> Result<()> {
    let dashboard = Dashboard::load(store);

    println!();
    println!("💰 FinSight Dashboard");
    println!("   ─────────────────────────────────────────────────────────────");

    if dashboard.is_empty() {
        println!("   No transactions yet. Add some with:");
        println!("     finsight add -D \"Groceries\" -a 850");
        println!("     finsight import --file expenses.csv");
        return Ok(());
    }

    println!("   Total spending: {}", rupees(dashboard.total));
    println!("   Transactions:   {}", dashboard.transactions.len());
    if let Some(top) = dashboard.distribution.first() {
        println!("   Top category:   {} ({})", top.name, rupees(top.value));
    }

    println!();
    println!("📈 Trend");
    print_trend(&dashboard.trend);

    println!();
    println!("📊 Categories");
    print_distribution(&dashboard.distribution, false);

    println!();
    println!("📝 Recent");
    for tx in dashboard.transactions.iter().take(5) {
        println!(
            "   {} │ {:>12} │ {:<13} │ {}",
            tx.date,
            rupees(tx.amount),
            tx.category.as_str(),
            truncate(&tx.description, 30)
        );
    }

    let insights = summarizer.summarize(&dashboard.transactions).await;
    print_insights(&insights);

    Ok(())
}
