use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use backtester::{
    compare_strategies, generate_bars, load_file, BacktestConfig, BacktestResult, Backtester, Bar,
    MomentumStrategy, SimpleRsiStrategy, Strategy, StrategyComparison,
};

#[derive(Parser, Debug)]
#[command(name = "backtester")]
#[command(version = "0.1.0")]
#[command(about = "Daily-bar long-only backtester with trailing stops", long_about = None)]
struct Args {
    /// Number of days to simulate (used with synthetic data)
    #[arg(short, long, default_value = "252")]
    days: usize,

    /// Initial price for synthetic data
    #[arg(long, default_value = "100.0")]
    initial_price: f64,

    /// Random seed for synthetic data
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Price data file (CSV/JSON). If not provided, uses synthetic data.
    #[arg(short = 'f', long)]
    data_file: Option<PathBuf>,

    /// Benchmark data file for excess-return comparison
    #[arg(short = 'b', long)]
    benchmark_file: Option<PathBuf>,

    /// Strategy: momentum, aggressive, conservative, rsi
    #[arg(short, long, default_value = "momentum")]
    strategy: String,

    /// Initial cash
    #[arg(short, long, default_value = "10000")]
    cash: f64,

    /// Flat commission per executed order
    #[arg(long, default_value = "0.0")]
    commission: f64,

    /// Fractional slippage per fill (0.001 = 0.1%)
    #[arg(long, default_value = "0.001")]
    slippage: f64,

    /// Annual risk-free rate used for Sharpe and Sortino
    #[arg(long, default_value = "0.02")]
    risk_free_rate: f64,

    /// Override the strategy's trailing-stop fraction (0.08 = 8%)
    #[arg(long)]
    stop_loss: Option<f64>,

    /// Run every built-in strategy and print a comparison
    #[arg(long)]
    compare: bool,

    /// Output format (json, text)
    #[arg(short, long, default_value = "json")]
    output: String,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = BacktestConfig::new(args.cash)
        .with_commission(args.commission)
        .with_slippage(args.slippage)
        .with_risk_free_rate(args.risk_free_rate);

    let bars = if let Some(path) = &args.data_file {
        eprintln!("Loading data from {:?}...", path);
        load_file(path)?
    } else {
        eprintln!(
            "Generating {} days of synthetic data (initial price ${:.2}, seed {})...",
            args.days, args.initial_price, args.seed
        );
        generate_bars(args.days, args.initial_price, args.seed)
    };

    let benchmark = match &args.benchmark_file {
        Some(path) => {
            eprintln!("Loading benchmark from {:?}...", path);
            Some(load_file(path)?)
        }
        None => None,
    };

    if args.compare {
        return run_comparison(&args, &bars, benchmark.as_deref(), &config);
    }

    let strategy = build_strategy(&args)?;
    eprintln!("Running {} over {} bars...", strategy.name(), bars.len());

    let mut engine = Backtester::new(config);
    let result = engine.run(strategy.as_ref(), &bars, benchmark.as_deref())?;

    match args.output.as_str() {
        "json" => print_json(&result, args.pretty)?,
        "text" => print_text_report(&result, benchmark.is_some()),
        other => {
            eprintln!("Unknown output format: {}. Using text.", other);
            print_text_report(&result, benchmark.is_some());
        }
    }

    Ok(())
}

fn build_strategy(args: &Args) -> Result<Box<dyn Strategy>> {
    let strategy: Box<dyn Strategy> = match args.strategy.as_str() {
        "momentum" => Box::new(apply_stop(MomentumStrategy::default(), args.stop_loss)),
        "aggressive" => Box::new(apply_stop(MomentumStrategy::aggressive(), args.stop_loss)),
        "conservative" => Box::new(apply_stop(MomentumStrategy::conservative(), args.stop_loss)),
        "rsi" => Box::new(SimpleRsiStrategy::default()),
        other => bail!(
            "Unknown strategy: {} (expected momentum, aggressive, conservative, or rsi)",
            other
        ),
    };
    Ok(strategy)
}

fn apply_stop(strategy: MomentumStrategy, stop_loss: Option<f64>) -> MomentumStrategy {
    match stop_loss {
        Some(pct) => strategy.with_stop_loss(pct),
        None => strategy,
    }
}

fn run_comparison(
    args: &Args,
    bars: &[Bar],
    benchmark: Option<&[Bar]>,
    config: &BacktestConfig,
) -> Result<()> {
    let strategies: Vec<Box<dyn Strategy>> = vec![
        Box::new(MomentumStrategy::default()),
        Box::new(MomentumStrategy::aggressive()),
        Box::new(MomentumStrategy::conservative()),
        Box::new(SimpleRsiStrategy::default()),
    ];

    eprintln!(
        "Comparing {} strategies over {} bars...",
        strategies.len(),
        bars.len()
    );

    let rows = compare_strategies(&strategies, bars, benchmark, config)?;

    match args.output.as_str() {
        "json" => print_json(&rows, args.pretty)?,
        _ => print_comparison_table(&rows),
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

fn print_text_report(result: &BacktestResult, has_benchmark: bool) {
    let m = &result.metrics;

    println!();
    println!("================================================================");
    println!("  BACKTEST REPORT - {}", result.strategy);
    println!("================================================================");
    println!();
    println!("  Period: {} to {}", m.start_date, m.end_date);
    println!("  Duration: {} trading days", m.trading_days);
    println!();
    println!("----------------------------------------------------------------");
    println!("  CAPITAL");
    println!("----------------------------------------------------------------");
    println!("  Initial Cash:     ${:>12.2}", result.initial_cash);
    println!("  Final Equity:     ${:>12.2}", result.final_equity);
    println!("  Total Return:     {:>12.2}%", m.total_return);
    println!("  CAGR:             {:>12.2}%", m.annual_return);
    if has_benchmark {
        println!("  Benchmark Return: {:>12.2}%", m.benchmark_return);
        println!("  Excess Return:    {:>12.2}%", m.excess_return);
    }
    println!();
    println!("----------------------------------------------------------------");
    println!("  RISK METRICS");
    println!("----------------------------------------------------------------");
    println!("  Volatility (Ann): {:>12.2}%", m.volatility);
    println!("  Sharpe Ratio:     {:>12.3}", m.sharpe_ratio);
    println!("  Sortino Ratio:    {:>12.3}", m.sortino_ratio);
    println!("  Max Drawdown:     {:>12.2}%", m.max_drawdown);
    println!("  Max DD Duration:  {:>12} days", m.max_drawdown_duration);
    println!("  Calmar Ratio:     {:>12.3}", m.calmar_ratio);
    println!();
    println!("----------------------------------------------------------------");
    println!("  TRADE STATISTICS");
    println!("----------------------------------------------------------------");
    println!("  Total Trades:     {:>12}", m.total_trades);
    println!("  Win Rate:         {:>12.1}%", m.win_rate);
    println!("  Avg Win:          {:>12.2}%", m.avg_win);
    println!("  Avg Loss:         {:>12.2}%", m.avg_loss);
    println!("  Profit Factor:    {:>12.3}", m.profit_factor);
    println!("  Avg Trade:        {:>12.2}%", m.avg_trade);
    println!();
    println!("================================================================");

    if !result.trades.is_empty() {
        println!();
        println!("  RECENT TRADES (last 5)");
        println!("----------------------------------------------------------------");
        for trade in result.trades.iter().rev().take(5) {
            println!(
                "  {} -> {} | P&L: ${:+.2} ({:+.1}%) | {}",
                trade.entry_date.format("%Y-%m-%d"),
                trade.exit_date.format("%Y-%m-%d"),
                trade.pnl,
                trade.pnl_pct,
                trade.exit_reason
            );
        }
        println!();
    }
}

fn print_comparison_table(rows: &[StrategyComparison]) {
    println!();
    println!("{:-<100}", "");
    println!(
        "{:<24} {:>10} {:>10} {:>8} {:>8} {:>10} {:>9} {:>7} {:>12}",
        "Strategy", "Return%", "CAGR%", "Sharpe", "Sortino", "MaxDD%", "WinRate%", "Trades", "Equity"
    );
    println!("{:-<100}", "");
    for row in rows {
        println!(
            "{:<24} {:>10.2} {:>10.2} {:>8.3} {:>8.3} {:>10.2} {:>9.1} {:>7} {:>12.2}",
            row.strategy,
            row.total_return,
            row.annual_return,
            row.sharpe_ratio,
            row.sortino_ratio,
            row.max_drawdown,
            row.win_rate,
            row.total_trades,
            row.final_equity
        );
    }
    println!("{:-<100}", "");
}
