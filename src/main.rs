use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use savings_tracker::utils::csv::{export_movements_to_csv, read_movements_from_csv};
use savings_tracker::{MonthlySummary, MovementStore, Settings, SqliteMovementStore, YearMonth};

const USAGE: &str = "Usage: savings-tracker [YYYY-MM] [--import <csv-file>] [--export <csv-file>]";

#[derive(Debug, Default)]
struct Args {
    month: Option<YearMonth>,
    import: Option<String>,
    export: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--import" => {
                args.import = Some(iter.next().with_context(|| format!("--import needs a file\n{USAGE}"))?);
            }
            "--export" => {
                args.export = Some(iter.next().with_context(|| format!("--export needs a file\n{USAGE}"))?);
            }
            "-h" | "--help" => bail!(USAGE),
            month if args.month.is_none() => {
                args.month = Some(
                    month
                        .parse::<YearMonth>()
                        .with_context(|| format!("Invalid month '{month}'\n{USAGE}"))?,
                );
            }
            other => bail!("Unexpected argument '{other}'\n{USAGE}"),
        }
    }

    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;
    let settings = Settings::new().context("Failed to load settings")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("savings_tracker={}", settings.log.level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = SqliteMovementStore::open(&settings.database.path)
        .with_context(|| format!("Failed to open database '{}'", settings.database.path))?;

    if let Some(path) = &args.import {
        let movements = read_movements_from_csv(path)
            .with_context(|| format!("Failed to read CSV file '{path}'"))?;
        let count = movements.len();
        for movement in movements {
            store.upsert(movement).await?;
        }
        tracing::info!(count, path = %path, "imported movements");
    }

    let month = args.month.unwrap_or_else(YearMonth::current);
    let movements = store.by_month(month).await?;

    if let Some(path) = &args.export {
        export_movements_to_csv(path, &movements)
            .with_context(|| format!("Failed to write CSV file '{path}'"))?;
        tracing::info!(count = movements.len(), path = %path, %month, "exported movements");
    }

    let summary = MonthlySummary::from_movements(&movements);
    let flags = summary.flags(&settings.budget);

    println!("{month}");
    for movement in &movements {
        println!("{}", movement.summary_line());
    }
    println!();
    println!("{summary}");
    if flags.necessary_over {
        println!("! necessary spending above {}%", settings.budget.necessary_max);
    }
    if flags.unnecessary_over {
        println!("! unnecessary spending above {}%", settings.budget.unnecessary_max);
    }
    if flags.savings_under {
        println!("! savings below {}%", settings.budget.savings_min);
    }

    Ok(())
}
