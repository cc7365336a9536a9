//! ledger-runner: headless runner for the ledger core.
//!
//! Usage:
//!   ledger-runner                                  (demo scenarios, in-memory)
//!   ledger-runner --db bank.db --demo
//!   ledger-runner --db bank.db --from 1001 --to 1002 --amount 200.00
//!   ledger-runner --config store.json --balances --json
//!
//! Without --db or --config, connection parameters come from
//! LEDGER_DB_PATH / LEDGER_ISOLATION / LEDGER_BUSY_TIMEOUT_MS.

use anyhow::{Context, Result};
use ledger_core::{config::StoreConfig, store::AccountRow, Ledger, Money, TransferError};
use std::env;

#[derive(serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Report<'a> {
    Balances { accounts: &'a [AccountRow] },
    Transfer { outcome: &'a ledger_core::TransferOutcome },
    Aborted { state: ledger_core::TransferState, error: String },
}

enum Mode {
    Demo,
    Balances,
    Single { from: String, to: String, amount: Money },
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let json = args.iter().any(|a| a == "--json");
    let config = resolve_config(&args)?;
    let mode = resolve_mode(&args)?;

    if !json {
        println!("ledger-runner");
        println!("  db:         {}", config.path);
        println!("  isolation:  {:?}", config.isolation);
        println!();
    }

    let mut ledger = Ledger::open(&config)
        .with_context(|| format!("cannot open ledger at {}", config.path))?;

    match mode {
        Mode::Demo => run_demo(&mut ledger, json)?,
        Mode::Balances => print_balances(&ledger, json)?,
        Mode::Single { from, to, amount } => {
            run_transfer(&mut ledger, &from, &to, amount, json)?;
            print_balances(&ledger, json)?;
        }
    }
    Ok(())
}

fn resolve_config(args: &[String]) -> Result<StoreConfig> {
    if let Some(file) = flag_value(args, "--config") {
        if flag_value(args, "--db").is_some() {
            log::warn!("--config given, ignoring --db");
        }
        return StoreConfig::load(file);
    }
    if let Some(db) = flag_value(args, "--db") {
        return Ok(StoreConfig::new(db));
    }
    if env::var_os(ledger_core::config::ENV_DB_PATH).is_some() {
        return Ok(StoreConfig::from_env()?);
    }
    Ok(StoreConfig::new(":memory:"))
}

fn resolve_mode(args: &[String]) -> Result<Mode> {
    if args.iter().any(|a| a == "--balances") {
        return Ok(Mode::Balances);
    }
    match (
        flag_value(args, "--from"),
        flag_value(args, "--to"),
        flag_value(args, "--amount"),
    ) {
        (Some(from), Some(to), Some(amount)) => {
            let amount: Money = amount
                .parse()
                .with_context(|| format!("bad --amount '{amount}'"))?;
            Ok(Mode::Single {
                from: from.to_string(),
                to: to.to_string(),
                amount,
            })
        }
        (None, None, None) => Ok(Mode::Demo),
        _ => anyhow::bail!("--from, --to and --amount must be given together"),
    }
}

fn run_demo(ledger: &mut Ledger, json: bool) -> Result<()> {
    ledger.store.seed_demo_accounts()?;
    if !json {
        println!("Database setup complete.");
    }
    print_balances(ledger, json)?;

    if !json {
        println!();
        println!("Scenario 1: successful transfer");
    }
    run_transfer(ledger, "1001", "1002", Money::from_minor_units(20_000), json)?;
    print_balances(ledger, json)?;

    if !json {
        println!();
        println!("Scenario 2: failed transfer (rollback)");
    }
    run_transfer(ledger, "1001", "1002", Money::from_minor_units(100_000), json)?;
    print_balances(ledger, json)?;
    Ok(())
}

/// Business aborts are reported, not fatal.
fn run_transfer(ledger: &mut Ledger, from: &str, to: &str, amount: Money, json: bool) -> Result<()> {
    match ledger.transfer(from, to, amount) {
        Ok(outcome) => {
            if json {
                emit(&Report::Transfer { outcome: &outcome })?;
            } else {
                println!("Transferred ${amount} from {from} to {to}.");
            }
        }
        Err(err) => report_abort(&err, json)?,
    }
    Ok(())
}

fn report_abort(err: &TransferError, json: bool) -> Result<()> {
    if json {
        emit(&Report::Aborted {
            state: err.state(),
            error: err.to_string(),
        })
    } else {
        println!("Error: {err}. Transaction rolled back.");
        Ok(())
    }
}

fn print_balances(ledger: &Ledger, json: bool) -> Result<()> {
    let accounts = ledger.balances()?;
    if json {
        return emit(&Report::Balances { accounts: &accounts });
    }
    println!("Current account balances:");
    for a in &accounts {
        println!(
            "  Account: {} ({}) | Balance: ${}",
            a.account_number, a.owner_name, a.balance
        );
    }
    Ok(())
}

fn emit(report: &Report<'_>) -> Result<()> {
    println!("{}", serde_json::to_string(report)?);
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
