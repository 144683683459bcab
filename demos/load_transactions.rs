//! Loading a small transaction export with currency normalization

use bigdecimal::BigDecimal;
use std::str::FromStr;
use transaction_loader::{DataLoader, Diagnostic, Loader, LoaderConfig, RateTable, RecordMap};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("📥 Transaction Loader - Currency Normalization Example\n");

    // 1. Rates are provisioned up front, all quoted against USD
    let mut rates = RateTable::new();
    rates.register("CHF/USD", BigDecimal::from_str("0.9")?);
    rates.register("GBP/USD", BigDecimal::from_str("1.25")?);
    rates.register("EUR/USD", BigDecimal::from_str("1.1")?);

    let config = LoaderConfig::from_json(
        r#"{ "reference_currency": "EUR", "conversion_currencies": ["CHF", "GBP", "SEK"] }"#,
    )?;
    let mut loader = DataLoader::new(config, rates)?;

    // 2. A raw export, including a duplicate, a bad amount and a currency without a rate
    let lines = [
        "Company Code\tAccount\tCost Center\tProject\tPeriod\tCurrency\tAmount",
        "C100\t4000\tCC10\tP1\t2024-01\tCHF\t100.00",
        "C100\t4000\tCC10\tP1\t2024-01\tCHF\t200.00",
        "C200\t4100\tCC20\tP2\t2024-01\tGBP\t80.00",
        "C300\t4200\tCC30\tP3\t2024-01\tEUR\t55.55",
        "C400\t4300\tCC40\tP4\t2024-01\tSEK\t1000",
        "C500\t4400\tCC50\tP5\t2024-01\tEUR\tn/a",
    ];

    let records = loader
        .load(RecordMap::new(), Some(&lines[..]))
        .unwrap_or_default();

    println!("📊 Loaded {} records:", records.len());
    let mut keys: Vec<&String> = records.keys().collect();
    keys.sort();
    for key in keys {
        let record = &records[key];
        println!(
            "  {:<30} {:>20} (from {}, {} line(s))",
            key,
            record.amount(),
            record.currency,
            record.observations()
        );
    }
    println!();

    // 3. Anything that degraded the run
    println!("⚠️  Diagnostics:");
    for diagnostic in loader.take_diagnostics() {
        match diagnostic {
            Diagnostic::StructuralRejection { reason } => println!("  rejected input: {}", reason),
            Diagnostic::SkippedLine { line, error } => {
                println!("  skipped '{}': {}", line.replace('\t', " | "), error)
            }
            Diagnostic::ConversionSkipped { currency, error } => {
                println!("  {} left unconverted: {}", currency, error)
            }
        }
    }

    Ok(())
}
