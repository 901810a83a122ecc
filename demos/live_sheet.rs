//! Fetches a real Google Sheet's payable/receivable tabs and prints the
//! dashboard summary.
//!
//! Run with: `cargo run --example live_sheet -- <sheet-id>`
//!
//! The sheet must be shared publicly and carry the canonical Portuguese
//! headers in tabs named "Contas a pagar" and "Contas a receber".

use finboard::*;

fn main() -> Result<()> {
    let sheet_id = match std::env::args().nth(1) {
        Some(id) => id,
        None => {
            eprintln!("usage: live_sheet <sheet-id>");
            std::process::exit(1);
        }
    };

    let config = DashboardConfig {
        sources: vec![
            SourceConfig::google_sheet(
                LedgerKind::Payable,
                &sheet_id,
                "Contas a pagar",
                ColumnSchema::payable_default(),
            ),
            SourceConfig::google_sheet(
                LedgerKind::Receivable,
                &sheet_id,
                "Contas a receber",
                ColumnSchema::receivable_default(),
            ),
        ],
        ..Default::default()
    };

    let client = LedgerClient::new(config)?;
    let ledgers = client.load_all()?;

    println!(
        "Loaded {} payable and {} receivable records",
        ledgers.payable.len(),
        ledgers.receivable.len()
    );

    let cards = aggregate::cashflow_summary(&ledgers.payable, &ledgers.receivable);
    println!("Total de Gastos:    R$ {:.2}", cards.total_payable);
    println!("Total a Receber:    R$ {:.2}", cards.total_receivable);
    println!("Saldo Líquido:      R$ {:.2}", cards.net_balance);

    println!("\nGastos por Categoria:");
    for group in aggregate::sum_by(&ledgers.payable, GroupField::Category) {
        println!("    {}: R$ {:.2}", group.key, group.total);
    }

    Ok(())
}
