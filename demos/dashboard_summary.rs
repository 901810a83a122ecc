//! Offline walkthrough of the whole pipeline: loads both ledgers from
//! embedded CSV through an in-memory source, applies a sidebar-style filter
//! and prints the numbers a dashboard would render.
//!
//! Run with: `cargo run --example dashboard_summary`

use finboard::*;
use std::collections::HashMap;
use std::sync::Arc;

const PAYABLE_CSV: &str = "\
Data de Lançamento,Data de Vencimento,Data de Pagamento,Fornecedor,Tipo,Subtipo,Centro de Custo,Produto,Categoria,Valor,Objetivo,Status (Pago/Em Aberto),Forma de Pagamento,Observações,Nota Fiscal
10/01/2025,15/01/2025,14/01/2025,Acme,Serviço,,Marketing,Anúncios,Fixo,\"R$ 1.200,00\",Captação,Pago,Pix,,NF-001
20/01/2025,25/01/2025,,Beta,Produto,Cartão de Crédito,Operações,Insumos,Variável,\"R$ 350,50\",,Em Aberto,Cartão,,
05/02/2025,10/02/2025,08/02/2025,Gama,Serviço,,Marketing,Consultoria,Variável,\"R$ 2.780,90\",,Pago,Boleto,,
12/02/2025,20/02/2025,,Delta,Produto,,Operações,Licenças,Fixo,\"R$ 499,00\",,Em Aberto,Cartão,,
";

const RECEIVABLE_CSV: &str = "\
Data de Lançamento,Data de Vencimento,Categoria,Valor,Status (Pago/Em Aberto)
12/01/2025,20/01/2025,Vendas,\"R$ 4.000,00\",Pago
03/02/2025,15/02/2025,Vendas,\"R$ 1.500,00\",Em Aberto
";

struct EmbeddedSheets(HashMap<String, String>);

impl RecordSource for EmbeddedSheets {
    fn fetch(&self, url: &str) -> Result<String> {
        self.0
            .get(url)
            .cloned()
            .ok_or_else(|| LedgerError::fetch(url, "no embedded sheet for this URL"))
    }
}

fn main() -> Result<()> {
    let config = DashboardConfig {
        sources: vec![
            SourceConfig {
                ledger: LedgerKind::Payable,
                url: "embedded://pagar".to_string(),
                columns: ColumnSchema::payable_default(),
            },
            SourceConfig {
                ledger: LedgerKind::Receivable,
                url: "embedded://receber".to_string(),
                columns: ColumnSchema::receivable_default(),
            },
        ],
        ..Default::default()
    };

    let sheets = EmbeddedSheets(HashMap::from([
        ("embedded://pagar".to_string(), PAYABLE_CSV.to_string()),
        ("embedded://receber".to_string(), RECEIVABLE_CSV.to_string()),
    ]));
    let client = LedgerClient::with_source(config, Arc::new(sheets));
    let ledgers = client.load_all()?;

    println!(
        "Loaded {} payable and {} receivable records",
        ledgers.payable.len(),
        ledgers.receivable.len()
    );

    // The sidebar's defaults: full date window of the issue-date column,
    // every category and status.
    let spec = FilterSpec::default()
        .with_date_range(ledgers.payable.default_date_range(DateBasis::Issue));
    let filtered = filter::apply(&ledgers.payable, &spec);

    let cards = aggregate::cashflow_summary(&filtered, &ledgers.receivable);
    println!("\n== Resumo Financeiro ==");
    println!("Total de Gastos:    R$ {:.2}", cards.total_payable);
    println!(
        "Média de Gastos:    R$ {:.2}",
        cards.mean_payable.unwrap_or(0.0)
    );
    println!("Total a Receber:    R$ {:.2}", cards.total_receivable);
    println!("Saldo Líquido:      R$ {:.2}", cards.net_balance);

    println!("\n== Gastos por Centro de Custo ==");
    for group in aggregate::sum_by_with_category_split(&filtered, GroupField::CostCenter) {
        println!("{}: R$ {:.2}", group.key, group.total);
        for category in &group.by_category {
            println!("    {}: R$ {:.2}", category.key, category.total);
        }
    }

    println!("\n== Evolução Mensal ==");
    for (month, total) in aggregate::monthly_totals(&filtered, DateBasis::Issue) {
        println!("{}: R$ {:.2}", month.format("%Y-%m"), total);
    }

    println!("\n== Gastos no Cartão de Crédito ==");
    let card_spec = FilterSpec::default().with_subtype(Selection::subset(["Cartão de Crédito"]));
    let card_spend = filter::apply(&ledgers.payable, &card_spec);
    println!("R$ {:.2}", aggregate::total(&card_spend));

    Ok(())
}
