use chrono::NaiveDate;
use finboard::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const PAYABLE_CSV: &str = "\
Data de Lançamento,Data de Vencimento,Data de Pagamento,Fornecedor,Tipo,Subtipo,Centro de Custo,Produto,Categoria,Valor,Objetivo,Status (Pago/Em Aberto),Forma de Pagamento,Observações,Nota Fiscal
10/01/2025,15/01/2025,14/01/2025,Acme,Serviço,,A,Anúncios,Fixo,\"R$ 100,00\",Captação,Pago,Pix,,NF-001
20/01/2025,25/01/2025,,Beta,Produto,Cartão de Crédito,B,Insumos,Variável,\"R$ 50,00\",,Em Aberto,Cartão,,
05/02/2025,10/02/2025,,Gama,Serviço,,A,Consultoria,Variável,\"R$ 1.234,56\",,Em Aberto,Boleto,,
";

const RECEIVABLE_CSV: &str = "\
Data de Lançamento,Data de Vencimento,Categoria,Valor,Status (Pago/Em Aberto)
12/01/2025,20/01/2025,Vendas,\"R$ 2.000,00\",Em Aberto
03/02/2025,15/02/2025,Vendas,\"R$ 500,00\",Pago
";

/// In-memory transport mapping source URLs to CSV fixtures, counting
/// fetches so cache behavior is observable.
struct SheetSource {
    sheets: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl SheetSource {
    fn new(sheets: &[(&str, &str)]) -> Self {
        Self {
            sheets: sheets
                .iter()
                .map(|(url, body)| (url.to_string(), body.to_string()))
                .collect(),
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl RecordSource for SheetSource {
    fn fetch(&self, url: &str) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.sheets
            .get(url)
            .cloned()
            .ok_or_else(|| LedgerError::fetch(url, "sheet not found"))
    }
}

fn dashboard_config() -> DashboardConfig {
    DashboardConfig {
        sources: vec![
            SourceConfig {
                ledger: LedgerKind::Payable,
                url: "https://sheets.test/pagar".to_string(),
                columns: ColumnSchema::payable_default(),
            },
            SourceConfig {
                ledger: LedgerKind::Receivable,
                url: "https://sheets.test/receber".to_string(),
                columns: ColumnSchema::receivable_default(),
            },
        ],
        ..Default::default()
    }
}

fn client_with_fixtures() -> (LedgerClient, Arc<SheetSource>) {
    let source = Arc::new(SheetSource::new(&[
        ("https://sheets.test/pagar", PAYABLE_CSV),
        ("https://sheets.test/receber", RECEIVABLE_CSV),
    ]));
    let transport: Arc<dyn RecordSource> = source.clone();
    let client = LedgerClient::with_source(dashboard_config(), transport);
    (client, source)
}

#[test]
fn test_load_filter_aggregate_end_to_end() {
    let (client, _) = client_with_fixtures();
    let ledgers = client.load_all().unwrap();
    assert_eq!(ledgers.payable.len(), 3);
    assert_eq!(ledgers.receivable.len(), 2);

    // Filter by category "Fixo": one record with the normalized amount.
    let spec = FilterSpec::default().with_category(Selection::subset(["Fixo"]));
    let filtered = filter::apply(&ledgers.payable, &spec);
    assert_eq!(filtered.len(), 1);
    assert!((filtered.records()[0].amount - 100.0).abs() < 1e-9);

    let summary = aggregate::summarize(&filtered);
    assert!((summary.total - 100.0).abs() < 1e-9);

    let groups = aggregate::sum_by(&filtered, GroupField::CostCenter);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "A");
    assert!((groups[0].total - 100.0).abs() < 1e-9);
}

#[test]
fn test_metric_cards_over_both_ledgers() {
    let (client, _) = client_with_fixtures();
    let ledgers = client.load_all().unwrap();

    let summary = aggregate::cashflow_summary(&ledgers.payable, &ledgers.receivable);
    assert!((summary.total_payable - 1384.56).abs() < 1e-9);
    assert!((summary.mean_payable.unwrap() - 1384.56 / 3.0).abs() < 1e-9);
    assert!((summary.total_receivable - 2500.0).abs() < 1e-9);
    assert!((summary.net_balance - (2500.0 - 1384.56)).abs() < 1e-9);
}

#[test]
fn test_sidebar_style_filtering_by_date_status_and_payment_method() {
    let (client, _) = client_with_fixtures();
    let payable = client.load(LedgerKind::Payable).unwrap();

    let spec = FilterSpec::default()
        .with_date_basis(DateBasis::Issue)
        .with_date_range(DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        ))
        .with_status(Selection::from_choices(
            ["Em Aberto"],
            EmptySelectionPolicy::MatchAll,
        ))
        .with_payment_method(Selection::subset(["Cartão"]));

    let filtered = filter::apply(&payable, &spec);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered.records()[0].vendor.as_deref(), Some("Beta"));
    assert_eq!(
        filtered.records()[0].subtype.as_deref(),
        Some("Cartão de Crédito")
    );
}

#[test]
fn test_empty_multiselect_follows_configured_policy() {
    let (client, _) = client_with_fixtures();
    let payable = client.load(LedgerKind::Payable).unwrap();
    let no_choices: Vec<String> = Vec::new();

    // The configured default ("Todas"): no constraint.
    let policy = client.config().empty_selection;
    assert_eq!(policy, EmptySelectionPolicy::MatchAll);
    let spec =
        FilterSpec::default().with_category(Selection::from_choices(no_choices.clone(), policy));
    assert_eq!(filter::apply(&payable, &spec).len(), 3);

    // The alternative deployment choice: an empty multiselect excludes all.
    let spec = FilterSpec::default().with_category(Selection::from_choices(
        no_choices,
        EmptySelectionPolicy::MatchNone,
    ));
    assert!(filter::apply(&payable, &spec).is_empty());
}

#[test]
fn test_credit_card_breakdown_via_parameterized_grouping() {
    let (client, _) = client_with_fixtures();
    let payable = client.load(LedgerKind::Payable).unwrap();

    // The "cartão de crédito" drill-down is a subtype filter plus the same
    // grouping call every other breakdown uses.
    let spec = FilterSpec::default().with_subtype(Selection::subset(["Cartão de Crédito"]));
    let card_spend = filter::apply(&payable, &spec);
    assert!((aggregate::total(&card_spend) - 50.0).abs() < 1e-9);

    let breakdowns = aggregate::sum_by_with_category_split(&payable, GroupField::CostCenter);
    assert_eq!(breakdowns[0].key, "A");
    assert!((breakdowns[0].total - 1334.56).abs() < 1e-9);
    let categories = &breakdowns[0].by_category;
    assert_eq!(categories[0].key, "Variável");
    assert_eq!(categories[1].key, "Fixo");
}

#[test]
fn test_monthly_trend_series() {
    let (client, _) = client_with_fixtures();
    let payable = client.load(LedgerKind::Payable).unwrap();

    let months = aggregate::monthly_totals(&payable, DateBasis::Issue);
    assert_eq!(months.len(), 2);
    assert!((months[&NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()] - 150.0).abs() < 1e-9);
    assert!((months[&NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()] - 1234.56).abs() < 1e-9);
}

#[test]
fn test_cached_loads_share_one_fetch_until_reload() {
    let (client, source) = client_with_fixtures();

    client.load(LedgerKind::Payable).unwrap();
    client.load(LedgerKind::Payable).unwrap();
    assert_eq!(source.fetch_count(), 1);

    client.reload(LedgerKind::Payable).unwrap();
    assert_eq!(source.fetch_count(), 2);
}

#[test]
fn test_fetch_failure_surfaces_as_error_not_empty_set() {
    let source = Arc::new(SheetSource::new(&[]));
    let client = LedgerClient::with_source(dashboard_config(), source);

    match client.load(LedgerKind::Payable) {
        Err(LedgerError::Fetch { url, .. }) => assert_eq!(url, "https://sheets.test/pagar"),
        other => panic!("expected Fetch error, got {other:?}"),
    }
}

#[test]
fn test_missing_column_fails_the_whole_load() {
    let source = Arc::new(SheetSource::new(&[(
        "https://sheets.test/pagar",
        "Valor,Categoria\n\"R$ 10,00\",Fixo\n",
    )]));
    let client = LedgerClient::with_source(dashboard_config(), source);

    match client.load(LedgerKind::Payable) {
        Err(LedgerError::MissingColumn { ledger, .. }) => {
            assert_eq!(ledger, LedgerKind::Payable);
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn test_unconfigured_ledger_is_invalid_config() {
    let source = Arc::new(SheetSource::new(&[]));
    let client = LedgerClient::with_source(DashboardConfig::default(), source);
    assert!(matches!(
        client.load(LedgerKind::Payable),
        Err(LedgerError::InvalidConfig(_))
    ));
}

#[test]
fn test_unparseable_amount_policy_is_zero_fill_by_default() {
    // The configured default keeps the row, contributing 0.0 to totals.
    let broken = PAYABLE_CSV.replace("R$ 100,00", "R$ abc");
    let source = Arc::new(SheetSource::new(&[
        ("https://sheets.test/pagar", broken.as_str()),
        ("https://sheets.test/receber", RECEIVABLE_CSV),
    ]));
    let client = LedgerClient::with_source(dashboard_config(), source);

    let payable = client.load(LedgerKind::Payable).unwrap();
    assert_eq!(payable.len(), 3);
    assert!((aggregate::total(&payable) - 1284.56).abs() < 1e-9);
}

#[test]
fn test_all_unparseable_dates_fall_back_to_sentinel_window() {
    let csv_text = "Data de Vencimento,Valor\ninvalid,\"R$ 10,00\"\n,\"R$ 20,00\"\n";
    let schema = ColumnSchema {
        amount: "Valor".to_string(),
        issue_date: None,
        due_date: Some("Data de Vencimento".to_string()),
        category: None,
        status: None,
        ..ColumnSchema::receivable_default()
    };

    let set = parse_records(csv_text, LedgerKind::Receivable, &schema, AmountPolicy::Zero).unwrap();
    let range = set.default_date_range(DateBasis::Due);
    assert_eq!(range, DateRange::sentinel());

    // The sentinel window still works as a usable filter default, even
    // though the dateless records themselves fail a range predicate.
    let spec = FilterSpec::default()
        .with_date_basis(DateBasis::Due)
        .with_date_range(range);
    assert!(filter::apply(&set, &spec).is_empty());
    assert_eq!(filter::apply(&set, &FilterSpec::default()).len(), 2);
}

#[test]
fn test_distinct_values_feed_ui_multiselects() {
    let (client, _) = client_with_fixtures();
    let payable = client.load(LedgerKind::Payable).unwrap();

    assert_eq!(
        payable.distinct_values(GroupField::Category),
        vec!["Fixo".to_string(), "Variável".to_string()]
    );
    assert_eq!(
        payable.distinct_values(GroupField::PaymentMethod),
        vec![
            "Boleto".to_string(),
            "Cartão".to_string(),
            "Pix".to_string()
        ]
    );
}

#[test]
fn test_filtered_output_serializes_for_presentation_handoff() {
    let (client, _) = client_with_fixtures();
    let payable = client.load(LedgerKind::Payable).unwrap();

    let spec = FilterSpec::default().with_category(Selection::subset(["Fixo"]));
    let filtered = filter::apply(&payable, &spec);
    let summary = aggregate::summarize(&filtered);

    let spec_json = serde_json::to_string(&spec).unwrap();
    let restored: FilterSpec = serde_json::from_str(&spec_json).unwrap();
    assert_eq!(restored, spec);

    let summary_json = serde_json::to_string(&summary).unwrap();
    assert!(summary_json.contains("\"total\":100.0"));

    let records_json = serde_json::to_string(filtered.records()).unwrap();
    assert!(records_json.contains("Fixo"));
}
