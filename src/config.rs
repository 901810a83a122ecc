use crate::error::Result;
use crate::filter::EmptySelectionPolicy;
use crate::record::LedgerKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// What to do with a row whose amount cell fails to parse. All three
/// behaviors exist in deployed sheets; the default is a product decision,
/// not an inferred truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum AmountPolicy {
    #[schemars(
        description = "Keep the record with amount 0.0, so row counts stay stable for table views"
    )]
    Zero,

    #[schemars(description = "Omit the record from the loaded set")]
    Drop,

    #[schemars(description = "Fail the whole load with a BadAmount error")]
    Reject,
}

impl Default for AmountPolicy {
    fn default() -> Self {
        Self::Zero
    }
}

/// Maps record fields to spreadsheet column headers. Every configured
/// column must be present in the fetched CSV; a configured-but-absent
/// column aborts the load. Unconfigured optional columns load as
/// empty/`None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnSchema {
    pub amount: String,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub cost_center: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub entry_type: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub invoice: Option<String>,
}

impl ColumnSchema {
    /// The canonical Portuguese headers of the "Contas a pagar" sheet.
    pub fn payable_default() -> Self {
        Self {
            amount: "Valor".to_string(),
            issue_date: Some("Data de Lançamento".to_string()),
            due_date: Some("Data de Vencimento".to_string()),
            payment_date: Some("Data de Pagamento".to_string()),
            category: Some("Categoria".to_string()),
            cost_center: Some("Centro de Custo".to_string()),
            status: Some("Status (Pago/Em Aberto)".to_string()),
            payment_method: Some("Forma de Pagamento".to_string()),
            subtype: Some("Subtipo".to_string()),
            vendor: Some("Fornecedor".to_string()),
            entry_type: Some("Tipo".to_string()),
            product: Some("Produto".to_string()),
            objective: Some("Objetivo".to_string()),
            notes: Some("Observações".to_string()),
            invoice: Some("Nota Fiscal".to_string()),
        }
    }

    /// The slimmer "Contas a receber" sheet: amount, dates, category and
    /// status only.
    pub fn receivable_default() -> Self {
        Self {
            amount: "Valor".to_string(),
            issue_date: Some("Data de Lançamento".to_string()),
            due_date: Some("Data de Vencimento".to_string()),
            payment_date: None,
            category: Some("Categoria".to_string()),
            cost_center: None,
            status: Some("Status (Pago/Em Aberto)".to_string()),
            payment_method: None,
            subtype: None,
            vendor: None,
            entry_type: None,
            product: None,
            objective: None,
            notes: None,
            invoice: None,
        }
    }
}

/// One ledger's remote source: where to fetch it and how its columns map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SourceConfig {
    pub ledger: LedgerKind,
    pub url: String,
    pub columns: ColumnSchema,
}

impl SourceConfig {
    /// Builds the Google Sheets CSV-export URL for one tab of a sheet.
    pub fn google_sheet(ledger: LedgerKind, sheet_id: &str, tab: &str, columns: ColumnSchema) -> Self {
        let url = format!(
            "https://docs.google.com/spreadsheets/d/{}/gviz/tq?tqx=out:csv&sheet={}",
            sheet_id,
            tab.replace(' ', "%20")
        );
        Self {
            ledger,
            url,
            columns,
        }
    }
}

/// Top-level configuration of the dashboard core: sources, cache TTL,
/// fetch timeout and the two cell/selection policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DashboardConfig {
    #[serde(default)]
    pub sources: Vec<SourceConfig>,

    #[serde(default = "default_cache_ttl_secs")]
    #[schemars(description = "Seconds a loaded record set stays cached; 0 means never expires")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default)]
    pub amount_policy: AmountPolicy,

    #[serde(default)]
    pub empty_selection: EmptySelectionPolicy,
}

fn default_cache_ttl_secs() -> u64 {
    600
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            cache_ttl_secs: default_cache_ttl_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            amount_policy: AmountPolicy::default(),
            empty_selection: EmptySelectionPolicy::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn source_for(&self, kind: LedgerKind) -> Option<&SourceConfig> {
        self.sources.iter().find(|source| source.ledger == kind)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DashboardConfig)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
