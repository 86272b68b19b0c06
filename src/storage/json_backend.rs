use std::{
    collections::BTreeMap,
    fmt,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    core::utils::data_file,
    ledger::{Expense, Ledger, MonthKey, UserInfo},
};

use super::{LoadOrigin, LoadReport, Result, StorageBackend};

const TMP_SUFFIX: &str = "tmp";

/// Single-file JSON persistence for a ledger.
///
/// The document layout is shared with earlier versions of the tracker:
/// `{"expenses": [...], "user_info": {"name", "savings_account", "monthly_budgets"}}`
/// with budget months keyed as `"YYYY-MM"`.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at the default data file inside the application directory.
    pub fn new_default() -> Self {
        Self::new(data_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<LoadReport> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(
                    "no saved data at {}; starting fresh",
                    self.path.display()
                );
                return Ok(LoadReport::fresh());
            }
            Err(err) => return Err(err.into()),
        };
        match decode_document(&data) {
            Ok((ledger, warnings)) => {
                for warning in &warnings {
                    warn!("{}: {}", self.path.display(), warning);
                }
                info!(
                    "loaded {} expense(s) and {} budget(s) from {}",
                    ledger.expense_count(),
                    ledger.budgets().len(),
                    self.path.display()
                );
                Ok(LoadReport {
                    ledger,
                    origin: LoadOrigin::Existing,
                    warnings,
                })
            }
            Err(err) => {
                warn!(
                    "data at {} is corrupted ({}); starting fresh",
                    self.path.display(),
                    err
                );
                Ok(LoadReport::corrupted(err.to_string()))
            }
        }
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        let json = encode_document(ledger)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        if let Err(err) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        info!(
            "saved {} expense(s) to {}",
            ledger.expense_count(),
            self.path.display()
        );
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// Serializes the full ledger into the on-disk document layout.
///
/// Budget keys are transcoded into a separate map, so the ledger itself is never
/// left holding text keys.
pub fn encode_document(ledger: &Ledger) -> Result<String> {
    let monthly_budgets = ledger
        .budgets()
        .iter()
        .map(|(month, amount)| (month.encode(), Amount(*amount)))
        .collect();
    let document = DocumentOut {
        expenses: ledger.expenses(),
        user_info: UserInfoOut {
            name: &ledger.user().name,
            savings_account: ledger.user().savings_account,
            monthly_budgets,
        },
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Parses a document, dropping individual entries that cannot be represented.
///
/// Returns the ledger plus one warning per dropped entry. Budgets are applied in
/// document order, so when two keys name the same month the later one wins.
/// Fails only when the document as a whole is not valid JSON of the expected shape.
pub fn decode_document(data: &[u8]) -> std::result::Result<(Ledger, Vec<String>), serde_json::Error> {
    let document: DocumentIn = serde_json::from_slice(data)?;
    let mut warnings = Vec::new();

    let mut expenses = Vec::with_capacity(document.expenses.len());
    for (idx, value) in document.expenses.into_iter().enumerate() {
        let parsed = serde_json::from_value::<Expense>(value)
            .map_err(|err| err.to_string())
            .and_then(|expense| {
                expense
                    .validate()
                    .map(|_| expense)
                    .map_err(|err| err.to_string())
            });
        match parsed {
            Ok(expense) => expenses.push(expense),
            Err(reason) => warnings.push(format!("dropped expense #{}: {}", idx + 1, reason)),
        }
    }

    let mut budgets = BTreeMap::new();
    for (raw_key, value) in document.user_info.monthly_budgets {
        let month = match MonthKey::decode(&raw_key) {
            Ok(month) => month,
            Err(err) => {
                warnings.push(format!("dropped budget: {}", err));
                continue;
            }
        };
        let amount = match serde_json::from_value::<Amount>(value) {
            Ok(Amount(amount)) if amount.is_sign_negative() && !amount.is_zero() => {
                warnings.push(format!(
                    "dropped budget `{}`: negative amount {}",
                    raw_key, amount
                ));
                continue;
            }
            Ok(Amount(amount)) => amount,
            Err(err) => {
                warnings.push(format!("dropped budget `{}`: {}", raw_key, err));
                continue;
            }
        };
        if budgets.insert(month, amount).is_some() {
            warnings.push(format!(
                "budget `{}` duplicates {}; keeping the later entry",
                raw_key, month
            ));
        }
    }

    let user = UserInfo {
        name: document.user_info.name,
        savings_account: document.user_info.savings_account,
    };
    Ok((Ledger::from_parts(expenses, budgets, user), warnings))
}

/// Keeps every `monthly_budgets` entry in document order, duplicates included.
fn budget_entries<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, Value)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, Value)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of month keys to budget amounts")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, Value>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}

#[derive(Debug, Serialize, Deserialize)]
struct Amount(#[serde(with = "rust_decimal::serde::arbitrary_precision")] Decimal);

#[derive(Serialize)]
struct DocumentOut<'a> {
    expenses: &'a [Expense],
    user_info: UserInfoOut<'a>,
}

#[derive(Serialize)]
struct UserInfoOut<'a> {
    name: &'a str,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    savings_account: Decimal,
    monthly_budgets: BTreeMap<String, Amount>,
}

#[derive(Deserialize)]
struct DocumentIn {
    #[serde(default)]
    expenses: Vec<Value>,
    #[serde(default)]
    user_info: UserInfoIn,
}

#[derive(Default, Deserialize)]
struct UserInfoIn {
    #[serde(default)]
    name: String,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision")]
    savings_account: Decimal,
    #[serde(default, deserialize_with = "budget_entries")]
    monthly_budgets: Vec<(String, Value)>,
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Category;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(temp.path().join("expenses.json"));
        (storage, temp)
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        ledger
            .add_expense(Expense::new("Lunch", dec!(12.50), date, Category::Food).unwrap())
            .unwrap();
        ledger
            .set_budget(MonthKey::new(2024, 3).unwrap(), dec!(100.0))
            .unwrap();
        ledger.set_user_name("Sample");
        ledger
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let ledger = sample_ledger();
        storage.save(&ledger).expect("save ledger");
        let report = storage.load().expect("load ledger");
        assert_eq!(report.origin, LoadOrigin::Existing);
        assert!(report.warnings.is_empty());
        assert_eq!(report.ledger, ledger);
    }

    #[test]
    fn missing_file_is_a_fresh_start() {
        let (storage, _guard) = storage_with_temp_dir();
        let report = storage.load().expect("load");
        assert_eq!(report.origin, LoadOrigin::Fresh);
        assert!(report.is_fresh_start());
        assert!(report.needs_initial_budget(MonthKey::new(2024, 3).unwrap()));
        assert_eq!(report.ledger, Ledger::new());
    }

    #[test]
    fn loaded_budget_for_current_month_skips_the_prompt() {
        let (storage, _guard) = storage_with_temp_dir();
        storage.save(&sample_ledger()).unwrap();
        let report = storage.load().unwrap();
        assert!(!report.needs_initial_budget(MonthKey::new(2024, 3).unwrap()));
        assert!(report.needs_initial_budget(MonthKey::new(2024, 4).unwrap()));
    }

    #[test]
    fn unparseable_file_is_reported_as_corrupted() {
        let (storage, _guard) = storage_with_temp_dir();
        fs::write(storage.path(), "{\"expenses\": [").unwrap();
        let report = storage.load().expect("load");
        assert!(matches!(report.origin, LoadOrigin::Corrupted { .. }));
        assert!(report.is_fresh_start());
        assert_eq!(report.ledger, Ledger::new());
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let temp = TempDir::new().unwrap();
        let storage = JsonStorage::new(temp.path().join("nested").join("expenses.json"));
        storage.save(&sample_ledger()).expect("save");
        assert!(storage.path().exists());
        assert!(!tmp_path(storage.path()).exists());
    }

    #[test]
    fn document_uses_text_keys_and_original_date_layout() {
        let json = encode_document(&sample_ledger()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["user_info"]["monthly_budgets"]["2024-03"].to_string(), "100.0");
        assert_eq!(value["expenses"][0]["date"], "03-15-2024");
        assert_eq!(value["user_info"]["name"], "Sample");
    }

    #[test]
    fn decode_drops_invalid_entries_with_warnings() {
        let raw = r#"{
            "expenses": [
                {"description": "ok", "amount": 5, "date": "03-01-2024", "category": "Food"},
                {"description": "neg", "amount": -1, "date": "03-01-2024", "category": "Food"},
                {"description": "cat", "amount": 1, "date": "03-01-2024", "category": "Pets"}
            ],
            "user_info": {
                "name": "",
                "savings_account": 0.0,
                "monthly_budgets": {"2024-03": 100.0, "abc": 5.0, "2024-04": "lots", "2024-05": -3}
            }
        }"#;
        let (ledger, warnings) = decode_document(raw.as_bytes()).unwrap();
        assert_eq!(ledger.expense_count(), 1);
        assert_eq!(ledger.budgets().len(), 1);
        assert_eq!(ledger.budget(MonthKey::new(2024, 3).unwrap()), dec!(100));
        assert_eq!(warnings.len(), 5, "{warnings:?}");
    }

    #[test]
    fn decode_drops_expenses_dated_before_year_one() {
        let raw = r#"{"expenses": [
            {"description": "old", "amount": 1, "date": "03-15-0000", "category": "Food"},
            {"description": "new", "amount": 2, "date": "03-15-2024", "category": "Food"}
        ]}"#;
        let (ledger, warnings) = decode_document(raw.as_bytes()).unwrap();
        assert_eq!(ledger.expense_count(), 1);
        assert_eq!(ledger.expense(1).unwrap().description, "new");
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(warnings[0].contains("expense #1"), "{warnings:?}");
    }

    #[test]
    fn later_budget_entry_wins_in_document_order() {
        let march = MonthKey::new(2024, 3).unwrap();
        for (raw, expected) in [
            (r#"{"user_info": {"monthly_budgets": {"2024-03": 1, "2024-3": 2}}}"#, dec!(2)),
            (r#"{"user_info": {"monthly_budgets": {"2024-3": 2, "2024-03": 1}}}"#, dec!(1)),
            (r#"{"user_info": {"monthly_budgets": {"2024-03": 1, "2024-03": 5}}}"#, dec!(5)),
        ] {
            let (ledger, warnings) = decode_document(raw.as_bytes()).unwrap();
            assert_eq!(ledger.budget(march), expected, "{raw}");
            assert_eq!(warnings.len(), 1, "{raw}: {warnings:?}");
            assert!(warnings[0].contains("duplicates"), "{warnings:?}");
        }
    }

    #[test]
    fn failed_rename_removes_the_temp_file() {
        let (storage, _guard) = storage_with_temp_dir();
        fs::create_dir_all(storage.path()).unwrap();
        let err = storage.save(&sample_ledger()).expect_err("rename onto a directory fails");
        assert!(err.is_io(), "{err:?}");
        assert!(!tmp_path(storage.path()).exists());
    }

    #[test]
    fn high_precision_amounts_round_trip() {
        let (storage, _guard) = storage_with_temp_dir();
        let mut ledger = Ledger::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        ledger
            .add_expense(
                Expense::new("Bulk", dec!(12345678901234567.89), date, Category::Other).unwrap(),
            )
            .unwrap();
        ledger
            .set_budget(MonthKey::new(2024, 3).unwrap(), dec!(0.1234567890123456789))
            .unwrap();
        ledger.set_savings_account(dec!(98765432109876543.21));

        storage.save(&ledger).unwrap();
        let raw = fs::read_to_string(storage.path()).unwrap();
        assert!(raw.contains("12345678901234567.89"), "{raw}");
        assert!(raw.contains("0.1234567890123456789"), "{raw}");

        let report = storage.load().unwrap();
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert_eq!(report.ledger, ledger);
    }

    #[test]
    fn decode_tolerates_missing_sections() {
        let (ledger, warnings) = decode_document(b"{}").unwrap();
        assert_eq!(ledger, Ledger::new());
        assert!(warnings.is_empty());
    }
}
