use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// The five instrument categories a debtor information report discloses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Credit,
    LetterOfCredit,
    Guarantee,
    Securities,
    OtherFacility,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Credit,
        Category::LetterOfCredit,
        Category::Guarantee,
        Category::Securities,
        Category::OtherFacility,
    ];

    /// Label written into the `Kategori` column.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Credit => "Kredit/Pembiayaan",
            Category::LetterOfCredit => "Irrevocable L/C",
            Category::Guarantee => "Garansi yang Diberikan",
            Category::Securities => "Surat Berharga",
            Category::OtherFacility => "Fasilitas Lain",
        }
    }

    /// Short identifier used on the command line and in option files.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Credit => "credit",
            Category::LetterOfCredit => "letter_of_credit",
            Category::Guarantee => "guarantee",
            Category::Securities => "securities",
            Category::OtherFacility => "other_facility",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Category> {
        let lower = s.trim().to_lowercase().replace(['-', ' '], "_");
        match lower.as_str() {
            "credit" | "kredit" | "kredit/pembiayaan" => Some(Category::Credit),
            "letter_of_credit" | "lc" | "l/c" | "irrevocable_l/c" => Some(Category::LetterOfCredit),
            "guarantee" | "garansi" | "garansi_yang_diberikan" => Some(Category::Guarantee),
            "securities" | "surat_berharga" => Some(Category::Securities),
            "other_facility" | "fasilitas_lain" => Some(Category::OtherFacility),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How a column's raw text is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Amount,
    Percentage,
    Date,
}

/// A column of the unified output table.
///
/// Variants are declared in output order, so the derived `Ord` is the
/// canonical column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Category,
    DebtorName,
    GroupName,
    BankCode,
    BankName,
    Bank,
    Branch,
    Balance,
    AccountNumber,
    Quality,
    InstrumentType,
    CreditNature,
    DaysPastDue,
    Contract,
    ExtensionFrequency,
    ProjectValue,
    InitialCeiling,
    Ceiling,
    CurrentDisbursement,
    OriginalCurrencyValue,
    MarketValue,
    AcquisitionValue,
    CollateralDeposit,
    InitialAgreementNo,
    InitialAgreementDate,
    FinalAgreementNo,
    FinalAgreementDate,
    CreditStartDate,
    StartDate,
    MaturityDate,
    Arrears,
    PrincipalArrears,
    InterestArrears,
    ArrearsFrequency,
    Penalty,
    DefaultCause,
    DefaultDate,
    DebtorCategory,
    Purpose,
    EconomicSector,
    GovernmentProgram,
    ProjectLocation,
    Currency,
    InterestRate,
    InterestRateType,
    RestructuringFrequency,
    LastRestructuringDate,
    RestructuringMethod,
    Condition,
    ConditionDate,
    Beneficiary,
    Guaranteed,
    Rating,
    Remarks,
}

/// Canonical column order of the unified table.
pub const UNIFIED_COLUMNS: &[Column] = &[
    Column::Category,
    Column::DebtorName,
    Column::GroupName,
    Column::BankCode,
    Column::BankName,
    Column::Bank,
    Column::Branch,
    Column::Balance,
    Column::AccountNumber,
    Column::Quality,
    Column::InstrumentType,
    Column::CreditNature,
    Column::DaysPastDue,
    Column::Contract,
    Column::ExtensionFrequency,
    Column::ProjectValue,
    Column::InitialCeiling,
    Column::Ceiling,
    Column::CurrentDisbursement,
    Column::OriginalCurrencyValue,
    Column::MarketValue,
    Column::AcquisitionValue,
    Column::CollateralDeposit,
    Column::InitialAgreementNo,
    Column::InitialAgreementDate,
    Column::FinalAgreementNo,
    Column::FinalAgreementDate,
    Column::CreditStartDate,
    Column::StartDate,
    Column::MaturityDate,
    Column::Arrears,
    Column::PrincipalArrears,
    Column::InterestArrears,
    Column::ArrearsFrequency,
    Column::Penalty,
    Column::DefaultCause,
    Column::DefaultDate,
    Column::DebtorCategory,
    Column::Purpose,
    Column::EconomicSector,
    Column::GovernmentProgram,
    Column::ProjectLocation,
    Column::Currency,
    Column::InterestRate,
    Column::InterestRateType,
    Column::RestructuringFrequency,
    Column::LastRestructuringDate,
    Column::RestructuringMethod,
    Column::Condition,
    Column::ConditionDate,
    Column::Beneficiary,
    Column::Guaranteed,
    Column::Rating,
    Column::Remarks,
];

impl Column {
    /// Header text of the column in the exported spreadsheet.
    pub fn header(&self) -> &'static str {
        match self {
            Column::Category => "Kategori",
            Column::DebtorName => "Nama Debitur",
            Column::GroupName => "Nama Group",
            Column::BankCode => "KODE BANK",
            Column::BankName => "NAMA BANK",
            Column::Bank => "BANK",
            Column::Branch => "CABANG",
            Column::Balance => "Baki Debet/Nominal",
            Column::AccountNumber => "No Rek/LC/Surat",
            Column::Quality => "Kualitas",
            Column::InstrumentType => "Jenis Kredit/LC/Garansi/Surat/Fasilitas",
            Column::CreditNature => "Sifat Kredit/Pembiayaan",
            Column::DaysPastDue => "Jumlah Hari Tunggakan",
            Column::Contract => "Akad Kredit/Pembiayaan",
            Column::ExtensionFrequency => "Frekuensi Perpanjangan Kredit/",
            Column::ProjectValue => "Nilai Proyek",
            Column::InitialCeiling => "Plafon Awal",
            Column::Ceiling => "Plafon",
            Column::CurrentDisbursement => "Realisasi/Pencairan Bulan Berjalan",
            Column::OriginalCurrencyValue => "Nilai dalam Mata Uang Asal",
            Column::MarketValue => "Nilai Pasar",
            Column::AcquisitionValue => "Nilai Perolehan",
            Column::CollateralDeposit => "Setoran Jaminan",
            Column::InitialAgreementNo => "No Akad Awal",
            Column::InitialAgreementDate => "Tanggal Akad Awal",
            Column::FinalAgreementNo => "No Akad Akhir",
            Column::FinalAgreementDate => "Tanggal Akad Akhir",
            Column::CreditStartDate => "Tanggal Awal Kredit",
            Column::StartDate => "Tanggal Mulai/Terbit",
            Column::MaturityDate => "Tanggal Jatuh Tempo",
            Column::Arrears => "Tunggakan",
            Column::PrincipalArrears => "Tunggakan Pokok",
            Column::InterestArrears => "Tunggakan Bunga",
            Column::ArrearsFrequency => "Frekuensi Tunggakan",
            Column::Penalty => "Denda",
            Column::DefaultCause => "Sebab Macet",
            Column::DefaultDate => "Tanggal Macet/Wanprestasi",
            Column::DebtorCategory => "Kategori Debitur",
            Column::Purpose => "Tujuan/Jenis Penggunaan",
            Column::EconomicSector => "Sektor Ekonomi",
            Column::GovernmentProgram => "Kredit Program Pemerintah",
            Column::ProjectLocation => "Kab/Kota Lokasi Proyek",
            Column::Currency => "Valuta",
            Column::InterestRate => "Suku Bunga/Imbalan",
            Column::InterestRateType => "Jenis Suku Bunga/Imbalan",
            Column::RestructuringFrequency => "Frekuensi Restrukturisasi",
            Column::LastRestructuringDate => "Tanggal Restrukturisasi Akhir",
            Column::RestructuringMethod => "Cara Restrukturisasi",
            Column::Condition => "Kondisi",
            Column::ConditionDate => "Tanggal Kondisi",
            Column::Beneficiary => "Bank Beneficiary",
            Column::Guaranteed => "Nama yang Dijamin",
            Column::Rating => "Peringkat Surat Berharga",
            Column::Remarks => "Keterangan",
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Balance
            | Column::ProjectValue
            | Column::InitialCeiling
            | Column::Ceiling
            | Column::CurrentDisbursement
            | Column::OriginalCurrencyValue
            | Column::MarketValue
            | Column::AcquisitionValue
            | Column::CollateralDeposit
            | Column::Arrears
            | Column::PrincipalArrears
            | Column::InterestArrears
            | Column::Penalty => ColumnKind::Amount,
            Column::InitialAgreementDate
            | Column::FinalAgreementDate
            | Column::CreditStartDate
            | Column::StartDate
            | Column::MaturityDate
            | Column::DefaultDate
            | Column::LastRestructuringDate
            | Column::ConditionDate => ColumnKind::Date,
            Column::InterestRate => ColumnKind::Percentage,
            _ => ColumnKind::Text,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.header())
    }
}

/// A typed cell of a normalized record or of the unified table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(Decimal),
    Date(NaiveDate),
}

impl CellValue {
    /// Text cell, or `Empty` when the trimmed text is blank.
    pub fn text(s: &str) -> CellValue {
        let s = s.trim();
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(d) => write!(f, "{}", d.normalize()),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Raw field values captured for one facility block before normalization.
///
/// A column that was never captured is absent; a captured label with no
/// value after it is present with an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateRecord {
    fields: BTreeMap<Column, String>,
}

impl CandidateRecord {
    pub fn get(&self, column: Column) -> Option<&str> {
        self.fields.get(&column).map(|s| s.as_str())
    }

    pub fn set(&mut self, column: Column, value: impl Into<String>) {
        self.fields.insert(column, value.into());
    }

    pub fn contains(&self, column: Column) -> bool {
        self.fields.contains_key(&column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Column, &str)> {
        self.fields.iter().map(|(c, v)| (*c, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A candidate record after splitting, cleaning and bank resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub category: Category,
    cells: BTreeMap<Column, CellValue>,
}

impl NormalizedRecord {
    pub fn new(category: Category) -> Self {
        NormalizedRecord {
            category,
            cells: BTreeMap::new(),
        }
    }

    /// Cell for `column`; columns the category never populates read as `Empty`.
    pub fn get(&self, column: Column) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells.get(&column).unwrap_or(&EMPTY)
    }

    pub fn set(&mut self, column: Column, value: CellValue) {
        self.cells.insert(column, value);
    }

    pub fn text(&self, column: Column) -> Option<&str> {
        self.get(column).as_text()
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.cells.keys().copied()
    }
}

/// The unified output table: ordered columns, ordered rows of typed cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, column: Column) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }

    pub fn cell(&self, row: usize, column: Column) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }
}

/// A non-fatal condition encountered during conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionWarning {
    /// Document name or resource the warning is about.
    pub source: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unified_columns_follow_declaration_order() {
        let mut sorted = UNIFIED_COLUMNS.to_vec();
        sorted.sort();
        assert_eq!(sorted, UNIFIED_COLUMNS);
        assert_eq!(UNIFIED_COLUMNS[0].header(), "Kategori");
    }

    #[test]
    fn test_category_from_str_loose() {
        assert_eq!(Category::from_str_loose("LC"), Some(Category::LetterOfCredit));
        assert_eq!(
            Category::from_str_loose("Fasilitas Lain"),
            Some(Category::OtherFacility)
        );
        assert_eq!(Category::from_str_loose("credit"), Some(Category::Credit));
        assert_eq!(Category::from_str_loose("deposito"), None);
    }

    #[test]
    fn test_cell_text_blank_is_empty() {
        assert_eq!(CellValue::text("   "), CellValue::Empty);
        assert_eq!(CellValue::text(" IDR "), CellValue::Text("IDR".into()));
    }

    #[test]
    fn test_missing_column_reads_empty() {
        let record = NormalizedRecord::new(Category::Guarantee);
        assert!(record.get(Column::ProjectValue).is_empty());
    }
}
