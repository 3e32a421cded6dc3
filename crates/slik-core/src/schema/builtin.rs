use crate::model::{Category, Column};
use crate::schema::{
    AnchorField, BankLine, EndAnchor, FieldSchema, InlinePair, Lookback, RecordClose, Trigger,
    VocabularyTable,
};

const GROUP_NAME: Lookback = Lookback {
    trigger: Trigger::Equals("Nomor Laporan"),
    offset: 2,
    words: 3,
    column: Column::GroupName,
};

const DEBTOR_NAME: Lookback = Lookback {
    trigger: Trigger::Contains("Penyajian informasi debitur pada Sistem Layanan Informasi"),
    offset: 3,
    words: 5,
    column: Column::DebtorName,
};

const fn bank_line(branch_guard: Option<&'static str>) -> BankLine {
    BankLine {
        separator: " - ",
        currency: "Rp",
        branch_guard,
        bank_column: Column::Bank,
        balance_column: Column::Balance,
    }
}

const fn close(predecessor: &'static str) -> RecordClose {
    RecordClose {
        label: "Keterangan",
        predecessor,
        column: Column::Remarks,
    }
}

const fn pair(start: &'static str, column: Column, end: &'static str, next: Column) -> AnchorField {
    AnchorField {
        start,
        column,
        end: Some(EndAnchor { label: end, column: next }),
    }
}

const fn single(start: &'static str, column: Column) -> AnchorField {
    AnchorField {
        start,
        column,
        end: None,
    }
}

const fn account(label: &'static str) -> InlinePair {
    InlinePair {
        first: label,
        first_column: Column::AccountNumber,
        second: "Kualitas",
        second_column: Column::Quality,
        first_token_only: false,
    }
}

pub static CREDIT: FieldSchema = FieldSchema {
    category: Category::Credit,
    group_name: GROUP_NAME,
    debtor_name: DEBTOR_NAME,
    bank_line: bank_line(Some("Pelapor Cabang")),
    inline_pairs: &[
        account("No Rekening"),
        InlinePair {
            first: "Suku Bunga/Imbalan",
            first_column: Column::InterestRate,
            second: "Jenis Suku Bunga/Imbalan",
            second_column: Column::InterestRateType,
            first_token_only: true,
        },
    ],
    fields: &[
        pair("Sifat Kredit/Pembiayaan", Column::CreditNature, "Jumlah Hari Tunggakan", Column::DaysPastDue),
        pair("Jenis Kredit/Pembiayaan", Column::InstrumentType, "Nilai Proyek", Column::ProjectValue),
        pair("Akad Kredit/Pembiayaan", Column::Contract, "Plafon Awal", Column::InitialCeiling),
        pair("Frekuensi Perpanjangan Kredit/", Column::ExtensionFrequency, "Plafon", Column::Ceiling),
        pair("No Akad Awal", Column::InitialAgreementNo, "Realisasi/Pencairan Bulan Berjalan", Column::CurrentDisbursement),
        pair("Tanggal Akad Awal", Column::InitialAgreementDate, "Nilai dalam Mata Uang Asal", Column::OriginalCurrencyValue),
        pair("No Akad Akhir", Column::FinalAgreementNo, "Sebab Macet", Column::DefaultCause),
        pair("Tanggal Akad Akhir", Column::FinalAgreementDate, "Tanggal Macet", Column::DefaultDate),
        pair("Tanggal Awal Kredit", Column::CreditStartDate, "Tunggakan Pokok", Column::PrincipalArrears),
        pair("Tanggal Mulai", Column::StartDate, "Tunggakan Bunga", Column::InterestArrears),
        pair("Tanggal Jatuh Tempo", Column::MaturityDate, "Frekuensi Tunggakan", Column::ArrearsFrequency),
        pair("Kategori Debitur", Column::DebtorCategory, "Denda", Column::Penalty),
        pair("Jenis Penggunaan", Column::Purpose, "Frekuensi Restrukturisasi", Column::RestructuringFrequency),
        pair("Sektor Ekonomi", Column::EconomicSector, "Tanggal Restrukturisasi Akhir", Column::LastRestructuringDate),
        pair("Kredit Program Pemerintah", Column::GovernmentProgram, "Cara Restrukturisasi", Column::RestructuringMethod),
        pair("Kab/Kota Lokasi Proyek", Column::ProjectLocation, "Kondisi", Column::Condition),
        pair("Valuta", Column::Currency, "Tanggal Kondisi", Column::ConditionDate),
    ],
    close: close("Jenis Suku Bunga/Imbalan"),
    primary: Column::InstrumentType,
    // Appraisal notes and cross-references to the guarantee and L/C sections.
    excluded_remarks: &["Tgl Penilaian Penilai Independen", "Garansi", "L/C"],
    vocabulary: &[
        VocabularyTable {
            column: Column::InstrumentType,
            entries: &[
                ("Kredit atau Pembiayaan untuk", "Kredit atau Pembiayaan untuk Pembayaran Bersama (Sindikasi)"),
                ("Kartu Kredit atau Kartu Pembiayaan", "Kartu Kredit atau Kartu Pembiayaan Syariah"),
                ("Kredit atau Pembiayaan kepada Pihak", "Kredit atau Pembiayaan kepada Pihak Ketiga Melalui Lembaga Lain Secara Channeling"),
                ("Kredit atau Pembiayaan kepada Non-UMKM", "Kredit atau Pembiayaan kepada Non-UMKM melalui Lembaga Lain Secara Executing"),
                ("Kredit atau Pembiayaan kepada UMKM", "Kredit atau Pembiayaan kepada UMKM Melalui Lembaga Lain Secara Executing"),
                ("Kredit/ Pembiayaan Kepada Non-UMKM", "Kredit atau Pembiayaan kepada Non-UMKM melalui Lembaga Lain Secara Executing"),
                ("Kredit/Pembiayaan Dalam Rangka", "Kredit atau Pembiayaan Dalam Rangka Pembiayaan Bersama (Sindikasi)"),
            ],
        },
        VocabularyTable {
            column: Column::DebtorCategory,
            entries: &[(
                "Bukan Debitur Usaha Mikro, Kecil, dan",
                "Bukan Debitur Usaha Mikro, Kecil, dan Menengah",
            )],
        },
        VocabularyTable {
            column: Column::EconomicSector,
            entries: &[
                ("Industri Rokok dan Produk Tembakau", "Industri Rokok dan Produk Tembakau Lainnya"),
                ("Industri Penggilingan Beras dan Jagung", "Industri Penggilingan Beras dan Jagung dan Industri Tepung Beras dan Jagung"),
                ("Industri Penggilingan Padi dan", "Industri Penggilingan Padi dan Penyosohan Beras"),
                ("Perdagangan Besar Mesin-mesin, Suku", "Perdagangan Besar Mesin-mesin, Suku Cadang dan Perlengkapannya"),
                ("Perdagangan Eceran Mesin-mesin", "Perdagangan Eceran Mesin-mesin (Kecuali Mobil dan Sepeda Motor) dan Suku Cadang, termasuk Alat-alat Tranportasi"),
                ("Perdagangan Besar Mesin, Peralatan", "Perdagangan Besar Mesin, Peralatan dan Perlengkapannya"),
                ("Perdagangan Impor Suku Cadang", "Perdagangan Impor Suku Cadang Mesin-mesin, Suku Cadang dan Perlengkapan Lain"),
                ("Rumah Tangga Untuk Pemilikan Mobil", "Rumah Tangga Untuk Pemilikian Mobil Roda Empat"),
            ],
        },
        VocabularyTable {
            column: Column::GovernmentProgram,
            entries: &[(
                "Kredit yang bukan merupakan kredit/",
                "Kredit yang bukan merupakan kredit/pembiayaan dalam rangka program pemerintah",
            )],
        },
    ],
};

pub static LETTER_OF_CREDIT: FieldSchema = FieldSchema {
    category: Category::LetterOfCredit,
    group_name: GROUP_NAME,
    debtor_name: DEBTOR_NAME,
    bank_line: bank_line(Some("Pelapor Cabang")),
    inline_pairs: &[account("No L/C")],
    fields: &[
        pair("Jenis L/C", Column::InstrumentType, "Tujuan L/C", Column::Purpose),
        pair("Plafon", Column::Ceiling, "Setoran Jaminan", Column::CollateralDeposit),
        pair("Tanggal Keluar", Column::StartDate, "Tanggal Jatuh Tempo", Column::MaturityDate),
        pair("No Akad Awal", Column::InitialAgreementNo, "Valuta", Column::Currency),
        pair("Tanggal Akad Awal", Column::InitialAgreementDate, "Tanggal Wanprestasi", Column::DefaultDate),
        pair("No Akad Akhir", Column::FinalAgreementNo, "Kondisi", Column::Condition),
        pair("Tanggal Akad Akhir", Column::FinalAgreementDate, "Tanggal Kondisi", Column::ConditionDate),
        single("Bank Beneficiary", Column::Beneficiary),
    ],
    close: close("Bank Beneficiary"),
    primary: Column::InstrumentType,
    excluded_remarks: &[],
    vocabulary: &[VocabularyTable {
        column: Column::InstrumentType,
        entries: &[(
            "Sight L/C dalam Negeri atau Surat",
            "Sight L/C dalam Negeri atau Surat Kredit Berdokumen Dalam Negeri (SKBDN)",
        )],
    }],
};

pub static GUARANTEE: FieldSchema = FieldSchema {
    category: Category::Guarantee,
    group_name: GROUP_NAME,
    debtor_name: DEBTOR_NAME,
    bank_line: bank_line(None),
    inline_pairs: &[account("No Rekening")],
    fields: &[
        pair("Jenis Garansi", Column::InstrumentType, "Tujuan Garansi", Column::Purpose),
        pair("Plafon", Column::Ceiling, "Setoran Jaminan", Column::CollateralDeposit),
        pair("Tanggal Diterbitkan", Column::StartDate, "Tanggal Jatuh Tempo", Column::MaturityDate),
        pair("No Akad Awal", Column::InitialAgreementNo, "Valuta", Column::Currency),
        pair("Tanggal Akad Awal", Column::InitialAgreementDate, "Tanggal Wanprestasi", Column::DefaultDate),
        pair("No Akad Akhir", Column::FinalAgreementNo, "Kondisi", Column::Condition),
        pair("Tanggal Akad Akhir", Column::FinalAgreementDate, "Tanggal Kondisi", Column::ConditionDate),
        single("Nama yang Dijamin", Column::Guaranteed),
    ],
    close: close("Nama yang Dijamin"),
    primary: Column::InstrumentType,
    excluded_remarks: &[],
    vocabulary: &[VocabularyTable {
        column: Column::Purpose,
        entries: &[(
            "Jaminan Pelaksanaan Pekerjaan",
            "Jaminan Pelaksanaan Pekerjaan (Performance Bond)",
        )],
    }],
};

pub static SECURITIES: FieldSchema = FieldSchema {
    category: Category::Securities,
    group_name: GROUP_NAME,
    debtor_name: DEBTOR_NAME,
    bank_line: bank_line(None),
    inline_pairs: &[
        account("No Surat Berharga"),
        InlinePair {
            first: "Suku Bunga/Imbalan",
            first_column: Column::InterestRate,
            second: "Sebab Macet",
            second_column: Column::DefaultCause,
            first_token_only: true,
        },
    ],
    fields: &[
        pair("Jenis Surat Berharga", Column::InstrumentType, "Nilai Pasar", Column::MarketValue),
        pair("Tujuan Kepemilikan", Column::Purpose, "Nilai Perolehan", Column::AcquisitionValue),
        pair("Tanggal Terbit", Column::StartDate, "Tanggal Jatuh Tempo", Column::MaturityDate),
        pair("Tanggal Macet", Column::DefaultDate, "Kondisi", Column::Condition),
        pair("Valuta", Column::Currency, "Tanggal Kondisi", Column::ConditionDate),
        single("Peringkat Surat Berharga", Column::Rating),
    ],
    close: close("Peringkat Surat Berharga"),
    primary: Column::InstrumentType,
    excluded_remarks: &[],
    vocabulary: &[VocabularyTable {
        column: Column::InstrumentType,
        entries: &[(
            "Medium Term Notes (MTN) yang",
            "Medium Term Notes (MTN) yang Diterbitkan oleh Korporasi",
        )],
    }],
};

pub static OTHER_FACILITY: FieldSchema = FieldSchema {
    category: Category::OtherFacility,
    group_name: GROUP_NAME,
    debtor_name: DEBTOR_NAME,
    bank_line: bank_line(None),
    inline_pairs: &[account("No Rekening")],
    fields: &[
        pair("Jenis Fasilitas", Column::InstrumentType, "Tunggakan", Column::Arrears),
        pair("Tanggal Mulai", Column::StartDate, "Tanggal Macet", Column::DefaultDate),
        pair("Tanggal Jatuh Tempo", Column::MaturityDate, "Sebab Macet", Column::DefaultCause),
        pair("Suku Bunga/Imbalan", Column::InterestRate, "Kondisi", Column::Condition),
        pair("Valuta", Column::Currency, "Tanggal Kondisi", Column::ConditionDate),
        single("Nilai dalam Mata Uang Asal", Column::OriginalCurrencyValue),
    ],
    close: close("Nilai dalam Mata Uang Asal"),
    primary: Column::InstrumentType,
    excluded_remarks: &[],
    vocabulary: &[VocabularyTable {
        column: Column::InstrumentType,
        entries: &[(
            "Tagihan Akseptasi atau",
            "Tagihan Akseptasi atau Tagihan Akseptasi Syariah",
        )],
    }],
};

/// Layout for a category.
pub fn schema_for(category: Category) -> &'static FieldSchema {
    match category {
        Category::Credit => &CREDIT,
        Category::LetterOfCredit => &LETTER_OF_CREDIT,
        Category::Guarantee => &GUARANTEE,
        Category::Securities => &SECURITIES,
        Category::OtherFacility => &OTHER_FACILITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_for_matches_category() {
        for category in Category::ALL {
            assert_eq!(schema_for(category).category, category);
        }
    }

    #[test]
    fn test_primary_field_is_captured_by_every_layout() {
        for category in Category::ALL {
            let schema = schema_for(category);
            assert!(
                schema.fields.iter().any(|f| f.column == schema.primary),
                "{category} never captures its primary field"
            );
        }
    }

    #[test]
    fn test_close_predecessor_is_a_label_of_the_layout() {
        for category in Category::ALL {
            let schema = schema_for(category);
            let pred = schema.close.predecessor;
            let known = schema.fields.iter().any(|f| {
                f.start == pred || f.end.map(|e| e.label == pred).unwrap_or(false)
            }) || schema.inline_pairs.iter().any(|p| p.second == pred);
            assert!(known, "{category}: predecessor '{pred}' not in layout");
        }
    }

    #[test]
    fn test_branch_guard_only_for_credit_and_lc() {
        assert!(CREDIT.bank_line.branch_guard.is_some());
        assert!(LETTER_OF_CREDIT.bank_line.branch_guard.is_some());
        assert!(GUARANTEE.bank_line.branch_guard.is_none());
        assert!(SECURITIES.bank_line.branch_guard.is_none());
        assert!(OTHER_FACILITY.bank_line.branch_guard.is_none());
    }

    #[test]
    fn test_credit_excludes_cross_reference_remarks() {
        assert!(CREDIT.is_excluded_remark("lihat garansi no 12"));
        assert!(CREDIT.is_excluded_remark("TGL PENILAIAN PENILAI INDEPENDEN 01/02/2020"));
        assert!(!CREDIT.is_excluded_remark("Lancar"));
        assert!(!GUARANTEE.is_excluded_remark("Garansi"));
    }

    #[test]
    fn test_credit_columns_include_split_targets() {
        let cols = CREDIT.columns();
        assert!(cols.contains(&Column::ProjectValue));
        assert!(cols.contains(&Column::InterestRateType));
        assert!(!cols.contains(&Column::Beneficiary));
    }
}
