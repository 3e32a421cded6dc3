use slik_core::error::SlikError;
use slik_core::model::{Category, UNIFIED_COLUMNS};
use slik_core::schema::builtin::schema_for;
use slik_core::schema::Trigger;

pub fn list() -> Result<(), SlikError> {
    println!("Report sections converted:\n");
    for category in Category::ALL {
        let schema = schema_for(category);
        println!("  {:<16} {}", category.key(), category.label());
        println!(
            "                   {} labels, record closes after '{}'",
            schema.fields.len() + 2 * schema.inline_pairs.len(),
            schema.close.predecessor
        );
        println!();
    }
    Ok(())
}

pub fn explain(name: &str) -> Result<(), SlikError> {
    let category = Category::from_str_loose(name).ok_or_else(|| {
        SlikError::OptionsInvalid(format!(
            "unknown category '{name}' (try: {})",
            Category::ALL
                .iter()
                .map(|c| c.key())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })?;
    let schema = schema_for(category);

    println!("{} ({})\n", category.label(), category.key());

    println!("Names (carried to every record of a document):");
    for rule in [&schema.group_name, &schema.debtor_name] {
        let trigger = match rule.trigger {
            Trigger::Equals(label) => format!("a line reading exactly '{label}'"),
            Trigger::Contains(label) => format!("a line containing '{label}'"),
        };
        println!(
            "  {:<28} first {} word(s) of the line {} after {}",
            rule.column.header(),
            rule.words,
            rule.offset,
            trigger
        );
    }
    println!();

    let bank = &schema.bank_line;
    print!(
        "Bank line: text before '{}' is the bank, the next token is the balance",
        bank.currency
    );
    match bank.branch_guard {
        Some(guard) => println!(" (only after a line containing '{guard}')"),
        None => println!(),
    }
    println!();

    println!("Label pairs on one line:");
    for pair in schema.inline_pairs {
        println!(
            "  {} <{}> {} <{}>",
            pair.first,
            pair.first_column.header(),
            pair.second,
            pair.second_column.header()
        );
    }
    println!();

    println!("Labels:");
    let width = schema
        .fields
        .iter()
        .map(|f| f.start.len())
        .max()
        .unwrap_or(20);
    for field in schema.fields {
        match field.end {
            Some(end) => println!(
                "  {:<width$}  -> {:<40} then '{}' -> {}",
                field.start,
                field.column.header(),
                end.label,
                end.column.header(),
            ),
            None => println!("  {:<width$}  -> {}", field.start, field.column.header()),
        }
    }
    println!();

    println!(
        "A record closes on '{}' directly after a line containing '{}'.",
        schema.close.label, schema.close.predecessor
    );
    println!(
        "Records without '{}' are discarded.",
        schema.primary.header()
    );
    if !schema.excluded_remarks.is_empty() {
        println!(
            "Records whose remark mentions {} are dropped.",
            schema
                .excluded_remarks
                .iter()
                .map(|r| format!("'{r}'"))
                .collect::<Vec<_>>()
                .join(" or ")
        );
    }
    let corrections: usize = schema.vocabulary.iter().map(|t| t.entries.len()).sum();
    if corrections > 0 {
        println!("{corrections} truncated label(s) are restored to their full wording.");
    }

    Ok(())
}

pub fn columns() -> Result<(), SlikError> {
    for (i, column) in UNIFIED_COLUMNS.iter().enumerate() {
        println!("{:>3}  {}", i + 1, column.header());
    }
    Ok(())
}
