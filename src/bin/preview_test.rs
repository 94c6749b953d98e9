use payform::document::FormDocument;
use payform::formset::FormsetManager;
use payform::preview::{
    SalaryPreview, format_amount, parse_number, toggle_percentage_fixed,
};

// Helper for float comparison
fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
    println!("✓ {} = {}", what, expected);
}

fn test_contract_mandatory_rate() {
    println!("\n====== Testing the contract form mandatory rate ======");
    let mut doc = FormDocument::contract_form();
    doc.set_value("salary", "50000");

    let totals = SalaryPreview::contract().compute(&doc).unwrap();
    assert_close(totals.gross, 50000.0, "gross");
    assert_close(totals.total_deductions, 18750.0, "mandatory 37.5%");
    assert_close(totals.net, 31250.0, "net");
}

fn test_payroll_mandatory_rate() {
    println!("\n====== Testing the payroll form mandatory rate ======");
    let mut doc = FormDocument::payroll_form();
    doc.set_value("gross_salary", "50000");

    let totals = SalaryPreview::payroll().compute(&doc).unwrap();
    assert_close(totals.total_deductions, 1375.0, "mandatory 2.75%");
    assert_close(totals.net, 48625.0, "net");
}

fn test_percentage_row() {
    println!("\n====== Testing a percentage deduction row ======");
    let mut doc = FormDocument::contract_form();
    doc.set_value("salary", "40000");
    doc.set_value("deduction_set-0-custom_percentage", "10");

    let totals = SalaryPreview::contract().compute(&doc).unwrap();
    // 40000 * 0.375 + 40000 * 0.10
    assert_close(totals.total_deductions, 19000.0, "deductions with 10% row");
    assert_close(totals.net, 21000.0, "net");
}

fn test_fixed_row() {
    println!("\n====== Testing a fixed-amount deduction row ======");
    let mut doc = FormDocument::contract_form();
    doc.set_value("salary", "40000");
    doc.set_value("deduction_set-0-fixed_amount", "2500");

    let totals = SalaryPreview::contract().compute(&doc).unwrap();
    assert_close(totals.total_deductions, 17500.0, "deductions with fixed row");
}

fn test_percentage_precedence() {
    println!("\n====== Testing percentage precedence over fixed ======");
    let mut doc = FormDocument::contract_form();
    doc.set_value("salary", "40000");
    // Bypass the exclusion toggle by writing both values directly
    doc.set_value("deduction_set-0-custom_percentage", "10");
    doc.set_value("deduction_set-0-fixed_amount", "9999");

    let totals = SalaryPreview::contract().compute(&doc).unwrap();
    assert_close(totals.total_deductions, 19000.0, "percentage wins");
}

fn test_deleted_rows_excluded() {
    println!("\n====== Testing soft-deleted rows are excluded ======");
    let mut doc = FormDocument::contract_form();
    let manager = FormsetManager::create("deduction_set");
    doc.set_value("salary", "40000");
    manager.add_row(&mut doc);
    doc.set_value("deduction_set-1-fixed_amount", "5000");

    let preview = SalaryPreview::contract();
    let before = preview.compute(&doc).unwrap();
    assert_close(before.total_deductions, 20000.0, "deductions before delete");

    manager.remove_row(&mut doc, 1);
    let after = preview.compute(&doc).unwrap();
    assert_close(after.total_deductions, 15000.0, "deductions after delete");
    assert!(doc.rows()[1].is_deleted(), "row must remain, flagged");
}

fn test_net_clamped_at_zero() {
    println!("\n====== Testing the zero floor on net salary ======");
    let mut doc = FormDocument::contract_form();
    doc.set_value("salary", "1000");
    doc.set_value("deduction_set-0-fixed_amount", "5000");

    let totals = SalaryPreview::contract().compute(&doc).unwrap();
    assert_close(totals.net, 0.0, "net clamped");
    assert_close(totals.total_deductions, 5375.0, "deductions unclamped");
}

fn test_empty_salary() {
    println!("\n====== Testing an empty salary field ======");
    let mut doc = FormDocument::contract_form();
    doc.set_value("deduction_set-0-fixed_amount", "300");

    let totals = SalaryPreview::contract().compute(&doc).unwrap();
    assert_close(totals.gross, 0.0, "gross");
    // No mandatory contribution on a non-positive salary, fixed rows still count
    assert_close(totals.total_deductions, 300.0, "deductions");
    assert_close(totals.net, 0.0, "net");
}

fn test_missing_salary_field() {
    println!("\n====== Testing a page without the salary field ======");
    let mut doc = FormDocument::contract_form();
    doc.fields.retain(|f| f.id != "id_salary");

    assert!(SalaryPreview::contract().compute(&doc).is_none());
    println!("✓ Preview degrades silently without the salary field");
}

fn test_mutual_exclusion() {
    println!("\n====== Testing percentage/fixed mutual exclusion ======");
    let mut doc = FormDocument::contract_form();
    doc.set_value("deduction_set-0-fixed_amount", "1200");
    doc.set_value("deduction_set-0-custom_percentage", "5");

    let rows = doc.rows_mut().unwrap();
    toggle_percentage_fixed(&mut rows[0], "deduction_set-0-custom_percentage");

    let row = &doc.rows()[0];
    assert_eq!(
        row.field_by_name_contains("fixed_amount").unwrap().value,
        "",
        "percentage edit clears the fixed amount"
    );
    assert_eq!(
        row.field_by_name_contains("custom_percentage").unwrap().value,
        "5"
    );
    println!("✓ Setting percentage clears fixed");

    doc.set_value("deduction_set-0-fixed_amount", "1200");
    let rows = doc.rows_mut().unwrap();
    toggle_percentage_fixed(&mut rows[0], "deduction_set-0-fixed_amount");

    let row = &doc.rows()[0];
    assert_eq!(
        row.field_by_name_contains("custom_percentage").unwrap().value,
        "",
        "fixed edit clears the percentage"
    );
    println!("✓ Setting fixed clears percentage");
}

fn test_empty_edit_keeps_sibling() {
    println!("\n====== Testing that clearing a field keeps its sibling ======");
    let mut doc = FormDocument::contract_form();
    doc.set_value("deduction_set-0-fixed_amount", "1200");
    doc.set_value("deduction_set-0-custom_percentage", "");

    let rows = doc.rows_mut().unwrap();
    toggle_percentage_fixed(&mut rows[0], "deduction_set-0-custom_percentage");

    assert_eq!(
        doc.rows()[0].field_by_name_contains("fixed_amount").unwrap().value,
        "1200",
        "an emptied field must not clear the other"
    );
    println!("✓ Empty edits leave the sibling untouched");
}

fn test_update_writes_displays() {
    println!("\n====== Testing formatted display writes ======");
    let mut doc = FormDocument::contract_form();
    doc.set_value("salary", "50000");

    SalaryPreview::contract().update(&mut doc).unwrap();

    let text_of = |doc: &FormDocument, id: &str| {
        doc.displays
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.text.clone())
            .unwrap_or_default()
    };
    assert_eq!(text_of(&doc, "gross-salary"), "50,000.00");
    assert_eq!(text_of(&doc, "total-deductions"), "18,750.00");
    assert_eq!(text_of(&doc, "net-salary"), "31,250.00");
    println!("✓ Displays carry grouped, two-decimal amounts");
}

fn test_update_with_missing_displays() {
    println!("\n====== Testing display writes on a partial panel ======");
    let mut doc = FormDocument::contract_form();
    doc.set_value("salary", "50000");
    doc.displays.retain(|d| d.id == "net-salary");

    let totals = SalaryPreview::contract().update(&mut doc);
    assert!(totals.is_some(), "computation must still run");
    assert_eq!(doc.displays.len(), 1);
    assert_eq!(doc.displays[0].text, "31,250.00");
    println!("✓ Each display write is guarded on its own");
}

fn test_format_amount() {
    println!("\n====== Testing amount formatting ======");
    assert_eq!(format_amount(0.0), "0.00");
    assert_eq!(format_amount(100.0), "100.00");
    assert_eq!(format_amount(1234.5), "1,234.50");
    assert_eq!(format_amount(37500.0), "37,500.00");
    assert_eq!(format_amount(1000000.0), "1,000,000.00");
    assert_eq!(format_amount(1234567.891), "1,234,567.89");
    assert_eq!(format_amount(-250.75), "-250.75");
    println!("✓ Grouping and two decimals hold across magnitudes");
}

fn test_parse_number() {
    println!("\n====== Testing field value parsing ======");
    assert_eq!(parse_number("50000"), 50000.0);
    assert_eq!(parse_number(""), 0.0);
    assert_eq!(parse_number("12.5"), 12.5);
    assert_eq!(parse_number("abc"), 0.0);
    assert_eq!(parse_number(" 7 "), 7.0);
    assert_eq!(parse_number("12abc"), 12.0);
    assert_eq!(parse_number("-3.5"), -3.5);
    println!("✓ Parsing mirrors the page's number handling");
}

fn main() {
    test_contract_mandatory_rate();
    test_payroll_mandatory_rate();
    test_percentage_row();
    test_fixed_row();
    test_percentage_precedence();
    test_deleted_rows_excluded();
    test_net_clamped_at_zero();
    test_empty_salary();
    test_missing_salary_field();
    test_mutual_exclusion();
    test_empty_edit_keeps_sibling();
    test_update_writes_displays();
    test_update_with_missing_displays();
    test_format_amount();
    test_parse_number();

    println!("\nAll preview tests passed!");
}
