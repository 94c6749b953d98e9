use crate::document::{FormDocument, Row};
use serde::{Deserialize, Serialize};

/// Statutory deduction rate applied on the contract form (37.5%)
pub const CONTRACT_MANDATORY_RATE: f64 = 0.375;

/// Statutory deduction rate applied on the payroll form (2.75%)
pub const PAYROLL_MANDATORY_RATE: f64 = 0.0275;

/// Computed preview totals
///
/// Derived values only; nothing here is stored. The totals are recomputed
/// from scratch on every qualifying input event.
#[derive(Clone, Copy, Serialize, Deserialize, Debug)]
pub struct PreviewTotals {
    /// Salary as entered
    pub gross: f64,

    /// Mandatory contribution plus all active row contributions
    pub total_deductions: f64,

    /// Gross minus deductions, floored at zero
    pub net: f64,
}

/// Salary preview calculator for one form page
///
/// Each page wires its own field ids, display ids and mandatory rate; the
/// arithmetic is shared. Deduction rows contribute either a percentage of the
/// salary or a verbatim fixed amount, never both, and soft-deleted rows are
/// skipped entirely.
pub struct SalaryPreview {
    salary_field: String,
    mandatory_rate: f64,
    gross_display: String,
    deductions_display: String,
    net_display: String,
}

impl SalaryPreview {
    pub fn create(
        salary_field: &str,
        mandatory_rate: f64,
        gross_display: &str,
        deductions_display: &str,
        net_display: &str,
    ) -> Self {
        SalaryPreview {
            salary_field: salary_field.to_string(),
            mandatory_rate,
            gross_display: gross_display.to_string(),
            deductions_display: deductions_display.to_string(),
            net_display: net_display.to_string(),
        }
    }

    /// Preview wiring for the contract form
    pub fn contract() -> Self {
        Self::create(
            "id_salary",
            CONTRACT_MANDATORY_RATE,
            "gross-salary",
            "total-deductions",
            "net-salary",
        )
    }

    /// Preview wiring for the payroll form
    pub fn payroll() -> Self {
        Self::create(
            "id_gross_salary",
            PAYROLL_MANDATORY_RATE,
            "gross-preview",
            "deductions-preview",
            "net-preview",
        )
    }

    /// Recompute the preview totals from the document
    ///
    /// Reads the salary field and every non-soft-deleted deduction row. The
    /// mandatory contribution applies only to a positive salary; each row
    /// adds salary × percentage / 100 when its percentage is set, otherwise
    /// its fixed amount when that is set.
    ///
    /// # Arguments
    /// * `doc` - The form document to read
    ///
    /// # Returns
    /// * `Option<PreviewTotals>` - The totals, or None when the page has no
    ///   salary field and the preview stays untouched
    pub fn compute(&self, doc: &FormDocument) -> Option<PreviewTotals> {
        let salary = parse_number(&doc.field_by_id(&self.salary_field)?.value);

        let mut total_deductions = 0.0;
        if salary > 0.0 {
            total_deductions += salary * self.mandatory_rate;
        }

        for row in doc.rows() {
            if row.is_deleted() {
                continue;
            }
            total_deductions += row_contribution(salary, row);
        }

        let net = (salary - total_deductions).max(0.0);

        Some(PreviewTotals {
            gross: salary,
            total_deductions,
            net,
        })
    }

    /// Recompute and write the formatted totals into the display elements
    ///
    /// Each write is guarded individually, so a page that renders only part
    /// of the preview panel still gets the elements it has.
    pub fn update(&self, doc: &mut FormDocument) -> Option<PreviewTotals> {
        let totals = self.compute(doc)?;

        if let Some(el) = doc.display_by_id_mut(&self.gross_display) {
            el.text = format_amount(totals.gross);
        }
        if let Some(el) = doc.display_by_id_mut(&self.deductions_display) {
            el.text = format_amount(totals.total_deductions);
        }
        if let Some(el) = doc.display_by_id_mut(&self.net_display) {
            el.text = format_amount(totals.net);
        }

        Some(totals)
    }
}

/// One row's share of the deductions. Percentage wins when both amounts
/// would parse positive.
fn row_contribution(salary: f64, row: &Row) -> f64 {
    let percentage = row
        .field_by_name_contains("custom_percentage")
        .map(|f| parse_number(&f.value))
        .unwrap_or(0.0);
    let fixed = row
        .field_by_name_contains("fixed_amount")
        .map(|f| parse_number(&f.value))
        .unwrap_or(0.0);

    if percentage > 0.0 {
        salary * (percentage / 100.0)
    } else if fixed > 0.0 {
        fixed
    } else {
        0.0
    }
}

/// Enforce the percentage/fixed mutual exclusion on a row
///
/// Called after an edit to either amount field: a non-empty percentage clears
/// the fixed amount and a non-empty fixed amount clears the percentage.
/// Rows missing either field are left alone.
pub fn toggle_percentage_fixed(row: &mut Row, edited_name: &str) {
    let percentage_name = match row.field_by_name_contains("custom_percentage") {
        Some(f) => f.name.clone(),
        None => return,
    };
    let fixed_name = match row.field_by_name_contains("fixed_amount") {
        Some(f) => f.name.clone(),
        None => return,
    };

    let edited_value = match row.fields.iter().find(|f| f.name == edited_name) {
        Some(f) => f.value.clone(),
        None => return,
    };
    if edited_value.is_empty() {
        return;
    }

    if edited_name == percentage_name {
        if let Some(fixed) = row.field_by_name_contains_mut("fixed_amount") {
            fixed.value.clear();
        }
    } else if edited_name == fixed_name {
        if let Some(percentage) = row.field_by_name_contains_mut("custom_percentage") {
            percentage.value.clear();
        }
    }
}

/// Parse a field value the way the page input parsing does: leading numeric
/// prefix, anything unparsable counting as zero.
pub fn parse_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    if let Ok(v) = s.parse::<f64>() {
        if v.is_nan() { 0.0 } else { v }
    } else {
        numeric_prefix(s).parse().unwrap_or(0.0)
    }
}

fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut seen_dot = false;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }

    &s[..end]
}

/// Format an amount for the preview panel: grouped thousands, two decimals
///
/// # Examples
/// ```
/// use payform::preview::format_amount;
///
/// assert_eq!(format_amount(37500.0), "37,500.00");
/// assert_eq!(format_amount(0.0), "0.00");
/// ```
pub fn format_amount(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}.{:02}", if negative { "-" } else { "" }, grouped, frac)
}
