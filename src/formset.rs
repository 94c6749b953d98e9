use crate::document::{FormDocument, Row};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMBEDDED_INDEX_REGEX: Regex = Regex::new(r"-(\d+)-").unwrap();
}

/// Manager for one formset: the repeated deduction rows of a form page
///
/// A formset is a group of rows whose fields follow the
/// `prefix-<N>-fieldname` naming convention, with ids of the form
/// `id_prefix-<N>-fieldname` and a sibling hidden counter named
/// `prefix-TOTAL_FORMS`. The manager clones rows, keeps the embedded indices
/// contiguous and maintains the counter; it never hard-removes a row.
pub struct FormsetManager {
    prefix: String,
    name_regex: Regex,
    id_regex: Regex,
}

impl FormsetManager {
    /// Create a manager for the given formset prefix (e.g. `deduction_set`)
    pub fn create(prefix: &str) -> Self {
        let escaped = regex::escape(prefix);
        FormsetManager {
            prefix: prefix.to_string(),
            name_regex: Regex::new(&format!(r"{}-\d+-", escaped)).unwrap(),
            id_regex: Regex::new(&format!(r"id_{}-\d+-", escaped)).unwrap(),
        }
    }

    /// The formset prefix this manager rewrites indices for
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Read the total-forms counter
    ///
    /// Looks for the counter by its exact name first and falls back to any
    /// field whose name ends in `-TOTAL_FORMS`, matching how the page locates
    /// it when several formsets share a template.
    ///
    /// # Arguments
    /// * `doc` - The form document to read
    ///
    /// # Returns
    /// * `Option<u32>` - The parsed counter value, or None when the counter
    ///   field is absent or holds a non-numeric value
    pub fn total_forms(&self, doc: &FormDocument) -> Option<u32> {
        self.counter_field(doc)?.value.trim().parse().ok()
    }

    /// Append a new row cloned from the first row in the container
    ///
    /// The clone has its input and select values cleared, its delete flag
    /// reset, every embedded field index rewritten to the current counter
    /// value (names, ids and label targets alike), and its delete control
    /// revealed. The counter is then incremented.
    ///
    /// Missing pieces degrade the feature instead of failing the page: an
    /// absent container, counter or template row is logged and the document
    /// is left untouched.
    ///
    /// # Arguments
    /// * `doc` - The form document to extend
    ///
    /// # Returns
    /// * `Option<usize>` - The index of the appended row, or None when the
    ///   container, counter or template row is missing
    pub fn add_row(&self, doc: &mut FormDocument) -> Option<usize> {
        if doc.container.is_none() {
            log::error!("deduction container not found");
            return None;
        }

        let counter_name = match self.counter_field(doc) {
            Some(f) => f.name.clone(),
            None => {
                log::error!("{}-TOTAL_FORMS input not found", self.prefix);
                return None;
            }
        };

        // Unparsable counters fall back to 1, so a template-only page still
        // numbers its first added row correctly
        let total: u32 = doc
            .field_by_name(&counter_name)
            .map(|f| f.value.trim().parse().unwrap_or(1))
            .unwrap_or(1);

        let template = match doc.rows().first() {
            Some(row) => row.clone(),
            None => {
                log::error!("no template row found in {} container", self.prefix);
                return None;
            }
        };

        let mut row = template;
        clear_cloned_row(&mut row);
        self.renumber(&mut row, total);
        row.delete_visible = true;

        let index = match doc.rows_mut() {
            Some(rows) => {
                rows.push(row);
                rows.len() - 1
            }
            None => return None,
        };

        if let Some(counter) = doc.field_by_name_mut(&counter_name) {
            counter.value = (total + 1).to_string();
        }

        log::info!("row added to {}, total forms now {}", self.prefix, total + 1);
        Some(index)
    }

    /// Soft-delete a row
    ///
    /// Marks the row's hidden `-DELETE` flag, dims the row and disables its
    /// fields. The row element itself is preserved so the server-side form
    /// handling can process the deletion on submit.
    ///
    /// # Arguments
    /// * `doc` - The form document holding the row
    /// * `index` - Position of the row in the container
    ///
    /// # Returns
    /// * `bool` - True when a delete flag was found and set
    pub fn remove_row(&self, doc: &mut FormDocument, index: usize) -> bool {
        let row = match doc.rows_mut().and_then(|rows| rows.get_mut(index)) {
            Some(row) => row,
            None => {
                log::warn!("row {} not found in {} container", index, self.prefix);
                return false;
            }
        };

        match row.field_by_name_suffix_mut("-DELETE") {
            Some(flag) => flag.checked = true,
            None => {
                log::warn!("row {} has no delete flag", index);
                return false;
            }
        }

        row.dimmed = true;
        for field in &mut row.fields {
            field.disabled = true;
        }
        true
    }

    fn counter_field<'a>(&self, doc: &'a FormDocument) -> Option<&'a crate::document::Field> {
        let exact = format!("{}-TOTAL_FORMS", self.prefix);
        doc.field_by_name(&exact)
            .or_else(|| doc.field_by_name_suffix("-TOTAL_FORMS"))
    }

    /// Rewrite every embedded index in the row to `new_index`
    fn renumber(&self, row: &mut Row, new_index: u32) {
        let name_repl = format!("{}-{}-", self.prefix, new_index);
        let id_repl = format!("id_{}-{}-", self.prefix, new_index);

        for field in &mut row.fields {
            field.name = self
                .name_regex
                .replace(&field.name, name_repl.as_str())
                .into_owned();
            field.id = self
                .id_regex
                .replace(&field.id, id_repl.as_str())
                .into_owned();
        }

        for label in &mut row.labels {
            label.for_id = self
                .id_regex
                .replace(&label.for_id, id_repl.as_str())
                .into_owned();
        }
    }
}

/// Extract the numeric index embedded in a field name
/// (`deduction_set-3-fixed_amount` yields 3)
pub fn embedded_index(name: &str) -> Option<u32> {
    EMBEDDED_INDEX_REGEX
        .captures(name)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// The index a row carries in its field names, taken from its first field
pub fn row_index(row: &Row) -> Option<u32> {
    row.fields.first().and_then(|f| embedded_index(&f.name))
}

// Cloning a rendered row keeps whatever its markup carried; the clone must
// come out as a fresh entry. Values are emptied, the delete flag is reset and
// the dimmed/disabled state cleared. Checked state of other checkboxes (the
// active flag) survives the clone, as it does in the page.
fn clear_cloned_row(row: &mut Row) {
    for field in &mut row.fields {
        field.value.clear();
        field.disabled = false;
        if field.name.ends_with("-DELETE") {
            field.checked = false;
        }
    }
    row.dimmed = false;
}
