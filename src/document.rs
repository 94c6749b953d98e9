use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    Text,
    Number,
    Hidden,
    Checkbox,
    Select,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Field {
    pub control: Control,
    pub name: String,
    pub id: String,
    pub value: String,
    pub checked: bool,
    pub disabled: bool,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Label {
    pub for_id: String,
    pub text: String,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Row {
    pub fields: Vec<Field>,
    pub labels: Vec<Label>,
    pub delete_visible: bool,
    pub dimmed: bool,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct DisplayElement {
    pub id: String,
    pub text: String,
}

impl Field {
    pub fn create(control: Control, name: &str, id: &str) -> Self {
        Field {
            control,
            name: name.to_string(),
            id: id.to_string(),
            value: String::new(),
            checked: false,
            disabled: false,
        }
    }
}

impl Row {
    pub fn field_by_name_contains(&self, fragment: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name.contains(fragment))
    }

    pub fn field_by_name_contains_mut(&mut self, fragment: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name.contains(fragment))
    }

    pub fn field_by_name_suffix(&self, suffix: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name.ends_with(suffix))
    }

    pub fn field_by_name_suffix_mut(&mut self, suffix: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name.ends_with(suffix))
    }

    pub fn field_by_name_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// A row is soft-deleted once its hidden delete flag is checked. The row
    /// stays in the document so the form framework can process the deletion.
    pub fn is_deleted(&self) -> bool {
        self.field_by_name_suffix("-DELETE")
            .map(|f| f.checked)
            .unwrap_or(false)
    }
}

/// The slice of the page the enhancement behaviors read and write: standalone
/// fields, the repeated-row container, and the preview display elements.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct FormDocument {
    pub fields: Vec<Field>,
    pub container: Option<Vec<Row>>,
    pub displays: Vec<DisplayElement>,
}

impl FormDocument {
    pub fn create() -> Self {
        FormDocument {
            fields: Vec::new(),
            container: None,
            displays: Vec::new(),
        }
    }

    pub fn field_by_id(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn field_by_id_mut(&mut self, id: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.id == id)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_by_name_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn field_by_name_suffix(&self, suffix: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name.ends_with(suffix))
    }

    pub fn field_by_name_suffix_mut(&mut self, suffix: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name.ends_with(suffix))
    }

    pub fn display_by_id_mut(&mut self, id: &str) -> Option<&mut DisplayElement> {
        self.displays.iter_mut().find(|d| d.id == id)
    }

    pub fn rows(&self) -> &[Row] {
        self.container.as_deref().unwrap_or(&[])
    }

    pub fn rows_mut(&mut self) -> Option<&mut Vec<Row>> {
        self.container.as_mut()
    }

    /// Index of the row holding the named field, if any.
    pub fn row_of_field(&self, name: &str) -> Option<usize> {
        self.rows()
            .iter()
            .position(|row| row.fields.iter().any(|f| f.name == name))
    }

    /// Write a value to a field anywhere in the document. Checkbox fields
    /// treat a non-empty value as checked. Returns false when no field with
    /// that name exists.
    pub fn set_value(&mut self, name: &str, value: &str) -> bool {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            write_field(field, value);
            return true;
        }

        if let Some(rows) = self.container.as_mut() {
            if let Some(field) = rows.iter_mut().find_map(|r| r.field_by_name_mut(name)) {
                write_field(field, value);
                return true;
            }
        }

        false
    }

    /// The contract form page: salary field, one template deduction row under
    /// the `deduction_set` prefix, and the salary preview panel.
    pub fn contract_form() -> Self {
        let mut doc = FormDocument::create();

        doc.fields
            .push(Field::create(Control::Number, "salary", "id_salary"));
        doc.fields.push(management_field("deduction_set", "TOTAL_FORMS", "1"));
        doc.fields.push(management_field("deduction_set", "INITIAL_FORMS", "0"));

        doc.container = Some(vec![deduction_row("deduction_set", 0)]);

        doc.displays = vec![
            DisplayElement {
                id: "gross-salary".to_string(),
                text: String::new(),
            },
            DisplayElement {
                id: "total-deductions".to_string(),
                text: String::new(),
            },
            DisplayElement {
                id: "net-salary".to_string(),
                text: String::new(),
            },
        ];

        doc
    }

    /// The payroll form page: gross salary field, one template deduction row
    /// under the `form` prefix, and the preview panel with its own ids.
    pub fn payroll_form() -> Self {
        let mut doc = FormDocument::create();

        doc.fields
            .push(Field::create(Control::Number, "gross_salary", "id_gross_salary"));
        doc.fields.push(management_field("form", "TOTAL_FORMS", "1"));
        doc.fields.push(management_field("form", "INITIAL_FORMS", "0"));

        doc.container = Some(vec![deduction_row("form", 0)]);

        doc.displays = vec![
            DisplayElement {
                id: "gross-preview".to_string(),
                text: String::new(),
            },
            DisplayElement {
                id: "deductions-preview".to_string(),
                text: String::new(),
            },
            DisplayElement {
                id: "net-preview".to_string(),
                text: String::new(),
            },
        ];

        doc
    }
}

pub fn indexed_name(prefix: &str, index: u32, field: &str) -> String {
    format!("{}-{}-{}", prefix, index, field)
}

pub fn indexed_id(prefix: &str, index: u32, field: &str) -> String {
    format!("id_{}", indexed_name(prefix, index, field))
}

fn write_field(field: &mut Field, value: &str) {
    if field.control == Control::Checkbox {
        field.checked = !value.is_empty();
    } else {
        field.value = value.to_string();
    }
}

fn management_field(prefix: &str, name: &str, value: &str) -> Field {
    let full = format!("{}-{}", prefix, name);
    let mut field = Field::create(Control::Hidden, &full, &format!("id_{}", full));
    field.value = value.to_string();
    field
}

/// One deduction row as the form framework renders it: the deduction select,
/// the two mutually exclusive amount fields, the active flag and the hidden
/// delete flag, each with a label targeting the field id.
pub fn deduction_row(prefix: &str, index: u32) -> Row {
    let mut fields = Vec::new();
    let mut labels = Vec::new();

    let push = |control: Control, field: &str, label: &str, fields: &mut Vec<Field>, labels: &mut Vec<Label>| {
        let name = indexed_name(prefix, index, field);
        let id = indexed_id(prefix, index, field);
        fields.push(Field::create(control, &name, &id));
        labels.push(Label {
            for_id: id,
            text: label.to_string(),
        });
    };

    push(Control::Select, "deduction", "Deduction", &mut fields, &mut labels);
    push(
        Control::Number,
        "custom_percentage",
        "Custom Percentage (%)",
        &mut fields,
        &mut labels,
    );
    push(
        Control::Number,
        "fixed_amount",
        "Fixed Amount (KSh)",
        &mut fields,
        &mut labels,
    );
    push(Control::Checkbox, "is_active", "Is Active", &mut fields, &mut labels);
    push(Control::Checkbox, "DELETE", "Delete", &mut fields, &mut labels);

    // The active flag defaults on, as rendered
    if let Some(active) = fields.iter_mut().find(|f| f.name.ends_with("-is_active")) {
        active.checked = true;
    }

    Row {
        fields,
        labels,
        delete_visible: false,
        dimmed: false,
    }
}
