//! Helpers for building tables using the tabled crate.
use tabled::{
    builder::Builder,
    settings::{Alignment, Padding, Style, object::Columns},
};

struct TableCol {
    header: String,
    align: Alignment,
    fields: Vec<String>,
}

/// General table. They look like this:
/// Id  Section             Type      Addr  Offset  Size
/// --  -------             ----      ----  ------  ----
///  0                      NULL         0       0     0
///  1  .interp             PROGBITS   318     318    1c
pub struct TableBuilder {
    cols: Vec<TableCol>,
}

impl TableBuilder {
    pub fn new() -> TableBuilder {
        TableBuilder { cols: Vec::new() }
    }

    /// Left aligned column
    pub fn add_col_l(&mut self, header: &str) {
        debug_assert!(!self.has_col(header));
        let col = TableCol {
            header: header.to_string(),
            align: Alignment::left(),
            fields: Vec::new(),
        };
        self.cols.push(col);
    }

    /// Right aligned column
    pub fn add_col_r(&mut self, header: &str) {
        debug_assert!(!self.has_col(header));
        let col = TableCol {
            header: header.to_string(),
            align: Alignment::right(),
            fields: Vec::new(),
        };
        self.cols.push(col);
    }

    /// Typically add_field! is used instead.
    pub fn add_str_field(&mut self, header: &str, value: String) {
        let col = self.find_col(header);
        if value.is_empty() {
            // Completely empty fields screw up tabled formatting.
            col.fields.push(" ".to_string());
        } else {
            col.fields.push(value);
        }
    }

    pub fn println(&self) {
        println!("{}", self.table_str());
    }

    // We need to preserve add_col ordering so we can't use a HashMap
    // but O(n) should be fine for tables.
    fn has_col(&self, header: &str) -> bool {
        self.cols.iter().any(|c| c.header == header)
    }

    fn find_col(&mut self, header: &str) -> &mut TableCol {
        self.cols.iter_mut().find(|c| c.header == header).unwrap() // programmer error to not have a col
    }

    fn table_str(&self) -> String {
        let height = self.cols[0].fields.len();
        let mut builder = Builder::with_capacity(height + 2, self.cols.len());
        let names: Vec<String> = self.cols.iter().map(|c| c.header.to_string()).collect();
        let dashes: Vec<String> = names.iter().map(|s| "-".repeat(s.len())).collect();
        builder.push_record(&names);
        builder.push_record(&dashes);
        for i in 0..height {
            let row: Vec<String> = self.cols.iter().map(|c| c.fields[i].clone()).collect();
            builder.push_record(&row);
        }

        let mut table = builder.build();
        for (i, col) in self.cols.iter().enumerate() {
            table.modify(Columns::one(i), col.align);
        }
        table.modify(Columns::first(), Padding::new(0, 1, 0, 0));
        table.with(Style::empty());

        table.to_string()
    }
}

macro_rules! add_field {
    ($builder:ident, $header:literal, $value:expr) => {
        $builder.add_str_field($header, format!("{}", $value));
    };
    ($builder:ident, $header:literal, $format:literal, $value:expr) => {
        $builder.add_str_field($header, format!($format, $value));
    };
}
pub(crate) use add_field;

struct SimpleRow {
    name: String,
    value: String,
}

/// Table with just name and value columns, for struct-like output:
/// pid     4321
/// fname   prog
pub struct SimpleTableBuilder {
    rows: Vec<SimpleRow>,
}

impl SimpleTableBuilder {
    pub fn new() -> SimpleTableBuilder {
        SimpleTableBuilder { rows: Vec::new() }
    }

    /// Typically add_simple! is used instead.
    pub fn add_str_row(&mut self, name: &str, value: String) {
        let row = SimpleRow {
            name: name.to_string(),
            value,
        };
        self.rows.push(row);
    }

    pub fn println(&self) {
        println!("{}", self.table_str());
    }

    fn table_str(&self) -> String {
        let height = self.rows.len();
        let mut builder = Builder::with_capacity(height, 2);
        for row in self.rows.iter() {
            let row = vec![row.name.clone(), row.value.clone()];
            builder.push_record(&row);
        }

        let mut table = builder.build();
        table.modify(Columns::one(0), Alignment::left());
        table.modify(Columns::one(1), Alignment::left());
        table.modify(Columns::first(), Padding::new(0, 1, 0, 0));
        table.with(Style::empty());

        table.to_string()
    }
}

macro_rules! add_simple {
    ($builder:ident, $name:literal, $value:expr) => {
        $builder.add_str_row($name, format!("{}", $value));
    };
    ($builder:ident, $name:literal, $format:literal, $value:expr) => {
        $builder.add_str_row($name, format!($format, $value));
    };
}
pub(crate) use add_simple;
