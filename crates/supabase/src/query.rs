use std::fmt::Display;

/// What a request wants back: a JSON array of rows or exactly one row object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    Rows,
    SingleObject,
}

impl Accept {
    pub fn text(&self) -> &'static str {
        match self {
            Self::Rows => "application/json",
            Self::SingleObject => "application/vnd.pgrst.object+json",
        }
    }
}

pub fn table_path(table: &str) -> String {
    format!("/rest/v1/{table}")
}

/// A `GET` of whole rows (`select=*`) against a PostgREST table, built as a
/// `from(table).eq(..).order(..).single()` chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    table: String,
    filters: Vec<(String, String)>,
    order: Option<(String, bool)>,
    single: bool,
}

impl Select {
    pub fn from<S: Into<String>>(table: S) -> Self {
        Self {
            table: table.into(),
            filters: vec![],
            order: None,
            single: false,
        }
    }

    pub fn eq<V: Display>(mut self, column: &str, value: V) -> Self {
        self.filters.push((column.to_owned(), format!("eq.{value}")));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some((column.to_owned(), ascending));
        self
    }

    /// Ask for exactly one row; the gateway answers 406 otherwise.
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    pub fn path(&self) -> String {
        table_path(&self.table)
    }

    pub fn accept(&self) -> Accept {
        if self.single {
            Accept::SingleObject
        } else {
            Accept::Rows
        }
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_owned(), "*".to_owned())];
        pairs.extend(self.filters.iter().cloned());
        if let Some((column, ascending)) = &self.order {
            let direction = if *ascending { "asc" } else { "desc" };
            pairs.push(("order".to_owned(), format!("{column}.{direction}")));
        }
        pairs
    }
}
