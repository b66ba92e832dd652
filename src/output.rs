//! Tabular rendering of resource objects for terminal display.
//!
//! [`Table`] flattens resources into rows keyed by attribute name, which
//! is handy for quick reports and demos. Nothing else in the crate
//! depends on it.

use std::fmt;

use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::jsonapi::ResourceObject;

/// Resource objects flattened into a grid of text cells.
///
/// Columns are `id`, `type`, then every attribute key in first-seen order
/// across all rows.
///
/// # Example
///
/// ```no_run
/// use futures::TryStreamExt;
/// use highbond::{HighbondClient, List, ListQuery, Project, Resource, Table};
///
/// # async fn example(client: &HighbondClient) -> highbond::Result<()> {
/// let projects: Vec<Project> = Project::list_all(client, &(), &ListQuery::new(), Some(1))
///     .try_collect()
///     .await?;
/// println!("{}", Table::from_resources(projects.iter().map(Resource::object)));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_resources<'a, I>(resources: I) -> Self
    where
        I: IntoIterator<Item = &'a ResourceObject>,
    {
        let resources: Vec<&ResourceObject> = resources.into_iter().collect();

        let mut columns = vec!["id".to_string(), "type".to_string()];
        for resource in &resources {
            for key in resource.attributes.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = resources
            .iter()
            .map(|resource| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(i, column)| match i {
                        0 => resource.id.clone(),
                        1 => resource.resource_type.clone(),
                        _ => resource.attribute(column).map(cell).unwrap_or_default(),
                    })
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Scalars as plain text, arrays and objects as compact JSON.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return writeln!(f, "No results found.");
        }

        let mut builder = Builder::default();
        builder.push_record(self.columns.clone());
        for row in &self.rows {
            builder.push_record(row.clone());
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        write!(f, "{table}")
    }
}
