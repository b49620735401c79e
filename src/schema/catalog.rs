//! # Object Catalog
//!
//! Every database file stores its own directory as an ordinary table
//! rooted at page 1, with the fixed five-column layout
//! `(type, name, tbl_name, rootpage, sql)`. Walking that tree yields one
//! record per persisted object; rows whose type is neither `"table"` nor
//! `"index"` (views, triggers) are ignored.
//!
//! An `Object` is a handle bound to the database it came from: it knows
//! its root page and drives record iteration over the object's tree.

use crate::btree::Cell;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::record::Record;
use crate::storage::ByteSource;

/// Page holding the root of the schema table.
pub const SCHEMA_ROOT_PAGE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Table,
    Index,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Table => "table",
            ObjectKind::Index => "index",
        }
    }
}

/// A table or index recorded in the schema, bound to its database.
pub struct Object<'d, S: ByteSource> {
    db: &'d Database<S>,
    name: String,
    kind: ObjectKind,
    table_name: String,
    root_page: u32,
    sql: String,
}

impl<'d, S: ByteSource> std::fmt::Debug for Object<'d, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Object")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("table_name", &self.table_name)
            .field("root_page", &self.root_page)
            .field("sql", &self.sql)
            .finish()
    }
}

impl<'d, S: ByteSource> Object<'d, S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// For an index, the name of the table it covers; for a table, the
    /// table's own name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn root_page(&self) -> u32 {
        self.root_page
    }

    /// The object's stored SQL text, as written by the creating statement.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Column metadata scanned from the stored SQL.
    pub fn columns(&self) -> Vec<super::Column> {
        super::parse_columns(&self.sql)
    }

    /// Table options (`WITHOUT ROWID`, `STRICT`) scanned from the stored
    /// SQL.
    pub fn options(&self) -> super::TableOptions {
        super::table_options(&self.sql)
    }

    /// Iterates the object's records in tree order: rows of a table or
    /// entries of an index.
    pub fn for_each<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(Record<'_>) -> Result<()>,
    {
        let encoding = self.db.encoding();
        self.db.tree(self.root_page).walk(|cell| {
            let payload = match cell.payload() {
                Some(payload) => payload,
                None => return Ok(()),
            };
            let record = Record::parse(encoding, payload, cell.rowid())?;
            visit(record)
        })
    }
}

/// Walks the schema tree and returns all tables and indexes in physical
/// order.
pub(crate) fn read_schema<S: ByteSource>(db: &Database<S>) -> Result<Vec<Object<'_, S>>> {
    tracing::debug!("reading schema from page 1");

    let encoding = db.encoding();
    let mut objects = Vec::new();

    db.tree(SCHEMA_ROOT_PAGE).walk(|cell: &Cell<'_>| {
        let payload = match cell.payload() {
            Some(payload) => payload,
            None => return Ok(()),
        };
        let record = Record::parse(encoding, payload, cell.rowid())?;

        let kind = match &*record.as_text(0)? {
            "table" => ObjectKind::Table,
            "index" => ObjectKind::Index,
            _ => return Ok(()),
        };

        let root_page = record.as_int(3)?;
        let root_page = u32::try_from(root_page)
            .map_err(|_| Error::corruption(format!("bad root page {}", root_page)))?;

        objects.push(Object {
            db,
            name: record.as_text(1)?.into_owned(),
            kind,
            table_name: record.as_text(2)?.into_owned(),
            root_page,
            sql: record.as_text(4)?.into_owned(),
        });
        Ok(())
    })?;

    tracing::debug!(objects = objects.len(), "schema read");
    Ok(objects)
}
