use log::debug;

use crate::{
    error::{Error, Result},
    filter::ConnectionTypeFilter,
    resources::metadata::{DatabaseTable, DatabaseTablesConnection},
};

/// Number of tables requested per page by default.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Something that can return a page of database tables by offset.
pub trait DatabaseTablesSource {
    fn get_database_tables_page(
        &self,
        first: usize,
        offset: usize,
    ) -> Result<DatabaseTablesConnection>;
}

/// Iterates over the pages of database tables, yielding the tables kept by the
/// filter on each page.
///
/// The total count is read from the first page only and the number of pages is
/// fixed from it. The first error ends the iteration.
pub struct DatabaseTablesIter<'a, SourceT: ?Sized> {
    source: &'a SourceT,
    filter: &'a ConnectionTypeFilter,
    page_size: usize,
    page: usize,
    total_pages: Option<usize>,
    done: bool,
}

impl<'a, SourceT> DatabaseTablesIter<'a, SourceT>
where
    SourceT: DatabaseTablesSource + ?Sized,
{
    pub fn new(
        source: &'a SourceT,
        page_size: usize,
        filter: &'a ConnectionTypeFilter,
    ) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::InvalidPageSize);
        }
        Ok(Self {
            source,
            filter,
            page_size,
            page: 0,
            total_pages: None,
            done: false,
        })
    }
}

impl<SourceT> Iterator for DatabaseTablesIter<'_, SourceT>
where
    SourceT: DatabaseTablesSource + ?Sized,
{
    type Item = Result<Vec<DatabaseTable>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let offset = self.page_size * self.page;
        let page = match self.source.get_database_tables_page(self.page_size, offset) {
            Ok(page) => page,
            Err(error) => {
                self.done = true;
                return Some(Err(error));
            }
        };

        let page_size = self.page_size;
        let total_pages = *self
            .total_pages
            .get_or_insert_with(|| page.total_count.div_ceil(page_size));
        let num_nodes = page.nodes.len();
        let tables = self.filter.apply(page.nodes);

        self.page += 1;
        self.done = self.page >= total_pages;

        debug!(
            "Fetched page {} of {} (offset {}), keeping {} of {} tables",
            self.page,
            total_pages.max(1),
            offset,
            tables.len(),
            num_nodes
        );
        Some(Ok(tables))
    }
}

/// Fetch every page and collect the tables kept by the filter, in page order.
pub fn fetch_all<SourceT>(
    source: &SourceT,
    page_size: usize,
    filter: &ConnectionTypeFilter,
) -> Result<Vec<DatabaseTable>>
where
    SourceT: DatabaseTablesSource + ?Sized,
{
    let mut tables = Vec::new();
    for page in DatabaseTablesIter::new(source, page_size, filter)? {
        tables.extend(page?);
    }
    Ok(tables)
}
