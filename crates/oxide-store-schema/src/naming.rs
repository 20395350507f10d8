//! Table, index and identifier naming.
//!
//! Join tables are looked up by name whenever a collection is queried, so
//! [`table_name_for_join`] is the only place that name may be built.

/// Quotes an identifier with backticks, doubling any embedded backtick.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Returns the join table name linking `owner` to `item_class`.
///
/// ```
/// use oxide_store_schema::table_name_for_join;
///
/// assert_eq!(table_name_for_join("Thread", "Folder"), "Thread-Folder");
/// ```
#[must_use]
pub fn table_name_for_join(owner: &str, item_class: &str) -> String {
    format!("{owner}-{item_class}")
}

/// Returns the prefix used for index names on a join table.
///
/// Hyphens are not valid in bare SQL identifiers, so they become underscores.
#[must_use]
pub fn index_prefix_for_join_table(join_table: &str) -> String {
    join_table.replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("Thread"), "`Thread`");
        assert_eq!(quote_identifier("Thread-Folder"), "`Thread-Folder`");
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_join_table_name() {
        assert_eq!(table_name_for_join("Thread", "Label"), "Thread-Label");
        assert_eq!(
            table_name_for_join("Thread", "Label"),
            table_name_for_join("Thread", "Label")
        );
    }

    #[test]
    fn test_index_prefix_replaces_every_hyphen() {
        assert_eq!(index_prefix_for_join_table("Thread-Folder"), "Thread_Folder");
        assert_eq!(index_prefix_for_join_table("Mail-Thread-Folder"), "Mail_Thread_Folder");
        assert_eq!(index_prefix_for_join_table("ThreadFolder"), "ThreadFolder");
    }
}
