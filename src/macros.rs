/// Builds a [`Row`](crate::Row) from a list of displayable values.
///
/// ```rust
/// use csv_dialect::row;
///
/// let row = row!["Ann", 31, true, 1.5];
/// assert_eq!(row, vec!["Ann", "31", "true", "1.5"]);
/// ```
#[macro_export]
macro_rules! row {
    () => {
        ::std::vec::Vec::<::std::string::String>::new()
    };

    ($($field:expr),+ $(,)?) => {
        ::std::vec![$(::std::string::ToString::to_string(&$field)),+]
    };
}
