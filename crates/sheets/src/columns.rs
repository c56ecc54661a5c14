//! Spreadsheet column letters.

/// Converts a 0-based column index into its A1-notation letters.
///
/// The numbering is bijective base-26: `0 → A`, `25 → Z`, `26 → AA`,
/// `701 → ZZ`, `702 → AAA`.
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let remainder = (n - 1) % 26;
        letters.push(b'A' + remainder as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// `<sheet>!A:<last>`, the append target for a header of `width` columns.
pub fn append_range(sheet_name: &str, width: usize) -> String {
    format!("{sheet_name}!A:{}", column_letter(width.saturating_sub(1)))
}

/// `<sheet>!A<row>:<last><row>` for a 1-based sheet row.
pub fn row_range(sheet_name: &str, row: usize, width: usize) -> String {
    let last = column_letter(width.saturating_sub(1));
    format!("{sheet_name}!A{row}:{last}{row}")
}
