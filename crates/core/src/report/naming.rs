use chrono::NaiveDate;

/// File name used when no vessel name was found.
pub const FALLBACK_STEM: &str = "MERGED_ORDER_SUMMARY";

const FORBIDDEN_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Output file name for a merge: `{vessels}_{DD-MM-YYYY}.xlsx`.
///
/// Vessel names are joined with `_`, stripped of characters that are not
/// allowed in file names and trimmed. Without any usable vessel the stem is
/// [`FALLBACK_STEM`].
#[must_use]
pub fn output_file_name(vessel_names: &[String], date: NaiveDate) -> String {
    let joined = vessel_names.join("_");
    let stem: String = joined.chars().filter(|c| !FORBIDDEN_CHARS.contains(c)).collect();
    let stem = stem.trim();
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };
    format!("{stem}_{}.xlsx", date.format("%d-%m-%Y"))
}
