/**
This module rewrites raw addresses (and the values of their fields) into the canonical
punctuation/whitespace form used for span lookup. The address and its fields must go through the
same hyphen and period rules, otherwise a field would not be found in its own address.
*/
use fancy_regex::Regex;
use once_cell::sync::Lazy;
use std::borrow::Cow;

/// A comma that is not followed by whitespace (this includes a comma ending the string).
static UNSPACED_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",(?!\s)").unwrap());
/// The two characters `\` and `n`, as found in exports that escaped their line breaks.
static ESCAPED_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\n").unwrap());
/// A hyphen that is not followed by whitespace.
static UNSPACED_HYPHEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-(?!\s)").unwrap());
static PERIOD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.").unwrap());

/// Normalizes a raw address. The rules are applied in this order:
///
/// 1. `,` not followed by whitespace becomes `, `
/// 2. the literal escape `\n` becomes `, `
/// 3. `-` not followed by whitespace becomes ` - `
/// 4. every `.` is removed
///
/// This function never fails. Applying it twice gives the same result as applying it once, as
/// long as the input never separates a `\` from an `n` with periods only (e.g. `\.n`).
///
/// # Example
/// ```rust
/// use addrner::normalize_address;
///
/// assert_eq!(normalize_address("21-23 High St.,London"), "21 - 23 High St, London");
/// ```
pub fn normalize_address(raw: &str) -> String {
    let commas = UNSPACED_COMMA.replace_all(raw, ", ");
    let newlines = ESCAPED_NEWLINE.replace_all(&commas, ", ");
    let hyphens = UNSPACED_HYPHEN.replace_all(&newlines, " - ");
    remove_periods(&hyphens).into_owned()
}

/// Normalizes the value of a single field. Only the hyphen and period rules of
/// [`normalize_address`] are applied, in the same order: field values are not expected to hold
/// commas or escaped line breaks.
pub fn normalize_field(value: &str) -> String {
    let hyphens = UNSPACED_HYPHEN.replace_all(value, " - ");
    remove_periods(&hyphens).into_owned()
}

fn remove_periods(text: &str) -> Cow<'_, str> {
    PERIOD.replace_all(text, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{self, Arbitrary, TestResult};
    use rstest::rstest;

    #[rstest]
    #[case("123 Main St, Apt 4", "123 Main St, Apt 4")]
    #[case("123 Main St,Apt 4", "123 Main St, Apt 4")]
    #[case("a,,b", "a, , b")]
    #[case("Austin, TX,", "Austin, TX, ")]
    #[case("a,\tb", "a,\tb")]
    fn test_comma_spacing(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_address(raw), expected)
    }

    #[rstest]
    #[case(r"1 Main St\nAustin", "1 Main St, Austin")]
    #[case(r"1 Main St,\nAustin", "1 Main St, , Austin")]
    #[case("1 Main St\nAustin", "1 Main St\nAustin")]
    fn test_escaped_newline(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_address(raw), expected)
    }

    #[rstest]
    #[case("21-23 High St", "21 - 23 High St")]
    #[case("21 - 23 High St", "21 - 23 High St")]
    #[case("21- 23 High St", "21- 23 High St")]
    #[case("-21 High St", " - 21 High St")]
    #[case("High St-", "High St - ")]
    fn test_hyphen_spacing(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_address(raw), expected)
    }

    #[test]
    fn test_periods_are_removed() {
        assert_eq!(normalize_address("St. Louis, MO."), "St Louis, MO");
        assert_eq!(normalize_address("P.O. Box 12"), "PO Box 12");
    }

    #[test]
    fn test_period_between_escape_and_n_is_not_idempotent() {
        let once = normalize_address(r"a\.n");
        assert_eq!(once, r"a\n");
        assert_eq!(normalize_address(&once), "a, ");
    }

    #[test]
    fn test_nothing_to_normalize() {
        assert_eq!(normalize_address(""), "");
        assert_eq!(
            normalize_address("John Doe, 123 Main St, Austin, TX 73301"),
            "John Doe, 123 Main St, Austin, TX 73301"
        );
    }

    #[rstest]
    #[case("St. Louis", "St Louis")]
    #[case("Stratford-upon-Avon", "Stratford - upon - Avon")]
    #[case("A.-B", "A - B")]
    #[case("A-. 3", "A -  3")]
    #[case("a,b", "a,b")]
    fn test_normalize_field(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(normalize_field(value), expected)
    }

    #[test]
    fn test_field_matches_address_normalization() {
        let raw = "Flat 2, 10-12 Mt. Pleasant Rd";
        let normalized = normalize_address(raw);
        assert!(normalized.contains(&normalize_field("10-12 Mt. Pleasant Rd")));
    }

    #[rstest]
    #[case("Bldg A-. 3, Reno", "A-. 3")]
    #[case("Unit 4-.B, Reno", "4-.B")]
    #[case("Flat 1, 21-23 St. Louis Rd.", "21-23 St. Louis Rd.")]
    fn test_field_is_found_verbatim_in_its_address(#[case] raw: &str, #[case] value: &str) {
        assert!(normalize_address(raw).contains(&normalize_field(value)));
    }

    /// Building blocks of an address. The escaped newline is kept whole so that removing a period
    /// cannot glue a `\` to an `n`.
    #[derive(Debug, Clone)]
    struct AddressPiece(&'static str);

    impl Arbitrary for AddressPiece {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let choices = [
                "Main", "St", "12", "Apt", "-", ",", ".", " ", "\t", ", ", " - ", r"\n", "é", "O'",
            ];
            AddressPiece(*g.choose(&choices).unwrap())
        }
    }

    #[test]
    fn test_propertie_normalize_address_idempotent() {
        fn propertie_normalize_address_idempotent(pieces: Vec<AddressPiece>) -> TestResult {
            let raw: String = pieces.iter().map(|p| p.0).collect();
            let once = normalize_address(&raw);
            let twice = normalize_address(&once);
            if once == twice {
                TestResult::passed()
            } else {
                TestResult::failed()
            }
        }
        let mut qc = quickcheck::QuickCheck::new().tests(2000);
        qc.quickcheck(propertie_normalize_address_idempotent as fn(Vec<AddressPiece>) -> TestResult)
    }

    #[test]
    fn test_propertie_normalize_field_idempotent() {
        fn propertie_normalize_field_idempotent(pieces: Vec<AddressPiece>) -> TestResult {
            let raw: String = pieces.iter().map(|p| p.0).collect();
            let once = normalize_field(&raw);
            TestResult::from_bool(normalize_field(&once) == once)
        }
        let mut qc = quickcheck::QuickCheck::new().tests(2000);
        qc.quickcheck(propertie_normalize_field_idempotent as fn(Vec<AddressPiece>) -> TestResult)
    }
}
