//! Identifier matching and free-text search over the visit store.
//!
//! The front desk drives returning-visitor check-in through
//! [`returning_lookup`], and the directory screen through [`search`].
//! Both read the store; neither mutates it.

use chrono::NaiveDate;
use gatepass_core::validation::{digits_only, looks_like_mobile, validate_aadhaar, validate_pan, validate_passport};

use crate::record::VisitRecord;
use crate::store::{VisitFilter, VisitorStore};

/// Minimum digits a query must contain before phone-substring matching
/// kicks in; anything shorter matches half the directory.
const MIN_PHONE_QUERY_DIGITS: usize = 2;

/// Date formats accepted by day search, tried in order.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%m-%d-%Y"];

/// What kind of identifier a raw lookup string appears to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Aadhaar,
    Phone,
    Pan,
    Passport,
    Unknown,
}

/// Classifies a raw identifier string.
///
/// A 12-digit string is Aadhaar before it is anything else; a 10-digit
/// string starting 6-9 is an Indian mobile number; then PAN and
/// passport shapes.
#[must_use]
pub fn classify_identifier(raw: &str) -> IdentifierKind {
    let trimmed = raw.trim();
    if validate_aadhaar(trimmed) {
        IdentifierKind::Aadhaar
    } else if looks_like_mobile(trimmed) {
        IdentifierKind::Phone
    } else if validate_pan(trimmed) {
        IdentifierKind::Pan
    } else if validate_passport(trimmed) {
        IdentifierKind::Passport
    } else {
        IdentifierKind::Unknown
    }
}

/// Outcome of a returning-visitor lookup at the check-in desk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReturningLookup<'a> {
    /// The most recent matching visit is still open; a new check-in
    /// must be refused.
    AlreadyCheckedIn(&'a VisitRecord),
    /// A past visit matched; its details can prefill the form.
    Returning(&'a VisitRecord),
    NoMatch,
}

/// Finds the visit record matching an identifier exactly, preferring the
/// most recent check-in. Matches phone (digit-normalized), Aadhaar, PAN
/// and passport; ties on check-in time go to the last record created.
#[must_use]
pub fn find_by_identifier<'a>(store: &'a VisitorStore, identifier: &str) -> Option<&'a VisitRecord> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() {
        return None;
    }
    let digits = digits_only(trimmed);
    let upper = trimmed.to_uppercase();

    let mut best: Option<&VisitRecord> = None;
    for record in store.records() {
        let hit = (!digits.is_empty() && record.phone.as_str() == digits)
            || record.aadhaar_id.as_ref().is_some_and(|v| v.as_str() == upper)
            || record.pan_id.as_ref().is_some_and(|v| v.as_str() == upper)
            || record.passport_id.as_ref().is_some_and(|v| v.as_str() == upper);
        if !hit {
            continue;
        }
        // >= so that among equal timestamps the later creation wins.
        if best.is_none_or(|b| record.check_in_time >= b.check_in_time) {
            best = Some(record);
        }
    }
    best
}

/// Runs [`find_by_identifier`] and folds the result into the check-in
/// gate decision.
#[must_use]
pub fn returning_lookup<'a>(store: &'a VisitorStore, identifier: &str) -> ReturningLookup<'a> {
    match find_by_identifier(store, identifier) {
        Some(record) if record.is_checked_in() => ReturningLookup::AlreadyCheckedIn(record),
        Some(record) => ReturningLookup::Returning(record),
        None => ReturningLookup::NoMatch,
    }
}

/// Free-text search over the directory, optionally narrowed by a
/// structured filter. Results come back most recent check-in first.
///
/// A record matches when any clause does: substring on first, last or
/// full name, email or company (case-insensitive); digit-substring on
/// phone; substring on any identity document; or calendar-day equality
/// against the check-in or check-out date when the query parses as a
/// date. A blank query matches everything.
#[must_use]
pub fn search(store: &VisitorStore, query: &str, filter: Option<&VisitFilter>) -> Vec<VisitRecord> {
    let term = query.trim();
    if term.is_empty() {
        return store.list(filter);
    }

    let lower = term.to_lowercase();
    let digits = digits_only(term);
    let day = parse_day(term);

    let mut out: Vec<VisitRecord> = store
        .records()
        .iter()
        .filter(|r| filter.is_none_or(|f| f.matches(r)))
        .filter(|r| matches_text(r, &lower, &digits, day))
        .cloned()
        .collect();
    out.sort_by(|a, b| b.check_in_time.cmp(&a.check_in_time));
    out
}

fn matches_text(record: &VisitRecord, lower: &str, digits: &str, day: Option<NaiveDate>) -> bool {
    if record.first_name.to_lowercase().contains(lower)
        || record.last_name.to_lowercase().contains(lower)
        || record.full_name().to_lowercase().contains(lower)
    {
        return true;
    }
    if contains_ci(record.email.as_deref(), lower) || contains_ci(record.company.as_deref(), lower)
    {
        return true;
    }
    if digits.len() >= MIN_PHONE_QUERY_DIGITS && record.phone.as_str().contains(digits) {
        return true;
    }
    let id_hit = [
        record.aadhaar_id.as_ref().map(|v| v.as_str().to_owned()),
        record.pan_id.as_ref().map(|v| v.as_str().to_owned()),
        record.passport_id.as_ref().map(|v| v.as_str().to_owned()),
        record.driving_license_id.as_ref().map(|v| v.as_str().to_owned()),
    ]
    .into_iter()
    .flatten()
    .any(|id| id.to_lowercase().contains(lower));
    if id_hit {
        return true;
    }
    day.is_some_and(|day| {
        record.check_in_time.date_naive() == day
            || record
                .check_out_time
                .is_some_and(|t| t.date_naive() == day)
    })
}

fn contains_ci(value: Option<&str>, lower: &str) -> bool {
    value.is_some_and(|v| v.to_lowercase().contains(lower))
}

/// First format that parses wins, so an ambiguous query like
/// `03/04/2025` reads day-first.
fn parse_day(term: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(term, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::record::NewVisit;
    use chrono::{Duration, TimeZone, Utc};
    use gatepass_core::Purpose;
    use rstest::rstest;
    use std::sync::Arc;

    #[rstest]
    #[case("123456789012", IdentifierKind::Aadhaar)]
    #[case("9876543210", IdentifierKind::Phone)]
    #[case("ABCDE1234F", IdentifierKind::Pan)]
    #[case("A1234567", IdentifierKind::Passport)]
    #[case("5876543210", IdentifierKind::Unknown)] // mobile must start 6-9
    #[case("hello", IdentifierKind::Unknown)]
    fn classification(#[case] raw: &str, #[case] expected: IdentifierKind) {
        assert_eq!(classify_identifier(raw), expected);
    }

    fn seeded() -> (ManualClock, VisitorStore) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
        let mut store = VisitorStore::with_clock(Arc::new(clock.clone()));

        store
            .create(NewVisit {
                first_name: "Jane".into(),
                last_name: "Doe".into(),
                email: Some("jane@example.com".into()),
                phone: "9876543210".into(),
                company: Some("Acme Corp".into()),
                aadhaar_id: Some("123456789012".into()),
                ..Default::default()
            })
            .unwrap();

        clock.advance(Duration::hours(1));
        store
            .create(NewVisit {
                first_name: "Ravi".into(),
                last_name: "Kumar".into(),
                phone: "9123456780".into(),
                purpose: Purpose::ControlRoom,
                pan_id: Some("abcde1234f".into()),
                ..Default::default()
            })
            .unwrap();

        (clock, store)
    }

    #[test]
    fn find_matches_phone_with_formatting() {
        let (_clock, store) = seeded();
        let found = find_by_identifier(&store, "(987) 654-3210").unwrap();
        assert_eq!(found.first_name, "Jane");
    }

    #[test]
    fn find_matches_pan_case_insensitively() {
        let (_clock, store) = seeded();
        let found = find_by_identifier(&store, "ABCDE1234F").unwrap();
        assert_eq!(found.first_name, "Ravi");
    }

    #[test]
    fn find_prefers_most_recent_visit() {
        let (clock, mut store) = seeded();
        let first = store.list(None)[0].id;
        store.checkout(first).unwrap();

        clock.advance(Duration::days(1));
        store
            .create(NewVisit {
                first_name: "Ravi".into(),
                last_name: "Kumar".into(),
                phone: "9123456780".into(),
                pan_id: Some("ABCDE1234F".into()),
                ..Default::default()
            })
            .unwrap();

        let found = find_by_identifier(&store, "9123456780").unwrap();
        assert_eq!(found.check_in_time, clock.now());
    }

    #[test]
    fn find_empty_identifier_matches_nothing() {
        let (_clock, store) = seeded();
        assert!(find_by_identifier(&store, "   ").is_none());
    }

    #[test]
    fn returning_lookup_gates_open_visits() {
        let (_clock, mut store) = seeded();
        match returning_lookup(&store, "9876543210") {
            ReturningLookup::AlreadyCheckedIn(r) => assert_eq!(r.first_name, "Jane"),
            other => panic!("expected AlreadyCheckedIn, got {other:?}"),
        }

        let jane = store.list(None)[1].id;
        store.checkout(jane).unwrap();
        match returning_lookup(&store, "9876543210") {
            ReturningLookup::Returning(r) => assert_eq!(r.first_name, "Jane"),
            other => panic!("expected Returning, got {other:?}"),
        }

        assert_eq!(
            returning_lookup(&store, "9999999999"),
            ReturningLookup::NoMatch
        );
    }

    #[rstest]
    #[case("jane")]
    #[case("Jane Doe")]
    #[case("jane@example")]
    #[case("acme")]
    #[case("6543")]
    #[case("123456789012")]
    fn search_clauses_hit_jane(#[case] query: &str) {
        let (_clock, store) = seeded();
        let hits = search(&store, query, None);
        assert_eq!(hits.len(), 1, "query {query:?}");
        assert_eq!(hits[0].first_name, "Jane");
    }

    #[test]
    fn search_single_digit_does_not_match_phones() {
        let (_clock, store) = seeded();
        assert!(search(&store, "9", None).is_empty());
    }

    #[rstest]
    #[case("2025-03-01")]
    #[case("01/03/2025")]
    #[case("01-03-2025")]
    fn search_by_day_in_any_format(#[case] query: &str) {
        let (_clock, store) = seeded();
        let hits = search(&store, query, None);
        assert_eq!(hits.len(), 2, "query {query:?}");
    }

    #[test]
    fn ambiguous_date_reads_day_first() {
        let (_clock, store) = seeded();
        // 03/01/2025 parses as 3 January, not March 1.
        assert!(search(&store, "03/01/2025", None).is_empty());
    }

    #[test]
    fn search_matches_checkout_day() {
        let (clock, mut store) = seeded();
        let ravi = store.list(None)[0].id;
        clock.set(Utc.with_ymd_and_hms(2025, 3, 2, 8, 0, 0).unwrap());
        store.checkout(ravi).unwrap();

        let hits = search(&store, "2025-03-02", None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].first_name, "Ravi");
    }

    #[test]
    fn search_blank_query_lists_everything() {
        let (_clock, store) = seeded();
        assert_eq!(search(&store, "  ", None).len(), 2);
    }

    #[test]
    fn search_no_match_is_empty() {
        let (_clock, store) = seeded();
        assert!(search(&store, "zzzz", None).is_empty());
    }

    #[test]
    fn search_respects_structured_filter() {
        let (_clock, store) = seeded();
        let filter = VisitFilter {
            purpose: Some(Purpose::ControlRoom),
            ..Default::default()
        };
        let hits = search(&store, "kumar", Some(&filter));
        assert_eq!(hits.len(), 1);

        let filter = VisitFilter {
            purpose: Some(Purpose::MahilaCell),
            ..Default::default()
        };
        assert!(search(&store, "kumar", Some(&filter)).is_empty());
    }
}
