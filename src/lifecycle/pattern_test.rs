use super::IndexNamePattern;
use super::Periodicity;
use crate::Error;
use crate::LifecycleError;

fn daily(family: &str) -> IndexNamePattern {
    IndexNamePattern::new(family, Periodicity::Daily)
}

#[test]
fn test_filter_accepts_well_formed_names() {
    let pattern = daily("logs-");

    assert!(pattern.filter("logs-20240610"));
    assert!(pattern.filter("other-20240610")); // shape only, family checked by matches()
    assert!(pattern.filter("a20240229")); // leap day
}

#[test]
fn test_filter_rejects_malformed_names() {
    let pattern = daily("logs-");

    assert!(!pattern.filter("logs-2024061")); // one digit short
    assert!(!pattern.filter("20240610")); // bare suffix with no prefix
    assert!(!pattern.filter("logs-2024061x"));
    assert!(!pattern.filter("logs-20240431")); // April has 30 days
    assert!(!pattern.filter("logs-20241301"));
    assert!(!pattern.filter(""));
}

#[test]
fn test_filter_respects_periodicity_width() {
    let monthly = IndexNamePattern::new("audit-", Periodicity::Monthly);
    assert!(monthly.filter("audit-202406"));
    assert!(!monthly.filter("audit-202413"));

    let yearly = IndexNamePattern::new("archive-", Periodicity::Yearly);
    assert!(yearly.filter("archive-2024"));

    // A daily-width name still passes a monthly filter structurally: its
    // last six digits form a valid YYYYMM. Family matching is what keeps
    // differently-partitioned families apart.
    assert!(monthly.filter("audit-20240610"));
    assert_eq!(monthly.name_part("audit-20240610"), "audit-20");
}

#[test]
fn test_filter_handles_multibyte_prefixes() {
    let pattern = IndexNamePattern::new("журнал-", Periodicity::Daily);

    assert!(pattern.filter("журнал-20240610"));
    assert!(!pattern.filter("журнал-"));
    assert!(!pattern.filter("журнал"));
}

#[test]
fn test_name_part_strips_suffix() {
    let pattern = daily("logs-");

    assert_eq!(pattern.name_part("logs-20240610"), "logs-");
    assert_eq!(pattern.name_part("short"), "");
}

#[test]
fn test_date_value_round_trip() {
    for (family, periodicity, value) in [
        ("logs-", Periodicity::Daily, 20240610),
        ("weekly-", Periodicity::Weekly, 20240610),
        ("audit-", Periodicity::Monthly, 202406),
        ("archive-", Periodicity::Yearly, 2024),
    ] {
        let pattern = IndexNamePattern::new(family, periodicity);
        let rendered = pattern.render(value);

        assert!(pattern.matches(&rendered), "{rendered} must match its own family");
        assert_eq!(pattern.date_value(&rendered).unwrap(), value);
    }
}

#[test]
fn test_render_zero_pads_to_suffix_width() {
    let yearly = IndexNamePattern::new("archive-", Periodicity::Yearly);

    assert_eq!(yearly.render(810), "archive-0810");
    assert_eq!(yearly.date_value("archive-0810").unwrap(), 810);
}

#[test]
fn test_date_value_rejects_unfiltered_names() {
    let pattern = daily("logs-");

    assert!(matches!(
        pattern.date_value("logs-2024061x"),
        Err(Error::Lifecycle(LifecycleError::UnparsableDateSuffix { .. }))
    ));
}

#[test]
fn test_matches_requires_same_family() {
    let pattern = daily("logs-");

    assert!(pattern.matches("logs-20240610"));
    assert!(pattern.matches("LOGS-20240610")); // cluster index names compare case-insensitively
    assert!(!pattern.matches("other-20240610"));
    assert!(!pattern.matches("logs-extra-20240610x"));
}
