use kunai_rfc::rfc::ical::core::DateValue;
use kunai_rfc::rfc::ical::parse::{parse_date_value, parse_rrule};
use kunai_rfc::{ExpansionOptions, ExpansionWindow, OccurrenceSet, expand_rule};
use rrule::RRuleSet;

pub struct RecurrenceCase {
    pub name: &'static str,
    pub anchor: &'static str,
    pub rrule: &'static str,
    pub window: (&'static str, &'static str),
    pub expected: Option<&'static [&'static str]>,
    pub expected_len: Option<usize>,
    /// Occurrences to pull from the `rrule` crate for cross-checking; 0 skips the check.
    pub limit: u16,
}

#[expect(clippy::too_many_lines)]
pub fn recurrence_cases() -> Vec<RecurrenceCase> {
    vec![
        RecurrenceCase {
            name: "daily_count",
            anchor: "20240101",
            rrule: "FREQ=DAILY;COUNT=5",
            window: ("20240101", "20241231"),
            expected: Some(&["20240101", "20240102", "20240103", "20240104", "20240105"]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "weekly_until_date",
            anchor: "20240101",
            rrule: "FREQ=WEEKLY;BYDAY=MO,WE,FR;UNTIL=20240112",
            window: ("20240101", "20241231"),
            expected: Some(&[
                "20240101", "20240103", "20240105", "20240108", "20240110", "20240112",
            ]),
            expected_len: None,
            limit: 0,
        },
        RecurrenceCase {
            name: "monthly_last_weekday",
            anchor: "20240101",
            rrule: "FREQ=MONTHLY;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-1",
            window: ("20240101", "20240331"),
            expected: Some(&["20240131", "20240229", "20240329"]),
            expected_len: None,
            limit: 0,
        },
        RecurrenceCase {
            name: "monthly_thirty_first",
            anchor: "20240131",
            rrule: "FREQ=MONTHLY;BYMONTHDAY=31",
            window: ("20240101", "20241231"),
            expected: Some(&[
                "20240131", "20240331", "20240531", "20240731", "20240831", "20241031",
                "20241231",
            ]),
            expected_len: None,
            limit: 7,
        },
        RecurrenceCase {
            name: "yearly_week_twenty_monday",
            anchor: "20240101",
            rrule: "FREQ=YEARLY;BYWEEKNO=20;BYDAY=MO",
            window: ("20240101", "20261231"),
            expected: Some(&["20240513", "20250512", "20260511"]),
            expected_len: None,
            limit: 0,
        },
        RecurrenceCase {
            name: "count_consumed_before_window",
            anchor: "20240101",
            rrule: "FREQ=DAILY;COUNT=5",
            window: ("20240104", "20241231"),
            expected: Some(&["20240104", "20240105"]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "daily_interval_ten",
            anchor: "19970902T090000",
            rrule: "FREQ=DAILY;INTERVAL=10;COUNT=5",
            window: ("19970101", "19971231"),
            expected: Some(&[
                "19970902T090000",
                "19970912T090000",
                "19970922T090000",
                "19971002T090000",
                "19971012T090000",
            ]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "daily_january_for_three_years",
            anchor: "19980101T090000",
            rrule: "FREQ=DAILY;UNTIL=20000131T140000Z;BYMONTH=1",
            window: ("19980101", "20001231"),
            expected: None,
            expected_len: Some(93),
            limit: 200,
        },
        RecurrenceCase {
            name: "weekly_every_other_tue_thu",
            anchor: "19970902T090000",
            rrule: "FREQ=WEEKLY;INTERVAL=2;WKST=SU;BYDAY=TU,TH;COUNT=8",
            window: ("19970101", "19971231"),
            expected: Some(&[
                "19970902T090000",
                "19970904T090000",
                "19970916T090000",
                "19970918T090000",
                "19970930T090000",
                "19971002T090000",
                "19971014T090000",
                "19971016T090000",
            ]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "weekly_every_other_mwf_until",
            anchor: "19970901T090000",
            rrule: "FREQ=WEEKLY;INTERVAL=2;UNTIL=19971224T000000Z;WKST=SU;BYDAY=MO,WE,FR",
            window: ("19970101", "19971231"),
            expected: None,
            expected_len: Some(25),
            limit: 100,
        },
        RecurrenceCase {
            name: "weekly_wkst_monday",
            anchor: "19970805T090000",
            rrule: "FREQ=WEEKLY;INTERVAL=2;COUNT=4;BYDAY=TU,SU;WKST=MO",
            window: ("19970101", "19971231"),
            expected: Some(&[
                "19970805T090000",
                "19970810T090000",
                "19970819T090000",
                "19970824T090000",
            ]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "weekly_wkst_sunday",
            anchor: "19970805T090000",
            rrule: "FREQ=WEEKLY;INTERVAL=2;COUNT=4;BYDAY=TU,SU;WKST=SU",
            window: ("19970101", "19971231"),
            expected: Some(&[
                "19970805T090000",
                "19970817T090000",
                "19970819T090000",
                "19970831T090000",
            ]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "weekly_set_pos_from_midweek_anchor",
            anchor: "20240821",
            rrule: "FREQ=WEEKLY;BYDAY=TU,FR,SU;BYSETPOS=1;COUNT=2",
            window: ("20240821", "20241231"),
            expected: Some(&["20240823", "20240827"]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "monthly_first_friday",
            anchor: "19970905T090000",
            rrule: "FREQ=MONTHLY;COUNT=10;BYDAY=1FR",
            window: ("19970101", "19981231"),
            expected: Some(&[
                "19970905T090000",
                "19971003T090000",
                "19971107T090000",
                "19971205T090000",
                "19980102T090000",
                "19980206T090000",
                "19980306T090000",
                "19980403T090000",
                "19980501T090000",
                "19980605T090000",
            ]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "monthly_second_to_last_monday",
            anchor: "19970922T090000",
            rrule: "FREQ=MONTHLY;COUNT=6;BYDAY=-2MO",
            window: ("19970101", "19981231"),
            expected: Some(&[
                "19970922T090000",
                "19971020T090000",
                "19971117T090000",
                "19971222T090000",
                "19980119T090000",
                "19980216T090000",
            ]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "monthly_third_to_last_day",
            anchor: "19970928T090000",
            rrule: "FREQ=MONTHLY;BYMONTHDAY=-3",
            window: ("19970901", "19980228"),
            expected: Some(&[
                "19970928T090000",
                "19971029T090000",
                "19971128T090000",
                "19971229T090000",
                "19980129T090000",
                "19980226T090000",
            ]),
            expected_len: None,
            limit: 6,
        },
        RecurrenceCase {
            name: "monthly_second_and_fifteenth",
            anchor: "19970902T090000",
            rrule: "FREQ=MONTHLY;COUNT=10;BYMONTHDAY=2,15",
            window: ("19970101", "19981231"),
            expected: Some(&[
                "19970902T090000",
                "19970915T090000",
                "19971002T090000",
                "19971015T090000",
                "19971102T090000",
                "19971115T090000",
                "19971202T090000",
                "19971215T090000",
                "19980102T090000",
                "19980115T090000",
            ]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "monthly_friday_thirteenth",
            anchor: "19980213T090000",
            rrule: "FREQ=MONTHLY;BYDAY=FR;BYMONTHDAY=13;COUNT=4",
            window: ("19980101", "19991231"),
            expected: Some(&[
                "19980213T090000",
                "19980313T090000",
                "19981113T090000",
                "19990813T090000",
            ]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "monthly_third_tue_wed_thu",
            anchor: "19970904T090000",
            rrule: "FREQ=MONTHLY;COUNT=3;BYDAY=TU,WE,TH;BYSETPOS=3",
            window: ("19970101", "19971231"),
            expected: Some(&["19970904T090000", "19971007T090000", "19971106T090000"]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "monthly_second_to_last_weekday",
            anchor: "19970929T090000",
            rrule: "FREQ=MONTHLY;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-2",
            window: ("19970901", "19980331"),
            expected: Some(&[
                "19970929T090000",
                "19971030T090000",
                "19971127T090000",
                "19971230T090000",
                "19980129T090000",
                "19980226T090000",
                "19980330T090000",
            ]),
            expected_len: None,
            limit: 7,
        },
        RecurrenceCase {
            name: "yearly_june_july",
            anchor: "19970610T090000",
            rrule: "FREQ=YEARLY;COUNT=10;BYMONTH=6,7",
            window: ("19970101", "20011231"),
            expected: Some(&[
                "19970610T090000",
                "19970710T090000",
                "19980610T090000",
                "19980710T090000",
                "19990610T090000",
                "19990710T090000",
                "20000610T090000",
                "20000710T090000",
                "20010610T090000",
                "20010710T090000",
            ]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "yearly_every_other_year_first_quarter",
            anchor: "19970310T090000",
            rrule: "FREQ=YEARLY;INTERVAL=2;COUNT=10;BYMONTH=1,2,3",
            window: ("19970101", "20031231"),
            expected: Some(&[
                "19970310T090000",
                "19990110T090000",
                "19990210T090000",
                "19990310T090000",
                "20010110T090000",
                "20010210T090000",
                "20010310T090000",
                "20030110T090000",
                "20030210T090000",
                "20030310T090000",
            ]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "yearly_every_third_year_by_year_day",
            anchor: "19970101T090000",
            rrule: "FREQ=YEARLY;INTERVAL=3;COUNT=10;BYYEARDAY=1,100,200",
            window: ("19970101", "20061231"),
            expected: Some(&[
                "19970101T090000",
                "19970410T090000",
                "19970719T090000",
                "20000101T090000",
                "20000409T090000",
                "20000718T090000",
                "20030101T090000",
                "20030410T090000",
                "20030719T090000",
                "20060101T090000",
            ]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "yearly_twentieth_monday",
            anchor: "19970519T090000",
            rrule: "FREQ=YEARLY;BYDAY=20MO;COUNT=3",
            window: ("19970101", "19991231"),
            expected: Some(&["19970519T090000", "19980518T090000", "19990517T090000"]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "yearly_iso_week_twenty_monday",
            anchor: "19970512T090000",
            rrule: "FREQ=YEARLY;BYWEEKNO=20;BYDAY=MO;COUNT=3",
            window: ("19970101", "19991231"),
            expected: Some(&["19970512T090000", "19980511T090000", "19990517T090000"]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "yearly_thursdays_in_march",
            anchor: "19970313T090000",
            rrule: "FREQ=YEARLY;BYMONTH=3;BYDAY=TH",
            window: ("19970101", "19981231"),
            expected: Some(&[
                "19970313T090000",
                "19970320T090000",
                "19970327T090000",
                "19980305T090000",
                "19980312T090000",
                "19980319T090000",
                "19980326T090000",
            ]),
            expected_len: None,
            limit: 7,
        },
        RecurrenceCase {
            name: "yearly_election_day",
            anchor: "19961105T090000",
            rrule: "FREQ=YEARLY;INTERVAL=4;COUNT=3;BYMONTH=11;BYDAY=TU;BYMONTHDAY=2,3,4,5,6,7,8",
            window: ("19960101", "20041231"),
            expected: Some(&["19961105T090000", "20001107T090000", "20041102T090000"]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "yearly_leap_day",
            anchor: "20240229",
            rrule: "FREQ=YEARLY;COUNT=3",
            window: ("20240101", "20401231"),
            expected: Some(&["20240229", "20280229", "20320229"]),
            expected_len: None,
            limit: 100,
        },
        RecurrenceCase {
            name: "yearly_last_day_of_february",
            anchor: "20230228",
            rrule: "FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=-1;COUNT=3",
            window: ("20230101", "20301231"),
            expected: Some(&["20230228", "20240229", "20250228"]),
            expected_len: None,
            limit: 100,
        },
    ]
}

pub fn assert_case(case: &RecurrenceCase) {
    let rule = parse_rrule(case.rrule, 1, 1)
        .unwrap_or_else(|err| panic!("Failed to parse {}: {}", case.name, err));
    let anchor = parse_value(case.anchor);
    let window = ExpansionWindow::new(parse_value(case.window.0), parse_value(case.window.1));

    let classified = expand_rule(&rule, anchor, window, &ExpansionOptions::default())
        .unwrap_or_else(|err| panic!("Failed to expand {}: {}", case.name, err));
    let general = expand_rule(
        &rule,
        anchor,
        window,
        &ExpansionOptions::default().with_force_general(true),
    )
    .unwrap_or_else(|err| panic!("Failed to expand {}: {}", case.name, err));
    assert_eq!(
        classified, general,
        "Case {} differs between the classified and general generators",
        case.name
    );

    let actual: Vec<&str> = classified.keys().collect();

    if let Some(expected) = case.expected {
        assert_eq!(actual, expected, "Case {} did not match", case.name);
    }

    if let Some(expected_len) = case.expected_len {
        assert_eq!(
            actual.len(),
            expected_len,
            "Case {} expected {} occurrences",
            case.name,
            expected_len
        );
    }

    if case.limit > 0 {
        let oracle = oracle_occurrences(case, anchor, window);
        assert_eq!(
            classified, oracle,
            "Case {} disagrees with the rrule crate",
            case.name
        );
    }
}

/// Expands the case with the `rrule` crate, anchored in UTC, and keeps occurrences inside `window`.
fn oracle_occurrences(
    case: &RecurrenceCase,
    anchor: DateValue,
    window: ExpansionWindow,
) -> OccurrenceSet {
    let dtstart = match anchor {
        DateValue::Date(date) => format!("{}T000000Z", date.format("%Y%m%d")),
        DateValue::DateTime(datetime) => format!("{}Z", datetime.format("%Y%m%dT%H%M%S")),
    };
    let rrule_set: RRuleSet = format!("DTSTART:{dtstart}\nRRULE:{}", case.rrule)
        .parse()
        .unwrap_or_else(|err| panic!("rrule crate failed to parse {}: {}", case.name, err));

    rrule_set
        .all(case.limit)
        .dates
        .iter()
        .map(|occurrence| match anchor {
            DateValue::Date(_) => DateValue::Date(occurrence.date_naive()),
            DateValue::DateTime(_) => DateValue::DateTime(occurrence.naive_utc()),
        })
        .filter(|value| window.contains(*value))
        .collect()
}

fn parse_value(value: &str) -> DateValue {
    parse_date_value(value, 1, 1)
        .unwrap_or_else(|err| panic!("Failed to parse date value {value}: {err}"))
}
