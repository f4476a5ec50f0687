use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use typed_json::{clone, encode, json_record, parse, parse_value, to_json, DateParser, Key, Value};

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-4000i32..4000).prop_map(|q| Value::Float(f64::from(q) / 4.0 + 0.25)),
        ".{0,12}".prop_map(Value::Str),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Seq),
            prop::collection::vec(("[a-z]{0,6}", inner), 0..4).prop_map(|entries| {
                entries
                    .into_iter()
                    .map(|(k, v)| (Key::Str(k), v))
                    .collect::<Value>()
            }),
        ]
    })
}

fn arb_datetime() -> impl Strategy<Value = NaiveDateTime> {
    (1i32..=9999, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_filter_map(
        "valid calendar date",
        |(y, mo, d, h, mi, s)| {
            NaiveDate::from_ymd_opt(y, mo, d).and_then(|date| date.and_hms_opt(h, mi, s))
        },
    )
}

json_record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Attendee {
        name: String = "",
        age: i64 = 0,
        joined: Option<NaiveDateTime> = None,
    }
}

json_record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Event {
        title: String = "untitled" => ReplaceWithFieldDefault,
        capacity: i64 = 10,
        starts: Option<NaiveDateTime> = None,
        tags: Vec<String> = Vec::new(),
        attendees: Vec<Attendee> = Vec::new(),
        agenda: HashMap<String, NaiveDateTime> = HashMap::new(),
    }
}

fn arb_attendee() -> impl Strategy<Value = Attendee> {
    (".{0,12}", any::<i64>(), prop::option::of(arb_datetime()))
        .prop_map(|(name, age, joined)| Attendee { name, age, joined })
}

fn arb_event() -> impl Strategy<Value = Event> {
    (
        ".{0,12}",
        any::<i64>(),
        prop::option::of(arb_datetime()),
        prop::collection::vec(".{0,8}", 0..4),
        prop::collection::vec(arb_attendee(), 0..3),
        prop::collection::hash_map("[a-k]{1,5}", arb_datetime(), 0..3),
    )
        .prop_map(|(title, capacity, starts, tags, attendees, agenda)| Event {
            title,
            capacity,
            starts,
            tags,
            attendees,
            agenda,
        })
}

proptest! {
    #[test]
    fn records_survive_encode_then_parse(event in arb_event()) {
        let text = to_json(&event);
        let back: Event = parse(&text).expect("encoded record must parse");
        prop_assert_eq!(back, event);
    }

    #[test]
    fn inferred_values_survive_encode_then_parse(value in arb_value()) {
        let text = encode(&value);
        let back = parse_value(&text).expect("encoded text must parse");
        prop_assert_eq!(back, value);
    }

    #[test]
    fn canonical_dates_parse_back(date in arb_datetime()) {
        let parser = DateParser::default();
        let text = parser.format(&date);
        prop_assert_eq!(parser.parse(&text).expect("canonical text must parse"), Some(date));
    }

    #[test]
    fn typed_clone_preserves_nested_dates(
        entries in prop::collection::vec(
            prop::collection::hash_map("[a-z]{1,5}", arb_datetime(), 0..4),
            0..4,
        )
    ) {
        let copy: Vec<HashMap<String, NaiveDateTime>> = clone(&entries).expect("clone must succeed");
        prop_assert_eq!(copy, entries);
    }
}

#[test]
fn empty_record_document_takes_declared_defaults() {
    let event: Event = parse("{}").expect("empty object must parse");
    assert_eq!(event, Event::default());
    assert_eq!(event.title, "untitled");
    assert_eq!(event.capacity, 10);
}
