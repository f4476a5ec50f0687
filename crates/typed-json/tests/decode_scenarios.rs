use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use typed_json::{
    json_record, parse, parse_as, parse_generic, to_json, CodecError, Container, Key, NullPolicy,
    TypeDescriptor, Value,
};

json_record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Student {
        pub name: String = "default" => ReplaceWithEmptyValue,
        pub age: i64 = 1 => ReplaceWithEmptyValue,
    }
}

json_record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Settings {
        pub theme: String = "dark" => ReplaceWithFieldDefault,
        pub retries: i64 = 3 => ReplaceWithFieldDefault,
        pub note: Option<String> = Some("n/a".to_string()),
    }
}

json_record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Course {
        pub title: String = "",
        pub students: Vec<Student> = Vec::new(),
        pub schedule: HashMap<String, NaiveDateTime> = HashMap::new(),
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

#[test]
fn sequence_of_dates_keeps_order() {
    let value = parse_generic(
        r#"["20180102","20180306"]"#,
        Container::Sequence,
        &[TypeDescriptor::date()],
    )
    .expect("sequence must decode");
    assert_eq!(
        value,
        Value::Seq(vec![Value::Date(day(2018, 1, 2)), Value::Date(day(2018, 3, 6))])
    );

    let typed: Vec<NaiveDateTime> =
        parse(r#"["20180102","20180306"]"#).expect("typed sequence must decode");
    assert_eq!(typed, vec![day(2018, 1, 2), day(2018, 3, 6)]);
}

#[test]
fn mapping_of_dates_is_narrowed() {
    let value = parse_generic(
        r#"{"arr":"20180102"}"#,
        Container::Mapping,
        &[TypeDescriptor::str(), TypeDescriptor::date()],
    )
    .expect("mapping must decode");
    let map = value.as_map().expect("mapping value");
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&Key::from("arr")), Some(&Value::Date(day(2018, 1, 2))));
}

#[test]
fn unresolved_mapping_keeps_text() {
    let value = parse_generic(r#"{"arr":"20180102"}"#, Container::Mapping, &[])
        .expect("unresolved mapping must decode");
    assert_eq!(value.get("arr"), Some(&Value::from("20180102")));
}

#[test]
fn null_fields_take_empty_values() {
    let student: Student = parse(r#"{"name":null,"age":null}"#).expect("student must decode");
    assert_eq!(student.name, "");
    assert_eq!(student.age, 0);
}

#[test]
fn absent_fields_keep_declared_defaults() {
    let student: Student = parse("{}").expect("empty object must decode");
    assert_eq!(student, Student::default());
    assert_eq!(student.name, "default");
    assert_eq!(student.age, 1);
}

#[test]
fn field_default_policy_covers_null_and_absence() {
    let from_null: Settings =
        parse(r#"{"theme":null,"retries":null}"#).expect("settings must decode");
    let from_absent: Settings = parse("{}").expect("settings must decode");
    assert_eq!(from_null.theme, "dark");
    assert_eq!(from_null.retries, 3);
    assert_eq!(from_null, from_absent);
}

#[test]
fn keep_as_null_clears_optional_fields() {
    let settings: Settings = parse(r#"{"note":null}"#).expect("settings must decode");
    assert_eq!(settings.note, None);
    let settings: Settings = parse("{}").expect("settings must decode");
    assert_eq!(settings.note.as_deref(), Some("n/a"));
}

#[test]
fn keep_as_null_gives_required_fields_their_empty_value() {
    json_record! {
        #[derive(Debug, PartialEq)]
        struct Roster {
            name: String = "x",
            size: i64 = 5,
            tags: Vec<String> = vec!["t".to_string()],
            lead: Student = Student::default(),
        }
    }
    let roster: Roster = parse(r#"{"name":null,"size":null,"tags":null,"lead":null}"#)
        .expect("null must coerce, not fail");
    assert_eq!(roster.name, "");
    assert_eq!(roster.size, 0);
    assert!(roster.tags.is_empty());
    assert_eq!(roster.lead, Student::default());

    let course: Course = parse(r#"{"title":null,"students":null,"schedule":null}"#)
        .expect("null containers must coerce");
    assert_eq!(course, Course::default());
}

#[test]
fn keep_as_null_on_required_date_is_a_mismatch() {
    json_record! {
        struct Deadline {
            due: NaiveDateTime = day(2020, 1, 1),
        }
    }
    let err = parse::<Deadline>(r#"{"due":null}"#)
        .err()
        .expect("a date has no empty value");
    match err {
        CodecError::TypeMismatch { path, .. } => assert_eq!(path, "/due"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn policies_are_visible_on_descriptors() {
    let d = typed_json::descriptor_of::<Student>();
    let record = d.as_record().expect("record descriptor");
    assert!(record
        .fields()
        .iter()
        .all(|f| f.policy() == NullPolicy::ReplaceWithEmptyValue));
}

#[test]
fn nested_records_decode_through_containers() {
    let text = r#"{
        "title": "rust",
        "students": [{"name": "ann", "age": "20"}, {"name": null}],
        "schedule": {"start": "2018-01-02", "end": "2018/03/06"}
    }"#;
    let course: Course = parse(text).expect("course must decode");
    assert_eq!(course.students.len(), 2);
    assert_eq!(course.students[0].age, 20);
    assert_eq!(course.students[1].name, "");
    assert_eq!(course.students[1].age, 1);
    assert_eq!(course.schedule["end"], day(2018, 3, 6));

    let again: Course = parse(&to_json(&course)).expect("re-encoded course must decode");
    assert_eq!(again, course);
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = parse_as("{\"a\": [1, 2", &TypeDescriptor::inferred()).expect_err("must fail");
    assert!(matches!(err, CodecError::Parse { line: 1, .. }), "{err:?}");
}

#[test]
fn array_for_record_is_a_type_mismatch() {
    let err = parse::<Student>("[1, 2]").err().expect("must fail");
    assert_eq!(
        err,
        CodecError::TypeMismatch {
            path: String::new(),
            expected: "record Student".to_string(),
            found: "array".to_string(),
        }
    );
}

#[test]
fn bad_date_reports_text() {
    let err = parse::<Vec<NaiveDateTime>>(r#"["2018-01-02", "soon"]"#)
        .err()
        .expect("must fail");
    assert_eq!(
        err,
        CodecError::DateFormat {
            text: "soon".to_string()
        }
    );
}
