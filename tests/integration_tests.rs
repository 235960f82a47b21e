//! Integration tests for query parsing, evaluation and rule matching
//!
//! These tests exercise the public API end to end using typed records,
//! JSON records and rule files.

use ast_filter::condition::{classify, ValueKind};
use ast_filter::{impl_record, parse, Condition, FilterError, Record, RuleLoader};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value as JsonValue};
use std::io::Write;

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Account {
    id: i64,
    member_id: i64,
    division: String,
    score: Option<i32>,
    point: Option<i64>,
    wallet: Option<f32>,
    money: Option<f64>,
    join_date: NaiveDateTime,
    leave_date: Option<NaiveDateTime>,
}

impl_record!(Account {
    "id" => id,
    "member_id" => member_id,
    "division" => division,
    "score" => score,
    "point" => point,
    "wallet" => wallet,
    "money" => money,
    "join_date" => join_date,
    "leave_date" => leave_date,
});

fn date(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap()
}

#[allow(clippy::too_many_arguments)]
fn account(
    id: i64,
    member_id: i64,
    division: &str,
    score: Option<i32>,
    point: Option<i64>,
    wallet: Option<f32>,
    money: Option<f64>,
    join_date: NaiveDateTime,
    leave_date: Option<NaiveDateTime>,
) -> Account {
    Account {
        id,
        member_id,
        division: division.to_string(),
        score,
        point,
        wallet,
        money,
        join_date,
        leave_date,
    }
}

fn accounts() -> Vec<Account> {
    vec![
        account(
            1,
            21,
            "people",
            Some(90),
            Some(12000),
            Some(100000.0),
            Some(10000.0),
            date(2020, 3, 9),
            Some(date(2020, 12, 9)),
        ),
        account(
            2,
            22,
            "finance",
            Some(40),
            Some(1000),
            Some(1000.0),
            Some(50000.0),
            date(2014, 1, 9),
            Some(date(2015, 12, 9)),
        ),
        account(
            3,
            23,
            "business",
            Some(60),
            Some(5000),
            Some(5000.0),
            Some(80000.0),
            date(2016, 12, 9),
            Some(date(2017, 12, 9)),
        ),
        account(
            4,
            24,
            "managerial",
            Some(70),
            Some(20000),
            Some(4000.0),
            Some(900000.0),
            date(2018, 4, 9),
            Some(date(2019, 12, 9)),
        ),
        account(
            5,
            25,
            "engineering",
            Some(100),
            Some(3000),
            Some(100.0),
            Some(1500000.0),
            date(2015, 10, 9),
            None,
        ),
        account(
            5,
            25,
            "engineering",
            None,
            None,
            None,
            None,
            date(2015, 7, 9),
            Some(date(2016, 12, 9)),
        ),
    ]
}

fn filtered_ids(query: &str) -> Vec<(i64, i64)> {
    let data = accounts();
    parse(query)
        .filter(&data)
        .unwrap()
        .into_iter()
        .map(|a| (a.id, a.member_id))
        .collect()
}

fn object(value: JsonValue) -> serde_json::Map<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_json_fixtures() {
    let cases = [
        (
            "(id=1 && member_id=2) || (division=engineering || division=finance)",
            r#"{"conditions":[{"conditions":[{"attribute":{"name":"id","operator":"=","value":"1"}},{"operator":"AND","attribute":{"name":"member_id","operator":"=","value":"2"}}]},{"operator":"OR","conditions":[{"attribute":{"name":"division","operator":"=","value":"engineering"}},{"operator":"OR","attribute":{"name":"division","operator":"=","value":"finance"}}]}]}"#,
        ),
        (
            "id=1 &&  member_id=2   &&   (division=engineering || division=finance)",
            r#"{"conditions":[{"attribute":{"name":"id","operator":"=","value":"1"}},{"operator":"AND","attribute":{"name":"member_id","operator":"=","value":"2"}},{"operator":"AND","conditions":[{"attribute":{"name":"division","operator":"=","value":"engineering"}},{"operator":"OR","attribute":{"name":"division","operator":"=","value":"finance"}}]}]}"#,
        ),
        (
            "id=1 && member_id=2 && user_id=3 && (province=jatim || city=mojokerto || (warehouse_id=1 && warehouse_detail_id=2))",
            r#"{"conditions":[{"attribute":{"name":"id","operator":"=","value":"1"}},{"operator":"AND","attribute":{"name":"member_id","operator":"=","value":"2"}},{"operator":"AND","attribute":{"name":"user_id","operator":"=","value":"3"}},{"operator":"AND","conditions":[{"attribute":{"name":"province","operator":"=","value":"jatim"}},{"operator":"OR","attribute":{"name":"city","operator":"=","value":"mojokerto"}},{"operator":"OR","conditions":[{"attribute":{"name":"warehouse_id","operator":"=","value":"1"}},{"operator":"AND","attribute":{"name":"warehouse_detail_id","operator":"=","value":"2"}}]}]}]}"#,
        ),
        (
            "((date<=2019-09-09 && date > 2019-08-08) || (p_date>=2019-01-01 && p_date<2019-02-02)) && (member_type=1||member_type=2)",
            r#"{"conditions":[{"conditions":[{"conditions":[{"attribute":{"name":"date","operator":"<=","value":"2019-09-09"}},{"operator":"AND","attribute":{"name":"date","operator":">","value":"2019-08-08"}}]},{"operator":"OR","conditions":[{"attribute":{"name":"p_date","operator":">=","value":"2019-01-01"}},{"operator":"AND","attribute":{"name":"p_date","operator":"<","value":"2019-02-02"}}]}]},{"operator":"AND","conditions":[{"attribute":{"name":"member_type","operator":"=","value":"1"}},{"operator":"OR","attribute":{"name":"member_type","operator":"=","value":"2"}}]}]}"#,
        ),
    ];

    for (query, expected) in cases {
        let got = serde_json::to_value(parse(query)).unwrap();
        let want: JsonValue = serde_json::from_str(expected).unwrap();
        assert_eq!(got, want, "query: {}", query);

        let back: Condition = serde_json::from_value(want).unwrap();
        assert_eq!(back, parse(query), "query: {}", query);
    }
}

#[test]
fn test_parse_empty_query_serializes_to_empty_leaf() {
    let got = serde_json::to_value(parse("")).unwrap();
    assert_eq!(got, json!({"attribute": {"name": "", "operator": "", "value": ""}}));
}

#[test]
fn test_render_round_trip() {
    for query in [
        "id=1",
        "(id=1 || id=2) && member_id>100",
        r#"name="John Doe" && join_date>="2020-01-01 00:00:00""#,
    ] {
        let condition = parse(query);
        assert_eq!(parse(&condition.to_string()), condition, "query: {}", query);
    }
}

// ============================================================================
// Structural evaluation
// ============================================================================

#[test]
fn test_literal_scenario() {
    let condition = parse("(id=1 || id=2) && member_id>100");
    assert!(condition.matches_json(&json!({"id": 1, "member_id": 111})).unwrap());
    assert!(!condition.matches_json(&json!({"id": 1, "member_id": 99})).unwrap());
}

#[test]
fn test_and_chain_is_associative() {
    let flat = parse("id=1 && member_id=21 && division=people");
    let grouped = parse("(id=1 && member_id=21) && division=people");
    let flat_or = parse("id=9 || member_id=22 || division=people");
    let grouped_or = parse("(id=9 || member_id=22) || division=people");

    for account in accounts() {
        assert_eq!(flat.matches(&account).unwrap(), grouped.matches(&account).unwrap());
        assert_eq!(
            flat_or.matches(&account).unwrap(),
            grouped_or.matches(&account).unwrap()
        );
    }
}

#[test]
fn test_struct_validation() {
    struct Named {
        id: i64,
        member_id: i64,
        division: String,
    }

    impl_record!(Named {
        "ID" => id,
        "MemberID" => member_id,
        "Division" => division,
    });

    let record = Named {
        id: 1,
        member_id: 2,
        division: "engineering".to_string(),
    };

    assert!(parse("ID=1 &&  MemberID=2  &&   (Division=engineering || Division=finance)")
        .matches(&record)
        .unwrap());
    assert!(!parse("ID=1 && MemberID=2 && (Division=engineering || Division=finance) && Brand=Adidas")
        .matches(&record)
        .unwrap());
    assert!(parse("ID=1 && MemberID=2 && (Division=engineering || Division=finance) && (Category=Bawahan || ID=1 || Brand=nike)")
        .matches(&record)
        .unwrap());
}

#[test]
fn test_json_validation() {
    let data = json!({"id": "1", "member_id": "2", "division": "finance"});
    assert!(parse("(id=1 && (member_id=12||member_id=2))  &&   (division=engineering || division=finance)")
        .matches_json(&data)
        .unwrap());

    let data = json!({"id": 1, "member_id": 3, "division": "finance"});
    assert!(parse("(id=1 &&  member_id=2  &&   (division=engineering || division=finance))||(member_id=3)")
        .matches_json(&data)
        .unwrap());
    assert!(!parse("(id=1 &&  member_id=2  &&   (division=engineering || division=finance))||(member_id=3&&brand=abc)")
        .matches_json(&data)
        .unwrap());

    assert!(matches!(
        parse("id=1").matches_json(&JsonValue::Null),
        Err(FilterError::InvalidInput(_))
    ));
    assert!(matches!(
        parse("id=1").matches_json(&json!([1, 2])),
        Err(FilterError::InvalidType(_))
    ));
}

// ============================================================================
// Collection filtering
// ============================================================================

#[test]
fn test_filter_accounts() {
    assert_eq!(filtered_ids("id=1||id=2"), vec![(1, 21), (2, 22)]);
    assert_eq!(
        filtered_ids("(member_id=23)||((id=1 && member_id=21)&&(division=people||division=managerial))"),
        vec![(1, 21), (3, 23)]
    );
    assert_eq!(filtered_ids("member_id=21 && score=90"), vec![(1, 21)]);
    assert_eq!(filtered_ids("member_id=25 && point>=3000"), vec![(5, 25)]);
}

#[test]
fn test_filter_accounts_by_time_and_float() {
    let data = accounts();
    let passed = parse(r#"join_date>"2015-01-01 00:00:00" && join_date<="2016-01-01 00:00:00" && score>80 && point<4000 && wallet>90 && money>=1500000"#)
        .filter(&data)
        .unwrap();
    assert_eq!(passed, vec![&data[4]]);
}

#[test]
fn test_filter_missing_optional_field_never_matches() {
    let data = accounts();
    let passed = parse(r#"leave_date<"2030-01-01 00:00:00""#).filter(&data).unwrap();
    assert_eq!(passed.len(), 5);
    assert!(passed.iter().all(|a| a.leave_date.is_some()));
}

#[test]
fn test_filter_empty_slice() {
    let data: Vec<Account> = Vec::new();
    assert!(parse("member_id=25").filter(&data).unwrap().is_empty());
}

#[test]
fn test_filter_json_order() {
    let items = json!([
        {"id": 1, "tier": "gold"},
        {"id": 2, "tier": "silver"},
        {"id": 3, "tier": "gold"}
    ]);
    let passed = parse("tier=gold").filter_json(&items).unwrap();
    let ids: Vec<_> = passed.iter().map(|item| item["id"].clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(3)]);
}

// ============================================================================
// Multi-record evaluation
// ============================================================================

struct FirstStruct {
    id: String,
    member_id: String,
    division: String,
}

impl_record!(FirstStruct {
    "id" => id,
    "member_id" => member_id,
    "division" => division,
});

struct SecondStruct {
    name: String,
}

impl_record!(SecondStruct { "name" => name });

struct ThirdStruct {
    kind: String,
    segment: String,
}

impl_record!(ThirdStruct {
    "type" => kind,
    "segment" => segment,
});

#[test]
fn test_validate_objects() {
    let first: &dyn Record = &FirstStruct {
        id: "123".to_string(),
        member_id: "345".to_string(),
        division: "engineering".to_string(),
    };
    let second: &dyn Record = &SecondStruct {
        name: "Test".to_string(),
    };
    let third: &dyn Record = &ThirdStruct {
        kind: "ABC".to_string(),
        segment: "new-member".to_string(),
    };

    let cases: Vec<(&str, Vec<&dyn Record>, bool)> = vec![
        ("member_id=345", vec![first], true),
        ("member_id=345 && brand=adidas", vec![first], false),
        ("ThirdStruct.type=ABC && SecondStruct.name=Test", vec![third, second], true),
        ("SecondStruct.name=Test && SecondStruct.memberId=1010101", vec![third, second], false),
        ("FirstStruct.id=123 && SecondStruct.name=Test", vec![first, second], true),
        ("id=123", vec![first], true),
        (
            "(FirstStruct.id=1234 || SecondStruct=Test || ThirdStruct.segment=new-member) && (FirstStruct.member_id=345 && SecondStruct.name=Test) && ThirdStruct.type=ABC",
            vec![first, second, third],
            true,
        ),
    ];

    for (query, records, expected) in cases {
        let got = parse(query).matches_many(&records).unwrap();
        assert_eq!(got, expected, "query: {}", query);
    }

    assert!(matches!(
        parse("id=1").matches_many(&[]),
        Err(FilterError::InvalidInput(_))
    ));
}

#[test]
fn test_nested_json_qualifier() {
    let record = object(json!({
        "member": {"id": 7, "tier": "gold"},
        "region": "apac"
    }));
    let condition = parse("member.tier=gold && region=apac");
    assert!(condition.matches(&record).unwrap());

    let record = object(json!({"member": 7}));
    assert!(matches!(
        parse("member.tier=gold").matches(&record),
        Err(FilterError::UnableToCastRecord(_))
    ));
}

// ============================================================================
// Cross-tree matching and rules
// ============================================================================

#[test]
fn test_matches_condition_properties() {
    let reference = parse("a=1 && b=2");
    assert!(!reference.matches_condition(&parse("a=1")).unwrap());

    let reference = parse("a=1 && (b=2 || c=3)");
    assert!(reference.matches_condition(&parse("a=1 && c=3")).unwrap());

    let query = parse("deviceType=mobile && (ABTest=xxx || ABTest=yyy) && spend>=100");
    assert!(query.matches_condition(&query).unwrap());
}

#[test]
fn test_value_classification() {
    assert_eq!(classify("19.123"), ValueKind::Numeric);
    assert_eq!(classify("10.01.200.01"), ValueKind::Opaque);
    assert_eq!(classify("2020-02-02 12:00:21"), ValueKind::Temporal);
}

#[test]
fn test_rule_file_end_to_end() {
    let dir = std::env::temp_dir().join(format!("ast-filter-rules-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("rules.yaml");

    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"rules:
  - name: mobile
    description: "Mobile traffic"
    when: 'deviceType=mobile'
  - name: mobile-xxx
    when: 'deviceType=mobile && ABTest=xxx'
  - name: late-joiners
    when: 'join_date>="2019-01-01 00:00:00"'
"#
    )
    .unwrap();
    drop(file);

    let rules = RuleLoader::new().load_rules(&path).unwrap();
    assert_eq!(rules.len(), 3);

    let candidate = parse("deviceType=mobile && ABTest=yyy");
    let matched: Vec<_> = rules
        .matching_rules(&candidate)
        .unwrap()
        .into_iter()
        .map(|rule| rule.name.as_str())
        .collect();
    assert_eq!(matched, vec!["mobile"]);

    let record = object(json!({"deviceType": "MOBILE", "join_date": "2020-03-09 00:00:00"}));
    let matched: Vec<_> = rules
        .matching_record(&record)
        .unwrap()
        .into_iter()
        .map(|rule| rule.name.as_str())
        .collect();
    assert_eq!(matched, vec!["late-joiners"]);

    std::fs::remove_dir_all(&dir).ok();
}
