use mei_rs::parse::{parse, RawRow, RawValue};
use mei_rs::Provider;
use serde_json::json;

#[test]
fn fred_observations_with_missing_marker() {
    let sample = json!({
        "observations": [
            {"date": "2024-01-01", "value": "3.7"},
            {"date": "2024-02-01", "value": "."},
            {"date": "2024-03-01", "value": "3.9"},
            {"value": "4.0"}
        ]
    });
    let rows = parse(Provider::Fred, &sample).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].value, RawValue::Text("3.7".into()));
    // FRED encodes missing observations as "." — explicit absence.
    assert_eq!(rows[1].value, RawValue::Absent);
}

#[test]
fn worldbank_two_element_array() {
    let sample = r#"
    [
      {"page":1,"pages":1,"per_page":"1000","total":3},
      [
        {"indicator":{"id":"SL.UEM.TOTL.ZS","value":"Unemployment, total"},
         "country":{"id":"CN","value":"China"},
         "date":"2022","value":4.98,"unit":"","obs_status":"","decimal":1},
        {"indicator":{"id":"SL.UEM.TOTL.ZS","value":"Unemployment, total"},
         "country":{"id":"CN","value":"China"},
         "date":"2023","value":null,"unit":"","obs_status":"","decimal":1},
        {"indicator":{"id":"SL.UEM.TOTL.ZS","value":"Unemployment, total"},
         "country":{"id":"CN","value":"China"},
         "date":"2021","value":4.55,"unit":"","obs_status":"","decimal":1}
      ]
    ]
    "#;
    let v: serde_json::Value = serde_json::from_str(sample).unwrap();
    let rows = parse(Provider::WorldBank, &v).unwrap();
    // Nulls are unpublished periods and are dropped, not kept absent.
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].period, "2022");
    assert_eq!(rows[0].value, RawValue::Number(4.98));
}

#[test]
fn worldbank_error_payload_is_format_error() {
    let sample = json!([{"message": [{"id": "120", "value": "invalid indicator"}]}]);
    assert!(parse(Provider::WorldBank, &sample).is_err());
}

#[test]
fn eurostat_compact_positions_and_gaps() {
    let sample = json!({
        "value": {"0": 105.1, "2": 105.9},
        "dimension": {
            "time": {"category": {"index": {"2024-01": 0, "2024-02": 1, "2024-03": 2}}}
        }
    });
    let rows = parse(Provider::Eurostat, &sample).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].value, RawValue::Number(105.1));
    // Position 1 is missing from the value map: explicitly absent.
    assert_eq!(rows[1].period, "2024-02");
    assert_eq!(rows[1].value, RawValue::Absent);
    assert_eq!(rows[2].value, RawValue::Number(105.9));
}

#[test]
fn recursive_walker_finds_sdmx_observations() {
    let sample = json!({
        "header": {"id": "abc"},
        "data": {
            "series": [
                {"observations": [
                    {"period": "2024-Q1", "value": 0.4},
                    {"period": "2024-Q2", "value": null}
                ]}
            ]
        }
    });
    let rows = parse(Provider::Oecd, &sample).unwrap();
    assert_eq!(
        rows,
        vec![
            RawRow { period: "2024-Q1".into(), value: RawValue::Number(0.4) },
            RawRow { period: "2024-Q2".into(), value: RawValue::Absent },
        ]
    );
}

#[test]
fn recursive_walker_reads_nested_statistical_arrays() {
    // e-Stat style: @TIME / #text leaves under a VALUE array.
    let sample = json!({
        "GET_STATS_DATA": {
            "STATISTICAL_DATA": {
                "DATA_INF": {
                    "VALUE": [
                        {"@TIME": "2024-01", "@unit": "index", "#text": "107.2"},
                        {"@TIME": "2024-02", "@unit": "index", "#text": "107.5"}
                    ]
                }
            }
        }
    });
    let rows = parse(Provider::EStat, &sample).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].value, RawValue::Text("107.5".into()));
}

#[test]
fn recursive_walker_reads_tabular_rows() {
    let sample = json!([
        {"REF_DATE": "2024-01", "GEO": "Canada", "VALUE": 158.3},
        {"REF_DATE": "2024-02", "GEO": "Canada", "VALUE": 158.9},
        {"REF_DATE": "2024-03", "GEO": "Canada", "VALUE": {"odd": true}}
    ]);
    let rows = parse(Provider::StatCan, &sample).unwrap();
    // The malformed third entry is dropped silently.
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].period, "2024-01");
}

#[test]
fn key_value_map() {
    let sample = json!({"2024-01": 1.5, "2024-02": null, "2024-03": "1.75", "meta": {"cube": "x"}});
    let rows = parse(Provider::Snb, &sample).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().any(|r| r.value == RawValue::Absent));
}

#[test]
fn malformed_payloads_never_panic() {
    let junk = json!({"unexpected": true});
    for provider in [
        Provider::Fred,
        Provider::WorldBank,
        Provider::Eurostat,
        Provider::Oecd,
        Provider::Snb,
    ] {
        // Either a descriptive format error or an empty row set; the
        // resolver downgrades both to an empty series.
        match parse(provider, &junk) {
            Ok(rows) => assert!(rows.is_empty()),
            Err(e) => assert!(!e.to_string().is_empty()),
        }
    }
    assert!(parse(Provider::Fred, &json!("not even an object")).is_err());
    assert!(parse(Provider::WorldBank, &json!([])).is_err());
}
