/// Ultra-TOON encoding: legend, aliased header, categorical codes, and the
/// caller overrides in `UltraConfig`.
use ultra_toon::{encode_ultra, AliasPolicy, KeyPolicy, ToonError, UltraConfig};

fn ultra(json: &str) -> String {
    encode_ultra(json, &UltraConfig::default()).unwrap()
}

const TEAM: &str = r#"{"users":[
    {"id":1,"role":"developer","city":"Delhi"},
    {"id":2,"role":"designer","city":"Mumbai"},
    {"id":3,"role":"manager","city":"Delhi"},
    {"id":4,"role":"analyst","city":"Chennai"},
    {"id":5,"role":"engineer","city":"Bangalore"},
    {"id":6,"role":"developer","city":"Hyderabad"}
]}"#;

// ============================================================================
// Layout
// ============================================================================

#[test]
fn ultra_two_users() {
    let json = r#"{"users":[{"id":1,"name":"Alice"},{"id":2,"name":"Bob"}]}"#;
    assert_eq!(
        ultra(json),
        "SCHEMA: i=id; n=name\nENCODE name: a=Alice; b=Bob\nu[2]{i,n}:\n  1,a\n  2,b"
    );
}

#[test]
fn ultra_without_categorical_fields_has_no_encode_block() {
    let json = r#"{"items":[{"id":1,"price":2.5},{"id":2,"price":3}]}"#;
    assert_eq!(ultra(json), "SCHEMA: i=id; p=price\ni[2]{i,p}:\n  1,2.5\n  2,3");
}

#[test]
fn ultra_team_roles_and_cities() {
    assert_eq!(
        ultra(TEAM),
        "SCHEMA: i=id; r=role; c=city\n\
         ENCODE role: a=analyst; d=designer; e=developer; n=engineer; m=manager\n\
         ENCODE city: b=Bangalore; c=Chennai; d=Delhi; h=Hyderabad; m=Mumbai\n\
         u[6]{i,r,c}:\n  1,e,d\n  2,d,m\n  3,m,d\n  4,a,c\n  5,n,b\n  6,e,h"
    );
}

#[test]
fn ultra_is_deterministic() {
    let first = ultra(TEAM);
    for _ in 0..5 {
        assert_eq!(ultra(TEAM), first);
    }
}

#[test]
fn ultra_row_lines_match_row_count() {
    let out = ultra(TEAM);
    let header = out.lines().find(|l| l.starts_with("u[")).unwrap();
    assert_eq!(header, "u[6]{i,r,c}:");
    assert_eq!(out.lines().filter(|l| l.starts_with("  ")).count(), 6);
}

// ============================================================================
// Categorical heuristic
// ============================================================================

#[test]
fn ultra_single_value_column_not_encoded() {
    let json = r#"{"t":[{"k":"x"},{"k":"x"}]}"#;
    assert_eq!(ultra(json), "SCHEMA: k=k\nt[2]{k}:\n  x\n  x");
}

#[test]
fn ultra_high_cardinality_column_not_encoded() {
    let rows: Vec<String> = (0..17).map(|i| format!(r#"{{"tag":"t{}"}}"#, i)).collect();
    let json = format!(r#"{{"tags":[{}]}}"#, rows.join(","));
    let out = ultra(&json);
    assert!(!out.contains("ENCODE"));
    assert!(out.contains("\n  t16"));
}

#[test]
fn ultra_sixteen_values_still_encoded() {
    let rows: Vec<String> = (0..16).map(|i| format!(r#"{{"tag":"t{}"}}"#, i)).collect();
    let json = format!(r#"{{"tags":[{}]}}"#, rows.join(","));
    assert!(ultra(&json).contains("ENCODE tag: "));
}

#[test]
fn ultra_mixed_type_column_not_encoded() {
    let json = r#"{"t":[{"v":"a"},{"v":1}]}"#;
    assert!(!ultra(json).contains("ENCODE"));
}

#[test]
fn ultra_boolean_column_not_encoded() {
    let json = r#"{"t":[{"ok":true},{"ok":false}]}"#;
    assert_eq!(ultra(json), "SCHEMA: o=ok\nt[2]{o}:\n  true\n  false");
}

#[test]
fn ultra_max_categories_is_configurable() {
    let config = UltraConfig::default().with_max_categories(4);
    let out = encode_ultra(TEAM, &config).unwrap();
    assert!(!out.contains("ENCODE"));
}

#[test]
fn ultra_large_max_categories_leaves_wide_columns_plain() {
    let rows: Vec<String> = (0..30).map(|i| format!(r#"{{"k":"v{}"}}"#, i)).collect();
    let json = format!(r#"{{"t":[{}]}}"#, rows.join(","));
    let config = UltraConfig::default().with_max_categories(40);
    let out = encode_ultra(&json, &config).unwrap();
    assert!(!out.contains("ENCODE"));
    assert!(out.ends_with("\n  v29"));
}

#[test]
fn ultra_codes_fold_case() {
    // "Apple" < "apple" in byte order; the second one falls to its next letter
    let json = r#"{"t":[{"f":"apple"},{"f":"Apple"}]}"#;
    assert_eq!(
        ultra(json),
        "SCHEMA: f=f\nENCODE f: a=Apple; p=apple\nt[2]{f}:\n  p\n  a"
    );
}

#[test]
fn ultra_values_without_letters_use_alphabet() {
    let json = r#"{"t":[{"zip":"456"},{"zip":"123"}]}"#;
    assert_eq!(
        ultra(json),
        "SCHEMA: z=zip\nENCODE zip: a=123; b=456\nt[2]{z}:\n  b\n  a"
    );
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn ultra_explicit_mapping_overrides_generated_codes() {
    let config = UltraConfig::default().with_value_encoding(
        "role",
        [
            ("developer", "D"),
            ("designer", "G"),
            ("manager", "M"),
            ("analyst", "A"),
            ("engineer", "E"),
        ],
    );
    let out = encode_ultra(TEAM, &config).unwrap();
    assert!(out.contains("ENCODE role: A=analyst; G=designer; D=developer; E=engineer; M=manager\n"));
    assert!(out.ends_with("  1,D,d\n  2,G,m\n  3,M,d\n  4,A,c\n  5,E,b\n  6,D,h"));
}

#[test]
fn ultra_explicit_mapping_lists_only_present_values() {
    let json = r#"{"t":[{"s":"open"},{"s":"closed"}]}"#;
    let config =
        UltraConfig::default().with_value_encoding("s", [("open", "O"), ("closed", "C"), ("archived", "X")]);
    assert_eq!(
        encode_ultra(json, &config).unwrap(),
        "SCHEMA: s=s\nENCODE s: C=closed; O=open\nt[2]{s}:\n  O\n  C"
    );
}

#[test]
fn ultra_unmapped_values_pass_through() {
    let json = r#"{"t":[{"s":"open"},{"s":"pending"}]}"#;
    let config = UltraConfig::default().with_value_encoding("s", [("open", "O")]);
    assert_eq!(
        encode_ultra(json, &config).unwrap(),
        "SCHEMA: s=s\nENCODE s: O=open\nt[2]{s}:\n  O\n  pending"
    );
}

#[test]
fn ultra_code_equal_to_unmapped_value_is_error() {
    let json = r#"{"t":[{"s":"x"},{"s":"y"}]}"#;
    let config = UltraConfig::default().with_value_encoding("s", [("x", "y")]);
    let err = encode_ultra(json, &config).unwrap_err();
    assert!(matches!(
        err,
        ToonError::AmbiguousCode { ref field, ref code } if field == "s" && code == "y"
    ));
}

#[test]
fn ultra_explicit_mapping_forces_field() {
    // A single-valued column is below the heuristic but still encoded
    let json = r#"{"t":[{"s":"open"},{"s":"open"}]}"#;
    let config = UltraConfig::default().with_value_encoding("s", [("open", "o")]);
    assert_eq!(
        encode_ultra(json, &config).unwrap(),
        "SCHEMA: s=s\nENCODE s: o=open\nt[2]{s}:\n  o\n  o"
    );
}

#[test]
fn ultra_explicit_mapping_without_matches_is_omitted() {
    let json = r#"{"t":[{"s":"open"},{"s":"open"}]}"#;
    let config = UltraConfig::default().with_value_encoding("s", [("closed", "c")]);
    assert_eq!(encode_ultra(json, &config).unwrap(), "SCHEMA: s=s\nt[2]{s}:\n  open\n  open");
}

#[test]
fn ultra_duplicate_explicit_code_is_error() {
    let config = UltraConfig::default().with_value_encoding("role", [("developer", "d"), ("designer", "d")]);
    let err = encode_ultra(TEAM, &config).unwrap_err();
    assert!(matches!(
        err,
        ToonError::DuplicateCode { ref field, ref code } if field == "role" && code == "d"
    ));
}

#[test]
fn ultra_unknown_override_field_is_error() {
    let config = UltraConfig::default().with_value_encoding("department", [("x", "x")]);
    let err = encode_ultra(TEAM, &config).unwrap_err();
    assert!(matches!(err, ToonError::UnknownField { ref field } if field == "department"));

    let config = UltraConfig::default().with_auto_encode_fields(["team"]);
    let err = encode_ultra(TEAM, &config).unwrap_err();
    assert!(matches!(err, ToonError::UnknownField { ref field } if field == "team"));
}

#[test]
fn ultra_forced_numeric_field() {
    let json = r#"{"t":[{"n":2},{"n":1},{"n":2}]}"#;
    let config = UltraConfig::default().with_auto_encode_fields(["n"]);
    assert_eq!(
        encode_ultra(json, &config).unwrap(),
        "SCHEMA: n=n\nENCODE n: a=1; b=2\nt[3]{n}:\n  b\n  a\n  b"
    );
}

#[test]
fn ultra_empty_field_list_disables_heuristic() {
    let json = r#"{"users":[{"id":1,"name":"Alice"},{"id":2,"name":"Bob"}]}"#;
    let config = UltraConfig::default().with_auto_encode_fields(Vec::<String>::new());
    assert_eq!(
        encode_ultra(json, &config).unwrap(),
        "SCHEMA: i=id; n=name\nu[2]{i,n}:\n  1,Alice\n  2,Bob"
    );
}

#[test]
fn ultra_forced_field_over_capacity_is_error() {
    let rows: Vec<String> = (0..27).map(|i| format!(r#"{{"k":"v{}"}}"#, i)).collect();
    let json = format!(r#"{{"t":[{}]}}"#, rows.join(","));
    let config = UltraConfig::default().with_auto_encode_fields(["k"]);
    let err = encode_ultra(&json, &config).unwrap_err();
    assert!(matches!(
        err,
        ToonError::TooManyCategories { ref field, count: 27 } if field == "k"
    ));
}

#[test]
fn ultra_forced_field_at_capacity_succeeds() {
    let rows: Vec<String> = (0..26).map(|i| format!(r#"{{"k":"v{}"}}"#, i)).collect();
    let json = format!(r#"{{"t":[{}]}}"#, rows.join(","));
    let config = UltraConfig::default().with_auto_encode_fields(["k"]);
    let out = encode_ultra(&json, &config).unwrap();
    let legend = out.lines().find(|l| l.starts_with("ENCODE k: ")).unwrap();
    assert_eq!(legend.split("; ").count(), 26);
}

// ============================================================================
// Aliases and keys
// ============================================================================

#[test]
fn ultra_resolves_alias_collisions_by_default() {
    let json = r#"{"t":[{"name":"a","notes":"b"}]}"#;
    assert_eq!(ultra(json), "SCHEMA: n=name; o=notes\nt[1]{n,o}:\n  a,b");
}

#[test]
fn ultra_leading_punctuation_aliases_kept_without_collision() {
    let json = r#"{"_users":[{"_id":1,"x":2}]}"#;
    assert_eq!(ultra(json), "SCHEMA: _=_id; x=x\n_[1]{_,x}:\n  1,2");
}

#[test]
fn ultra_first_char_policy_keeps_collisions() {
    let json = r#"{"t":[{"name":"a","notes":"b"}]}"#;
    let config = UltraConfig::default().with_alias_policy(AliasPolicy::FirstChar);
    assert_eq!(
        encode_ultra(json, &config).unwrap(),
        "SCHEMA: n=name; n=notes\nt[1]{n,n}:\n  a,b"
    );
}

#[test]
fn ultra_strict_keys_rejects_extra_keys() {
    let json = r#"{"users":[{"id":1}],"meta":[{"page":2}]}"#;
    let config = UltraConfig::default().with_key_policy(KeyPolicy::Strict);
    let err = encode_ultra(json, &config).unwrap_err();
    assert!(matches!(err, ToonError::MultipleKeys { ref keys } if keys == &["users", "meta"]));
}

#[test]
fn ultra_strict_keys_accepts_single_key() {
    let json = r#"{"users":[{"id":1}]}"#;
    let config = UltraConfig::default().with_key_policy(KeyPolicy::Strict);
    assert_eq!(encode_ultra(json, &config).unwrap(), "SCHEMA: i=id\nu[1]{i}:\n  1");
}

#[test]
fn ultra_empty_rows_is_error() {
    let err = encode_ultra(r#"{"users":[]}"#, &UltraConfig::default()).unwrap_err();
    assert!(matches!(err, ToonError::EmptyDataset { .. }));
}

// ============================================================================
// Config files
// ============================================================================

#[test]
fn config_from_json_applies_every_field() {
    let config = UltraConfig::from_json(
        r#"{
            "alias_policy": "first_char",
            "key_policy": "strict",
            "max_categories": 3,
            "value_encodings": {"role": {"developer": "D"}},
            "auto_encode_fields": ["city"]
        }"#,
    )
    .unwrap();
    assert_eq!(config.alias_policy, AliasPolicy::FirstChar);
    assert_eq!(config.key_policy, KeyPolicy::Strict);
    assert_eq!(config.max_categories, 3);
    assert_eq!(config.value_encodings["role"]["developer"], "D");
    assert_eq!(config.auto_encode_fields, Some(vec!["city".to_string()]));
}

#[test]
fn config_from_empty_json_is_default() {
    let config = UltraConfig::from_json("{}").unwrap();
    assert_eq!(config.alias_policy, AliasPolicy::Resolve);
    assert_eq!(config.key_policy, KeyPolicy::FirstKeyWins);
    assert_eq!(config.max_categories, 16);
    assert!(config.value_encodings.is_empty());
    assert!(config.auto_encode_fields.is_none());
}

#[test]
fn config_rejects_unknown_policy() {
    assert!(matches!(
        UltraConfig::from_json(r#"{"alias_policy":"random"}"#),
        Err(ToonError::JsonParse(_))
    ));
}
