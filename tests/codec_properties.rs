//! Codec Property Tests
//!
//! Round trip: `cast(serialize(v)) == v` for values in each codec's domain.
//! Canonicalization: once a raw value has been cast and serialized, doing it
//! again changes nothing.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use typedmap::codec::{
    ArrayCodec, AttrValue, BinaryBooleanCodec, BooleanCodec, Codec, DateCodec, DateTimeCodec,
    DecimalCodec, EnumCodec, EnumMapping, IntegerCodec, Money, MoneyCodec, NestedCodec,
    StringCodec, TypeSpec,
};
use typedmap::{Attribute, Schema, SchemaBuilder, TypedView};

// =============================================================================
// Helper Functions
// =============================================================================

fn round_trip(codec: &dyn Codec, value: AttrValue) -> AttrValue {
    let raw = codec.serialize(&value).unwrap();
    codec.cast(&AttrValue::from_raw(raw)).unwrap()
}

fn canonical(codec: &dyn Codec, raw: Value) -> Value {
    let typed = codec.cast(&AttrValue::from_raw(raw)).unwrap();
    codec.serialize(&typed).unwrap()
}

fn decimal_strategy() -> impl Strategy<Value = Decimal> {
    (any::<i64>(), 0u32..=28)
        .prop_map(|(m, scale)| Decimal::from_i128_with_scale(i128::from(m), scale))
}

/// Raw JSON number with the decimal's exact text
fn number_text(d: Decimal) -> Value {
    serde_json::from_str(&d.to_string()).unwrap()
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    // 0001-01-01 through 9999-12-31
    (1i32..=3_652_059).prop_map(|days| NaiveDate::from_num_days_from_ce_opt(days).unwrap())
}

fn offset_strategy() -> impl Strategy<Value = FixedOffset> {
    // Whole minutes; timestamps carry no offset seconds
    (-14 * 60i32..=14 * 60).prop_map(|minutes| FixedOffset::east_opt(minutes * 60).unwrap())
}

fn datetime_strategy() -> impl Strategy<Value = DateTime<FixedOffset>> {
    // 1970 through late 9999, leaving room for any offset
    (0i64..253_402_000_000, 0u32..1_000_000_000, offset_strategy()).prop_map(
        |(secs, nanos, offset)| {
            DateTime::from_timestamp(secs, nanos)
                .unwrap()
                .with_timezone(&offset)
        },
    )
}

fn naive_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (date_strategy(), 0u32..86_400).prop_map(|(date, secs)| {
        date.and_time(NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap())
    })
}

fn contact_schema() -> Arc<Schema> {
    SchemaBuilder::new("Contact")
        .declare(Attribute::new("name").ty("string"))
        .unwrap()
        .declare(Attribute::new("age").field("Idade").ty("integer"))
        .unwrap()
        .build()
}

// =============================================================================
// Round Trip Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_integer_round_trip(i in any::<i64>()) {
        prop_assert_eq!(round_trip(&IntegerCodec, AttrValue::Int(i)), AttrValue::Int(i));
    }

    #[test]
    fn prop_string_round_trip(s in ".*") {
        prop_assert_eq!(round_trip(&StringCodec, AttrValue::from(s.clone())), AttrValue::from(s));
    }

    #[test]
    fn prop_boolean_round_trip(b in any::<bool>()) {
        prop_assert_eq!(round_trip(&BooleanCodec, AttrValue::Bool(b)), AttrValue::Bool(b));
    }

    #[test]
    fn prop_decimal_round_trip(d in decimal_strategy()) {
        prop_assert_eq!(round_trip(&DecimalCodec, AttrValue::Decimal(d)), AttrValue::Decimal(d));
    }

    #[test]
    fn prop_date_round_trip(d in date_strategy()) {
        prop_assert_eq!(round_trip(&DateCodec, AttrValue::Date(d)), AttrValue::Date(d));
    }

    #[test]
    fn prop_datetime_round_trip(dt in datetime_strategy()) {
        let codec = DateTimeCodec::new(None);
        prop_assert_eq!(round_trip(&codec, AttrValue::DateTime(dt)), AttrValue::DateTime(dt));
    }

    #[test]
    fn prop_datetime_round_trip_with_fallback(
        dt in datetime_strategy(),
        fallback in offset_strategy(),
    ) {
        let codec = DateTimeCodec::new(Some(fallback));
        let value = AttrValue::DateTime(dt);
        prop_assert_eq!(round_trip(&codec, value.clone()), value);
    }

    #[test]
    fn prop_money_round_trip(m in any::<i64>(), scale in 0u32..=2) {
        let codec = MoneyCodec::new("USD", 2);
        let value = AttrValue::Money(Money::new(Decimal::new(m, scale), "USD"));
        prop_assert_eq!(round_trip(&codec, value.clone()), value);
    }

    #[test]
    fn prop_binary_boolean_round_trip(b in any::<bool>()) {
        prop_assert_eq!(round_trip(&BinaryBooleanCodec, AttrValue::Bool(b)), AttrValue::Bool(b));
    }

    #[test]
    fn prop_enum_round_trip(
        keys in prop::collection::btree_set("[a-z]{1,8}", 1..6),
        pick in any::<prop::sample::Index>(),
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mapping = EnumMapping::new(
            keys.iter().enumerate().map(|(code, key)| (key.clone(), json!(code))),
        )
        .unwrap();
        let codec = EnumCodec::new(mapping);
        let key = AttrValue::symbol(pick.get(&keys).as_str());
        prop_assert_eq!(round_trip(&codec, key.clone()), key);
    }

    #[test]
    fn prop_nested_view_round_trip(name in "[A-Za-z ]{0,12}", age in any::<i64>()) {
        let schema = contact_schema();
        let mut view = TypedView::new(&schema, json!({})).unwrap();
        view.set("name", name).unwrap();
        view.set("age", age).unwrap();

        let codec = NestedCodec::new(Arc::clone(&schema));
        let value = AttrValue::View(view);
        prop_assert_eq!(round_trip(&codec, value.clone()), value);
    }

    #[test]
    fn prop_integer_array_round_trip(items in prop::collection::vec(any::<i64>(), 0..8)) {
        let codec = ArrayCodec::new(Arc::new(IntegerCodec));
        let value = AttrValue::list(items.iter().copied().map(AttrValue::Int));
        prop_assert_eq!(round_trip(&codec, value.clone()), value);
    }
}

// =============================================================================
// Canonicalization Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_integer_text_canonicalizes(i in any::<i64>()) {
        let once = canonical(&IntegerCodec, Value::String(i.to_string()));
        prop_assert_eq!(&once, &json!(i));
        prop_assert_eq!(canonical(&IntegerCodec, once.clone()), once);
    }

    #[test]
    fn prop_string_from_number_canonicalizes(i in any::<i64>()) {
        let once = canonical(&StringCodec, json!(i));
        prop_assert_eq!(&once, &Value::String(i.to_string()));
        prop_assert_eq!(canonical(&StringCodec, once.clone()), once);
    }

    #[test]
    fn prop_decimal_text_canonicalizes(d in decimal_strategy()) {
        let once = canonical(&DecimalCodec, Value::String(d.to_string()));
        prop_assert_eq!(canonical(&DecimalCodec, once.clone()), once);
    }

    #[test]
    fn prop_decimal_number_canonicalizes(d in decimal_strategy()) {
        let once = canonical(&DecimalCodec, number_text(d));
        prop_assert_eq!(canonical(&DecimalCodec, once.clone()), once.clone());
        let back = DecimalCodec.cast(&AttrValue::from_raw(once)).unwrap();
        prop_assert_eq!(back, AttrValue::Decimal(d));
    }

    #[test]
    fn prop_money_canonicalizes(m in any::<i64>(), scale in 0u32..=6) {
        let codec = MoneyCodec::new("USD", 2);
        let once = canonical(&codec, number_text(Decimal::new(m, scale)));
        prop_assert_eq!(canonical(&codec, once.clone()), once);
    }

    #[test]
    fn prop_binary_boolean_canonicalizes(i in 0i64..=1, as_bool in any::<bool>()) {
        let raw = if as_bool { json!(i == 1) } else { json!(i) };
        let once = canonical(&BinaryBooleanCodec, raw);
        prop_assert_eq!(&once, &Value::String(i.to_string()));
        prop_assert_eq!(canonical(&BinaryBooleanCodec, once.clone()), once);
    }

    #[test]
    fn prop_datetime_text_canonicalizes(dt in datetime_strategy()) {
        let codec = DateTimeCodec::new(None);
        let once = canonical(&codec, Value::String(dt.to_rfc3339()));
        prop_assert_eq!(canonical(&codec, once.clone()), once);
    }

    #[test]
    fn prop_naive_datetime_canonicalizes(naive in naive_strategy(), offset in offset_strategy()) {
        let codec = DateTimeCodec::new(Some(offset));
        let text = naive.format("%Y-%m-%dT%H:%M:%S").to_string();
        let once = canonical(&codec, Value::String(text.clone()));
        let expected = format!("{}{}", text, offset);
        prop_assert_eq!(&once, &Value::String(expected));
        prop_assert_eq!(canonical(&codec, once.clone()), once);
    }

    #[test]
    fn prop_boolean_int_canonicalizes(i in 0i64..=1) {
        let once = canonical(&BooleanCodec, json!(i));
        prop_assert_eq!(&once, &json!(i == 1));
        prop_assert_eq!(canonical(&BooleanCodec, once.clone()), once);
    }

    #[test]
    fn prop_date_from_timestamp_canonicalizes(d in date_strategy()) {
        let raw = Value::String(format!("{}T12:30:00Z", d.format("%Y-%m-%d")));
        let once = canonical(&DateCodec, raw);
        prop_assert_eq!(&once, &Value::String(d.format("%Y-%m-%d").to_string()));
        prop_assert_eq!(canonical(&DateCodec, once.clone()), once);
    }
}

// =============================================================================
// Enum Duality Property
// =============================================================================

proptest! {
    #[test]
    fn prop_enum_key_and_code_store_same_raw(index in 0usize..3) {
        let keys = ["red", "green", "blue"];
        let schema = SchemaBuilder::new("Paint")
            .declare(Attribute::new("color").ty(TypeSpec::enum_of([
                ("red", json!(0)),
                ("green", json!(1)),
                ("blue", json!(2)),
            ])))
            .unwrap()
            .build();
        let mut by_key = TypedView::new(&schema, json!({})).unwrap();
        let mut by_code = TypedView::new(&schema, json!({})).unwrap();

        by_key.set("color", AttrValue::symbol(keys[index])).unwrap();
        by_code.set("color", json!(index)).unwrap();

        prop_assert_eq!(by_key.raw(), by_code.raw());
        prop_assert_eq!(by_key.get("color").unwrap(), AttrValue::symbol(keys[index]));
    }
}
