use super::*;
use crate::types::Uuid;
use std::str::FromStr;

fn text(value: MyValue) -> Value {
    decode_value(value, ColumnType::MYSQL_TYPE_VAR_STRING, false)
}

#[test]
fn empty_parameters_are_not_positional() {
    assert_eq!(encode_params(&[]), Params::Empty);
    assert_eq!(
        encode_params(&[Value::Int(1), Value::Null]),
        Params::Positional(vec![MyValue::Int(1), MyValue::NULL])
    );
}

#[test]
fn scalars_encode_as_wire_values() {
    assert_eq!(encode_value(Value::Bool(true)), MyValue::Int(1));
    assert_eq!(encode_value(Value::UInt(u64::MAX)), MyValue::UInt(u64::MAX));
    assert_eq!(encode_value(Value::Float(1.5)), MyValue::Double(1.5));
    assert_eq!(
        encode_value(Value::Text("hé".into())),
        MyValue::Bytes("hé".as_bytes().to_vec())
    );
}

#[test]
fn structured_values_encode_as_text() {
    let decimal = Decimal::from_str("12.50").unwrap();
    assert_eq!(
        encode_value(Value::Decimal(decimal)),
        MyValue::Bytes(b"12.50".to_vec())
    );

    let uuid = Uuid::nil();
    assert_eq!(
        encode_value(Value::Uuid(uuid)),
        MyValue::Bytes(b"00000000-0000-0000-0000-000000000000".to_vec())
    );

    let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    assert_eq!(
        encode_value(Value::DateTime(dt)),
        MyValue::Bytes(b"2024-03-01 10:00:00".to_vec())
    );
}

#[test]
fn numeric_columns_keep_their_sign() {
    assert_eq!(text(MyValue::Int(-3)), Value::Int(-3));
    assert_eq!(text(MyValue::UInt(3)), Value::UInt(3));
    assert_eq!(text(MyValue::Float(0.5)), Value::Float(0.5));
    assert_eq!(text(MyValue::NULL), Value::Null);
}

#[test]
fn decimal_columns_parse_exactly() {
    let value = decode_value(
        MyValue::Bytes(b"1.50".to_vec()),
        ColumnType::MYSQL_TYPE_NEWDECIMAL,
        false,
    );
    assert_eq!(value, Value::Decimal(Decimal::new(150, 2)));

    let garbage = decode_value(
        MyValue::Bytes(b"nope".to_vec()),
        ColumnType::MYSQL_TYPE_DECIMAL,
        false,
    );
    assert_eq!(garbage, Value::Bytes(b"nope".to_vec()));
}

#[test]
fn binary_columns_stay_bytes() {
    let bits = decode_value(MyValue::Bytes(vec![1]), ColumnType::MYSQL_TYPE_BIT, false);
    assert_eq!(bits, Value::Bytes(vec![1]));

    let blob = decode_value(
        MyValue::Bytes(b"abc".to_vec()),
        ColumnType::MYSQL_TYPE_BLOB,
        true,
    );
    assert_eq!(blob, Value::Bytes(b"abc".to_vec()));

    assert_eq!(
        text(MyValue::Bytes(b"abc".to_vec())),
        Value::Text("abc".into())
    );
    assert_eq!(text(MyValue::Bytes(vec![0xff])), Value::Bytes(vec![0xff]));
}

#[test]
fn dates_decode_to_datetimes() {
    let value = text(MyValue::Date(2024, 2, 29, 13, 5, 0, 250));
    let expected = NaiveDate::from_ymd_opt(2024, 2, 29)
        .unwrap()
        .and_hms_micro_opt(13, 5, 0, 250)
        .unwrap();
    assert_eq!(value, Value::DateTime(expected));

    assert_eq!(text(MyValue::Date(0, 0, 0, 0, 0, 0, 0)), Value::Null);
}

#[test]
fn times_decode_to_clock_text() {
    assert_eq!(
        text(MyValue::Time(false, 0, 8, 30, 0, 0)),
        Value::Text("08:30:00".into())
    );
    assert_eq!(
        text(MyValue::Time(true, 1, 2, 3, 4, 500)),
        Value::Text("-26:03:04.000500".into())
    );
}

#[test]
fn connect_rejects_bad_urls() {
    let err = MysqlDriver::connect("postgres://localhost/db").unwrap_err();

    assert!(!err.to_string().is_empty());
}
