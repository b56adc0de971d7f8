//! End-to-end tests: write a DBC file to disk, parse it back, then exercise
//! the payload codec against it.

use std::collections::HashMap;
use std::io::Write;

use can_codec::{BusType, CodecError, Database, ParseError};

const POWERTRAIN_DBC: &str = r#"VERSION "1.2"

NS_ :
    NS_DESC_
    CM_
    BA_DEF_
    BA_
    VAL_
    SIG_VALTYPE_

BS_:

BU_ ECM BCM TCU

BO_ 100 EngineData: 8 ECM
 SG_ EngineSpeed : 0|16@1+ (1,0) [0|65535] "rpm" BCM,TCU
 SG_ CoolantTemp : 16|8@1- (0.5,-10) [-50|77] "degC" BCM

BO_ 200 BrakeData: 8 BCM
 SG_ BrakePressure : 7|16@0+ (1,0) [0|65535] "kPa" Vector__XXX

BO_ 300 SensorData: 8 ECM
 SG_ AxleLoad : 0|32@1+ (1,0) [0|0] "kg" Vector__XXX

BO_ 400 ShortFrame: 7 ECM
 SG_ Counter : 0|8@1+ (1,0) [0|255] "" Vector__XXX

BA_DEF_ SG_  "GenSigStartValue" INT 0 65535;
BA_DEF_DEF_  "GenSigStartValue" 0;
BA_ "BusType" "CAN";
BA_ "GenSigStartValue" SG_ 100 EngineSpeed 800;

SIG_VALTYPE_ 300 AxleLoad : 1;

VAL_ 100 CoolantTemp 77 "Overheat" -50 "Sensor fault" ;
"#;

/// Writes `content` to a named temporary `.dbc` file and parses it.
fn parse_str(content: &str) -> Result<Database, ParseError> {
    let mut file = tempfile::Builder::new()
        .suffix(".dbc")
        .tempfile()
        .expect("temp dbc file");
    file.write_all(content.as_bytes()).expect("write dbc");
    can_codec::from_file(file.path().to_str().unwrap())
}

#[test]
fn test_parse_from_file() {
    let db = parse_str(POWERTRAIN_DBC).unwrap();
    assert_eq!(db.version, "1.2");
    assert_eq!(db.bus_type, BusType::Can);
    assert_eq!(db.messages.len(), 4);

    let engine = db.get_message_by_id(100).unwrap();
    assert_eq!(engine.name, "EngineData");
    assert_eq!(engine.sender, "ECM");
    assert_eq!(engine.message_size, 8);

    let speed = engine.signals(&db).next().unwrap();
    assert_eq!(speed.initial_value, Some(800.0));
    assert_eq!(speed.receivers, vec!["BCM".to_string(), "TCU".to_string()]);

    let temp = engine.signals(&db).nth(1).unwrap();
    assert_eq!(temp.value_descriptions.len(), 2);
}

#[test]
fn test_extension_check() {
    assert!(matches!(
        can_codec::from_file("database.txt"),
        Err(ParseError::InvalidExtension { .. })
    ));
    assert!(matches!(
        can_codec::from_file("no_such_file.dbc"),
        Err(ParseError::OpenFile { .. })
    ));
}

#[test]
fn test_decode_intel_and_motorola() {
    let db = parse_str(POWERTRAIN_DBC).unwrap();

    // Intel: 0x1234 little-endian in the first two bytes
    let values = db
        .decode(100, &[0x34, 0x12, 0x00, 0, 0, 0, 0, 0], 8)
        .unwrap();
    assert_eq!(values["EngineSpeed"], 4660.0);

    // Motorola forward MSB at start bit 7: big-endian bytes
    let values = db
        .decode(200, &[0x12, 0x34, 0, 0, 0, 0, 0, 0], 8)
        .unwrap();
    assert_eq!(values["BrakePressure"], 4660.0);
}

#[test]
fn test_decode_scaled_signed() {
    let db = parse_str(POWERTRAIN_DBC).unwrap();
    // CoolantTemp raw 0xFF sign-extends to -1: -1 * 0.5 - 10 = -10.5
    let values = db
        .decode(100, &[0x00, 0x00, 0xFF, 0, 0, 0, 0, 0], 8)
        .unwrap();
    assert_eq!(values["CoolantTemp"], -10.5);
}

#[test]
fn test_sig_valtype_switches_to_ieee_float() {
    let db = parse_str(POWERTRAIN_DBC).unwrap();
    // 1.0f32 = 0x3F800000, Intel byte order
    let values = db
        .decode(300, &[0x00, 0x00, 0x80, 0x3F, 0, 0, 0, 0], 8)
        .unwrap();
    assert_eq!(values["AxleLoad"], 1.0);

    let mut buffer = [0u8; 8];
    let dlc = db
        .encode(300, &[("AxleLoad".to_string(), 1.0)], &mut buffer)
        .unwrap();
    assert_eq!(dlc, 8);
    assert_eq!(buffer, [0x00, 0x00, 0x80, 0x3F, 0, 0, 0, 0]);
}

#[test]
fn test_length_mismatch() {
    let db = parse_str(POWERTRAIN_DBC).unwrap();
    let err = db.decode(400, &[0u8; 8], 8).unwrap_err();
    assert!(matches!(
        err,
        CodecError::LengthMismatch {
            expected: 7,
            actual: 8
        }
    ));
}

#[test]
fn test_encode_decode_roundtrip() {
    let db = parse_str(POWERTRAIN_DBC).unwrap();
    let assignments = vec![
        ("EngineSpeed".to_string(), 4660.0),
        ("CoolantTemp".to_string(), -10.5),
    ];

    let mut buffer = [0u8; 8];
    let dlc = db.encode(100, &assignments, &mut buffer).unwrap();
    assert_eq!(dlc, 8);

    let values: HashMap<String, f64> = db.decode(100, &buffer, dlc).unwrap();
    assert_eq!(values["EngineSpeed"], 4660.0);
    assert_eq!(values["CoolantTemp"], -10.5);
}

#[test]
fn test_unassigned_signal_encodes_initial_value() {
    let db = parse_str(POWERTRAIN_DBC).unwrap();
    let mut buffer = [0u8; 8];
    db.encode(100, &[("CoolantTemp".to_string(), 0.0)], &mut buffer)
        .unwrap();
    // EngineSpeed was not assigned: its raw initial value 800 is encoded
    let values = db.decode(100, &buffer, 8).unwrap();
    assert_eq!(values["EngineSpeed"], 800.0);
}

#[test]
fn test_out_of_range_encode_substitutes_initial_value() {
    let db = parse_str(POWERTRAIN_DBC).unwrap();
    let mut buffer = [0u8; 8];
    // 70000 exceeds the declared max of 65535
    db.encode(100, &[("EngineSpeed".to_string(), 70000.0)], &mut buffer)
        .unwrap();
    let values = db.decode(100, &buffer, 8).unwrap();
    assert_eq!(values["EngineSpeed"], 800.0);
}

#[test]
fn test_encode_unknown_signal() {
    let db = parse_str(POWERTRAIN_DBC).unwrap();
    let mut buffer = [0u8; 8];
    let err = db
        .encode(100, &[("NoSuchSignal".to_string(), 1.0)], &mut buffer)
        .unwrap_err();
    assert!(matches!(err, CodecError::UnknownSignal { .. }));
}

#[test]
fn test_encode_into_short_buffer_truncates() {
    let db = parse_str(POWERTRAIN_DBC).unwrap();
    let mut buffer = [0u8; 2];
    let dlc = db
        .encode(100, &[("EngineSpeed".to_string(), 4660.0)], &mut buffer)
        .unwrap();
    // declared size is still reported, payload truncated to capacity
    assert_eq!(dlc, 8);
    assert_eq!(buffer, [0x34, 0x12]);
}

#[test]
fn test_decode_single_signal_on_request() {
    let db = parse_str(POWERTRAIN_DBC).unwrap();
    let payload = [0x34, 0x12, 0x00, 0, 0, 0, 0, 0];
    let value = db.decode_signal(100, &payload, 8, "EngineSpeed").unwrap();
    assert_eq!(value, 4660.0);

    let err = db.decode_signal(100, &payload, 8, "Nope").unwrap_err();
    assert!(matches!(err, CodecError::UnknownSignal { .. }));
}

#[test]
fn test_multiplexed_signal_rejected() {
    let src = r#"BO_ 800 MuxMsg: 8 ECM
 SG_ Selector M : 0|4@1+ (1,0) [0|15] "" Vector__XXX
"#;
    assert!(matches!(
        parse_str(src),
        Err(ParseError::MultiplexedSignalUnsupported { name }) if name == "Selector"
    ));
}

#[test]
fn test_duplicate_signal_in_message_rejected() {
    let src = r#"BO_ 800 M: 8 ECM
 SG_ Twice : 0|8@1+ (1,0) [0|255] "" Vector__XXX
 SG_ Twice : 8|8@1+ (1,0) [0|255] "" Vector__XXX
"#;
    assert!(matches!(
        parse_str(src),
        Err(ParseError::DuplicateSignal { name }) if name == "Twice"
    ));
}

#[test]
fn test_value_type_order_is_enforced() {
    // SIG_VALTYPE_ before the message exists must fail
    let src = r#"SIG_VALTYPE_ 900 Late : 1;
BO_ 900 M: 8 ECM
 SG_ Late : 0|32@1+ (1,0) [0|0] "" Vector__XXX
"#;
    assert!(matches!(
        parse_str(src),
        Err(ParseError::UnknownMessage { id: 900 })
    ));
}

#[test]
fn test_can_fd_database() {
    let src = r#"BO_ 1000 WideFrame: 64 ECM
 SG_ TailCounter : 504|8@1+ (1,0) [0|255] "" Vector__XXX
BA_ "BusType" "CAN FD";
"#;
    let db = parse_str(src).unwrap();
    assert_eq!(db.bus_type, BusType::CanFd);

    let mut payload = [0u8; 64];
    let dlc = db
        .encode(1000, &[("TailCounter".to_string(), 0xA5 as f64)], &mut payload)
        .unwrap();
    assert_eq!(dlc, 64);
    assert_eq!(payload[63], 0xA5);

    let values = db.decode(1000, &payload, 64).unwrap();
    assert_eq!(values["TailCounter"], 0xA5 as f64);
}

#[test]
fn test_unknown_bus_type_rejected() {
    let src = r#"BA_ "BusType" "LIN";"#;
    assert!(matches!(
        parse_str(src),
        Err(ParseError::UnknownBusType { token }) if token == "LIN"
    ));
}

#[test]
fn test_describe_lists_messages_and_signals() {
    let db = parse_str(POWERTRAIN_DBC).unwrap();
    let dump = db.describe();
    assert!(dump.contains("<Message> EngineData 100"));
    assert!(dump.contains("<Signal> EngineSpeed"));
    assert!(dump.contains("INTEL"));
    assert!(dump.contains("MOTO"));
    assert!(dump.contains("rpm"));

    let empty = Database::default();
    assert!(empty.describe().contains("Empty library"));
}

#[test]
fn test_hex_and_octal_ids_accepted() {
    let src = r#"BO_ 0x10 HexId: 8 ECM
 SG_ A : 0|8@1+ (1,0) [0|255] "" Vector__XXX
BO_ 010 OctalId: 8 ECM
"#;
    let db = parse_str(src).unwrap();
    assert!(db.get_message_by_id(16).is_some());
    assert!(db.get_message_by_id(8).is_some());
}
