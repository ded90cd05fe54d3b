use sbon::{Field, SbonError, Type, decode, encode};

fn encode_int(value: i64) -> bytes::Bytes {
    encode(|w| w.write_int(value)).unwrap()
}

fn encode_uint(value: u64) -> bytes::Bytes {
    encode(|w| w.write_uint(value)).unwrap()
}

#[test]
fn signed_boundaries_round_trip() {
    let values = [
        0,
        9,
        -9,
        10,
        -10,
        127,
        -127,
        1 << 31,
        -(1 << 31),
        i64::MAX,
        i64::MIN,
        -1,
    ];
    for value in values {
        let bytes = encode_int(value);
        let dec = decode(&bytes[..]);
        assert_eq!(dec.reader().get_i64().unwrap(), value, "value {value}");
    }
}

#[test]
fn unsigned_boundaries_round_trip() {
    for value in [0, 9, 10, 127, 1 << 31, 1 << 63, u64::MAX] {
        let bytes = encode_uint(value);
        let dec = decode(&bytes[..]);
        assert_eq!(dec.reader().get_u64().unwrap(), value, "value {value}");
    }
}

#[test]
fn small_integers_are_single_digits() {
    for value in 0..=9u64 {
        let bytes = encode_uint(value);
        assert_eq!(&bytes[..], &[b'0' + value as u8]);
        assert_eq!(&encode_int(value as i64)[..], &bytes[..]);
    }
    assert_eq!(&encode_uint(10)[..], b"+\x0a");
    assert_eq!(&encode_int(-1)[..], b"-\x01");
}

#[test]
fn i64_min_boundary() {
    let bytes = encode_int(i64::MIN);
    assert_eq!(&bytes[..], b"-\x80\x80\x80\x80\x80\x80\x80\x80\x80\x01");

    let dec = decode(&bytes[..]);
    assert_eq!(dec.reader().get_i64().unwrap(), i64::MIN);

    // Negative, so never a u64.
    let dec = decode(&bytes[..]);
    assert!(matches!(
        dec.reader().get_u64(),
        Err(SbonError::LossyNarrowing { target: "u64" })
    ));

    // One past i64::MIN only fits a wider integer.
    let past = b"-\x81\x80\x80\x80\x80\x80\x80\x80\x80\x01";
    assert!(matches!(
        decode(&past[..]).reader().get_i64(),
        Err(SbonError::LossyNarrowing { target: "i64" })
    ));
    assert_eq!(
        decode(&past[..]).reader().get_number::<i128>().unwrap(),
        i128::from(i64::MIN) - 1
    );
}

#[test]
fn floats_round_trip_bit_for_bit() {
    let doubles = [
        0.0f64,
        -0.0,
        1.5,
        -1e300,
        f64::MIN_POSITIVE,
        f64::INFINITY,
        f64::NEG_INFINITY,
    ];
    for value in doubles {
        let bytes = encode(|w| w.write_f64(value)).unwrap();
        let got = decode(&bytes[..]).reader().get_f64().unwrap();
        assert_eq!(got.to_bits(), value.to_bits());
    }
    for value in [0.25f32, -3.75, f32::MAX, f32::INFINITY, f32::NEG_INFINITY] {
        let bytes = encode(|w| w.write_f32(value)).unwrap();
        let got = decode(&bytes[..]).reader().get_f32().unwrap();
        assert_eq!(got.to_bits(), value.to_bits());
    }
}

#[test]
fn other_scalars_round_trip() {
    let bytes = encode(|w| {
        w.write_true()?;
        w.write_false()?;
        w.write_null()?;
        w.write_string("")?;
        w.write_string("héllo wörld")?;
        w.write_binary(&[])?;
        w.write_binary(&[0, 0xff, 0, b'}'])
    })
    .unwrap();

    let dec = decode(&bytes[..]);
    let r = dec.reader();
    assert!(r.get_bool().unwrap());
    assert!(!r.get_bool().unwrap());
    r.get_nil().unwrap();
    assert_eq!(r.get_string().unwrap(), "");
    assert_eq!(r.get_string().unwrap(), "héllo wörld");
    assert_eq!(r.get_binary().unwrap(), b"");
    assert_eq!(r.get_binary().unwrap(), [0, 0xff, 0, b'}']);
    assert!(!r.has_next().unwrap());
}

#[test]
fn narrowing_is_rejected() {
    let bytes = encode(|w| w.write_f64(1.5)).unwrap();
    assert!(matches!(
        decode(&bytes[..]).reader().get_i64(),
        Err(SbonError::LossyNarrowing { .. })
    ));

    let bytes = encode_uint(u64::MAX);
    assert!(matches!(
        decode(&bytes[..]).reader().get_number::<u32>(),
        Err(SbonError::LossyNarrowing { target: "u32" })
    ));
    assert!(matches!(
        decode(&bytes[..]).reader().get_number::<i32>(),
        Err(SbonError::LossyNarrowing { target: "i32" })
    ));

    // Integral floats convert cleanly.
    let bytes = encode(|w| w.write_f64(-42.0)).unwrap();
    assert_eq!(decode(&bytes[..]).reader().get_number::<i16>().unwrap(), -42);
}

#[test]
fn parent_writer_is_locked_inside_child() {
    let err = encode(|w| {
        w.write_array(|_arr| w.write_null())?;
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(err, SbonError::UseAfterChildActive));
    assert!(err.is_contract_violation());
}

#[test]
fn parent_reader_is_locked_inside_child() {
    let bytes = encode(|w| w.write_array(|arr| arr.write_uint(1))).unwrap();
    let dec = decode(&bytes[..]);
    let r = dec.reader();
    let err = r.get_array(|_arr| r.get_type()).unwrap_err();
    assert!(matches!(err, SbonError::UseAfterChildActive));
}

#[test]
fn match_object_skips_unknown_keys() {
    let bytes = encode(|w| {
        w.write_object(|obj| {
            obj.key("a")?.write_uint(1)?;
            obj.key("z")?.write_uint(99)?;
            obj.key("b")?.write_uint(2)
        })
    })
    .unwrap();

    let dec = decode(&bytes[..]);
    let calls = std::cell::RefCell::new(Vec::new());
    dec.reader()
        .match_object(&mut [
            Field::new("a", &mut |v| {
                calls.borrow_mut().push(("a", v.get_u64()?));
                Ok(())
            }),
            Field::new("b", &mut |v| {
                calls.borrow_mut().push(("b", v.get_u64()?));
                Ok(())
            }),
        ])
        .unwrap();
    assert_eq!(calls.into_inner(), [("a", 1), ("b", 2)]);
    assert!(!dec.reader().has_next().unwrap());
}

#[test]
fn skip_deeply_nested_value() {
    fn nest<B: bytes::BufMut>(w: sbon::Writer<'_, B>, depth: usize) -> sbon::Result<()> {
        if depth == 0 {
            return w.write_string("leaf");
        }
        if depth % 2 == 0 {
            w.write_array(|arr| {
                arr.write_binary(&[1, 2, 3])?;
                nest(arr, depth - 1)?;
                arr.write_f32(0.5)
            })
        } else {
            w.write_object(|obj| {
                obj.key("n")?.write_null()?;
                obj.field("child", |v| nest(v, depth - 1))?;
                obj.key("i")?.write_int(-300)
            })
        }
    }

    let bytes = encode(|w| nest(w, 40)).unwrap();
    let dec = decode(&bytes[..]);
    let r = dec.reader();
    r.skip().unwrap();
    assert!(!r.has_next().unwrap());
    assert!(dec.into_inner().is_empty());
}

#[test]
fn hello_document_end_to_end() {
    let bytes = encode(|w| {
        w.write_object(|obj| {
            obj.key("Hello")?.write_false()?;
            obj.key("Sub")?.write_object(|sub| sub.key("x")?.write_null())?;
            obj.key("last")?.write_true()
        })
    })
    .unwrap();
    assert_eq!(&bytes[..], b"{Hello\0FSub\0{x\0N}last\0T}");

    let dec = decode(&bytes[..]);
    let r = dec.reader();
    assert_eq!(r.get_type().unwrap(), Type::Object);
    r.get_object(|obj| {
        let (key, value) = obj.next()?;
        assert_eq!(key, "Hello");
        assert!(!value.get_bool()?);

        let (key, value) = obj.next()?;
        assert_eq!(key, "Sub");
        value.get_object(|sub| {
            let (key, value) = sub.next()?;
            assert_eq!(key, "x");
            value.get_nil()?;
            assert!(!sub.has_next()?);
            Ok(())
        })?;

        let (key, value) = obj.next()?;
        assert_eq!(key, "last");
        assert!(value.get_bool()?);

        assert!(!obj.has_next()?);
        Ok(())
    })
    .unwrap();
    assert!(!r.has_next().unwrap());
}

#[test]
fn decoder_limits_apply() {
    let bytes =
        encode(|w| w.write_array(|a| a.write_array(|b| b.write_array(|_| Ok(()))))).unwrap();
    let dec = sbon::Decoder::builder(&bytes[..]).max_depth(2).build();
    assert!(matches!(
        dec.reader().skip(),
        Err(SbonError::DepthLimitExceeded(2))
    ));

    let bytes = encode(|w| w.write_string("too long")).unwrap();
    let dec = sbon::Decoder::builder(&bytes[..]).max_length(4).build();
    assert!(matches!(
        dec.reader().get_string(),
        Err(SbonError::LengthLimitExceeded { limit: 4, .. })
    ));
}
