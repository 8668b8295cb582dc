use crate::decimal_arith::wrap_to_i64;
use crate::gfunction_helpers::{
    byte_array, check_bounds, int_arg, object_arg, optional_object_arg, string_arg, string_value,
};
use jacobin_core::java_exception::{get_error_block, ErrorBlock, ExceptionKind};
use jacobin_core::jvm_values::{host_bytes_from_java_bytes, java_bytes_from_host_bytes, ObjectRef, Value};
use jacobin_core::native_method_area::{trap_function, with_gfunction_table, GFunctionResult};
use jacobin_core::object::{
    clear_field_table, make_2_elem_ref_array, make_array_object, make_primitive_object, FieldValue,
    Object, BIG_INTEGER_DESCRIPTOR,
};
use jacobin_core::static_field_area::preload_class_statics;
use log::debug;
use num_bigint::{BigInt, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rand::rngs::OsRng;

pub const BIG_INTEGER_CLASS: &str = "java/math/BigInteger";

const RADIX_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SMALL_PRIMES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
const PRIME_ROUNDS: u32 = 40;

fn signum_of(v: &BigInt) -> i64 {
    match v.sign() {
        Sign::Minus => -1,
        Sign::NoSign => 0,
        Sign::Plus => 1,
    }
}

pub fn make_big_integer(v: BigInt) -> ObjectRef {
    let signum = signum_of(&v);
    let obj = make_primitive_object(BIG_INTEGER_CLASS, BIG_INTEGER_DESCRIPTOR, FieldValue::BigInt(v));
    obj.set_field("signum", "I", FieldValue::Int(signum));
    obj
}

/// Re-initialises a receiver in place, as the constructors do.
pub fn set_big_integer(obj: &Object, v: BigInt) {
    clear_field_table(obj);
    obj.set_field("signum", "I", FieldValue::Int(signum_of(&v)));
    obj.set_field("value", BIG_INTEGER_DESCRIPTOR, FieldValue::BigInt(v));
}

pub fn big_integer_value(obj: &Object, who: &str) -> Result<BigInt, ErrorBlock> {
    match obj.get_field_value("value") {
        Some(FieldValue::BigInt(v)) => Ok(v),
        _ => Err(get_error_block(
            ExceptionKind::IllegalArgumentException,
            format!("{}: object is not a BigInteger", who),
        )),
    }
}

/// `BigInteger.hashCode()`: big-endian 32-bit words of the magnitude, folded with 31.
pub fn java_big_integer_hash(v: &BigInt) -> i32 {
    let bytes = v.magnitude().to_bytes_be();
    let head = bytes.len() % 4;
    let mut words: Vec<&[u8]> = Vec::new();
    if head > 0 {
        words.push(&bytes[..head]);
    }
    words.extend(bytes[head..].chunks(4));
    let hash = words.iter().fold(0i32, |h, word| {
        let w = word.iter().fold(0u32, |acc, b| (acc << 8) | *b as u32);
        h.wrapping_mul(31).wrapping_add(w as i32)
    });
    hash.wrapping_mul(signum_of(v) as i32)
}

/// Digits `0-9a-zA-Z`, so radixes up to 62.
pub fn to_string_radix(v: &BigInt, radix: u32) -> String {
    let (sign, digits) = v.to_radix_be(radix);
    let mut out = String::with_capacity(digits.len() + 1);
    if sign == Sign::Minus {
        out.push('-');
    }
    out.extend(digits.iter().map(|d| RADIX_DIGITS[*d as usize] as char));
    out
}

/// Java's `new BigInteger(String, radix)`: an optional sign then digits only.
pub fn parse_big_integer(text: &str, radix: i64) -> Result<BigInt, ErrorBlock> {
    let nfe = |msg: String| get_error_block(ExceptionKind::NumberFormatException, msg);
    if !(2..=36).contains(&radix) {
        return Err(nfe("Radix out of range".to_string()));
    }
    let radix = radix as u32;
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if digits.is_empty() {
        return Err(nfe("Zero length BigInteger".to_string()));
    }
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(nfe(format!("For input string: \"{}\"", text)));
    }
    BigInt::parse_bytes(text.as_bytes(), radix)
        .ok_or_else(|| nfe(format!("For input string: \"{}\"", text)))
}

fn arithmetic(msg: &str) -> ErrorBlock {
    get_error_block(ExceptionKind::ArithmeticException, msg)
}

/// Miller-Rabin with random bases.
pub fn is_probable_prime(n: &BigInt, rounds: u32) -> bool {
    let two = BigInt::from(2u8);
    if n < &two {
        return false;
    }
    for p in SMALL_PRIMES {
        let p = BigInt::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }
    let n_minus_one: BigInt = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s as usize;
    let mut rng = OsRng;
    'witness: for _ in 0..rounds {
        let a = rng.gen_bigint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// A random probable prime of exactly `bit_length` bits.
pub fn probable_prime(bit_length: i64) -> Result<BigInt, ErrorBlock> {
    if bit_length < 2 {
        return Err(arithmetic("bitLength < 2"));
    }
    let bits = bit_length as u64;
    let mut rng = OsRng;
    loop {
        let mut candidate = BigInt::from(rng.gen_biguint(bits));
        candidate |= BigInt::one() << (bits - 1) as usize;
        if bits > 2 {
            candidate |= BigInt::one();
        }
        if is_probable_prime(&candidate, PRIME_ROUNDS) {
            debug!("probable prime of {} bits found", bits);
            return Ok(candidate);
        }
    }
}

pub fn next_probable_prime(start: &BigInt) -> Result<BigInt, ErrorBlock> {
    if start.is_negative() {
        return Err(arithmetic(&format!("start < 0: {}", start)));
    }
    let mut candidate: BigInt = start + 1u32;
    if candidate <= BigInt::from(2u8) {
        return Ok(BigInt::from(2u8));
    }
    if candidate.is_even() {
        candidate += 1;
    }
    while !is_probable_prime(&candidate, PRIME_ROUNDS) {
        candidate += 2;
    }
    Ok(candidate)
}

pub fn mod_inverse(v: &BigInt, m: &BigInt) -> Result<BigInt, ErrorBlock> {
    if !m.is_positive() {
        return Err(arithmetic("BigInteger: modulus not positive"));
    }
    let (mut old_r, mut r) = (v.mod_floor(m), m.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }
    if !old_r.is_one() {
        return Err(arithmetic("BigInteger not invertible."));
    }
    Ok(old_s.mod_floor(m))
}

fn bit_address(n: i64) -> Result<usize, ErrorBlock> {
    usize::try_from(n).map_err(|_| arithmetic("Negative bit address"))
}

/// Java's `bitLength`: minimal two's-complement width excluding the sign bit.
pub fn java_bit_length(v: &BigInt) -> u64 {
    if v.is_negative() {
        (-v - 1u8).bits()
    } else {
        v.bits()
    }
}

fn this_value(args: &[Value], who: &str) -> Result<BigInt, ErrorBlock> {
    let obj = object_arg(args, 0, who)?;
    big_integer_value(&obj, who)
}

fn other_value(args: &[Value], index: usize, who: &str) -> Result<BigInt, ErrorBlock> {
    let obj = object_arg(args, index, who)?;
    big_integer_value(&obj, who)
}

fn big_result(v: BigInt) -> GFunctionResult {
    Ok(Some(Value::ObjectRef(make_big_integer(v))))
}

fn binary_op(
    args: &[Value],
    who: &str,
    op: impl FnOnce(BigInt, BigInt) -> Result<BigInt, ErrorBlock>,
) -> GFunctionResult {
    let a = this_value(args, who)?;
    let b = other_value(args, 1, who)?;
    big_result(op(a, b)?)
}

fn positive_divisor(b: &BigInt, msg: &str) -> Result<(), ErrorBlock> {
    if b.is_positive() {
        Ok(())
    } else {
        Err(arithmetic(msg))
    }
}

fn big_integer_clinit(_args: &[Value]) -> GFunctionResult {
    preload_class_statics(
        BIG_INTEGER_CLASS,
        [("ZERO", 0u8), ("ONE", 1), ("TWO", 2), ("TEN", 10)]
            .into_iter()
            .map(|(name, v)| {
                (name, BIG_INTEGER_DESCRIPTOR, Value::ObjectRef(make_big_integer(BigInt::from(v))))
            })
            .collect(),
    );
    Ok(None)
}

fn big_integer_init_byte_array(args: &[Value]) -> GFunctionResult {
    let who = "BigInteger.<init>([B)";
    let this = object_arg(args, 0, who)?;
    let bytes = byte_array(&object_arg(args, 1, who)?, who)?;
    if bytes.is_empty() {
        return Err(get_error_block(ExceptionKind::NumberFormatException, "Zero length BigInteger"));
    }
    set_big_integer(&this, BigInt::from_signed_bytes_be(&host_bytes_from_java_bytes(&bytes)));
    Ok(None)
}

fn big_integer_init_byte_array_range(args: &[Value]) -> GFunctionResult {
    let who = "BigInteger.<init>([BII)";
    let this = object_arg(args, 0, who)?;
    let bytes = byte_array(&object_arg(args, 1, who)?, who)?;
    let (off, len) = check_bounds(bytes.len(), int_arg(args, 2, who)?, int_arg(args, 3, who)?, who)?;
    if len == 0 {
        return Err(get_error_block(ExceptionKind::NumberFormatException, "Zero length BigInteger"));
    }
    let slice = host_bytes_from_java_bytes(&bytes[off..off + len]);
    set_big_integer(&this, BigInt::from_signed_bytes_be(&slice));
    Ok(None)
}

fn big_integer_init_signum_magnitude(args: &[Value]) -> GFunctionResult {
    let who = "BigInteger.<init>(I[B)";
    let this = object_arg(args, 0, who)?;
    let signum = int_arg(args, 1, who)?;
    let magnitude = BigInt::from_bytes_be(
        Sign::Plus,
        &host_bytes_from_java_bytes(&byte_array(&object_arg(args, 2, who)?, who)?),
    );
    let value = match signum {
        -1 => -magnitude,
        1 => magnitude,
        0 if magnitude.is_zero() => magnitude,
        0 => {
            return Err(get_error_block(
                ExceptionKind::NumberFormatException,
                "signum-magnitude mismatch",
            ))
        }
        _ => return Err(get_error_block(ExceptionKind::NumberFormatException, "Invalid signum value")),
    };
    set_big_integer(&this, value);
    Ok(None)
}

fn big_integer_init_probable_prime(args: &[Value]) -> GFunctionResult {
    let who = "BigInteger.<init>(IILjava/util/Random;)";
    let this = object_arg(args, 0, who)?;
    let prime = probable_prime(int_arg(args, 1, who)?)?;
    set_big_integer(&this, prime);
    Ok(None)
}

fn big_integer_init_random(args: &[Value]) -> GFunctionResult {
    let who = "BigInteger.<init>(ILjava/util/Random;)";
    let this = object_arg(args, 0, who)?;
    let num_bits = int_arg(args, 1, who)?;
    if num_bits < 0 {
        return Err(get_error_block(
            ExceptionKind::IllegalArgumentException,
            "numBits must be non-negative",
        ));
    }
    let value = BigInt::from(OsRng.gen_biguint(num_bits as u64));
    set_big_integer(&this, value);
    Ok(None)
}

fn big_integer_init_string(args: &[Value]) -> GFunctionResult {
    let who = "BigInteger.<init>(Ljava/lang/String;)";
    let this = object_arg(args, 0, who)?;
    let value = parse_big_integer(&string_arg(args, 1, who)?, 10)?;
    set_big_integer(&this, value);
    Ok(None)
}

fn big_integer_init_string_radix(args: &[Value]) -> GFunctionResult {
    let who = "BigInteger.<init>(Ljava/lang/String;I)";
    let this = object_arg(args, 0, who)?;
    let value = parse_big_integer(&string_arg(args, 1, who)?, int_arg(args, 2, who)?)?;
    set_big_integer(&this, value);
    Ok(None)
}

fn big_integer_abs(args: &[Value]) -> GFunctionResult {
    big_result(this_value(args, "BigInteger.abs")?.abs())
}

fn big_integer_add(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigInteger.add", |a, b| Ok(a + b))
}

fn big_integer_and(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigInteger.and", |a, b| Ok(a & b))
}

fn big_integer_and_not(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigInteger.andNot", |a, b| Ok(a & !b))
}

fn big_integer_bit_count(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.bitCount")?;
    Ok(Some(Value::Int(v.magnitude().count_ones() as i64)))
}

fn big_integer_bit_length(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.bitLength")?;
    Ok(Some(Value::Int(java_bit_length(&v) as i64)))
}

fn big_integer_byte_value_exact(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.byteValueExact")?;
    match v.to_i64() {
        Some(b @ 0..=255) => Ok(Some(Value::Int(b as u8 as i8 as i64))),
        _ => Err(arithmetic("BigInteger out of byte range")),
    }
}

fn big_integer_clear_bit(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.clearBit")?;
    let n = bit_address(int_arg(args, 1, "BigInteger.clearBit")?)?;
    big_result(v & !(BigInt::one() << n))
}

fn big_integer_compare_to(args: &[Value]) -> GFunctionResult {
    let a = this_value(args, "BigInteger.compareTo")?;
    let b = other_value(args, 1, "BigInteger.compareTo")?;
    Ok(Some(Value::Int(a.cmp(&b) as i64)))
}

fn big_integer_divide(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigInteger.divide", |a, b| {
        positive_divisor(&b, "BigInteger divide by zero or negative divisor")?;
        Ok(a / b)
    })
}

fn big_integer_divide_and_remainder(args: &[Value]) -> GFunctionResult {
    let who = "BigInteger.divideAndRemainder";
    let a = this_value(args, who)?;
    let b = other_value(args, 1, who)?;
    positive_divisor(&b, "BigInteger divide by zero or negative divisor")?;
    let (q, r) = a.div_rem(&b);
    Ok(Some(Value::ObjectRef(make_2_elem_ref_array(
        "[Ljava/math/BigInteger;",
        Value::ObjectRef(make_big_integer(q)),
        Value::ObjectRef(make_big_integer(r)),
    ))))
}

fn big_integer_double_value(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.doubleValue")?;
    Ok(Some(Value::Float(v.to_f64().unwrap_or(f64::NAN))))
}

fn big_integer_float_value(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.floatValue")?;
    Ok(Some(Value::Float(v.to_f32().unwrap_or(f32::NAN) as f64)))
}

fn big_integer_equals(args: &[Value]) -> GFunctionResult {
    let who = "BigInteger.equals";
    let a = this_value(args, who)?;
    let equal = match optional_object_arg(args, 1, who)? {
        Some(other) if other.class_name() == BIG_INTEGER_CLASS => {
            big_integer_value(&other, who).is_ok_and(|b| a == b)
        }
        _ => false,
    };
    Ok(Some(Value::bool(equal)))
}

fn big_integer_flip_bit(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.flipBit")?;
    let n = bit_address(int_arg(args, 1, "BigInteger.flipBit")?)?;
    big_result(v ^ (BigInt::one() << n))
}

fn big_integer_gcd(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigInteger.gcd", |a, b| Ok(a.gcd(&b)))
}

fn big_integer_get_lowest_set_bit(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.getLowestSetBit")?;
    let lowest = v.magnitude().trailing_zeros().map_or(-1, |n| n as i64);
    Ok(Some(Value::Int(lowest)))
}

fn big_integer_hash_code(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.hashCode")?;
    Ok(Some(Value::Int(java_big_integer_hash(&v) as i64)))
}

fn big_integer_int_value(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.intValue")?;
    Ok(Some(Value::Int(wrap_to_i64(&v) as i32 as i64)))
}

fn big_integer_int_value_exact(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.intValueExact")?;
    let exact = v.to_i32().ok_or_else(|| arithmetic("BigInteger out of int range"))?;
    Ok(Some(Value::Int(exact as i64)))
}

fn big_integer_is_probable_prime(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.isProbablePrime")?;
    let certainty = int_arg(args, 1, "BigInteger.isProbablePrime")?;
    if certainty <= 0 {
        return Ok(Some(Value::bool(true)));
    }
    let rounds = ((certainty + 1) / 2).clamp(1, PRIME_ROUNDS as i64) as u32;
    Ok(Some(Value::bool(is_probable_prime(&v.abs(), rounds))))
}

fn big_integer_long_value(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.longValue")?;
    Ok(Some(Value::Int(wrap_to_i64(&v))))
}

fn big_integer_long_value_exact(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.longValueExact")?;
    let exact = v.to_i64().ok_or_else(|| arithmetic("BigInteger out of long range"))?;
    Ok(Some(Value::Int(exact)))
}

fn big_integer_max(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigInteger.max", |a, b| Ok(a.max(b)))
}

fn big_integer_min(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigInteger.min", |a, b| Ok(a.min(b)))
}

fn big_integer_mod(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigInteger.mod", |a, m| {
        positive_divisor(&m, "BigInteger: modulus not positive")?;
        Ok(a.mod_floor(&m))
    })
}

fn big_integer_mod_inverse(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigInteger.modInverse", |a, m| mod_inverse(&a, &m))
}

fn big_integer_mod_pow(args: &[Value]) -> GFunctionResult {
    let who = "BigInteger.modPow";
    let base = this_value(args, who)?;
    let exponent = other_value(args, 1, who)?;
    let m = other_value(args, 2, who)?;
    positive_divisor(&m, "BigInteger: modulus not positive")?;
    let result = if exponent.is_negative() {
        mod_inverse(&base, &m)?.modpow(&-exponent, &m)
    } else {
        base.mod_floor(&m).modpow(&exponent, &m)
    };
    big_result(result.mod_floor(&m))
}

fn big_integer_multiply(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigInteger.multiply", |a, b| Ok(a * b))
}

fn big_integer_multiply_long(args: &[Value]) -> GFunctionResult {
    let a = this_value(args, "BigInteger.multiply")?;
    let b = int_arg(args, 1, "BigInteger.multiply")?;
    big_result(a * b)
}

fn big_integer_negate(args: &[Value]) -> GFunctionResult {
    big_result(-this_value(args, "BigInteger.negate")?)
}

fn big_integer_next_probable_prime(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.nextProbablePrime")?;
    big_result(next_probable_prime(&v)?)
}

fn big_integer_not(args: &[Value]) -> GFunctionResult {
    big_result(!this_value(args, "BigInteger.not")?)
}

fn big_integer_or(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigInteger.or", |a, b| Ok(a | b))
}

fn big_integer_pow(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.pow")?;
    let n = int_arg(args, 1, "BigInteger.pow")?;
    let exponent = u32::try_from(n).map_err(|_| arithmetic("Negative exponent"))?;
    big_result(v.pow(exponent))
}

fn big_integer_probable_prime(args: &[Value]) -> GFunctionResult {
    big_result(probable_prime(int_arg(args, 0, "BigInteger.probablePrime")?)?)
}

fn big_integer_remainder(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigInteger.remainder", |a, b| {
        positive_divisor(&b, "BigInteger divide by zero or negative divisor")?;
        Ok(a % b)
    })
}

fn big_integer_set_bit(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.setBit")?;
    let n = bit_address(int_arg(args, 1, "BigInteger.setBit")?)?;
    big_result(v | (BigInt::one() << n))
}

fn shift(v: BigInt, n: i64) -> BigInt {
    if n >= 0 {
        v << n as usize
    } else {
        v >> n.unsigned_abs() as usize
    }
}

fn big_integer_shift_left(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.shiftLeft")?;
    big_result(shift(v, int_arg(args, 1, "BigInteger.shiftLeft")?))
}

fn big_integer_shift_right(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.shiftRight")?;
    let n = int_arg(args, 1, "BigInteger.shiftRight")?;
    big_result(shift(v, n.saturating_neg()))
}

fn big_integer_short_value_exact(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.shortValueExact")?;
    let exact = v.to_i16().ok_or_else(|| arithmetic("BigInteger out of short range"))?;
    Ok(Some(Value::Int(exact as i64)))
}

fn big_integer_signum(args: &[Value]) -> GFunctionResult {
    Ok(Some(Value::Int(signum_of(&this_value(args, "BigInteger.signum")?))))
}

fn checked_sqrt(v: &BigInt) -> Result<BigInt, ErrorBlock> {
    if v.is_negative() {
        return Err(arithmetic("Negative BigInteger"));
    }
    Ok(v.sqrt())
}

fn big_integer_sqrt(args: &[Value]) -> GFunctionResult {
    big_result(checked_sqrt(&this_value(args, "BigInteger.sqrt")?)?)
}

fn big_integer_sqrt_and_remainder(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.sqrtAndRemainder")?;
    let root = checked_sqrt(&v)?;
    let rem = &v - &root * &root;
    Ok(Some(Value::ObjectRef(make_2_elem_ref_array(
        "[Ljava/math/BigInteger;",
        Value::ObjectRef(make_big_integer(root)),
        Value::ObjectRef(make_big_integer(rem)),
    ))))
}

fn big_integer_subtract(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigInteger.subtract", |a, b| Ok(a - b))
}

fn big_integer_test_bit(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.testBit")?;
    let n = bit_address(int_arg(args, 1, "BigInteger.testBit")?)?;
    Ok(Some(Value::bool(!((v >> n) & BigInt::one()).is_zero())))
}

fn big_integer_to_byte_array(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.toByteArray")?;
    let bytes = java_bytes_from_host_bytes(&v.to_signed_bytes_be());
    Ok(Some(Value::ObjectRef(make_array_object("[B", FieldValue::Bytes(bytes)))))
}

fn big_integer_to_string(args: &[Value]) -> GFunctionResult {
    Ok(Some(string_value(&this_value(args, "BigInteger.toString")?.to_string())))
}

fn big_integer_to_string_radix(args: &[Value]) -> GFunctionResult {
    let v = this_value(args, "BigInteger.toString")?;
    let radix = int_arg(args, 1, "BigInteger.toString")?;
    if !(2..=62).contains(&radix) {
        return Err(get_error_block(
            ExceptionKind::IllegalArgumentException,
            format!("Invalid radix value ({})", radix),
        ));
    }
    Ok(Some(string_value(&to_string_radix(&v, radix as u32))))
}

fn big_integer_value_of(args: &[Value]) -> GFunctionResult {
    big_result(BigInt::from(int_arg(args, 0, "BigInteger.valueOf")?))
}

fn big_integer_xor(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigInteger.xor", |a, b| Ok(a ^ b))
}

pub fn load_big_integer() {
    const BI: &str = "Ljava/math/BigInteger;";
    with_gfunction_table(|t| {
        let c = BIG_INTEGER_CLASS;
        t.registry_gfunction(c, "<clinit>", "()V", 0, big_integer_clinit);
        t.registry_gfunction(c, "<init>", "([B)V", 1, big_integer_init_byte_array);
        t.registry_gfunction(c, "<init>", "([BII)V", 3, big_integer_init_byte_array_range);
        t.registry_gfunction(c, "<init>", "(I[B)V", 2, big_integer_init_signum_magnitude);
        t.registry_gfunction(c, "<init>", "(I[BII)V", 4, trap_function);
        t.registry_gfunction(c, "<init>", "(IILjava/util/Random;)V", 3, big_integer_init_probable_prime);
        t.registry_gfunction(c, "<init>", "(ILjava/util/Random;)V", 2, big_integer_init_random);
        t.registry_gfunction(c, "<init>", "(Ljava/lang/String;)V", 1, big_integer_init_string);
        t.registry_gfunction(c, "<init>", "(Ljava/lang/String;I)V", 2, big_integer_init_string_radix);

        let unary: [(&str, fn(&[Value]) -> GFunctionResult); 5] = [
            ("abs", big_integer_abs),
            ("negate", big_integer_negate),
            ("nextProbablePrime", big_integer_next_probable_prime),
            ("not", big_integer_not),
            ("sqrt", big_integer_sqrt),
        ];
        for (name, body) in unary {
            t.registry_gfunction(c, name, &format!("(){}", BI), 0, body);
        }
        let binary: [(&str, fn(&[Value]) -> GFunctionResult); 14] = [
            ("add", big_integer_add),
            ("and", big_integer_and),
            ("andNot", big_integer_and_not),
            ("divide", big_integer_divide),
            ("gcd", big_integer_gcd),
            ("max", big_integer_max),
            ("min", big_integer_min),
            ("mod", big_integer_mod),
            ("modInverse", big_integer_mod_inverse),
            ("multiply", big_integer_multiply),
            ("or", big_integer_or),
            ("remainder", big_integer_remainder),
            ("subtract", big_integer_subtract),
            ("xor", big_integer_xor),
        ];
        for (name, body) in binary {
            t.registry_gfunction(c, name, &format!("({}){}", BI, BI), 1, body);
        }
        let by_int: [(&str, fn(&[Value]) -> GFunctionResult); 6] = [
            ("clearBit", big_integer_clear_bit),
            ("flipBit", big_integer_flip_bit),
            ("pow", big_integer_pow),
            ("setBit", big_integer_set_bit),
            ("shiftLeft", big_integer_shift_left),
            ("shiftRight", big_integer_shift_right),
        ];
        for (name, body) in by_int {
            t.registry_gfunction(c, name, &format!("(I){}", BI), 1, body);
        }

        t.registry_gfunction(c, "bitCount", "()I", 0, big_integer_bit_count);
        t.registry_gfunction(c, "bitLength", "()I", 0, big_integer_bit_length);
        t.registry_gfunction(c, "byteValueExact", "()B", 0, big_integer_byte_value_exact);
        t.registry_gfunction(c, "compareTo", "(Ljava/math/BigInteger;)I", 1, big_integer_compare_to);
        t.registry_gfunction(
            c,
            "divideAndRemainder",
            "(Ljava/math/BigInteger;)[Ljava/math/BigInteger;",
            1,
            big_integer_divide_and_remainder,
        );
        t.registry_gfunction(c, "doubleValue", "()D", 0, big_integer_double_value);
        t.registry_gfunction(c, "equals", "(Ljava/lang/Object;)Z", 1, big_integer_equals);
        t.registry_gfunction(c, "floatValue", "()F", 0, big_integer_float_value);
        t.registry_gfunction(c, "getLowestSetBit", "()I", 0, big_integer_get_lowest_set_bit);
        t.registry_gfunction(c, "hashCode", "()I", 0, big_integer_hash_code);
        t.registry_gfunction(c, "intValue", "()I", 0, big_integer_int_value);
        t.registry_gfunction(c, "intValueExact", "()I", 0, big_integer_int_value_exact);
        t.registry_gfunction(c, "isProbablePrime", "(I)Z", 1, big_integer_is_probable_prime);
        t.registry_gfunction(c, "longValue", "()J", 0, big_integer_long_value);
        t.registry_gfunction(c, "longValueExact", "()J", 0, big_integer_long_value_exact);
        t.registry_gfunction(
            c,
            "modPow",
            "(Ljava/math/BigInteger;Ljava/math/BigInteger;)Ljava/math/BigInteger;",
            2,
            big_integer_mod_pow,
        );
        t.registry_gfunction(c, "multiply", "(J)Ljava/math/BigInteger;", 1, big_integer_multiply_long);
        t.registry_gfunction(
            c,
            "probablePrime",
            "(ILjava/util/Random;)Ljava/math/BigInteger;",
            2,
            big_integer_probable_prime,
        );
        t.registry_gfunction(c, "shortValueExact", "()S", 0, big_integer_short_value_exact);
        t.registry_gfunction(c, "signum", "()I", 0, big_integer_signum);
        t.registry_gfunction(
            c,
            "sqrtAndRemainder",
            "()[Ljava/math/BigInteger;",
            0,
            big_integer_sqrt_and_remainder,
        );
        t.registry_gfunction(c, "testBit", "(I)Z", 1, big_integer_test_bit);
        t.registry_gfunction(c, "toByteArray", "()[B", 0, big_integer_to_byte_array);
        t.registry_gfunction(c, "toString", "()Ljava/lang/String;", 0, big_integer_to_string);
        t.registry_gfunction(c, "toString", "(I)Ljava/lang/String;", 1, big_integer_to_string_radix);
        t.registry_gfunction(c, "valueOf", "(J)Ljava/math/BigInteger;", 1, big_integer_value_of);
    });
}

#[cfg(test)]
mod tests {
    use crate::java_math_big_integer::{
        big_integer_value, java_big_integer_hash, java_bit_length, make_big_integer, mod_inverse,
        next_probable_prime, parse_big_integer, probable_prime, to_string_radix,
    };
    use crate::load_gfunctions;
    use jacobin_core::java_exception::ExceptionKind;
    use jacobin_core::jvm_values::Value;
    use jacobin_core::native_method_area::invoke;
    use jacobin_core::object::{make_array_object, make_empty_object_with_class_name, FieldValue};
    use num_bigint::BigInt;
    use num_traits::Signed;

    fn big(s: &str) -> BigInt {
        parse_big_integer(s, 10).unwrap()
    }

    fn call(key: &str, args: &[Value]) -> Value {
        load_gfunctions();
        invoke(&format!("java/math/BigInteger.{}", key), args)
            .unwrap()
            .unwrap()
    }

    fn obj(s: &str) -> Value {
        Value::ObjectRef(make_big_integer(big(s)))
    }

    fn value_of(v: &Value) -> BigInt {
        big_integer_value(&v.get_object().unwrap(), "test").unwrap()
    }

    #[test]
    fn test_hash_matches_jdk() {
        assert_eq!(java_big_integer_hash(&big("0")), 0);
        assert_eq!(java_big_integer_hash(&big("1")), 1);
        assert_eq!(java_big_integer_hash(&big("-1")), -1);
        // new BigInteger("4294967296").hashCode() == 31
        assert_eq!(java_big_integer_hash(&big("4294967296")), 31);
        assert_eq!(java_big_integer_hash(&big("123456789012345678901234567890")), 1915528825);
    }

    #[test]
    fn test_parse_rejects_java_invalid_input() {
        assert_eq!(big("-42"), BigInt::from(-42));
        assert_eq!(parse_big_integer("ff", 16).unwrap(), BigInt::from(255));
        for bad in ["", "-", "1_000", " 1", "12a"] {
            assert_eq!(
                parse_big_integer(bad, 10).unwrap_err().kind,
                ExceptionKind::NumberFormatException
            );
        }
    }

    #[test]
    fn test_radix_62() {
        assert_eq!(to_string_radix(&BigInt::from(61), 62), "Z");
        assert_eq!(to_string_radix(&BigInt::from(-255), 16), "-ff");
        let v = call("toString(I)Ljava/lang/String;", &[obj("35"), Value::Int(36)]);
        let s = jacobin_core::object::string_from_string_object(&v.get_object().unwrap()).unwrap();
        assert_eq!(s, "z");
        let err = invoke(
            "java/math/BigInteger.toString(I)Ljava/lang/String;",
            &[obj("35"), Value::Int(63)],
        )
        .unwrap_err();
        assert_eq!(err.kind, ExceptionKind::IllegalArgumentException);
    }

    #[test]
    fn test_signum_field_matches_value() {
        for s in ["-5", "0", "7"] {
            let o = make_big_integer(big(s));
            let expected = big(s).signum();
            assert_eq!(BigInt::from(o.int_field("signum").unwrap()), expected);
        }
    }

    #[test]
    fn test_byte_array_constructor() {
        load_gfunctions();
        let this = make_empty_object_with_class_name("java/math/BigInteger");
        let bytes = make_array_object("[B", FieldValue::Bytes(vec![-1, 0]));
        invoke(
            "java/math/BigInteger.<init>([B)V",
            &[Value::ObjectRef(this.clone()), Value::ObjectRef(bytes)],
        )
        .unwrap();
        assert_eq!(big_integer_value(&this, "t").unwrap(), BigInt::from(-256));
        assert_eq!(this.int_field("signum"), Some(-1));
    }

    #[test]
    fn test_arithmetic_and_divisor_checks() {
        let q = call("divide(Ljava/math/BigInteger;)Ljava/math/BigInteger;", &[obj("-7"), obj("2")]);
        assert_eq!(value_of(&q), BigInt::from(-3));
        let r = call("remainder(Ljava/math/BigInteger;)Ljava/math/BigInteger;", &[obj("-7"), obj("2")]);
        assert_eq!(value_of(&r), BigInt::from(-1));
        let m = call("mod(Ljava/math/BigInteger;)Ljava/math/BigInteger;", &[obj("-7"), obj("2")]);
        assert_eq!(value_of(&m), BigInt::from(1));
        for op in ["divide", "remainder", "mod", "modInverse"] {
            let key = format!("java/math/BigInteger.{}(Ljava/math/BigInteger;)Ljava/math/BigInteger;", op);
            let err = invoke(&key, &[obj("7"), obj("0")]).unwrap_err();
            assert_eq!(err.kind, ExceptionKind::ArithmeticException, "{}", op);
        }
        let p = call(
            "modPow(Ljava/math/BigInteger;Ljava/math/BigInteger;)Ljava/math/BigInteger;",
            &[obj("4"), obj("13"), obj("497")],
        );
        assert_eq!(value_of(&p), BigInt::from(445));
        let err = invoke("java/math/BigInteger.pow(I)Ljava/math/BigInteger;", &[obj("2"), Value::Int(-1)])
            .unwrap_err();
        assert_eq!(err.kind, ExceptionKind::ArithmeticException);
    }

    #[test]
    fn test_mod_inverse() {
        assert_eq!(mod_inverse(&BigInt::from(3), &BigInt::from(11)).unwrap(), BigInt::from(4));
        assert_eq!(mod_inverse(&BigInt::from(-3), &BigInt::from(11)).unwrap(), BigInt::from(7));
        assert!(mod_inverse(&BigInt::from(2), &BigInt::from(4)).is_err());
    }

    #[test]
    fn test_bits() {
        assert_eq!(java_bit_length(&BigInt::from(-1)), 0);
        assert_eq!(java_bit_length(&BigInt::from(-128)), 7);
        assert_eq!(java_bit_length(&BigInt::from(255)), 8);
        assert_eq!(call("testBit(I)Z", &[obj("-2"), Value::Int(0)]), Value::Int(0));
        assert_eq!(call("testBit(I)Z", &[obj("-2"), Value::Int(40)]), Value::Int(1));
        let cleared = call("clearBit(I)Ljava/math/BigInteger;", &[obj("15"), Value::Int(0)]);
        assert_eq!(value_of(&cleared), BigInt::from(14));
        assert_eq!(call("bitCount()I", &[obj("7")]), Value::Int(3));
        assert_eq!(call("getLowestSetBit()I", &[obj("0")]), Value::Int(-1));
        assert_eq!(call("getLowestSetBit()I", &[obj("40")]), Value::Int(3));
        let shifted = call("shiftRight(I)Ljava/math/BigInteger;", &[obj("-5"), Value::Int(1)]);
        assert_eq!(value_of(&shifted), BigInt::from(-3));
    }

    #[test]
    fn test_narrowing() {
        assert_eq!(call("longValue()J", &[obj("18446744073709551617")]), Value::Int(1));
        assert_eq!(call("intValue()I", &[obj("4294967297")]), Value::Int(1));
        assert_eq!(call("byteValueExact()B", &[obj("255")]), Value::Int(-1));
        let err = invoke("java/math/BigInteger.byteValueExact()B", &[obj("256")]).unwrap_err();
        assert_eq!(err.kind, ExceptionKind::ArithmeticException);
        let err = invoke("java/math/BigInteger.intValueExact()I", &[obj("2147483648")]).unwrap_err();
        assert_eq!(err.kind, ExceptionKind::ArithmeticException);
    }

    #[test]
    fn test_primes() {
        let p = probable_prime(64).unwrap();
        assert_eq!(p.bits(), 64);
        assert_eq!(next_probable_prime(&BigInt::from(13)).unwrap(), BigInt::from(17));
        assert_eq!(next_probable_prime(&BigInt::from(0)).unwrap(), BigInt::from(2));
        assert_eq!(call("isProbablePrime(I)Z", &[obj("97"), Value::Int(10)]), Value::Int(1));
        assert_eq!(call("isProbablePrime(I)Z", &[obj("91"), Value::Int(10)]), Value::Int(0));
        assert!(probable_prime(1).is_err());
    }

    #[test]
    fn test_equals() {
        assert_eq!(call("equals(Ljava/lang/Object;)Z", &[obj("5"), obj("5")]), Value::Int(1));
        assert_eq!(call("equals(Ljava/lang/Object;)Z", &[obj("5"), Value::Null]), Value::Int(0));
    }
}
