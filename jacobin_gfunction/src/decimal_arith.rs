use jacobin_core::java_exception::{get_error_block, ErrorBlock, ExceptionKind};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use thiserror::Error;

/// `java.math.RoundingMode`, in ordinal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    Up,
    Down,
    Ceiling,
    Floor,
    HalfUp,
    HalfDown,
    HalfEven,
    Unnecessary,
}

impl RoundingMode {
    pub const ALL: [RoundingMode; 8] = [
        RoundingMode::Up,
        RoundingMode::Down,
        RoundingMode::Ceiling,
        RoundingMode::Floor,
        RoundingMode::HalfUp,
        RoundingMode::HalfDown,
        RoundingMode::HalfEven,
        RoundingMode::Unnecessary,
    ];

    pub fn ordinal(self) -> i64 {
        self as i64
    }

    pub fn from_ordinal(ordinal: i64) -> Option<RoundingMode> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            RoundingMode::Up => "UP",
            RoundingMode::Down => "DOWN",
            RoundingMode::Ceiling => "CEILING",
            RoundingMode::Floor => "FLOOR",
            RoundingMode::HalfUp => "HALF_UP",
            RoundingMode::HalfDown => "HALF_DOWN",
            RoundingMode::HalfEven => "HALF_EVEN",
            RoundingMode::Unnecessary => "UNNECESSARY",
        }
    }

    /// Exact, case-sensitive match like `Enum.valueOf`.
    pub fn from_name(name: &str) -> Option<RoundingMode> {
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }
}

/// Precision and rounding policy of a `java.math.MathContext`. Precision 0 is unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalContext {
    pub precision: i64,
    pub rounding: RoundingMode,
}

impl DecimalContext {
    pub const UNLIMITED: DecimalContext = DecimalContext {
        precision: 0,
        rounding: RoundingMode::HalfUp,
    };

    pub fn new(precision: i64, rounding: RoundingMode) -> DecimalContext {
        DecimalContext {
            precision,
            rounding,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecimalError {
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Division undefined")]
    DivisionUndefined,
    #[error("Division impossible")]
    DivisionImpossible,
    #[error("Non-terminating decimal expansion; no exact representable decimal result.")]
    NonTerminating,
    #[error("Rounding necessary")]
    RoundingNecessary,
    #[error("Overflow")]
    Overflow,
    #[error("Underflow")]
    Underflow,
    #[error("Invalid operation")]
    InvalidOperation,
    #[error("Attempted square root of negative BigDecimal")]
    NegativeSquareRoot,
    #[error("{0}")]
    NumberFormat(&'static str),
}

impl From<DecimalError> for ErrorBlock {
    fn from(value: DecimalError) -> Self {
        let kind = match value {
            DecimalError::NumberFormat(_) => ExceptionKind::NumberFormatException,
            _ => ExceptionKind::ArithmeticException,
        };
        get_error_block(kind, value.to_string())
    }
}

pub type DecimalResult<T> = Result<T, DecimalError>;

fn ten() -> BigInt {
    BigInt::from(10u8)
}

/// `10^n` for a non-negative exponent within Java's 32-bit scale range.
pub fn ten_pow(n: i64) -> DecimalResult<BigInt> {
    if !(0..=i32::MAX as i64).contains(&n) {
        return Err(DecimalError::Overflow);
    }
    Ok(ten().pow(n as u32))
}

/// Decimal digits of the magnitude; zero has one.
pub fn digit_count(v: &BigInt) -> i64 {
    if v.is_zero() {
        1
    } else {
        v.magnitude().to_str_radix(10).len() as i64
    }
}

/// Low 64 bits in two's complement, as Java's narrowing `long` conversion.
pub fn wrap_to_i64(v: &BigInt) -> i64 {
    let modulus = BigInt::one() << 64usize;
    v.mod_floor(&modulus).to_u64().unwrap_or(0) as i64
}

/// Divides and rounds the quotient to an integer under `mode`.
pub fn round_quotient(num: &BigInt, den: &BigInt, mode: RoundingMode) -> DecimalResult<BigInt> {
    let (q, r) = num.div_rem(den);
    if r.is_zero() {
        return Ok(q);
    }
    let positive = num.is_negative() == den.is_negative();
    let half = (r.abs() << 1usize).cmp(&den.abs());
    let away = match mode {
        RoundingMode::Up => true,
        RoundingMode::Down => false,
        RoundingMode::Ceiling => positive,
        RoundingMode::Floor => !positive,
        RoundingMode::HalfUp => half != Ordering::Less,
        RoundingMode::HalfDown => half == Ordering::Greater,
        RoundingMode::HalfEven => half == Ordering::Greater || (half == Ordering::Equal && q.is_odd()),
        RoundingMode::Unnecessary => return Err(DecimalError::RoundingNecessary),
    };
    if !away {
        Ok(q)
    } else if positive {
        Ok(q + 1)
    } else {
        Ok(q - 1)
    }
}

/// Plain rendering of `unscaled · 10^-scale`: no exponent, trailing zeros kept.
pub fn format_decimal_string(unscaled: &BigInt, scale: i64) -> String {
    let digits = unscaled.magnitude().to_str_radix(10);
    let sign = if unscaled.is_negative() { "-" } else { "" };
    if scale <= 0 {
        if unscaled.is_zero() {
            return "0".to_string();
        }
        return format!("{}{}{}", sign, digits, "0".repeat(scale.unsigned_abs() as usize));
    }
    let scale = scale as usize;
    let padded = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);
    format!("{}{}.{}", sign, int_part, frac_part)
}

/// Arbitrary-precision decimal `unscaled · 10^-scale`. Equality includes the scale,
/// so `2.0 != 2.00`; use [`Decimal::compare`] for numeric order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal {
    pub unscaled: BigInt,
    pub scale: i64,
}

impl Decimal {
    pub fn new(unscaled: BigInt, scale: i64) -> Decimal {
        Decimal { unscaled, scale }
    }

    /// Builds a value whose scale must fit a Java `int`. A zero saturates instead of failing;
    /// otherwise a scale above the range is `Underflow` and one below it is `Overflow`.
    pub fn with_scale(unscaled: BigInt, scale: i64) -> DecimalResult<Decimal> {
        if (i32::MIN as i64..=i32::MAX as i64).contains(&scale) {
            return Ok(Decimal::new(unscaled, scale));
        }
        if unscaled.is_zero() {
            return Ok(Decimal::new(unscaled, scale.clamp(i32::MIN as i64, i32::MAX as i64)));
        }
        if scale > 0 {
            Err(DecimalError::Underflow)
        } else {
            Err(DecimalError::Overflow)
        }
    }

    /// `with_scale` for a scale computed as `base + delta`.
    fn with_scale_sum(unscaled: BigInt, base: i64, delta: i64) -> DecimalResult<Decimal> {
        let scale = base
            .checked_add(delta)
            .ok_or(if delta > 0 { DecimalError::Underflow } else { DecimalError::Overflow })?;
        Decimal::with_scale(unscaled, scale)
    }

    pub fn from_i64(v: i64) -> Decimal {
        Decimal::new(BigInt::from(v), 0)
    }

    pub fn zero() -> Decimal {
        Decimal::from_i64(0)
    }

    pub fn precision(&self) -> i64 {
        digit_count(&self.unscaled)
    }

    pub fn signum(&self) -> i64 {
        if self.unscaled.is_positive() {
            1
        } else if self.unscaled.is_negative() {
            -1
        } else {
            0
        }
    }

    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    /// Parses `[+-]digits[.digits][(e|E)[+-]digits]` after trimming whitespace.
    pub fn parse(text: &str) -> DecimalResult<Decimal> {
        const INVALID: DecimalError = DecimalError::NumberFormat("Invalid number format");
        let s = text.trim();
        if s.is_empty() {
            return Err(DecimalError::NumberFormat("Empty string"));
        }
        let (negative, body) = match s.as_bytes()[0] {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };
        if body.is_empty() {
            return Err(INVALID);
        }
        let (mantissa, exponent) = match body.find(['e', 'E']) {
            Some(idx) => {
                let exponent = body[idx + 1..]
                    .parse::<i64>()
                    .map_err(|_| DecimalError::NumberFormat("Invalid exponent"))?;
                (&body[..idx], exponent)
            }
            None => (body, 0),
        };
        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
            return Err(INVALID);
        }
        let digits = format!("{}{}", int_part, frac_part);
        let mut unscaled = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or(INVALID)?;
        if negative {
            unscaled = -unscaled;
        }
        const OUT_OF_RANGE: DecimalError = DecimalError::NumberFormat("Scale out of range");
        let scale = (frac_part.len() as i64).checked_sub(exponent).ok_or(OUT_OF_RANGE)?;
        if !(i32::MIN as i64..=i32::MAX as i64).contains(&scale) {
            return Err(OUT_OF_RANGE);
        }
        Ok(Decimal::new(unscaled, scale))
    }

    /// The exact binary value of `v`, as `new BigDecimal(double)`.
    pub fn from_f64_exact(v: f64) -> DecimalResult<Decimal> {
        if !v.is_finite() {
            return Err(DecimalError::NumberFormat("Infinite or NaN"));
        }
        if v == 0.0 {
            return Ok(Decimal::zero());
        }
        let bits = v.to_bits();
        let biased = ((bits >> 52) & 0x7ff) as i64;
        let fraction = bits & ((1u64 << 52) - 1);
        let (mut mantissa, mut exponent) = if biased == 0 {
            (fraction, -1074)
        } else {
            (fraction | (1u64 << 52), biased - 1075)
        };
        while mantissa & 1 == 0 && exponent < 0 {
            mantissa >>= 1;
            exponent += 1;
        }
        let mut unscaled = BigInt::from(mantissa);
        let scale = if exponent >= 0 {
            unscaled <<= exponent as usize;
            0
        } else {
            unscaled *= BigInt::from(5u8).pow((-exponent) as u32);
            -exponent
        };
        if v.is_sign_negative() {
            unscaled = -unscaled;
        }
        Ok(Decimal::new(unscaled, scale))
    }

    pub fn to_plain_string(&self) -> String {
        format_decimal_string(&self.unscaled, self.scale)
    }

    fn align(&self, other: &Decimal) -> DecimalResult<(BigInt, BigInt, i64)> {
        let scale = self.scale.max(other.scale);
        let a = &self.unscaled * ten_pow(scale - self.scale)?;
        let b = &other.unscaled * ten_pow(scale - other.scale)?;
        Ok((a, b, scale))
    }

    pub fn compare(&self, other: &Decimal) -> DecimalResult<Ordering> {
        let by_sign = self.signum().cmp(&other.signum());
        if by_sign != Ordering::Equal || self.is_zero() {
            return Ok(by_sign);
        }
        let (a, b, _) = self.align(other)?;
        Ok(a.cmp(&b))
    }

    pub fn add(&self, other: &Decimal) -> DecimalResult<Decimal> {
        let (a, b, scale) = self.align(other)?;
        Ok(Decimal::new(a + b, scale))
    }

    pub fn subtract(&self, other: &Decimal) -> DecimalResult<Decimal> {
        let (a, b, scale) = self.align(other)?;
        Ok(Decimal::new(a - b, scale))
    }

    pub fn multiply(&self, other: &Decimal) -> DecimalResult<Decimal> {
        Decimal::with_scale_sum(&self.unscaled * &other.unscaled, self.scale, other.scale)
    }

    pub fn negate(&self) -> Decimal {
        Decimal::new(-&self.unscaled, self.scale)
    }

    pub fn abs(&self) -> Decimal {
        Decimal::new(self.unscaled.abs(), self.scale)
    }

    fn check_divisor(&self, divisor: &Decimal) -> DecimalResult<()> {
        match (divisor.is_zero(), self.is_zero()) {
            (true, true) => Err(DecimalError::DivisionUndefined),
            (true, false) => Err(DecimalError::DivisionByZero),
            _ => Ok(()),
        }
    }

    /// Numerator and denominator whose integer quotient is `self / divisor` at `scale`.
    fn ratio_at_scale(&self, divisor: &Decimal, scale: i64) -> DecimalResult<(BigInt, BigInt)> {
        let shift = scale - self.scale + divisor.scale;
        if shift >= 0 {
            Ok((&self.unscaled * ten_pow(shift)?, divisor.unscaled.clone()))
        } else {
            Ok((self.unscaled.clone(), &divisor.unscaled * ten_pow(-shift)?))
        }
    }

    /// Strips trailing zeros but never below `preferred`.
    fn reduce_toward(&self, preferred: i64) -> Decimal {
        let mut unscaled = self.unscaled.clone();
        let mut scale = self.scale;
        if unscaled.is_zero() {
            return Decimal::new(unscaled, preferred.min(scale));
        }
        while scale > preferred {
            let (q, r) = unscaled.div_rem(&ten());
            if !r.is_zero() {
                break;
            }
            unscaled = q;
            scale -= 1;
        }
        Decimal::new(unscaled, scale)
    }

    /// Exact quotient with the smallest scale not below `self.scale - divisor.scale`.
    pub fn divide_exact(&self, divisor: &Decimal) -> DecimalResult<Decimal> {
        self.check_divisor(divisor)?;
        let preferred = self.scale - divisor.scale;
        if self.is_zero() {
            return Ok(Decimal::new(BigInt::zero(), preferred));
        }
        let g = self.unscaled.gcd(&divisor.unscaled);
        let mut n = &self.unscaled / &g;
        let mut d = &divisor.unscaled / &g;
        if d.is_negative() {
            n = -n;
            d = -d;
        }
        let (d, twos) = remove_factor(d, 2);
        let (d, fives) = remove_factor(d, 5);
        if !d.is_one() {
            return Err(DecimalError::NonTerminating);
        }
        let k = twos.max(fives);
        let multiplier = BigInt::from(2u8).pow((k - twos) as u32) * BigInt::from(5u8).pow((k - fives) as u32);
        Decimal::with_scale_sum(n * multiplier, preferred, k)
    }

    /// Quotient at exactly `scale` digits after the point.
    pub fn divide_to_scale(&self, divisor: &Decimal, scale: i64, mode: RoundingMode) -> DecimalResult<Decimal> {
        self.check_divisor(divisor)?;
        let (num, den) = self.ratio_at_scale(divisor, scale)?;
        Ok(Decimal::new(round_quotient(&num, &den, mode)?, scale))
    }

    pub fn divide_with_context(&self, divisor: &Decimal, ctx: DecimalContext) -> DecimalResult<Decimal> {
        if ctx.precision <= 0 {
            return self.divide_exact(divisor);
        }
        self.check_divisor(divisor)?;
        let preferred = self.scale - divisor.scale;
        if self.is_zero() {
            return Ok(Decimal::new(BigInt::zero(), preferred));
        }
        let magnitude = (self.precision() - self.scale) - (divisor.precision() - divisor.scale);
        let working_scale = ctx.precision - magnitude + 3;
        let (num, den) = self.ratio_at_scale(divisor, working_scale)?;
        let (q, r) = num.div_rem(&den);
        let exact = r.is_zero();
        let candidate = if exact {
            Decimal::new(q, working_scale)
        } else {
            // a sticky digit keeps ties from looking exact
            let sticky = if num.is_negative() == den.is_negative() { 1 } else { -1 };
            Decimal::new(q * 10 + sticky, working_scale + 1)
        };
        let rounded = candidate.round(ctx)?;
        if exact && rounded.compare(&candidate)? == Ordering::Equal {
            return Ok(rounded.reduce_toward(preferred));
        }
        Ok(rounded)
    }

    /// Integer part of the exact quotient, at the preferred scale where possible.
    pub fn divide_to_integral_value(&self, divisor: &Decimal) -> DecimalResult<Decimal> {
        self.check_divisor(divisor)?;
        let preferred = self.scale - divisor.scale;
        let (num, den) = self.ratio_at_scale(divisor, 0)?;
        let q = num / den;
        if preferred >= 0 {
            Ok(Decimal::new(q * ten_pow(preferred)?, preferred))
        } else {
            Ok(Decimal::new(q, 0).reduce_toward(preferred))
        }
    }

    pub fn divide_to_integral_value_with_context(&self, divisor: &Decimal, ctx: DecimalContext) -> DecimalResult<Decimal> {
        let result = self.divide_to_integral_value(divisor)?;
        if ctx.precision > 0 && digit_count(&result.to_big_integer()?) > ctx.precision {
            return Err(DecimalError::DivisionImpossible);
        }
        Ok(result)
    }

    /// `self - self.divideToIntegralValue(divisor) * divisor`; takes the dividend's sign.
    pub fn remainder(&self, divisor: &Decimal) -> DecimalResult<Decimal> {
        let q = self.divide_to_integral_value(divisor)?;
        self.subtract(&q.multiply(divisor)?)
    }

    pub fn remainder_with_context(&self, divisor: &Decimal, ctx: DecimalContext) -> DecimalResult<Decimal> {
        let q = self.divide_to_integral_value_with_context(divisor, ctx)?;
        self.subtract(&q.multiply(divisor)?)
    }

    pub fn divide_and_remainder(&self, divisor: &Decimal) -> DecimalResult<(Decimal, Decimal)> {
        let q = self.divide_to_integral_value(divisor)?;
        let r = self.subtract(&q.multiply(divisor)?)?;
        Ok((q, r))
    }

    pub fn set_scale(&self, new_scale: i64, mode: RoundingMode) -> DecimalResult<Decimal> {
        if new_scale >= self.scale {
            let unscaled = &self.unscaled * ten_pow(new_scale - self.scale)?;
            return Ok(Decimal::new(unscaled, new_scale));
        }
        let divisor = ten_pow(self.scale - new_scale)?;
        Ok(Decimal::new(round_quotient(&self.unscaled, &divisor, mode)?, new_scale))
    }

    /// Rounds to the context's precision; a carry such as `9.99 → 10.0` drops one more digit.
    pub fn round(&self, ctx: DecimalContext) -> DecimalResult<Decimal> {
        let precision = self.precision();
        if ctx.precision <= 0 || precision <= ctx.precision {
            return Ok(self.clone());
        }
        let drop = precision - ctx.precision;
        let mut unscaled = round_quotient(&self.unscaled, &ten_pow(drop)?, ctx.rounding)?;
        let mut scale = self.scale - drop;
        if digit_count(&unscaled) > ctx.precision {
            unscaled /= ten();
            scale -= 1;
        }
        Ok(Decimal::new(unscaled, scale))
    }

    pub fn pow(&self, n: i64) -> DecimalResult<Decimal> {
        if !(0..=999_999_999).contains(&n) {
            return Err(DecimalError::InvalidOperation);
        }
        let scale = self.scale.checked_mul(n).ok_or(if self.scale > 0 {
            DecimalError::Underflow
        } else {
            DecimalError::Overflow
        })?;
        Decimal::with_scale(self.unscaled.pow(n as u32), scale)
    }

    pub fn strip_trailing_zeros(&self) -> Decimal {
        if self.is_zero() {
            return Decimal::zero();
        }
        self.reduce_toward(i64::MIN)
    }

    pub fn move_point_left(&self, n: i64) -> DecimalResult<Decimal> {
        Decimal::with_scale_sum(self.unscaled.clone(), self.scale, n)?.non_negative_scale()
    }

    pub fn move_point_right(&self, n: i64) -> DecimalResult<Decimal> {
        Decimal::with_scale_sum(self.unscaled.clone(), self.scale, n.saturating_neg())?.non_negative_scale()
    }

    pub fn scale_by_power_of_ten(&self, n: i64) -> DecimalResult<Decimal> {
        Decimal::with_scale_sum(self.unscaled.clone(), self.scale, n.saturating_neg())
    }

    fn non_negative_scale(self) -> DecimalResult<Decimal> {
        if self.scale < 0 {
            self.set_scale(0, RoundingMode::Unnecessary)
        } else {
            Ok(self)
        }
    }

    pub fn ulp(&self) -> Decimal {
        Decimal::new(BigInt::one(), self.scale)
    }

    /// Integer part, truncated toward zero.
    pub fn to_big_integer(&self) -> DecimalResult<BigInt> {
        if self.scale <= 0 {
            Ok(&self.unscaled * ten_pow(-self.scale)?)
        } else {
            Ok(&self.unscaled / ten_pow(self.scale)?)
        }
    }

    pub fn to_big_integer_exact(&self) -> DecimalResult<BigInt> {
        if self.scale <= 0 {
            return self.to_big_integer();
        }
        let (q, r) = self.unscaled.div_rem(&ten_pow(self.scale)?);
        if !r.is_zero() {
            return Err(DecimalError::RoundingNecessary);
        }
        Ok(q)
    }

    pub fn long_value(&self) -> DecimalResult<i64> {
        Ok(wrap_to_i64(&self.to_big_integer()?))
    }

    /// Exact integer conversion bounded to `[min, max]`.
    pub fn exact_in_range(&self, min: i64, max: i64) -> DecimalResult<i64> {
        let v = self.to_big_integer_exact()?;
        v.to_i64()
            .filter(|v| (min..=max).contains(v))
            .ok_or(DecimalError::Overflow)
    }

    pub fn to_f64(&self) -> f64 {
        format!("{}e{}", self.unscaled, -self.scale)
            .parse::<f64>()
            .unwrap_or(f64::NAN)
    }

    pub fn to_f32(&self) -> f32 {
        format!("{}e{}", self.unscaled, -self.scale)
            .parse::<f32>()
            .unwrap_or(f32::NAN)
    }
}

fn remove_factor(mut v: BigInt, factor: u32) -> (BigInt, i64) {
    let f = BigInt::from(factor);
    let mut count = 0;
    loop {
        let (q, r) = v.div_rem(&f);
        if !r.is_zero() {
            return (v, count);
        }
        v = q;
        count += 1;
    }
}
