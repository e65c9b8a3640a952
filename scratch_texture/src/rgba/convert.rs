// Channel conversions between stored integer values and normalized floats.
// Float to integer conversions round to nearest after clamping.

pub fn unorm_to_float(value: u32, bits: u32) -> f32 {
    value as f32 / unorm_max(bits) as f32
}

pub fn float_to_unorm(value: f32, bits: u32) -> u32 {
    let max = unorm_max(bits) as f32;
    (value.clamp(0.0, 1.0) * max).round() as u32
}

fn unorm_max(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

pub fn unorm8_to_float(value: u8) -> f32 {
    value as f32 / 255.0
}

pub fn float_to_unorm8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn unorm16_to_float(value: u16) -> f32 {
    value as f32 / 65535.0
}

pub fn float_to_unorm16(value: f32) -> u16 {
    (value.clamp(0.0, 1.0) * 65535.0).round() as u16
}

// The most negative value maps to -1.0 like the value one above it.
pub fn snorm8_to_float(value: i8) -> f32 {
    (value as f32 / 127.0).max(-1.0)
}

pub fn float_to_snorm8(value: f32) -> i8 {
    (value.clamp(-1.0, 1.0) * 127.0).round() as i8
}

pub fn snorm16_to_float(value: i16) -> f32 {
    (value as f32 / 32767.0).max(-1.0)
}

pub fn float_to_snorm16(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * 32767.0).round() as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unorm8_endpoints() {
        assert_eq!(0.0, unorm8_to_float(0));
        assert_eq!(1.0, unorm8_to_float(255));
        assert_eq!(0, float_to_unorm8(-0.5));
        assert_eq!(255, float_to_unorm8(2.0));
        assert_eq!(128, float_to_unorm8(0.5));
    }

    #[test]
    fn unorm8_round_trips_every_value() {
        for v in 0..=255u8 {
            assert_eq!(v, float_to_unorm8(unorm8_to_float(v)));
        }
    }

    #[test]
    fn unorm_bits() {
        assert_eq!(31, float_to_unorm(1.0, 5));
        assert_eq!(63, float_to_unorm(1.0, 6));
        assert_eq!(1023, float_to_unorm(1.0, 10));
        assert_eq!(1.0, unorm_to_float(15, 4));
        assert_eq!(0.0, unorm_to_float(0, 1));
        assert_eq!(1, float_to_unorm(0.75, 1));
    }

    #[test]
    fn unorm16_round_trips() {
        for v in [0u16, 1, 255, 256, 32767, 32768, 65534, 65535] {
            assert_eq!(v, float_to_unorm16(unorm16_to_float(v)));
        }
    }

    #[test]
    fn snorm8_endpoints() {
        assert_eq!(-1.0, snorm8_to_float(-128));
        assert_eq!(-1.0, snorm8_to_float(-127));
        assert_eq!(1.0, snorm8_to_float(127));
        assert_eq!(0.0, snorm8_to_float(0));
        assert_eq!(127, float_to_snorm8(2.0));
        assert_eq!(-127, float_to_snorm8(-2.0));
    }

    #[test]
    fn snorm8_round_trips() {
        for v in -127..=127i8 {
            assert_eq!(v, float_to_snorm8(snorm8_to_float(v)));
        }
    }

    #[test]
    fn snorm16_endpoints() {
        assert_eq!(-1.0, snorm16_to_float(i16::MIN));
        assert_eq!(1.0, snorm16_to_float(i16::MAX));
        assert_eq!(32767, float_to_snorm16(1.0));
        assert_eq!(-32767, float_to_snorm16(-1.0));
    }
}
