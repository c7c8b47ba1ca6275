/// Convert an f32 to IEEE 754 binary16 bits, rounding to nearest-even.
///
/// Values above the half range saturate to infinity. Values below the
/// smallest subnormal flush to signed zero. NaN stays NaN (quiet).
pub fn f32_to_half(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exp = ((bits >> 23) & 0xFF) as i32;
    let mantissa = bits & 0x007F_FFFF;

    if exp == 0xFF {
        let nan = if mantissa != 0 { 0x0200 } else { 0 };
        return sign | 0x7C00 | nan;
    }

    // Rebias the exponent from 127 to 15.
    let half_exp = exp - 127 + 15;
    if half_exp >= 0x1F {
        return sign | 0x7C00;
    }

    if half_exp <= 0 {
        if half_exp < -10 {
            return sign;
        }
        // Subnormal half: restore the implicit bit and shift it down.
        let m = mantissa | 0x0080_0000;
        let shift = (14 - half_exp) as u32;
        let half_m = m >> shift;
        let halfway = 1u32 << (shift - 1);
        let rest = m & ((1u32 << shift) - 1);
        let rounded = if rest > halfway || (rest == halfway && half_m & 1 == 1) {
            half_m + 1
        } else {
            half_m
        };
        return sign | rounded as u16;
    }

    let mut half = ((half_exp as u32) << 10) | (mantissa >> 13);
    let rest = mantissa & 0x1FFF;
    // A carry out of the mantissa bumps the exponent, up to infinity.
    if rest > 0x1000 || (rest == 0x1000 && half & 1 == 1) {
        half += 1;
    }
    sign | half as u16
}

/// Convert IEEE 754 binary16 bits back to f32. Exact for every half value.
pub fn half_to_f32(half: u16) -> f32 {
    let sign = ((half & 0x8000) as u32) << 16;
    let exp = ((half >> 10) & 0x1F) as u32;
    let mantissa = (half & 0x03FF) as u32;

    match exp {
        0 => {
            // Zero or subnormal: mantissa * 2^-24.
            let magnitude = mantissa as f32 * (1.0 / 16_777_216.0);
            if sign != 0 {
                -magnitude
            } else {
                magnitude
            }
        }
        0x1F => f32::from_bits(sign | 0x7F80_0000 | (mantissa << 13)),
        _ => f32::from_bits(sign | ((exp + 112) << 23) | (mantissa << 13)),
    }
}

/// Pack a texture coordinate pair into two halves.
pub fn pack_half2(st: glam::Vec2) -> [u16; 2] {
    [f32_to_half(st.x), f32_to_half(st.y)]
}

/// Unpack two halves into a texture coordinate pair.
pub fn unpack_half2(packed: [u16; 2]) -> glam::Vec2 {
    glam::Vec2::new(half_to_f32(packed[0]), half_to_f32(packed[1]))
}
