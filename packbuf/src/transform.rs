//! Composite vector and quaternion codecs
//!
//! Assembles the scalar codecs into named transform-component encodings at
//! several precision tiers. Field order is fixed (x, y, z, then w) and is
//! part of the wire contract. The numeric suffix is the encoded size in
//! bits, so `pack_vec3_48` spends 16 bits per component.
//!
//! Per-axis ranges are `(min, max)` tuples; every quantized tier also has an
//! `_extents` variant that maps a symmetric extent `e` to `(-e, e)`, which
//! is the common case for world-space positions around an origin.
//!
//! Quantized quaternion decoding renormalizes by default: quantizing four
//! components independently does not preserve unit length, and a rotation
//! consumer needs a unit quaternion (zero magnitude decodes as identity).
//! The `_raw` variants skip that and hand back the components as stored.

use crate::buffer::PackBuf;
use crate::math::{Quat, Vec2, Vec3};

/// Fixed component range used by the quantized quaternion tiers.
const QUAT_RANGE: (f32, f32) = (-1.0, 1.0);

impl PackBuf {
    pub fn pack_vec2(&mut self, value: Vec2) {
        self.pack_f32(value.x);
        self.pack_f32(value.y);
    }

    pub fn unpack_vec2(&mut self) -> Vec2 {
        Vec2::new(self.unpack_f32(), self.unpack_f32())
    }

    /// 8 bits per component.
    pub fn pack_vec2_16(&mut self, value: Vec2, ranges: [(f32, f32); 2]) {
        self.pack_f32_8(value.x, ranges[0].0, ranges[0].1);
        self.pack_f32_8(value.y, ranges[1].0, ranges[1].1);
    }

    pub fn unpack_vec2_16(&mut self, ranges: [(f32, f32); 2]) -> Vec2 {
        Vec2::new(
            self.unpack_f32_8(ranges[0].0, ranges[0].1),
            self.unpack_f32_8(ranges[1].0, ranges[1].1),
        )
    }

    pub fn pack_vec2_16_extents(&mut self, value: Vec2, extents: [f32; 2]) {
        self.pack_vec2_16(value, symmetric2(extents));
    }

    pub fn unpack_vec2_16_extents(&mut self, extents: [f32; 2]) -> Vec2 {
        self.unpack_vec2_16(symmetric2(extents))
    }

    /// 16 bits per component.
    pub fn pack_vec2_32(&mut self, value: Vec2, ranges: [(f32, f32); 2]) {
        self.pack_f32_16(value.x, ranges[0].0, ranges[0].1);
        self.pack_f32_16(value.y, ranges[1].0, ranges[1].1);
    }

    pub fn unpack_vec2_32(&mut self, ranges: [(f32, f32); 2]) -> Vec2 {
        Vec2::new(
            self.unpack_f32_16(ranges[0].0, ranges[0].1),
            self.unpack_f32_16(ranges[1].0, ranges[1].1),
        )
    }

    pub fn pack_vec2_32_extents(&mut self, value: Vec2, extents: [f32; 2]) {
        self.pack_vec2_32(value, symmetric2(extents));
    }

    pub fn unpack_vec2_32_extents(&mut self, extents: [f32; 2]) -> Vec2 {
        self.unpack_vec2_32(symmetric2(extents))
    }

    /// 24 bits per component.
    pub fn pack_vec2_48(&mut self, value: Vec2, ranges: [(f32, f32); 2]) {
        self.pack_f32_24(value.x, ranges[0].0, ranges[0].1);
        self.pack_f32_24(value.y, ranges[1].0, ranges[1].1);
    }

    pub fn unpack_vec2_48(&mut self, ranges: [(f32, f32); 2]) -> Vec2 {
        Vec2::new(
            self.unpack_f32_24(ranges[0].0, ranges[0].1),
            self.unpack_f32_24(ranges[1].0, ranges[1].1),
        )
    }

    pub fn pack_vec2_48_extents(&mut self, value: Vec2, extents: [f32; 2]) {
        self.pack_vec2_48(value, symmetric2(extents));
    }

    pub fn unpack_vec2_48_extents(&mut self, extents: [f32; 2]) -> Vec2 {
        self.unpack_vec2_48(symmetric2(extents))
    }

    pub fn pack_vec3(&mut self, value: Vec3) {
        self.pack_f32(value.x);
        self.pack_f32(value.y);
        self.pack_f32(value.z);
    }

    pub fn unpack_vec3(&mut self) -> Vec3 {
        Vec3::new(self.unpack_f32(), self.unpack_f32(), self.unpack_f32())
    }

    /// 8 bits per component.
    pub fn pack_vec3_24(&mut self, value: Vec3, ranges: [(f32, f32); 3]) {
        self.pack_f32_8(value.x, ranges[0].0, ranges[0].1);
        self.pack_f32_8(value.y, ranges[1].0, ranges[1].1);
        self.pack_f32_8(value.z, ranges[2].0, ranges[2].1);
    }

    pub fn unpack_vec3_24(&mut self, ranges: [(f32, f32); 3]) -> Vec3 {
        Vec3::new(
            self.unpack_f32_8(ranges[0].0, ranges[0].1),
            self.unpack_f32_8(ranges[1].0, ranges[1].1),
            self.unpack_f32_8(ranges[2].0, ranges[2].1),
        )
    }

    pub fn pack_vec3_24_extents(&mut self, value: Vec3, extents: [f32; 3]) {
        self.pack_vec3_24(value, symmetric3(extents));
    }

    pub fn unpack_vec3_24_extents(&mut self, extents: [f32; 3]) -> Vec3 {
        self.unpack_vec3_24(symmetric3(extents))
    }

    /// 16 bits per component.
    pub fn pack_vec3_48(&mut self, value: Vec3, ranges: [(f32, f32); 3]) {
        self.pack_f32_16(value.x, ranges[0].0, ranges[0].1);
        self.pack_f32_16(value.y, ranges[1].0, ranges[1].1);
        self.pack_f32_16(value.z, ranges[2].0, ranges[2].1);
    }

    pub fn unpack_vec3_48(&mut self, ranges: [(f32, f32); 3]) -> Vec3 {
        Vec3::new(
            self.unpack_f32_16(ranges[0].0, ranges[0].1),
            self.unpack_f32_16(ranges[1].0, ranges[1].1),
            self.unpack_f32_16(ranges[2].0, ranges[2].1),
        )
    }

    pub fn pack_vec3_48_extents(&mut self, value: Vec3, extents: [f32; 3]) {
        self.pack_vec3_48(value, symmetric3(extents));
    }

    pub fn unpack_vec3_48_extents(&mut self, extents: [f32; 3]) -> Vec3 {
        self.unpack_vec3_48(symmetric3(extents))
    }

    /// 24 bits per component.
    pub fn pack_vec3_72(&mut self, value: Vec3, ranges: [(f32, f32); 3]) {
        self.pack_f32_24(value.x, ranges[0].0, ranges[0].1);
        self.pack_f32_24(value.y, ranges[1].0, ranges[1].1);
        self.pack_f32_24(value.z, ranges[2].0, ranges[2].1);
    }

    pub fn unpack_vec3_72(&mut self, ranges: [(f32, f32); 3]) -> Vec3 {
        Vec3::new(
            self.unpack_f32_24(ranges[0].0, ranges[0].1),
            self.unpack_f32_24(ranges[1].0, ranges[1].1),
            self.unpack_f32_24(ranges[2].0, ranges[2].1),
        )
    }

    pub fn pack_vec3_72_extents(&mut self, value: Vec3, extents: [f32; 3]) {
        self.pack_vec3_72(value, symmetric3(extents));
    }

    pub fn unpack_vec3_72_extents(&mut self, extents: [f32; 3]) -> Vec3 {
        self.unpack_vec3_72(symmetric3(extents))
    }

    /// Full precision, 16 bytes. No renormalization on decode; the
    /// components come back exactly as packed.
    pub fn pack_quat(&mut self, value: Quat) {
        self.pack_f32(value.x);
        self.pack_f32(value.y);
        self.pack_f32(value.z);
        self.pack_f32(value.w);
    }

    pub fn unpack_quat(&mut self) -> Quat {
        Quat::new(
            self.unpack_f32(),
            self.unpack_f32(),
            self.unpack_f32(),
            self.unpack_f32(),
        )
    }

    /// 8 bits per component, 4 bytes.
    pub fn pack_quat_32(&mut self, value: Quat) {
        self.pack_f32_8(value.x, QUAT_RANGE.0, QUAT_RANGE.1);
        self.pack_f32_8(value.y, QUAT_RANGE.0, QUAT_RANGE.1);
        self.pack_f32_8(value.z, QUAT_RANGE.0, QUAT_RANGE.1);
        self.pack_f32_8(value.w, QUAT_RANGE.0, QUAT_RANGE.1);
    }

    /// Decodes and renormalizes (zero magnitude becomes identity).
    pub fn unpack_quat_32(&mut self) -> Quat {
        self.unpack_quat_32_raw().normalized()
    }

    /// Decodes without renormalizing; the magnitude may drift off 1.
    pub fn unpack_quat_32_raw(&mut self) -> Quat {
        Quat::new(
            self.unpack_f32_8(QUAT_RANGE.0, QUAT_RANGE.1),
            self.unpack_f32_8(QUAT_RANGE.0, QUAT_RANGE.1),
            self.unpack_f32_8(QUAT_RANGE.0, QUAT_RANGE.1),
            self.unpack_f32_8(QUAT_RANGE.0, QUAT_RANGE.1),
        )
    }

    /// 10 bits per component in a shared 40-bit word, 5 bytes.
    pub fn pack_quat_40(&mut self, value: Quat) {
        self.pack_4f32_40([value.x, value.y, value.z, value.w], [QUAT_RANGE; 4]);
    }

    /// Decodes and renormalizes (zero magnitude becomes identity).
    pub fn unpack_quat_40(&mut self) -> Quat {
        self.unpack_quat_40_raw().normalized()
    }

    /// Decodes without renormalizing; the magnitude may drift off 1.
    pub fn unpack_quat_40_raw(&mut self) -> Quat {
        let [x, y, z, w] = self.unpack_4f32_40([QUAT_RANGE; 4]);
        Quat::new(x, y, z, w)
    }

    /// 16 bits per component, 8 bytes.
    pub fn pack_quat_64(&mut self, value: Quat) {
        self.pack_f32_16(value.x, QUAT_RANGE.0, QUAT_RANGE.1);
        self.pack_f32_16(value.y, QUAT_RANGE.0, QUAT_RANGE.1);
        self.pack_f32_16(value.z, QUAT_RANGE.0, QUAT_RANGE.1);
        self.pack_f32_16(value.w, QUAT_RANGE.0, QUAT_RANGE.1);
    }

    /// Decodes and renormalizes (zero magnitude becomes identity).
    pub fn unpack_quat_64(&mut self) -> Quat {
        self.unpack_quat_64_raw().normalized()
    }

    /// Decodes without renormalizing; the magnitude may drift off 1.
    pub fn unpack_quat_64_raw(&mut self) -> Quat {
        Quat::new(
            self.unpack_f32_16(QUAT_RANGE.0, QUAT_RANGE.1),
            self.unpack_f32_16(QUAT_RANGE.0, QUAT_RANGE.1),
            self.unpack_f32_16(QUAT_RANGE.0, QUAT_RANGE.1),
            self.unpack_f32_16(QUAT_RANGE.0, QUAT_RANGE.1),
        )
    }

    /// 24 bits per component, 12 bytes.
    pub fn pack_quat_96(&mut self, value: Quat) {
        self.pack_f32_24(value.x, QUAT_RANGE.0, QUAT_RANGE.1);
        self.pack_f32_24(value.y, QUAT_RANGE.0, QUAT_RANGE.1);
        self.pack_f32_24(value.z, QUAT_RANGE.0, QUAT_RANGE.1);
        self.pack_f32_24(value.w, QUAT_RANGE.0, QUAT_RANGE.1);
    }

    /// Decodes and renormalizes (zero magnitude becomes identity).
    pub fn unpack_quat_96(&mut self) -> Quat {
        self.unpack_quat_96_raw().normalized()
    }

    /// Decodes without renormalizing; the magnitude may drift off 1.
    pub fn unpack_quat_96_raw(&mut self) -> Quat {
        Quat::new(
            self.unpack_f32_24(QUAT_RANGE.0, QUAT_RANGE.1),
            self.unpack_f32_24(QUAT_RANGE.0, QUAT_RANGE.1),
            self.unpack_f32_24(QUAT_RANGE.0, QUAT_RANGE.1),
            self.unpack_f32_24(QUAT_RANGE.0, QUAT_RANGE.1),
        )
    }
}

#[inline]
fn symmetric2(extents: [f32; 2]) -> [(f32, f32); 2] {
    [(-extents[0], extents[0]), (-extents[1], extents[1])]
}

#[inline]
fn symmetric3(extents: [f32; 3]) -> [(f32, f32); 3] {
    [
        (-extents[0], extents[0]),
        (-extents[1], extents[1]),
        (-extents[2], extents[2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: (f32, f32) = (-1000.0, 1000.0);

    fn step(coef: u32) -> f32 {
        (RANGE.1 - RANGE.0) / coef as f32 * 2.0
    }

    fn quat_step(coef: u32) -> f32 {
        2.0 / coef as f32 * 2.0
    }

    /// Unit quaternion from an axis-angle rotation, for test fixtures.
    fn quat_axis_angle(axis: Vec3, angle: f32) -> Quat {
        let axis = axis.normalized();
        let (sin, cos) = (angle * 0.5).sin_cos();
        Quat::new(axis.x * sin, axis.y * sin, axis.z * sin, cos)
    }

    fn assert_vec3_close(a: Vec3, b: Vec3, tolerance: f32) {
        assert!((a.x - b.x).abs() <= tolerance, "{a:?} vs {b:?}");
        assert!((a.y - b.y).abs() <= tolerance, "{a:?} vs {b:?}");
        assert!((a.z - b.z).abs() <= tolerance, "{a:?} vs {b:?}");
    }

    fn assert_quat_components_close(a: Quat, b: Quat, tolerance: f32) {
        assert!((a.x - b.x).abs() <= tolerance, "{a:?} vs {b:?}");
        assert!((a.y - b.y).abs() <= tolerance, "{a:?} vs {b:?}");
        assert!((a.z - b.z).abs() <= tolerance, "{a:?} vs {b:?}");
        assert!((a.w - b.w).abs() <= tolerance, "{a:?} vs {b:?}");
    }

    /// Max rotation angle between two unit quaternions, in degrees.
    fn angle_between_deg(a: Quat, b: Quat) -> f32 {
        let dot = Quat::dot(a, b).abs().min(1.0);
        2.0 * dot.acos().to_degrees()
    }

    #[test]
    fn test_vec2_tiers() {
        let v = Vec2::new(950.0, 820.0);
        let mut buf = PackBuf::new(64);
        buf.pack_vec2_16(v, [RANGE; 2]);
        buf.pack_vec2_32(v, [RANGE; 2]);
        buf.pack_vec2_48(v, [RANGE; 2]);
        buf.pack_vec2(v);
        buf.seek_to_start();
        let low = buf.unpack_vec2_16([RANGE; 2]);
        assert!((low.x - v.x).abs() <= step(0xFF));
        assert!((low.y - v.y).abs() <= step(0xFF));
        let mid = buf.unpack_vec2_32([RANGE; 2]);
        assert!((mid.x - v.x).abs() <= step(0xFFFF));
        let high = buf.unpack_vec2_48([RANGE; 2]);
        assert!((high.x - v.x).abs() <= step(0xFFFFFF));
        assert_eq!(buf.unpack_vec2(), v);
    }

    #[test]
    fn test_vec3_tiers() {
        let v = Vec3::new(-940.0, 22.0, 830.0);
        let mut buf = PackBuf::new(64);
        buf.pack_vec3_24(v, [RANGE; 3]);
        buf.pack_vec3_48(v, [RANGE; 3]);
        buf.pack_vec3_72(v, [RANGE; 3]);
        buf.pack_vec3(v);
        buf.seek_to_start();
        assert_vec3_close(buf.unpack_vec3_24([RANGE; 3]), v, step(0xFF));
        assert_vec3_close(buf.unpack_vec3_48([RANGE; 3]), v, step(0xFFFF));
        assert_vec3_close(buf.unpack_vec3_72([RANGE; 3]), v, step(0xFFFFFF));
        assert_eq!(buf.unpack_vec3(), v);
    }

    #[test]
    fn test_vec3_extents_match_explicit_ranges() {
        let v = Vec3::new(-12.5, 3.25, 7.75);
        let mut a = PackBuf::new(16);
        let mut b = PackBuf::new(16);
        a.pack_vec3_48_extents(v, [20.0, 20.0, 20.0]);
        b.pack_vec3_48(v, [(-20.0, 20.0); 3]);
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn test_quat_tiers_renormalize() {
        let q = quat_axis_angle(Vec3::new(0.3, 1.0, -0.2), 1.1);
        let mut buf = PackBuf::new(64);
        buf.pack_quat_32(q);
        buf.pack_quat_40(q);
        buf.pack_quat_64(q);
        buf.pack_quat_96(q);
        buf.pack_quat(q);
        buf.seek_to_start();
        for (decoded, coef) in [
            (buf.unpack_quat_32(), 0xFFu32),
            (buf.unpack_quat_40(), 0x3FF),
            (buf.unpack_quat_64(), 0xFFFF),
            (buf.unpack_quat_96(), 0xFFFFFF),
        ] {
            assert!((decoded.length() - 1.0).abs() < 1e-6);
            let max_angle = quat_step(coef) * 180.0;
            assert!(
                angle_between_deg(q, decoded) <= max_angle,
                "coef {coef}: {decoded:?}"
            );
        }
        assert_eq!(buf.unpack_quat(), q);
    }

    #[test]
    fn test_quat_raw_variants_skip_normalization() {
        let q = quat_axis_angle(Vec3::new(1.0, 0.4, 0.0), 0.7);
        let mut buf = PackBuf::new(32);
        buf.pack_quat_32(q);
        buf.pack_quat_64(q);
        buf.seek_to_start();
        let raw32 = buf.unpack_quat_32_raw();
        assert_quat_components_close(raw32, q, quat_step(0xFF));
        let raw64 = buf.unpack_quat_64_raw();
        assert_quat_components_close(raw64, q, quat_step(0xFFFF));
    }

    #[test]
    fn test_under_read_quat_decodes_as_identity() {
        // Too small for any quat tier: every component under-reads to 0,
        // and the zero-magnitude fallback kicks in on the normalizing path.
        let mut buf = PackBuf::new(2);
        assert_eq!(buf.unpack_quat_64(), Quat::IDENTITY);
        assert_eq!(buf.unpack_quat_32_raw(), Quat::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_component_order_is_xyzw() {
        let mut buf = PackBuf::new(16);
        buf.pack_quat(Quat::new(1.0, 2.0, 3.0, 4.0));
        buf.seek_to_start();
        assert_eq!(buf.unpack_f32(), 1.0);
        assert_eq!(buf.unpack_f32(), 2.0);
        assert_eq!(buf.unpack_f32(), 3.0);
        assert_eq!(buf.unpack_f32(), 4.0);
    }
}
