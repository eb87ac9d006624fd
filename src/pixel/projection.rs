//! Sphere ↔ face-coordinate projection for the nested pixelization.
//!
//! Implements the Gorski et al. (2005) nested scheme: 12 base faces, each a
//! quad-subdivided `nside × nside` grid. The forward direction locates a sky
//! position on a face; the inverse accepts fractional in-face coordinates so
//! pixel centers, vertices, and edge midpoints all share one code path.

use crate::constants::{QUARTER_PI, TWOPI};

/// Ring offset (in units of nside) of the southernmost corner of each face.
const JRLL: [f64; 12] = [
    2.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0, 3.0, 4.0, 4.0, 4.0, 4.0,
];

/// Longitude offset (in units of π/4) of the center of each face.
const JPLL: [f64; 12] = [
    1.0, 3.0, 5.0, 7.0, 0.0, 2.0, 4.0, 6.0, 1.0, 3.0, 5.0, 7.0,
];

/// Determine which of the 12 base faces contains a direction, and the
/// integer (ix, iy) cell position within that face.
///
/// `phi` is the azimuthal angle in radians (any branch), `z` the direction's
/// z component.
pub(crate) fn ang_to_face_xy(phi: f64, z: f64, nside: u64) -> (u8, u64, u64) {
    let z_abs = libm::fabs(z);
    let tt = phi_to_tt(phi);
    if z_abs <= 2.0 / 3.0 {
        equatorial_face_xy(tt, z, nside)
    } else {
        polar_face_xy(tt, z, z_abs, nside)
    }
}

/// Convert phi to tt, the azimuth in units of π/2, normalized to [0, 4).
fn phi_to_tt(phi: f64) -> f64 {
    let phi_norm = if phi < 0.0 { phi + TWOPI } else { phi };
    let tt = phi_norm * 2.0 / crate::constants::PI;
    if tt >= 4.0 {
        tt - 4.0
    } else {
        tt
    }
}

/// Face and cell position for the equatorial belt (|z| <= 2/3).
fn equatorial_face_xy(tt: f64, z: f64, nside: u64) -> (u8, u64, u64) {
    let temp1 = nside as f64 * (0.5 + tt);
    let temp2 = nside as f64 * z * 0.75;
    let jp = (temp1 - temp2) as u64;
    let jm = (temp1 + temp2) as u64;
    let ifp = jp / nside;
    let ifm = jm / nside;
    let face = match ifp.cmp(&ifm) {
        std::cmp::Ordering::Equal => (ifp % 4 + 4) as u8,
        std::cmp::Ordering::Less => (ifp % 4) as u8,
        std::cmp::Ordering::Greater => (ifm % 4 + 8) as u8,
    };
    let ix = jm % nside;
    let iy = nside - 1 - jp % nside;
    (face, ix, iy)
}

/// Face and cell position for the polar caps (|z| > 2/3).
fn polar_face_xy(tt: f64, z: f64, z_abs: f64, nside: u64) -> (u8, u64, u64) {
    let tp = tt - libm::floor(tt);
    let tmp = nside as f64 * libm::sqrt(3.0 * (1.0 - z_abs));
    let jp = ((tp * tmp) as u64).min(nside - 1);
    let jm = (((1.0 - tp) * tmp) as u64).min(nside - 1);
    let ntt = (libm::floor(tt) as u64).min(3);
    let (face, ix, iy) = if z > 0.0 {
        (ntt as u8, nside - jm - 1, nside - jp - 1)
    } else {
        (ntt as u8 + 8, jp, jm)
    };
    (face, ix, iy)
}

/// Inverse projection: fractional in-face coordinates to `(z, phi)`.
///
/// `x` and `y` run in `[0, 1]` across the face along the ix and iy axes; a
/// cell center at integer position `(ix, iy)` has
/// `x = (ix + 0.5) / nside`, `y = (iy + 0.5) / nside`.
pub(crate) fn face_xy_to_ang(face: u8, x: f64, y: f64) -> (f64, f64) {
    let jr = JRLL[face as usize] - x - y;
    let (nr, z) = if jr < 1.0 {
        // north polar cap
        (jr, 1.0 - jr * jr / 3.0)
    } else if jr > 3.0 {
        // south polar cap
        let nr = 4.0 - jr;
        (nr, nr * nr / 3.0 - 1.0)
    } else {
        (1.0, (2.0 - jr) * 2.0 / 3.0)
    };
    let phi = if nr < 1.0e-12 {
        // at a pole the longitude is degenerate
        JPLL[face as usize] * QUARTER_PI
    } else {
        (JPLL[face as usize] + (x - y) / nr) * QUARTER_PI
    };
    let phi = if phi < 0.0 {
        phi + TWOPI
    } else if phi >= TWOPI {
        phi - TWOPI
    } else {
        phi
    };
    (z, phi)
}

/// Interleave (ix, iy) into a Z-order index within a base face.
pub(crate) fn xy_to_zorder(ix: u64, iy: u64, level: u8) -> u64 {
    let mut result: u64 = 0;
    for i in 0..level as u64 {
        let bit_x = (ix >> i) & 1;
        let bit_y = (iy >> i) & 1;
        result |= (bit_x << (2 * i)) | (bit_y << (2 * i + 1));
    }
    result
}

/// Deinterleave a Z-order index back into (ix, iy).
pub(crate) fn zorder_to_xy(zorder: u64, level: u8) -> (u64, u64) {
    let mut ix: u64 = 0;
    let mut iy: u64 = 0;
    for i in 0..level as u64 {
        ix |= ((zorder >> (2 * i)) & 1) << i;
        iy |= ((zorder >> (2 * i + 1)) & 1) << i;
    }
    (ix, iy)
}
