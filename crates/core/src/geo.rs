use glam::{DMat3, DQuat, DVec3, EulerRot, Vec3};

/// Spherical latitude and longitude in radians of a geocentric position.
/// The earth's centre maps to (0, 0).
pub fn geocentric_to_lat_lon(position: DVec3) -> (f64, f64) {
    let radius = position.length();
    if radius <= f64::EPSILON {
        return (0.0, 0.0);
    }

    let latitude = (position.z / radius).clamp(-1.0, 1.0).asin();
    let longitude = position.y.atan2(position.x);
    (latitude, longitude)
}

/// Rotation taking north-east-down axes at (`latitude`, `longitude`) into
/// geocentric axes.
pub fn ltp_ned_to_geocentric(latitude: f64, longitude: f64) -> DQuat {
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_lon, cos_lon) = longitude.sin_cos();

    let north = DVec3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
    let east = DVec3::new(-sin_lon, cos_lon, 0.0);
    let down = DVec3::new(-cos_lat * cos_lon, -cos_lat * sin_lon, -sin_lat);

    DQuat::from_mat3(&DMat3::from_cols(north, east, down)).normalize()
}

/// Converts DIS Euler angles (psi, theta, phi as yaw, pitch, roll) into a
/// geocentric orientation. The angles are taken relative to the local tangent
/// plane at `position`.
pub fn orientation_from_dis(euler: Vec3, position: DVec3) -> DQuat {
    let local = DQuat::from_euler(
        EulerRot::ZYX,
        euler.x as f64,
        euler.y as f64,
        euler.z as f64,
    );
    let (latitude, longitude) = geocentric_to_lat_lon(position);
    (ltp_ned_to_geocentric(latitude, longitude) * local).normalize()
}
