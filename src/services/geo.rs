use crate::models::{Coordinates, EventCandidate, UserProfile};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers (haversine)
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance from the user to the event, `None` when either side has no coordinates
///
/// An unknown distance must stay unknown: callers exclude it from scoring rather
/// than treating it as zero.
pub fn user_event_distance(user: &UserProfile, event: &EventCandidate) -> Option<f64> {
    let from = user.coordinates()?;
    let to = event.coordinates()?;
    Some(haversine_km(from, to))
}
