//! Labeled circles the user drops on the map.

use nightwalk_core::LatLng;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ViewError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserMarker {
    pub id: Uuid,
    pub position: LatLng,
    pub radius_m: f64,
    pub label: String,
}

impl UserMarker {
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidMarker`] when the position is out of
    /// range, the radius is not a positive finite number, or the label is
    /// blank.
    pub fn new(position: LatLng, radius_m: f64, label: &str) -> Result<Self, ViewError> {
        if !position.is_valid() {
            return Err(ViewError::InvalidMarker(format!(
                "coordinates out of range: {position}"
            )));
        }
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(ViewError::InvalidMarker(format!(
                "radius must be positive, got {radius_m}"
            )));
        }
        let label = label.trim();
        if label.is_empty() {
            return Err(ViewError::InvalidMarker("label is empty".to_owned()));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            position,
            radius_m,
            label: label.to_owned(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerSet {
    markers: Vec<UserMarker>,
}

impl MarkerSet {
    pub fn add(&mut self, marker: UserMarker) -> Uuid {
        let id = marker.id;
        self.markers.push(marker);
        id
    }

    /// Removes the marker with `id`; returns whether one was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.markers.len();
        self.markers.retain(|m| m.id != id);
        self.markers.len() != before
    }

    #[must_use]
    pub fn as_slice(&self) -> &[UserMarker] {
        &self.markers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
