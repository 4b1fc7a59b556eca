// src/entity/venue.rs
use serde::{Deserialize, Serialize};

use super::{
    first_value, joined_values, optional, parse_flag, parse_genres, required, ShowListing,
};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

/// Venue fields as submitted from the create/edit form.
#[derive(Debug, Clone, Default)]
pub struct VenueForm {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: Option<String>,
    pub seeking_description: Option<String>,
}

impl VenueForm {
    /// Build from raw form pairs. Every selected genre is kept.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            name: first_value(pairs, "name"),
            city: first_value(pairs, "city"),
            state: first_value(pairs, "state"),
            address: first_value(pairs, "address"),
            phone: first_value(pairs, "phone"),
            genres: joined_values(pairs, "genres"),
            image_link: first_value(pairs, "image_link"),
            facebook_link: first_value(pairs, "facebook_link"),
            website: first_value(pairs, "website"),
            seeking_talent: first_value(pairs, "seeking_talent"),
            seeking_description: first_value(pairs, "seeking_description"),
        }
    }

    /// Validate into a venue record. The id is ignored by inserts.
    pub fn into_venue(self, id: i64) -> Result<Venue> {
        let genres = parse_genres(&required("Genres", self.genres)?);
        Ok(Venue {
            id,
            name: required("Name", self.name)?,
            city: required("City", self.city)?,
            state: required("State", self.state)?,
            address: required("Address", self.address)?,
            phone: required("Phone", self.phone)?,
            genres,
            image_link: optional(self.image_link),
            facebook_link: optional(self.facebook_link),
            website: optional(self.website),
            seeking_talent: parse_flag(self.seeking_talent.as_deref()),
            seeking_description: optional(self.seeking_description),
        })
    }
}

/// A venue together with its shows split at a reference time.
#[derive(Debug, Clone, Serialize)]
pub struct VenueProfile {
    #[serde(flatten)]
    pub venue: Venue,
    pub upcoming_shows: Vec<ShowListing>,
    pub upcoming_shows_count: usize,
    pub past_shows: Vec<ShowListing>,
    pub past_shows_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_into_venue() {
        let form = VenueForm {
            name: Some("The Musical Hop".to_string()),
            city: Some("San Francisco".to_string()),
            state: Some("CA".to_string()),
            address: Some("1015 Folsom Street".to_string()),
            phone: Some("123-123-1234".to_string()),
            genres: Some("Jazz,Reggae,Swing".to_string()),
            seeking_talent: Some("y".to_string()),
            website: Some("".to_string()),
            ..Default::default()
        };
        let venue = form.into_venue(0).unwrap();
        assert_eq!(venue.genres.len(), 3);
        assert!(venue.seeking_talent);
        assert_eq!(venue.website, None);
    }

    #[test]
    fn test_form_pairs_keep_every_selected_genre() {
        let pairs: Vec<(String, String)> = [
            ("name", "The Musical Hop"),
            ("city", "San Francisco"),
            ("state", "CA"),
            ("address", "1015 Folsom Street"),
            ("phone", "123-123-1234"),
            ("genres", "Jazz"),
            ("genres", "Swing"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let venue = VenueForm::from_pairs(&pairs).into_venue(0).unwrap();
        assert_eq!(venue.name, "The Musical Hop");
        assert_eq!(venue.genres, vec!["Jazz", "Swing"]);
        assert!(!venue.seeking_talent);
    }

    #[test]
    fn test_form_missing_address_rejected() {
        let form = VenueForm {
            name: Some("Park Square".to_string()),
            city: Some("San Francisco".to_string()),
            state: Some("CA".to_string()),
            phone: Some("415-000-1234".to_string()),
            genres: Some("Rock".to_string()),
            ..Default::default()
        };
        let err = form.into_venue(0).unwrap_err();
        assert_eq!(err.to_string(), "Address is required.");
    }
}
