// src/entity/artist.rs
use serde::{Deserialize, Serialize};

use super::{
    first_value, joined_values, optional, parse_flag, parse_genres, required, ShowListing,
};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ArtistForm {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub genres: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: Option<String>,
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    /// Build from raw form pairs. Every selected genre is kept.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            name: first_value(pairs, "name"),
            city: first_value(pairs, "city"),
            state: first_value(pairs, "state"),
            phone: first_value(pairs, "phone"),
            genres: joined_values(pairs, "genres"),
            image_link: first_value(pairs, "image_link"),
            facebook_link: first_value(pairs, "facebook_link"),
            website: first_value(pairs, "website"),
            seeking_venue: first_value(pairs, "seeking_venue"),
            seeking_description: first_value(pairs, "seeking_description"),
        }
    }

    pub fn into_artist(self, id: i64) -> Result<Artist> {
        let genres = parse_genres(&required("Genres", self.genres)?);
        Ok(Artist {
            id,
            name: required("Name", self.name)?,
            city: required("City", self.city)?,
            state: required("State", self.state)?,
            phone: required("Phone", self.phone)?,
            genres,
            image_link: optional(self.image_link),
            facebook_link: optional(self.facebook_link),
            website: optional(self.website),
            seeking_venue: parse_flag(self.seeking_venue.as_deref()),
            seeking_description: optional(self.seeking_description),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtistProfile {
    #[serde(flatten)]
    pub artist: Artist,
    pub upcoming_shows: Vec<ShowListing>,
    pub upcoming_shows_count: usize,
    pub past_shows: Vec<ShowListing>,
    pub past_shows_count: usize,
}
