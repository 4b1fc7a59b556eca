use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::sqlite_store::parse_timestamp;
use super::{format_timestamp, Database};
use crate::entity::{
    parse_genres, Artist, ArtistProfile, NewShow, Show, ShowListing, ShowSchedule, Venue,
    VenueProfile,
};
use crate::error::{Result, ShowquizError};

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, genres, image_link, \
                             facebook_link, website, seeking_talent, seeking_description";

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, genres, image_link, \
                              facebook_link, website, seeking_venue, seeking_description";

const LISTING_SELECT: &str = "SELECT s.id, s.artist_id, a.name, a.image_link,
                                     s.venue_id, v.name, v.image_link, s.start_time
                              FROM shows s
                              JOIN artists a ON a.id = s.artist_id
                              LEFT JOIN venues v ON v.id = s.venue_id";

/// Venues sharing a city and state
#[derive(Debug, Clone, Serialize)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

fn venue_from_row(row: &Row<'_>) -> rusqlite::Result<Venue> {
    let genres: String = row.get(6)?;
    Ok(Venue {
        id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        state: row.get(3)?,
        address: row.get(4)?,
        phone: row.get(5)?,
        genres: parse_genres(&genres),
        image_link: row.get(7)?,
        facebook_link: row.get(8)?,
        website: row.get(9)?,
        seeking_talent: row.get(10)?,
        seeking_description: row.get(11)?,
    })
}

fn artist_from_row(row: &Row<'_>) -> rusqlite::Result<Artist> {
    let genres: String = row.get(5)?;
    Ok(Artist {
        id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        state: row.get(3)?,
        phone: row.get(4)?,
        genres: parse_genres(&genres),
        image_link: row.get(6)?,
        facebook_link: row.get(7)?,
        website: row.get(8)?,
        seeking_venue: row.get(9)?,
        seeking_description: row.get(10)?,
    })
}

fn listing_from_row(row: &Row<'_>) -> rusqlite::Result<ShowListing> {
    let start_time: String = row.get(7)?;
    Ok(ShowListing {
        show_id: row.get(0)?,
        artist_id: row.get(1)?,
        artist_name: row.get(2)?,
        artist_image_link: row.get(3)?,
        venue_id: row.get(4)?,
        venue_name: row.get(5)?,
        venue_image_link: row.get(6)?,
        start_time: parse_timestamp(7, &start_time)?,
    })
}

impl Database {
    // ========================================================================
    // Venues
    // ========================================================================

    pub fn list_venues(&self) -> Result<Vec<Venue>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM venues ORDER BY id", VENUE_COLUMNS))?;
        let venues = stmt
            .query_map([], venue_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(venues)
    }

    pub fn get_venue(&self, id: i64) -> Result<Option<Venue>> {
        let venue = self
            .conn
            .query_row(
                &format!("SELECT {} FROM venues WHERE id = ?1", VENUE_COLUMNS),
                [id],
                venue_from_row,
            )
            .optional()?;
        Ok(venue)
    }

    /// Case-insensitive substring match on the venue name
    pub fn search_venues(&self, term: &str) -> Result<Vec<Venue>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM venues WHERE instr(lower(name), lower(?1)) > 0 ORDER BY id",
            VENUE_COLUMNS
        ))?;
        let venues = stmt
            .query_map([term], venue_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(venues)
    }

    /// Insert a venue; `venue.id` is ignored and the stored record is returned
    pub fn insert_venue(&self, venue: &Venue) -> Result<Venue> {
        self.conn.execute(
            "INSERT INTO venues
             (name, city, state, address, phone, genres, image_link, facebook_link,
              website, seeking_talent, seeking_description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                venue.name,
                venue.city,
                venue.state,
                venue.address,
                venue.phone,
                venue.genres.join(", "),
                venue.image_link,
                venue.facebook_link,
                venue.website,
                venue.seeking_talent,
                venue.seeking_description,
            ],
        )?;

        Ok(Venue {
            id: self.conn.last_insert_rowid(),
            ..venue.clone()
        })
    }

    pub fn update_venue(&self, venue: &Venue) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE venues SET name = ?2, city = ?3, state = ?4, address = ?5, phone = ?6,
                genres = ?7, image_link = ?8, facebook_link = ?9, website = ?10,
                seeking_talent = ?11, seeking_description = ?12
             WHERE id = ?1",
            params![
                venue.id,
                venue.name,
                venue.city,
                venue.state,
                venue.address,
                venue.phone,
                venue.genres.join(", "),
                venue.image_link,
                venue.facebook_link,
                venue.website,
                venue.seeking_talent,
                venue.seeking_description,
            ],
        )?;

        if changed == 0 {
            return Err(ShowquizError::not_found(format!("venue {}", venue.id)));
        }
        Ok(())
    }

    /// Delete a venue and return it. Its shows stay, with no venue.
    pub fn delete_venue(&self, id: i64) -> Result<Venue> {
        let tx = self.conn.unchecked_transaction()?;

        let venue = tx
            .query_row(
                &format!("SELECT {} FROM venues WHERE id = ?1", VENUE_COLUMNS),
                [id],
                venue_from_row,
            )
            .optional()?
            .ok_or_else(|| ShowquizError::not_found(format!("venue {}", id)))?;

        tx.execute("DELETE FROM venues WHERE id = ?1", [id])?;
        tx.commit()?;

        Ok(venue)
    }

    /// Venues grouped by (city, state) in first-seen order
    pub fn venue_areas(&self, now: DateTime<Utc>) -> Result<Vec<VenueArea>> {
        let mut areas: Vec<VenueArea> = Vec::new();

        for venue in self.list_venues()? {
            let summary = VenueSummary {
                id: venue.id,
                name: venue.name,
                num_upcoming_shows: self.upcoming_show_count_for_venue(venue.id, now)?,
            };

            match areas
                .iter_mut()
                .find(|a| a.city == venue.city && a.state == venue.state)
            {
                Some(area) => area.venues.push(summary),
                None => areas.push(VenueArea {
                    city: venue.city,
                    state: venue.state,
                    venues: vec![summary],
                }),
            }
        }

        Ok(areas)
    }

    pub fn venue_profile(&self, id: i64, now: DateTime<Utc>) -> Result<VenueProfile> {
        let venue = self
            .get_venue(id)?
            .ok_or_else(|| ShowquizError::not_found(format!("venue {}", id)))?;
        let schedule = ShowSchedule::split(self.shows_for_venue(id)?, now);

        Ok(VenueProfile {
            venue,
            upcoming_shows_count: schedule.upcoming.len(),
            upcoming_shows: schedule.upcoming,
            past_shows_count: schedule.past.len(),
            past_shows: schedule.past,
        })
    }

    // ========================================================================
    // Artists
    // ========================================================================

    pub fn list_artists(&self) -> Result<Vec<Artist>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM artists ORDER BY id", ARTIST_COLUMNS))?;
        let artists = stmt
            .query_map([], artist_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(artists)
    }

    pub fn get_artist(&self, id: i64) -> Result<Option<Artist>> {
        let artist = self
            .conn
            .query_row(
                &format!("SELECT {} FROM artists WHERE id = ?1", ARTIST_COLUMNS),
                [id],
                artist_from_row,
            )
            .optional()?;
        Ok(artist)
    }

    pub fn search_artists(&self, term: &str) -> Result<Vec<Artist>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM artists WHERE instr(lower(name), lower(?1)) > 0 ORDER BY id",
            ARTIST_COLUMNS
        ))?;
        let artists = stmt
            .query_map([term], artist_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(artists)
    }

    pub fn insert_artist(&self, artist: &Artist) -> Result<Artist> {
        self.conn.execute(
            "INSERT INTO artists
             (name, city, state, phone, genres, image_link, facebook_link,
              website, seeking_venue, seeking_description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                artist.name,
                artist.city,
                artist.state,
                artist.phone,
                artist.genres.join(", "),
                artist.image_link,
                artist.facebook_link,
                artist.website,
                artist.seeking_venue,
                artist.seeking_description,
            ],
        )?;

        Ok(Artist {
            id: self.conn.last_insert_rowid(),
            ..artist.clone()
        })
    }

    pub fn update_artist(&self, artist: &Artist) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE artists SET name = ?2, city = ?3, state = ?4, phone = ?5, genres = ?6,
                image_link = ?7, facebook_link = ?8, website = ?9,
                seeking_venue = ?10, seeking_description = ?11
             WHERE id = ?1",
            params![
                artist.id,
                artist.name,
                artist.city,
                artist.state,
                artist.phone,
                artist.genres.join(", "),
                artist.image_link,
                artist.facebook_link,
                artist.website,
                artist.seeking_venue,
                artist.seeking_description,
            ],
        )?;

        if changed == 0 {
            return Err(ShowquizError::not_found(format!("artist {}", artist.id)));
        }
        Ok(())
    }

    pub fn artist_summaries(&self, now: DateTime<Utc>) -> Result<Vec<ArtistSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.name,
                    (SELECT COUNT(*) FROM shows s WHERE s.artist_id = a.id AND s.start_time > ?1)
             FROM artists a ORDER BY a.id",
        )?;
        let summaries = stmt
            .query_map([format_timestamp(now)], |row| {
                Ok(ArtistSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    num_upcoming_shows: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(summaries)
    }

    pub fn artist_profile(&self, id: i64, now: DateTime<Utc>) -> Result<ArtistProfile> {
        let artist = self
            .get_artist(id)?
            .ok_or_else(|| ShowquizError::not_found(format!("artist {}", id)))?;
        let schedule = ShowSchedule::split(self.shows_for_artist(id)?, now);

        Ok(ArtistProfile {
            artist,
            upcoming_shows_count: schedule.upcoming.len(),
            upcoming_shows: schedule.upcoming,
            past_shows_count: schedule.past.len(),
            past_shows: schedule.past,
        })
    }

    // ========================================================================
    // Shows
    // ========================================================================

    /// Store a show. The artist, and the venue when given, must exist.
    pub fn insert_show(&self, new: &NewShow) -> Result<Show> {
        let tx = self.conn.unchecked_transaction()?;

        let artist_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM artists WHERE id = ?1)",
            [new.artist_id],
            |row| row.get(0),
        )?;
        if !artist_exists {
            return Err(ShowquizError::not_found(format!("artist {}", new.artist_id)));
        }

        if let Some(venue_id) = new.venue_id {
            let venue_exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM venues WHERE id = ?1)",
                [venue_id],
                |row| row.get(0),
            )?;
            if !venue_exists {
                return Err(ShowquizError::not_found(format!("venue {}", venue_id)));
            }
        }

        tx.execute(
            "INSERT INTO shows (artist_id, venue_id, start_time) VALUES (?1, ?2, ?3)",
            params![new.artist_id, new.venue_id, format_timestamp(new.start_time)],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Show {
            id,
            artist_id: new.artist_id,
            venue_id: new.venue_id,
            start_time: new.start_time,
        })
    }

    /// Every show with artist and venue names, ordered by start time
    pub fn list_shows(&self) -> Result<Vec<ShowListing>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY s.start_time, s.id", LISTING_SELECT))?;
        let listings = stmt
            .query_map([], listing_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(listings)
    }

    pub fn shows_for_venue(&self, venue_id: i64) -> Result<Vec<ShowListing>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE s.venue_id = ?1 ORDER BY s.start_time, s.id",
            LISTING_SELECT
        ))?;
        let listings = stmt
            .query_map([venue_id], listing_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(listings)
    }

    pub fn shows_for_artist(&self, artist_id: i64) -> Result<Vec<ShowListing>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE s.artist_id = ?1 ORDER BY s.start_time, s.id",
            LISTING_SELECT
        ))?;
        let listings = stmt
            .query_map([artist_id], listing_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(listings)
    }

    /// Shows at the venue starting strictly after `now`
    pub fn upcoming_show_count_for_venue(&self, venue_id: i64, now: DateTime<Utc>) -> Result<usize> {
        let count: usize = self.conn.query_row(
            "SELECT COUNT(*) FROM shows WHERE venue_id = ?1 AND start_time > ?2",
            params![venue_id, format_timestamp(now)],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
